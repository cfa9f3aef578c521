//! # Servidor TCP con Pool de Workers
//! src/server/tcp.rs
//!
//! Un único thread acepta conexiones y, por cada una, encola una tarea
//! "parsear, rutear, responder, cerrar" en el `WorkerPool`.
//!
//! ```text
//! accept() ──► enqueue(task) ──► worker: read_request → Router → Response → close
//! ```
//!
//! No se aplican timeouts de lectura: un cliente lento o silencioso ocupa
//! un worker hasta que cierre la conexión.

use crate::config::Config;
use crate::http::{read_request, Response};
use crate::pool::{TaskResult, WorkerPool};
use crate::router::Router;
use socket2::{Domain, Protocol, Socket, Type};
use std::io::{self, ErrorKind, Read, Write};
use std::net::{IpAddr, Shutdown, SocketAddr, TcpListener, TcpStream, ToSocketAddrs};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Servidor HTTP/1.1 concurrente
pub struct Server {
    listener: TcpListener,
    router: Arc<Router>,
    pool: WorkerPool,
}

impl Server {
    /// Crea el socket de escucha y lanza el pool de workers
    ///
    /// # Errores
    ///
    /// Cualquier fallo de socket/bind/listen o de creación de threads.
    /// Son errores fatales de arranque.
    pub fn bind(config: &Config) -> io::Result<Self> {
        Self::with_router(config, Router::with_default_routes())
    }

    /// Igual que `bind`, con una tabla de rutas propia
    pub fn with_router(config: &Config, router: Router) -> io::Result<Self> {
        let address = resolve(&config.address())?;
        let listener = create_listener(address)?;
        let pool = WorkerPool::start(config.worker_count())?;

        Ok(Self {
            listener,
            router: Arc::new(router),
            pool,
        })
    }

    /// Dirección real de escucha (útil con puerto 0)
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Número de workers del pool
    pub fn workers(&self) -> usize {
        self.pool.size()
    }

    /// Loop de aceptación
    ///
    /// Corre indefinidamente. Solo retorna ante un error de `accept` que no
    /// sea una interrupción; en ese caso drena el pool antes de retornar.
    pub fn run(self) -> io::Result<()> {
        let Self {
            listener,
            router,
            pool,
        } = self;

        let result = loop {
            match listener.accept() {
                Ok((stream, peer)) => {
                    debug!(client = %peer, queued = pool.pending(), "Connection accepted");
                    let router = Arc::clone(&router);
                    pool.execute(move || handle_client(stream, peer, &router));
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(error = %e, "Failed to accept connection");
                    break Err(e);
                }
            }
        };

        pool.shutdown();
        result
    }
}

/// Tarea encolada por cada conexión aceptada
fn handle_client(mut stream: TcpStream, peer: SocketAddr, router: &Router) -> TaskResult {
    handle_connection(&mut stream, peer.ip(), router)?;

    if let Err(e) = stream.shutdown(Shutdown::Both) {
        debug!(client = %peer, error = %e, "Failed to shut down connection");
    }
    Ok(())
}

/// Atiende un único request sobre `stream`
///
/// Un error de framing no es un fallo de la tarea: se registra y la conexión
/// se cierra sin escribir nada. Solo los errores de escritura se propagan.
pub fn handle_connection<S: Read + Write>(
    stream: &mut S,
    client_ip: IpAddr,
    router: &Router,
) -> io::Result<Option<Response>> {
    let request = match read_request(stream) {
        Ok(request) => request,
        Err(e) => {
            warn!(client = %client_ip, error = %e, "Invalid request");
            return Ok(None);
        }
    };

    info!(
        client = %client_ip,
        method = %request.method(),
        path = request.path(),
        version = request.version(),
        "Request"
    );

    let response = router.route(&request);
    response.write_to(stream)?;

    debug!(client = %client_ip, status = response.status().as_u16(), "Response sent");
    Ok(Some(response))
}

fn resolve(address: &str) -> io::Result<SocketAddr> {
    address.to_socket_addrs()?.next().ok_or_else(|| {
        io::Error::new(
            ErrorKind::AddrNotAvailable,
            format!("could not resolve {}", address),
        )
    })
}

/// Socket de escucha con SO_REUSEADDR y backlog máximo de la plataforma
fn create_listener(addr: SocketAddr) -> io::Result<TcpListener> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;

    // Permite reabrir el puerto sin esperar TIME_WAIT
    if let Err(e) = socket.set_reuse_address(true) {
        warn!(error = %e, "Failed to set SO_REUSEADDR");
    }

    socket.bind(&addr.into())?;
    socket.listen(libc::SOMAXCONN)?;

    Ok(socket.into())
}
