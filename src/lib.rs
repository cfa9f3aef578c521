//! # Pooled HTTP Server
//! src/lib.rs
//!
//! Servidor HTTP/1.1 concurrente con un pool fijo de workers que consumen
//! una cola FIFO compartida. Cada conexión atiende un único request y se
//! cierra después de responder.
//!
//! ## Arquitectura
//!
//! El servidor está dividido en módulos especializados:
//! - `http`: framing de requests, escritura confiable y serialización de responses
//! - `pool`: cola de tareas (Mutex + Condvar) y workers
//! - `router`: tabla `(método, path) → handler` con fallbacks 404/405
//! - `commands`: handlers de las rutas fijas
//! - `server`: socket de escucha y loop de aceptación
//! - `config`: argumentos CLI y variables de entorno
//!
//! ## Ejemplo de uso
//!
//! ```no_run
//! use pooled_http_server::config::Config;
//! use pooled_http_server::server::Server;
//!
//! let config = Config::default();
//! let server = Server::bind(&config).expect("Error al iniciar servidor");
//! server.run().expect("Error en el loop de aceptación");
//! ```

pub mod commands;
pub mod config;
pub mod http;
pub mod pool;
pub mod router;
pub mod server;
