//! # Sistema de Routing
//! src/router/mod.rs
//!
//! Tabla declarativa `(método, path) → handler`.
//!
//! ## Arquitectura
//!
//! ```text
//! Request → Router::lookup → RouteMatch → Handler → Response
//! ```
//!
//! El path se compara de forma exacta (sin query). Hay dos fallbacks:
//! - El path existe pero no con ese método → 405 Method Not Allowed
//! - El path no existe → 404 Not Found

use crate::commands;
use crate::http::{HttpRequest, Method, Response, StatusCode};

/// Tipo de función handler
///
/// Un handler recibe un request y retorna una respuesta
pub type Handler = fn(&HttpRequest) -> Response;

/// Una ruta: un path y los métodos que acepta
struct Route {
    path: String,
    methods: Vec<(Method, Handler)>,
}

/// Resultado de buscar `(método, path)` en la tabla
#[derive(Clone, Copy)]
pub enum RouteMatch {
    /// Hay handler para ese método y path
    Found(Handler),

    /// El path existe pero no acepta ese método
    MethodNotAllowed,

    /// El path no está en la tabla
    NotFound,
}

/// Router que mapea `(método, path)` a handlers
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    /// Crea un nuevo router vacío
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Router con la tabla de rutas del servidor
    ///
    /// | Método | Path                    | Handler              |
    /// |--------|-------------------------|----------------------|
    /// | GET    | `/`, `/index.html`      | página de bienvenida |
    /// | GET    | `/google`               | 301 a google.com     |
    /// | DELETE | `/database.php`         | 403                  |
    /// | POST   | `/multiply`             | producto de a y b    |
    pub fn with_default_routes() -> Self {
        let mut router = Self::new();

        router.register(Method::GET, "/", commands::index_handler);
        router.register(Method::GET, "/index.html", commands::index_handler);
        router.register(Method::GET, "/google", commands::google_handler);
        router.register(Method::DELETE, "/database.php", commands::database_handler);
        router.register(Method::POST, "/multiply", commands::multiply_handler);

        router
    }

    /// Registra un handler para `(method, path)`
    ///
    /// Registrar dos veces el mismo par reemplaza el handler anterior.
    ///
    /// # Ejemplo
    /// ```
    /// use pooled_http_server::router::Router;
    /// use pooled_http_server::http::{HttpRequest, Method, Response, StatusCode};
    ///
    /// fn hello_handler(_req: &HttpRequest) -> Response {
    ///     Response::text(StatusCode::Ok, "hello")
    /// }
    ///
    /// let mut router = Router::new();
    /// router.register(Method::GET, "/hello", hello_handler);
    /// ```
    pub fn register(&mut self, method: Method, path: &str, handler: Handler) {
        let route = match self.routes.iter().position(|r| r.path == path) {
            Some(idx) => &mut self.routes[idx],
            None => {
                self.routes.push(Route {
                    path: path.to_string(),
                    methods: Vec::new(),
                });
                let last = self.routes.len() - 1;
                &mut self.routes[last]
            }
        };

        match route.methods.iter_mut().find(|(m, _)| *m == method) {
            Some(entry) => entry.1 = handler,
            None => route.methods.push((method, handler)),
        }
    }

    /// Busca `(method, path)` en la tabla
    pub fn lookup(&self, method: &Method, path: &str) -> RouteMatch {
        let Some(route) = self.routes.iter().find(|r| r.path == path) else {
            return RouteMatch::NotFound;
        };

        route
            .methods
            .iter()
            .find(|(m, _)| m == method)
            .map_or(RouteMatch::MethodNotAllowed, |(_, handler)| {
                RouteMatch::Found(*handler)
            })
    }

    /// Encuentra y ejecuta el handler apropiado para un request
    ///
    /// # Ejemplo
    /// ```
    /// use pooled_http_server::router::Router;
    /// use pooled_http_server::http::{HttpRequest, StatusCode};
    ///
    /// let router = Router::with_default_routes();
    /// let request = HttpRequest::parse(b"PUT /database.php HTTP/1.1\r\n\r\n").unwrap();
    /// assert_eq!(router.route(&request).status(), StatusCode::MethodNotAllowed);
    /// ```
    pub fn route(&self, request: &HttpRequest) -> Response {
        match self.lookup(request.method(), request.path()) {
            RouteMatch::Found(handler) => handler(request),
            RouteMatch::MethodNotAllowed => Response::reason(StatusCode::MethodNotAllowed),
            RouteMatch::NotFound => Response::reason(StatusCode::NotFound),
        }
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}
