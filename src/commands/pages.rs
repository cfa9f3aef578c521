//! # Páginas y respuestas fijas
//! src/commands/pages.rs
//!
//! - `GET /` y `GET /index.html`: página HTML de bienvenida
//! - `GET /google`: redirección permanente
//! - `DELETE /database.php`: siempre prohibido

use crate::http::{HttpRequest, Response, StatusCode};

/// Página de bienvenida
pub const INDEX_PAGE: &str = "<!doctype html>\n\
<html><head><meta charset=\"utf-8\"><title>Index</title></head>\n\
<body><h1>Hello from the pooled HTTP server :)</h1>\n\
</body></html>\n";

/// Destino de `/google`
pub const GOOGLE_URL: &str = "https://google.com";

/// Handler para `GET /` y `GET /index.html`
pub fn index_handler(_req: &HttpRequest) -> Response {
    Response::html(INDEX_PAGE)
}

/// Handler para `GET /google`
///
/// 301 con `Location: https://google.com`.
pub fn google_handler(_req: &HttpRequest) -> Response {
    Response::reason(StatusCode::MovedPermanently).with_header("Location", GOOGLE_URL)
}

/// Handler para `DELETE /database.php`
pub fn database_handler(_req: &HttpRequest) -> Response {
    Response::reason(StatusCode::Forbidden)
}
