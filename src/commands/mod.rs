//! # Comandos del Servidor
//! src/commands/mod.rs
//!
//! Handlers de las rutas que conoce el router.
//!
//! - **pages**: página de bienvenida, redirección y respuestas fijas
//! - **multiply**: `POST /multiply` con formulario `a=INT&b=INT`
//!
//! Cada comando es una función handler que recibe un `HttpRequest`
//! y retorna una `Response`.

pub mod multiply;
pub mod pages;

// Re-exportar funciones útiles
pub use multiply::multiply_handler;
pub use pages::{database_handler, google_handler, index_handler};
