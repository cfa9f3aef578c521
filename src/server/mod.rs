//! # Módulo del Servidor HTTP
//! src/server/mod.rs
//!
//! Este módulo implementa el servidor TCP que:
//! 1. Escucha en un puerto (SO_REUSEADDR, backlog máximo)
//! 2. Acepta conexiones en un único thread
//! 3. Encola cada conexión en el pool de workers
//! 4. Cada worker lee, rutea, responde y cierra

pub mod tcp;

// Re-exportar para facilitar el uso
pub use tcp::{handle_connection, Server};
