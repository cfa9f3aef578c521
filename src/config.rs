//! # Configuración del Servidor
//! src/config.rs
//!
//! Configuración con soporte para argumentos CLI y variables de entorno.
//!
//! ## Ejemplos de uso
//!
//! ### CLI
//! ```bash
//! ./pooled_http_server --port 8080 --workers 16 --log-level debug
//! ```
//!
//! ### Variables de entorno
//! ```bash
//! HTTP_PORT=9000 WORKERS=4 ./pooled_http_server
//! ```

use clap::Parser;
use std::thread;

/// Workers por defecto si no se puede detectar el paralelismo
pub const FALLBACK_WORKERS: usize = 8;

/// Mínimo de workers al calcular desde el hardware
pub const MIN_WORKERS: usize = 4;

/// Configuración del servidor HTTP/1.1
#[derive(Debug, Clone, Parser)]
#[command(name = "pooled_http_server")]
#[command(about = "Servidor HTTP/1.1 con pool fijo de workers")]
#[command(version = "0.1.0")]
pub struct Config {
    /// Puerto en el que escucha el servidor
    #[arg(short, long, default_value = "8080", env = "HTTP_PORT")]
    pub port: u16,

    /// Host/IP en el que escucha (todas las interfaces por defecto)
    #[arg(long, default_value = "0.0.0.0", env = "HTTP_HOST")]
    pub host: String,

    /// Número de workers (por defecto: max(4, 2 × núcleos), u 8 si no se detectan)
    #[arg(short, long, env = "WORKERS")]
    pub workers: Option<usize>,

    /// Nivel de log (trace, debug, info, warn, error); RUST_LOG tiene prioridad
    #[arg(long = "log-level", default_value = "info", env = "LOG_LEVEL")]
    pub log_level: String,
}

impl Config {
    /// Crea una nueva configuración parseando argumentos CLI
    pub fn new() -> Self {
        Config::parse()
    }

    /// Obtiene la dirección completa para bind (host:port)
    ///
    /// # Ejemplo
    /// ```rust
    /// use pooled_http_server::config::Config;
    ///
    /// let config = Config::default();
    /// assert_eq!(config.address(), "0.0.0.0:8080");
    /// ```
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Número de workers del pool
    ///
    /// Usa `--workers` si se indicó; si no, lo calcula desde el hardware.
    pub fn worker_count(&self) -> usize {
        self.workers
            .unwrap_or_else(|| default_worker_count(thread::available_parallelism().ok().map(|n| n.get())))
    }

    /// Valida la configuración
    ///
    /// Retorna errores si hay valores inválidos
    pub fn validate(&self) -> Result<(), String> {
        if self.workers == Some(0) {
            return Err("Workers must be >= 1".to_string());
        }
        if self.host.trim().is_empty() {
            return Err("Host must not be empty".to_string());
        }

        Ok(())
    }
}

/// Tamaño del pool a partir del paralelismo detectado
fn default_worker_count(parallelism: Option<usize>) -> usize {
    match parallelism {
        Some(cores) if cores > 0 => (cores * 2).max(MIN_WORKERS),
        _ => FALLBACK_WORKERS,
    }
}

impl Default for Config {
    /// Configuración por defecto
    fn default() -> Self {
        Self {
            port: 8080,
            host: "0.0.0.0".to_string(),
            workers: None,
            log_level: "info".to_string(),
        }
    }
}
