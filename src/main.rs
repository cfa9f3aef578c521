//! # Pooled HTTP Server - Entry Point
//! src/main.rs
//!
//! Punto de entrada del servidor HTTP/1.1.

use pooled_http_server::config::Config;
use pooled_http_server::server::Server;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() {
    let config = Config::new();

    // RUST_LOG tiene prioridad sobre --log-level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    let server = match Server::bind(&config) {
        Ok(server) => server,
        Err(e) => {
            error!(address = %config.address(), error = %e, "Failed to start server");
            std::process::exit(1);
        }
    };

    let address = server
        .local_addr()
        .map(|addr| addr.to_string())
        .unwrap_or_else(|_| config.address());
    info!(
        address = %address,
        workers = server.workers(),
        "HTTP/1.1 server listening"
    );

    // Bloquea hasta un error fatal de accept
    if let Err(e) = server.run() {
        error!(error = %e, "Server stopped");
        std::process::exit(1);
    }
}
