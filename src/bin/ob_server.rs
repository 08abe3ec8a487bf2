//! Standalone order book server speaking the line protocol over TCP.
//!
//! Usage: `ob_server [port]` (default 9999). Log verbosity follows
//! `RUST_LOG`, defaulting to `info`.

use matchbook_rs::manager::InstrumentManager;
use matchbook_rs::server::TcpServer;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let port: u16 = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(9999);

    let service = Arc::new(InstrumentManager::new());
    let server = TcpServer::bind(("0.0.0.0", port), service)?;
    info!("starting order book server on port {}", port);
    server.run()
}
