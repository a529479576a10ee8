//! GBI redirect handler.
//!
//! Serves a static site and hands every request it cannot serve to a pool
//! of redirect processors.
//!
//! ```text
//!     Client Request
//!     ──────────────▶ ServeDir ──(missing file)──▶ dispatcher ──▶ resolver 1..n
//!                        │                            │           GET ?r=<url>
//!     Client Response    │                            ▼
//!     ◀──────────────────┴──────────── 302 Location / fallback page / 404
//! ```

use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;

use gbi_redirect_handler::config::load_config;
use gbi_redirect_handler::http::HttpServer;
use gbi_redirect_handler::lifecycle::shutdown_signal;
use gbi_redirect_handler::observability::{logging, metrics};

#[derive(Parser)]
#[command(name = "gbi-redirect-handler")]
#[command(about = "Not-found fallback asking GBI redirect processors for redirects", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "redirect-handler.toml")]
    config: PathBuf,

    /// Validate the configuration and exit.
    #[arg(long)]
    check: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = load_config(&cli.config)?;
    logging::init(&config.observability.log_level);

    tracing::info!("gbi-redirect-handler v{} starting", env!("CARGO_PKG_VERSION"));

    let server = HttpServer::new(config)?;
    let config = server.config();

    tracing::info!(
        bind_address = %config.listener.bind_address,
        document_root = ?config.site.document_root,
        "Configuration loaded"
    );

    if cli.check {
        tracing::info!(path = ?cli.config, "Configuration is valid");
        return Ok(());
    }

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown_signal()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
