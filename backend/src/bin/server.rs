//! veplot HTTP Server Binary
//!
//! Loads the configuration and the variable catalog, sets up the HTTP router
//! and starts serving plan requests.
//!
//! # Usage
//!
//! ```bash
//! # Built-in VE.Direct catalog on 0.0.0.0:8080
//! cargo run --bin veplot-server
//!
//! # Explicit config file and catalog
//! VEPLOT_CONFIG=/etc/veplot/veplot.toml VEPLOT_CATALOG=catalog.toml \
//!   cargo run --bin veplot-server
//! ```
//!
//! # Environment Variables
//!
//! - `VEPLOT_CONFIG`: Config file path (default: search for `veplot.toml`)
//! - `VEPLOT_CATALOG`: Catalog file path, TOML or JSON (default: built-in)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8080)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use veplot::config::ServerConfig;
use veplot::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_thread_ids(true)
        .init();

    info!("Starting veplot HTTP Server");

    let config = ServerConfig::load()?;
    let state = AppState::from_config(&config)?;
    info!(
        "Catalog ready with {} variables ({:?} time labels)",
        state.catalog.len(),
        config.format.timezone
    );

    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
