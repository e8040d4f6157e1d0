//! Incidents HTTP Server Binary
//!
//! Loads configuration, opens the SQLite store, and serves the REST API.
//!
//! # Usage
//!
//! ```bash
//! DATABASE_PATH=./stpaul_incidents.sqlite3 PORT=8000 \
//!   cargo run --bin incidents-server
//! ```
//!
//! # Environment Variables
//!
//! - `INCIDENTS_CONFIG`: TOML config file (default: `incidents.toml` if present)
//! - `HOST`: Server host (default: 0.0.0.0)
//! - `PORT`: Server port (default: 8000)
//! - `DATABASE_PATH`: SQLite database file (default: stpaul_incidents.sqlite3)
//! - `RUST_LOG`: Log level (default: info)

use std::env;
use std::net::SocketAddr;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use incidents_api::config::AppConfig;
use incidents_api::db::RepositoryFactory;
use incidents_api::http::{create_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
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

    info!("Starting incidents HTTP server");

    let config = AppConfig::load()?;

    // One repository for the whole process, shared through the router state
    let repository = RepositoryFactory::from_settings(&config.database).await?;
    info!("Repository initialized at {}", config.database.path);

    let state = AppState::new(repository);
    let app = create_router(state);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
