//! Roster server binary.
//!
//! Serves the roster API over the data directory named by `ROSTER_DATA_DIR`
//! (default `./data`) on the address in `ROSTER_ADDR` (default
//! `127.0.0.1:3000`).

use roster_engine::api::{AppState, create_router};
use roster_engine::config::DataPaths;
use roster_engine::logging;
use tracing::info;

const ADDR_ENV: &str = "ROSTER_ADDR";
const DEFAULT_ADDR: &str = "127.0.0.1:3000";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let paths = DataPaths::from_env();
    let addr = std::env::var(ADDR_ENV).unwrap_or_else(|_| DEFAULT_ADDR.to_string());

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        addr = %listener.local_addr()?,
        data_dir = %paths.root().display(),
        version = env!("CARGO_PKG_VERSION"),
        "Roster server listening"
    );

    axum::serve(listener, create_router(AppState::new(paths))).await?;
    Ok(())
}
