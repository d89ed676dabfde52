//! Serve the built-in stage with default settings
//!
//! cargo run -p hexdig-server --example run_server
//! (set RUST_LOG=debug to watch every dig and solve)

use hexdig_server::{run_server, ServerConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = ServerConfig::default();
    println!(
        "Stage '{}' at http://localhost:{}/ (renderer files from {})",
        config.stage, config.port, config.static_dir
    );

    run_server(config).await
}
