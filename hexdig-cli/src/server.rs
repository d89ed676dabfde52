//! `hexdig serve`: host the renderer and its JSON API
//!
//! Flags are checked up front so a typo in a path or stage id fails before
//! the runtime starts; the HTTP side lives in `hexdig-server`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use hexdig_core::{StageCatalog, DEFAULT_STAGE};
use hexdig_server::{run_server, ServerConfig};

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory holding the renderer's static files
    #[arg(long, default_value = "hexdig/visualizer")]
    pub static_dir: PathBuf,

    /// Stage loaded at startup
    #[arg(long, default_value = DEFAULT_STAGE)]
    pub stage: String,

    /// Directory of extra stage JSON files
    #[arg(long, value_name = "DIR")]
    pub stages_dir: Option<PathBuf>,
}

pub fn run(args: ServerArgs) -> Result<()> {
    let config = server_config(&args)?;
    tracing::info!(
        "Serving stage '{}' on port {}",
        config.stage,
        config.port
    );

    tokio::runtime::Runtime::new()
        .context("starting the async runtime")?
        .block_on(run_server(config))
}

/// Turn flags into a server config, rejecting unusable paths and stage ids
fn server_config(args: &ServerArgs) -> Result<ServerConfig> {
    check_static_dir(&args.static_dir)?;

    let catalog = match &args.stages_dir {
        Some(dir) => {
            anyhow::ensure!(dir.is_dir(), "Stage directory not found: {}", dir.display());
            StageCatalog::load_dir(dir)?
        }
        None => StageCatalog::builtin(),
    };
    catalog.get(&args.stage)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        stage: args.stage.clone(),
        stages_dir: args.stages_dir.clone(),
    })
}

/// A missing static dir only disables the renderer; a file in its place is an error
fn check_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory {} does not exist; only the API will be served",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!("Static path is not a directory: {}", path.display());
    }
    Ok(())
}
