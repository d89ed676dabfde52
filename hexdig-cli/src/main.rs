//! HEXDIG CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the renderer-facing HTTP server
//! - solve: Score a stage (optionally after some digs) and print the picks

mod server;
mod solve;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexdig")]
#[command(about = "Hex treasure-dig puzzle solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server for the board renderer
    Serve(server::ServerArgs),
    /// Score a stage and print the recommended digs
    Solve(solve::SolveArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging (RUST_LOG controls verbosity)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Solve(args) => solve::run(args),
    }
}
