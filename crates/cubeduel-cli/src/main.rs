//! CubeDuel terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Local server, fresh identity
//! cubeduel
//!
//! # Remote server, identity kept across runs
//! cubeduel --server wss://cubeduel.example/ws --identity-file ~/.cubeduel-id
//! ```

use std::path::PathBuf;

use clap::Parser;
use cubeduel_cli::{DEFAULT_SERVER, Options};
use cubeduel_client::{ClientConfig, DEFAULT_RECENT_MOVES};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// CubeDuel terminal client
#[derive(Parser, Debug)]
#[command(name = "cubeduel")]
#[command(about = "Line-oriented client for the CubeDuel cube race")]
#[command(version)]
struct Args {
    /// WebSocket URL of the server
    #[arg(short, long, env = "CUBEDUEL_SERVER", default_value = DEFAULT_SERVER)]
    server: String,

    /// File holding the player token
    ///
    /// Created on first use. Without it every run plays as a new player.
    #[arg(long, env = "CUBEDUEL_IDENTITY_FILE")]
    identity_file: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Number of moves shown in the move list
    #[arg(long, default_value_t = DEFAULT_RECENT_MOVES)]
    recent_moves: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::registry().with(fmt::layer().with_writer(std::io::stderr)).with(filter).init();

    let options = Options {
        server: args.server,
        identity_file: args.identity_file,
        config: ClientConfig { recent_moves: args.recent_moves, ..ClientConfig::default() },
    };

    Ok(cubeduel_cli::run(options).await?)
}
