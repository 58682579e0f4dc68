//! Terminal client for CubeDuel
//!
//! A thin shell over [`cubeduel_app::Driver`] that reads commands from stdin
//! and prints the match state as text. All orchestration logic lives in the
//! generic [`cubeduel_app::Runtime`].

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod render;
pub mod system_env;
pub mod terminal;

use std::path::{Path, PathBuf};

pub use cubeduel_app::{App, Driver, Runtime};
use cubeduel_client::{ClientConfig, Identity};
use cubeduel_core::{IdentityError, IdentityStore};
pub use system_env::SystemEnv;
pub use terminal::{TerminalDriver, TerminalError};
use thiserror::Error;

/// Default server endpoint.
pub const DEFAULT_SERVER: &str = "ws://localhost:8083/ws";

/// Runtime errors.
#[derive(Debug, Error)]
pub enum RuntimeError {
    /// The session identity could not be loaded or stored.
    #[error("identity error: {0}")]
    Identity(#[from] IdentityError),

    /// Terminal or transport failure.
    #[error("terminal error: {0}")]
    Terminal(#[from] TerminalError),
}

/// Resolved command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// WebSocket URL of the server.
    pub server: String,
    /// File holding the player token. `None` uses a fresh token.
    pub identity_file: Option<PathBuf>,
    /// Client tuning.
    pub config: ClientConfig,
}

impl Default for Options {
    fn default() -> Self {
        Self { server: DEFAULT_SERVER.to_string(), identity_file: None, config: ClientConfig::default() }
    }
}

/// Load the identity from `path`, or generate one that lives only as long as
/// the process.
pub fn load_identity(env: &SystemEnv, path: Option<&Path>) -> Result<Identity, IdentityError> {
    match path {
        Some(path) => IdentityStore::new(path).load_or_create(env),
        None => Ok(Identity::generate(env)),
    }
}

/// Run the terminal client until the user quits or stdin closes.
pub async fn run(options: Options) -> Result<(), RuntimeError> {
    let env = SystemEnv::new();
    let identity = load_identity(&env, options.identity_file.as_deref())?;
    tracing::info!(player_id = %identity.player_id(), server = %options.server, "starting client");

    let mut runtime = Runtime::new(TerminalDriver::stdio(), identity, options.config, options.server);
    runtime.run().await?;

    tracing::info!("client stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_options() {
        let options = Options::default();
        assert_eq!(options.server, "ws://localhost:8083/ws");
        assert_eq!(options.identity_file, None);
        assert_eq!(options.config.recent_moves, 20);
    }

    #[test]
    fn identity_file_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("identity");
        let env = SystemEnv::new();

        let first = load_identity(&env, Some(path.as_path())).unwrap();
        let second = load_identity(&env, Some(path.as_path())).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn no_identity_file_generates_fresh_tokens() {
        let env = SystemEnv::new();
        let a = load_identity(&env, None).unwrap();
        let b = load_identity(&env, None).unwrap();
        assert_ne!(a, b);
    }
}
