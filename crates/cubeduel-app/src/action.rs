//! Application side-effects and intents.
//!
//! This module defines the [`AppAction`] enum, which represents instructions
//! produced by the [`crate::App`] state machine for the runtime to execute.

/// Actions produced by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    /// Render the UI.
    Render,

    /// Quit the application.
    Quit,

    /// Connect to server.
    Connect {
        /// WebSocket URL.
        server_url: String,
    },

    /// Create a new match.
    CreateMatch,

    /// Join a match. `None` uses the current join target.
    JoinMatch {
        /// Match to join.
        match_id: Option<String>,
    },

    /// Flip readiness.
    ToggleReady,

    /// Start the match.
    StartMatch,

    /// Submit a move.
    SubmitMove {
        /// Move notation.
        notation: String,
    },
}
