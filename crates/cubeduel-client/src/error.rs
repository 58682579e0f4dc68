//! Client error types.
//!
//! Every variant is a gate violation: a user intent that cannot be turned
//! into a request in the current state. They never leave the client as
//! outbound traffic and never change state.

use thiserror::Error;

/// Why an intent was refused.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// The intent needs a current match.
    #[error("not in a match")]
    NoMatch,

    /// Join was requested without a match id and no join target is set.
    #[error("no match id to join")]
    NoJoinTarget,

    /// Join was requested while the current match is running.
    #[error("cannot join while a match is running")]
    MatchRunning,

    /// Ready was toggled outside the lobby of a match the local player is in.
    #[error("cannot set ready (in_match={in_match}, started={started})")]
    CannotSetReady {
        /// Local player is in the match.
        in_match: bool,
        /// Match already running.
        started: bool,
    },

    /// Start was requested but the start conditions do not hold.
    #[error("cannot start match (in_match={in_match}, host={host}, all_ready={all_ready}, started={started})")]
    CannotStart {
        /// Local player is in the match.
        in_match: bool,
        /// Local player is host.
        host: bool,
        /// Two players, both ready.
        all_ready: bool,
        /// Match already running.
        started: bool,
    },

    /// A move was submitted outside a running match.
    #[error("cannot send move (in_match={in_match}, started={started})")]
    CannotSendMove {
        /// Local player is in the match.
        in_match: bool,
        /// Match is running.
        started: bool,
    },

    /// The move token was empty after trimming.
    #[error("empty move")]
    EmptyMove,
}
