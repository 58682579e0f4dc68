//! Application input events.
//!
//! This module defines [`AppEvent`], the set of inputs that drive the
//! [`crate::App`] state machine.
//!
//! Events originate from two distinct sources:
//! - User input lines.
//! - Protocol notifications translated from the underlying client.

use cubeduel_client::ClientViewState;

/// Events processed by the App state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// A line of user input.
    Line(String),

    /// Connection in progress.
    Connecting,

    /// Connection open.
    Connected,

    /// Connection closed.
    Disconnected,

    /// Line for the diagnostic log.
    Diagnostic(String),

    /// The client's view state changed.
    StateChanged(Box<ClientViewState>),

    /// An intent was refused or an operation failed.
    Error {
        /// Error description.
        message: String,
    },
}
