//! Client events and actions.

/// Events the caller feeds into the client.
///
/// The caller is responsible for:
/// - Reporting transport lifecycle (open, close, error)
/// - Forwarding received text frames
/// - Forwarding user intents
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    /// The transport finished opening.
    Opened,

    /// Text frame received from the server.
    FrameReceived(String),

    /// The transport closed.
    Closed,

    /// The transport reported an error. Advisory only.
    TransportError(String),

    /// Create a new match as host.
    CreateMatch,

    /// Join a match. `None` joins the current join target.
    JoinMatch {
        /// Match to join.
        match_id: Option<String>,
    },

    /// Set the default join target.
    SetJoinTarget(String),

    /// Flip the local player's readiness.
    ToggleReady,

    /// Start the match (host only).
    StartMatch,

    /// Submit a move in standard notation.
    SubmitMove(String),

    /// Tear the connection down.
    Shutdown,
}

/// Actions the client produces for the caller to execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientAction {
    /// Write a text frame to the server.
    Send(String),

    /// Append a line to the diagnostic log.
    Diagnostic(String),

    /// The view state changed; re-render.
    StateChanged,

    /// Close the transport.
    Close,
}
