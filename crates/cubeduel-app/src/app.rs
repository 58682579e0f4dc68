//! Application state machine.
//!
//! This module defines the [`App`] state machine, which manages the
//! interactive state of the application completely decoupled from I/O and
//! protocol mechanics.
//!
//! This is a pure state machine: it consumes [`crate::AppEvent`] inputs and
//! produces [`crate::AppAction`] instructions for the runtime to execute.
//!
//! # Responsibilities
//!
//! - Parses user command lines into intents.
//! - Keeps the diagnostic log and a transient status line.
//! - Mirrors the client's view state for rendering.
//! - Tracks high-level connection status for UI feedback.

use cubeduel_client::{ClientConfig, ClientViewState, Identity, View};

use crate::{
    AppAction, AppEvent,
    input::{Command, HELP, ParseError},
    state::{ConnectionStatus, DiagnosticLog},
};

/// Application state machine.
///
/// Pure state machine that processes events and produces actions.
/// No I/O dependencies - fully testable in simulation.
#[derive(Debug, Clone)]
pub struct App {
    /// Connection status.
    status: ConnectionStatus,
    /// Server URL for connection.
    server_url: String,
    /// Local identity, for view predicates.
    identity: Identity,
    /// Last view state published by the client.
    snapshot: ClientViewState,
    /// Diagnostic log, newest first.
    log: DiagnosticLog,
    /// Moves shown in the recent-move list.
    recent_moves: usize,
    /// Transient status message. `None` if no message.
    status_message: Option<String>,
    /// Set once the user asked to quit.
    quitting: bool,
}

impl App {
    /// Create a new App.
    pub fn new(server_url: String, identity: Identity, config: ClientConfig) -> Self {
        Self {
            status: ConnectionStatus::Disconnected,
            server_url,
            identity,
            snapshot: ClientViewState::new(),
            log: DiagnosticLog::new(config.diagnostic_capacity),
            recent_moves: config.recent_moves,
            status_message: None,
            quitting: false,
        }
    }

    /// Process an event and return actions.
    pub fn handle(&mut self, event: AppEvent) -> Vec<AppAction> {
        match event {
            AppEvent::Line(line) => self.handle_line(&line),
            AppEvent::Connecting => {
                self.status = ConnectionStatus::Connecting;
                vec![AppAction::Render]
            },
            AppEvent::Connected => {
                self.status = ConnectionStatus::Connected;
                vec![AppAction::Render]
            },
            AppEvent::Disconnected => {
                self.status = ConnectionStatus::Disconnected;
                vec![AppAction::Render]
            },
            AppEvent::Diagnostic(line) => {
                self.log.push(line);
                vec![AppAction::Render]
            },
            AppEvent::StateChanged(state) => {
                self.snapshot = *state;
                vec![AppAction::Render]
            },
            AppEvent::Error { message } => {
                self.log.push(format!("!! {message}"));
                self.status_message = Some(format!("Error: {message}"));
                vec![AppAction::Render]
            },
        }
    }

    fn handle_line(&mut self, line: &str) -> Vec<AppAction> {
        match Command::parse(line) {
            Ok(command) => self.command(command),
            Err(ParseError::Empty) => vec![],
            Err(e) => {
                self.status_message = Some(e.to_string());
                vec![AppAction::Render]
            },
        }
    }

    /// Execute a parsed command.
    pub fn command(&mut self, command: Command) -> Vec<AppAction> {
        match command {
            Command::Create => self.create_match(),
            Command::Join(match_id) => self.join_match(match_id),
            Command::Ready => self.toggle_ready(),
            Command::Start => self.start_match(),
            Command::Move(notation) => self.submit_move(notation),
            Command::Help => {
                self.status_message = Some(HELP.to_string());
                vec![AppAction::Render]
            },
            Command::Quit => self.quit(),
        }
    }

    /// Initiate connection to the server.
    pub fn connect(&mut self) -> Vec<AppAction> {
        self.status = ConnectionStatus::Connecting;
        vec![AppAction::Connect { server_url: self.server_url.clone() }, AppAction::Render]
    }

    /// Create a new match.
    pub fn create_match(&mut self) -> Vec<AppAction> {
        self.status_message = Some("Creating match...".to_string());
        vec![AppAction::CreateMatch, AppAction::Render]
    }

    /// Join a match, or the current join target.
    pub fn join_match(&mut self, match_id: Option<String>) -> Vec<AppAction> {
        let target = match_id.as_deref().unwrap_or(&self.snapshot.join_target);
        self.status_message = Some(format!("Joining {target}..."));
        vec![AppAction::JoinMatch { match_id }, AppAction::Render]
    }

    /// Flip readiness.
    pub fn toggle_ready(&self) -> Vec<AppAction> {
        vec![AppAction::ToggleReady, AppAction::Render]
    }

    /// Start the match.
    pub fn start_match(&self) -> Vec<AppAction> {
        vec![AppAction::StartMatch, AppAction::Render]
    }

    /// Submit a move.
    pub fn submit_move(&self, notation: String) -> Vec<AppAction> {
        vec![AppAction::SubmitMove { notation }, AppAction::Render]
    }

    /// Quit the application.
    pub fn quit(&mut self) -> Vec<AppAction> {
        self.quitting = true;
        vec![AppAction::Quit]
    }

    /// Set a status message to display to the user.
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Current connection status.
    pub fn connection_status(&self) -> ConnectionStatus {
        self.status
    }

    /// Server URL.
    pub fn server_url(&self) -> &str {
        &self.server_url
    }

    /// Local identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Last published view state.
    pub fn state(&self) -> &ClientViewState {
        &self.snapshot
    }

    /// Derived predicates over the last published view state.
    pub fn view(&self) -> View<'_> {
        View::new(&self.snapshot, &self.identity)
    }

    /// Diagnostic log.
    pub fn log(&self) -> &DiagnosticLog {
        &self.log
    }

    /// Moves shown in the recent-move list.
    pub fn recent_moves(&self) -> usize {
        self.recent_moves
    }

    /// Transient status message. `None` if no message.
    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    /// Whether the user asked to quit.
    pub fn is_quitting(&self) -> bool {
        self.quitting
    }
}
