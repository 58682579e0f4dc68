//! Protocol-to-Application translation layer.
//!
//! The [`Bridge`] wraps the low-level [`cubeduel_client::Client`] and adapts
//! it to the high-level application lifecycle.
//!
//! # Responsibilities
//!
//! - Converts high-level [`crate::AppAction`] into client intents.
//! - Accumulates outgoing text frames to be sent by the driver in the next
//!   I/O cycle.
//! - Converts client actions back into [`crate::AppEvent`]s: diagnostics,
//!   state snapshots, and refused intents as errors.

use cubeduel_client::{Client, ClientAction, ClientConfig, ClientError, ClientEvent, ClientViewState, Identity};

use crate::{AppAction, AppEvent};

/// Bridge between App and Client protocol logic.
#[derive(Debug)]
pub struct Bridge {
    client: Client,
    outgoing: Vec<String>,
    close_requested: bool,
}

impl Bridge {
    /// Create a new Bridge for `identity`.
    pub fn new(identity: Identity, config: ClientConfig) -> Self {
        Self { client: Client::new(identity, config), outgoing: Vec::new(), close_requested: false }
    }

    /// The wrapped client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Current client view state.
    pub fn state(&self) -> &ClientViewState {
        self.client.state()
    }

    /// Process an App action and return resulting App events.
    pub fn process_app_action(&mut self, action: AppAction) -> Vec<AppEvent> {
        let event = match action {
            AppAction::CreateMatch => ClientEvent::CreateMatch,
            AppAction::JoinMatch { match_id } => ClientEvent::JoinMatch { match_id },
            AppAction::ToggleReady => ClientEvent::ToggleReady,
            AppAction::StartMatch => ClientEvent::StartMatch,
            AppAction::SubmitMove { notation } => ClientEvent::SubmitMove(notation),
            AppAction::Render | AppAction::Quit | AppAction::Connect { .. } => return vec![],
        };
        let result = self.client.handle(event);
        self.handle_client_result(result)
    }

    /// The transport is open.
    pub fn handle_opened(&mut self) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Opened);
        let mut events = vec![AppEvent::Connected];
        events.extend(self.handle_client_result(result));
        events
    }

    /// Handle a text frame from the server.
    pub fn handle_frame(&mut self, raw: String) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::FrameReceived(raw));
        self.handle_client_result(result)
    }

    /// The transport closed.
    pub fn handle_closed(&mut self) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::Closed);
        let mut events = self.handle_client_result(result);
        events.push(AppEvent::Disconnected);
        events
    }

    /// The transport reported an error.
    pub fn handle_transport_error(&mut self, detail: String) -> Vec<AppEvent> {
        let result = self.client.handle(ClientEvent::TransportError(detail));
        self.handle_client_result(result)
    }

    /// Tear the connection down. Returns whether the transport must be
    /// closed as a result; `false` on every call after the first.
    pub fn shutdown(&mut self) -> bool {
        let result = self.client.handle(ClientEvent::Shutdown);
        let _ = self.handle_client_result(result);
        std::mem::take(&mut self.close_requested)
    }

    /// Take pending outgoing frames.
    pub fn take_outgoing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.outgoing)
    }

    fn handle_client_result(&mut self, result: Result<Vec<ClientAction>, ClientError>) -> Vec<AppEvent> {
        match result {
            Ok(actions) => self.process_client_actions(actions),
            Err(e) => {
                tracing::warn!(error = %e, "intent refused");
                vec![AppEvent::Error { message: e.to_string() }]
            },
        }
    }

    fn process_client_actions(&mut self, actions: Vec<ClientAction>) -> Vec<AppEvent> {
        let mut events = Vec::new();
        let mut changed = false;

        for action in actions {
            match action {
                ClientAction::Send(text) => self.outgoing.push(text),
                ClientAction::Diagnostic(line) => events.push(AppEvent::Diagnostic(line)),
                ClientAction::StateChanged => changed = true,
                ClientAction::Close => self.close_requested = true,
            }
        }

        if changed {
            events.push(AppEvent::StateChanged(Box::new(self.client.state().clone())));
        }
        events
    }
}
