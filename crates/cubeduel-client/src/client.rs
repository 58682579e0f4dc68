//! Client state machine.
//!
//! The `Client` owns the connection lifecycle and the view state for one
//! identity. Transport events go through the [`Connection`] and, once
//! decoded, through the reducer. User intents are gated on the derived view
//! predicates and turned into outbound requests.

use cubeduel_core::{Connection, ConnectionAction, ConnectionState, Identity};
use cubeduel_proto::{
    Inbound, Outbound,
    payloads::{
        game::SubmitMove,
        lobby::{CreateMatch, JoinMatch, SetReady, StartMatch},
    },
};

use crate::{
    config::ClientConfig,
    error::ClientError,
    event::{ClientAction, ClientEvent},
    reducer::{self, Outcome},
    state::ClientViewState,
    view::View,
};

/// Move shortcuts offered to the user.
pub const MOVE_PRESETS: [&str; 12] = ["R", "R'", "L", "L'", "U", "U'", "D", "D'", "F", "F'", "B", "B'"];

/// Client for one CubeDuel session.
#[derive(Debug, Clone)]
pub struct Client {
    identity: Identity,
    config: ClientConfig,
    connection: Connection,
    state: ClientViewState,
}

impl Client {
    /// Create a client for `identity`. The connection starts out connecting.
    pub fn new(identity: Identity, config: ClientConfig) -> Self {
        let connection = Connection::new(&identity);
        Self { identity, config, connection, state: ClientViewState::new() }
    }

    /// Local identity.
    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Current view state.
    pub fn state(&self) -> &ClientViewState {
        &self.state
    }

    /// Derived predicates over the current state.
    pub fn view(&self) -> View<'_> {
        View::new(&self.state, &self.identity)
    }

    /// Connection state.
    pub fn connection_state(&self) -> ConnectionState {
        self.connection.state()
    }

    /// Process an event and return resulting actions.
    ///
    /// # Errors
    ///
    /// Returns a [`ClientError`] when an intent is refused. A refused intent
    /// leaves the state untouched and sends nothing.
    pub fn handle(&mut self, event: ClientEvent) -> Result<Vec<ClientAction>, ClientError> {
        match event {
            ClientEvent::Opened => {
                let actions = self.connection.opened();
                Ok(self.execute(actions))
            },
            ClientEvent::FrameReceived(raw) => {
                let actions = self.connection.frame_received(&raw);
                Ok(self.execute(actions))
            },
            ClientEvent::Closed => {
                let actions = self.connection.closed();
                Ok(self.execute(actions))
            },
            ClientEvent::TransportError(detail) => {
                let actions = self.connection.error(&detail);
                Ok(self.execute(actions))
            },
            ClientEvent::CreateMatch => Ok(self.create_match()),
            ClientEvent::JoinMatch { match_id } => self.join_match(match_id.as_deref()),
            ClientEvent::SetJoinTarget(target) => {
                self.state.join_target = target.trim().to_string();
                Ok(vec![ClientAction::StateChanged])
            },
            ClientEvent::ToggleReady => self.toggle_ready(),
            ClientEvent::StartMatch => self.start_match(),
            ClientEvent::SubmitMove(token) => self.submit_move(&token),
            ClientEvent::Shutdown => {
                let actions = self.connection.close();
                Ok(self.execute(actions))
            },
        }
    }

    /// Reset locally, then ask the server for a new match.
    fn create_match(&mut self) -> Vec<ClientAction> {
        self.state.reset_match();
        self.state.last_error = None;

        let request = Outbound::CreateMatch(CreateMatch { player_id: self.player_id() });
        let mut actions = vec![ClientAction::StateChanged];
        actions.extend(self.send(&request));
        actions
    }

    fn join_match(&mut self, match_id: Option<&str>) -> Result<Vec<ClientAction>, ClientError> {
        if self.state.started {
            return Err(ClientError::MatchRunning);
        }

        let target = match match_id.map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => self.state.join_target.clone(),
        };
        if target.is_empty() {
            return Err(ClientError::NoJoinTarget);
        }

        self.state.join_target.clone_from(&target);
        self.state.last_error = None;

        let request = Outbound::JoinMatch(JoinMatch { match_id: target, player_id: self.player_id() });
        let mut actions = vec![ClientAction::StateChanged];
        actions.extend(self.send(&request));
        Ok(actions)
    }

    /// Ask for the negation of the current readiness. The state only
    /// changes when the server echoes it back.
    fn toggle_ready(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        let match_id = self.current_match()?;

        let view = self.view();
        let in_match = view.is_in_match();
        if !in_match || self.state.started {
            return Err(ClientError::CannotSetReady { in_match, started: self.state.started });
        }
        let ready = !view.me().is_some_and(|p| p.ready);

        let request = Outbound::SetReady(SetReady { match_id, player_id: self.player_id(), ready });
        Ok(self.send(&request))
    }

    fn start_match(&mut self) -> Result<Vec<ClientAction>, ClientError> {
        let match_id = self.current_match()?;

        let view = self.view();
        if !view.can_start() {
            return Err(ClientError::CannotStart {
                in_match: view.is_in_match(),
                host: view.is_host(),
                all_ready: view.all_ready(),
                started: self.state.started,
            });
        }

        Ok(self.send(&Outbound::StartMatch(StartMatch { match_id })))
    }

    fn submit_move(&mut self, token: &str) -> Result<Vec<ClientAction>, ClientError> {
        let notation = token.trim();
        if notation.is_empty() {
            return Err(ClientError::EmptyMove);
        }

        let match_id = self.current_match()?;
        let view = self.view();
        if !view.can_send_move() {
            return Err(ClientError::CannotSendMove {
                in_match: view.is_in_match(),
                started: self.state.started,
            });
        }

        let request = Outbound::SubmitMove(SubmitMove { match_id, notation: notation.to_string() });
        Ok(self.send(&request))
    }

    fn current_match(&self) -> Result<String, ClientError> {
        self.state.match_id.clone().ok_or(ClientError::NoMatch)
    }

    fn player_id(&self) -> String {
        self.identity.player_id().to_string()
    }

    fn send(&mut self, request: &Outbound) -> Vec<ClientAction> {
        let actions = self.connection.send(request);
        self.execute(actions)
    }

    /// Run connection actions, folding delivered envelopes into the state.
    fn execute(&mut self, actions: Vec<ConnectionAction>) -> Vec<ClientAction> {
        let mut out = Vec::with_capacity(actions.len());
        for action in actions {
            match action {
                ConnectionAction::SendText(text) => out.push(ClientAction::Send(text)),
                ConnectionAction::Diagnostic(line) => out.push(ClientAction::Diagnostic(line)),
                ConnectionAction::Close => out.push(ClientAction::Close),
                ConnectionAction::Deliver(envelope) => {
                    let inbound = Inbound::from_envelope(envelope);
                    match reducer::apply(&mut self.state, &self.identity, &inbound) {
                        Outcome::Applied => out.push(ClientAction::StateChanged),
                        Outcome::Unchanged | Outcome::Unrecognized => {},
                        Outcome::DuplicateMove { seq } => {
                            out.push(ClientAction::Diagnostic(format!("?? duplicate move seq={seq} ignored")));
                        },
                        Outcome::Legacy(kind) => out.push(ClientAction::Diagnostic(format!(
                            "?? protocol v1 message {kind} not applied (expected {})",
                            kind.successor()
                        ))),
                    }
                },
            }
        }
        out
    }
}
