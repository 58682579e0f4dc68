//! Connection lifecycle state machine.
//!
//! Tracks the single persistent connection a session holds to the server and
//! gates traffic on it. Uses the action pattern: every method returns the
//! actions the driver must perform (send a text frame, hand an envelope to
//! the client, append a diagnostic line, close the socket). Nothing here does
//! I/O.
//!
//! # State Machine
//!
//! ```text
//! ┌────────────┐  opened  ┌──────┐  closed / close()  ┌────────┐
//! │ Connecting │─────────>│ Open │───────────────────>│ Closed │
//! └────────────┘          └──────┘                    └────────┘
//!       │                                                  ↑
//!       └──────────────── closed / close() ────────────────┘
//! ```
//!
//! Errors reported by the transport are advisory: they produce a diagnostic
//! and never change the state. There is no transition out of `Closed`.

use std::fmt;

use cubeduel_proto::{Envelope, Outbound, decode};

use crate::identity::{Identity, PlayerId};

/// Actions returned by the connection state machine.
#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionAction {
    /// Write this text frame to the socket.
    SendText(String),

    /// Hand a decoded envelope to the client.
    Deliver(Envelope),

    /// Append a line to the user-visible diagnostic log.
    Diagnostic(String),

    /// Close the socket.
    Close,
}

/// Connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Socket requested, not yet open.
    Connecting,
    /// Frames flow both ways.
    Open,
    /// Terminal. Nothing is sent or delivered.
    Closed,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        })
    }
}

/// Connection state machine for one identity.
#[derive(Debug, Clone)]
pub struct Connection {
    state: ConnectionState,
    player_id: PlayerId,
    close_sent: bool,
    close_observed: bool,
}

impl Connection {
    /// Create a connection in [`ConnectionState::Connecting`].
    pub fn new(identity: &Identity) -> Self {
        Self {
            state: ConnectionState::Connecting,
            player_id: identity.player_id().clone(),
            close_sent: false,
            close_observed: false,
        }
    }

    /// Current state.
    #[must_use]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Whether frames may be sent.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state == ConnectionState::Open
    }

    /// The transport reported the socket open.
    pub fn opened(&mut self) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Connecting {
            tracing::debug!(state = %self.state, "ignoring open in non-connecting state");
            return Vec::new();
        }

        self.state = ConnectionState::Open;
        tracing::info!(player_id = %self.player_id, "connection open");
        vec![ConnectionAction::Diagnostic(format!("connected as playerId={}", self.player_id))]
    }

    /// A text frame arrived.
    ///
    /// Decodable frames are logged and delivered. Undecodable frames are
    /// logged verbatim and go no further.
    pub fn frame_received(&mut self, raw: &str) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Open {
            tracing::debug!(state = %self.state, "dropping frame on non-open connection");
            return vec![ConnectionAction::Diagnostic(format!(
                "!! dropped frame (state={}): {raw}",
                self.state
            ))];
        }

        match decode(raw) {
            Ok(envelope) => vec![
                ConnectionAction::Diagnostic(format!(
                    "<= {} {}",
                    envelope.kind,
                    envelope.payload_text()
                )),
                ConnectionAction::Deliver(envelope),
            ],
            Err(failure) => {
                tracing::warn!(reason = %failure.reason, "undecodable frame");
                vec![ConnectionAction::Diagnostic(format!("<= {}", failure.raw))]
            },
        }
    }

    /// Send a typed request.
    pub fn send(&mut self, message: &Outbound) -> Vec<ConnectionAction> {
        self.send_envelope(&message.to_envelope())
    }

    /// Send an arbitrary envelope.
    ///
    /// When the connection is not open this is a no-op apart from the
    /// diagnostic: nothing is queued for later.
    pub fn send_envelope(&mut self, envelope: &Envelope) -> Vec<ConnectionAction> {
        if self.state != ConnectionState::Open {
            tracing::warn!(kind = %envelope.kind, state = %self.state, "send on non-open connection");
            return vec![ConnectionAction::Diagnostic(format!(
                "!! ws not open (state={})",
                self.state
            ))];
        }

        match envelope.to_text() {
            Ok(text) => vec![
                ConnectionAction::Diagnostic(format!(
                    "=> {} {}",
                    envelope.kind,
                    envelope.payload_text()
                )),
                ConnectionAction::SendText(text),
            ],
            Err(e) => {
                tracing::warn!(kind = %envelope.kind, error = %e, "failed to encode envelope");
                vec![ConnectionAction::Diagnostic(format!("!! encode failed: {e}"))]
            },
        }
    }

    /// The transport reported the socket closed.
    pub fn closed(&mut self) -> Vec<ConnectionAction> {
        self.state = ConnectionState::Closed;
        if self.close_observed {
            return Vec::new();
        }

        self.close_observed = true;
        tracing::info!(player_id = %self.player_id, "connection closed");
        vec![ConnectionAction::Diagnostic("closed".to_string())]
    }

    /// The transport reported an error. Advisory only.
    pub fn error(&mut self, detail: &str) -> Vec<ConnectionAction> {
        tracing::warn!(state = %self.state, detail, "transport error");
        vec![ConnectionAction::Diagnostic("error (see console)".to_string())]
    }

    /// Tear the connection down.
    ///
    /// Idempotent: the first call yields [`ConnectionAction::Close`], later
    /// calls yield nothing.
    pub fn close(&mut self) -> Vec<ConnectionAction> {
        self.state = ConnectionState::Closed;
        if self.close_sent {
            return Vec::new();
        }

        self.close_sent = true;
        tracing::debug!(player_id = %self.player_id, "closing connection");
        vec![ConnectionAction::Close]
    }
}

#[cfg(test)]
mod tests {
    use cubeduel_proto::payloads::lobby::CreateMatch;
    use serde_json::json;

    use super::*;

    fn open_connection() -> Connection {
        let mut conn = Connection::new(&Identity::new("p1"));
        conn.opened();
        conn
    }

    #[test]
    fn connection_lifecycle() {
        let mut conn = Connection::new(&Identity::new("p1"));
        assert_eq!(conn.state(), ConnectionState::Connecting);

        let actions = conn.opened();
        assert_eq!(conn.state(), ConnectionState::Open);
        assert_eq!(actions, vec![ConnectionAction::Diagnostic("connected as playerId=p1".into())]);

        let actions = conn.closed();
        assert_eq!(conn.state(), ConnectionState::Closed);
        assert_eq!(actions, vec![ConnectionAction::Diagnostic("closed".into())]);

        assert!(conn.opened().is_empty());
        assert_eq!(conn.state(), ConnectionState::Closed);
    }

    #[test]
    fn send_before_open_is_dropped() {
        let mut conn = Connection::new(&Identity::new("p1"));
        let msg = Outbound::CreateMatch(CreateMatch { player_id: "p1".into() });

        let actions = conn.send(&msg);
        assert_eq!(
            actions,
            vec![ConnectionAction::Diagnostic("!! ws not open (state=connecting)".into())]
        );

        conn.opened();
        let actions = conn.send(&msg);
        assert_eq!(actions.len(), 2);
        assert_eq!(
            actions[0],
            ConnectionAction::Diagnostic(r#"=> LOBBY_CREATE_MATCH {"playerId":"p1"}"#.into())
        );
        let ConnectionAction::SendText(text) = &actions[1] else {
            panic!("expected SendText, got {:?}", actions[1]);
        };
        let value: serde_json::Value = serde_json::from_str(text).unwrap();
        assert_eq!(value, json!({"type": "LOBBY_CREATE_MATCH", "payload": {"playerId": "p1"}}));
    }

    #[test]
    fn send_after_close_is_dropped() {
        let mut conn = open_connection();
        conn.closed();

        let actions = conn.send_envelope(&Envelope::new("LOBBY_START_MATCH", None));
        assert_eq!(actions, vec![ConnectionAction::Diagnostic("!! ws not open (state=closed)".into())]);
    }

    #[test]
    fn frames_are_logged_then_delivered() {
        let mut conn = open_connection();
        let actions = conn.frame_received(r#"{"type":"LOBBY_MATCH_CREATED","payload":{"matchId":"m1"}}"#);

        assert_eq!(
            actions,
            vec![
                ConnectionAction::Diagnostic(r#"<= LOBBY_MATCH_CREATED {"matchId":"m1"}"#.into()),
                ConnectionAction::Deliver(Envelope::new(
                    "LOBBY_MATCH_CREATED",
                    Some(json!({"matchId": "m1"}))
                )),
            ]
        );
    }

    #[test]
    fn missing_payload_logs_empty_object() {
        let mut conn = open_connection();
        let actions = conn.frame_received(r#"{"type":"GAME_MATCH_ENDED"}"#);
        assert_eq!(actions[0], ConnectionAction::Diagnostic("<= GAME_MATCH_ENDED {}".into()));
    }

    #[test]
    fn undecodable_frame_logs_raw_text_only() {
        let mut conn = open_connection();
        let actions = conn.frame_received("not json at all");
        assert_eq!(actions, vec![ConnectionAction::Diagnostic("<= not json at all".into())]);
    }

    #[test]
    fn frames_before_open_are_not_delivered() {
        let mut conn = Connection::new(&Identity::new("p1"));
        let actions = conn.frame_received(r#"{"type":"SYS_ERROR"}"#);
        assert!(actions.iter().all(|a| matches!(a, ConnectionAction::Diagnostic(_))));
    }

    #[test]
    fn error_does_not_transition() {
        let mut conn = open_connection();
        let actions = conn.error("reset by peer");
        assert_eq!(actions, vec![ConnectionAction::Diagnostic("error (see console)".into())]);
        assert_eq!(conn.state(), ConnectionState::Open);
    }

    #[test]
    fn close_is_idempotent() {
        let mut conn = open_connection();
        assert_eq!(conn.close(), vec![ConnectionAction::Close]);
        assert!(conn.close().is_empty());
        assert_eq!(conn.state(), ConnectionState::Closed);

        // The socket's own close event still reaches the log once.
        assert_eq!(conn.closed(), vec![ConnectionAction::Diagnostic("closed".into())]);
        assert!(conn.closed().is_empty());
    }
}
