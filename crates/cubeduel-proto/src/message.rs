//! Typed inbound and outbound messages.
//!
//! [`Inbound`] is the closed set of things the client can receive. Every
//! [`Envelope`] maps to exactly one variant, so consumers match exhaustively
//! and a new server message is a compile-time decision rather than a silent
//! fall-through.
//!
//! [`Outbound`] is the closed set of requests the client can make.

use serde_json::Value;

use crate::{
    Envelope, LegacyMessageType, MessageType,
    errors::Result,
    payloads::{
        Payload,
        game::{CubeState, MatchEnded, MatchStarted, MoveApplied, SubmitMove},
        lobby::{
            CreateMatch, JoinMatch, MatchCreated, PlayerJoined, PlayerLeft, ReadyUpdated,
            SetReady, StartMatch,
        },
        system::ErrorReport,
    },
};

/// A server-to-client message.
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// `LOBBY_MATCH_CREATED`
    MatchCreated(MatchCreated),
    /// `LOBBY_PLAYER_JOINED`
    PlayerJoined(PlayerJoined),
    /// `LOBBY_LEFT_MATCH`
    PlayerLeft(PlayerLeft),
    /// `LOBBY_READY_UPDATED`
    ReadyUpdated(ReadyUpdated),
    /// `GAME_MATCH_STARTED`
    MatchStarted(MatchStarted),
    /// `GAME_MOVE_APPLIED`
    MoveApplied(MoveApplied),
    /// `GAME_CUBE_STATE`
    CubeState(CubeState),
    /// `GAME_MATCH_ENDED`
    MatchEnded(MatchEnded),
    /// `SYS_ERROR`
    Error(ErrorReport),
    /// A v1 (bare-scheme) message. Recognized but not interpreted.
    Legacy {
        /// The v1 type.
        kind: LegacyMessageType,
        /// Raw payload.
        payload: Value,
    },
    /// A known v2 type that only flows client-to-server.
    Unexpected(MessageType),
    /// A type name outside both registries.
    Unknown {
        /// The type name as received.
        kind: String,
    },
}

impl Inbound {
    /// Classify an envelope. Never fails; payload problems become defaults.
    pub fn from_envelope(envelope: Envelope) -> Self {
        let Envelope { kind, payload } = envelope;

        let Some(message_type) = MessageType::parse(&kind) else {
            return match LegacyMessageType::parse(&kind) {
                Some(kind) => Self::Legacy { kind, payload },
                None => Self::Unknown { kind },
            };
        };

        match message_type {
            MessageType::LobbyMatchCreated => Self::MatchCreated(Payload::from_value(payload)),
            MessageType::LobbyPlayerJoined => Self::PlayerJoined(Payload::from_value(payload)),
            MessageType::LobbyLeftMatch => Self::PlayerLeft(Payload::from_value(payload)),
            MessageType::LobbyReadyUpdated => Self::ReadyUpdated(Payload::from_value(payload)),
            MessageType::GameMatchStarted => Self::MatchStarted(Payload::from_value(payload)),
            MessageType::GameMoveApplied => Self::MoveApplied(Payload::from_value(payload)),
            MessageType::GameCubeState => Self::CubeState(Payload::from_value(payload)),
            MessageType::GameMatchEnded => Self::MatchEnded(Payload::from_value(payload)),
            MessageType::SysError => Self::Error(Payload::from_value(payload)),
            MessageType::LobbyCreateMatch
            | MessageType::LobbyJoinMatch
            | MessageType::LobbySetReady
            | MessageType::LobbyStartMatch
            | MessageType::GameSubmitMove => Self::Unexpected(message_type),
        }
    }

    /// Type name for logging.
    pub fn kind(&self) -> &str {
        match self {
            Self::MatchCreated(_) => MessageType::LobbyMatchCreated.as_str(),
            Self::PlayerJoined(_) => MessageType::LobbyPlayerJoined.as_str(),
            Self::PlayerLeft(_) => MessageType::LobbyLeftMatch.as_str(),
            Self::ReadyUpdated(_) => MessageType::LobbyReadyUpdated.as_str(),
            Self::MatchStarted(_) => MessageType::GameMatchStarted.as_str(),
            Self::MoveApplied(_) => MessageType::GameMoveApplied.as_str(),
            Self::CubeState(_) => MessageType::GameCubeState.as_str(),
            Self::MatchEnded(_) => MessageType::GameMatchEnded.as_str(),
            Self::Error(_) => MessageType::SysError.as_str(),
            Self::Legacy { kind, .. } => kind.as_str(),
            Self::Unexpected(kind) => kind.as_str(),
            Self::Unknown { kind } => kind,
        }
    }

    /// Build the envelope for this message.
    ///
    /// Used by simulation servers; the client only ever decodes inbound
    /// messages.
    pub fn to_envelope(&self) -> Envelope {
        let payload = match self {
            Self::MatchCreated(p) => p.to_value(),
            Self::PlayerJoined(p) => p.to_value(),
            Self::PlayerLeft(p) => p.to_value(),
            Self::ReadyUpdated(p) => p.to_value(),
            Self::MatchStarted(p) => p.to_value(),
            Self::MoveApplied(p) => p.to_value(),
            Self::CubeState(p) => p.to_value(),
            Self::MatchEnded(p) => p.to_value(),
            Self::Error(p) => p.to_value(),
            Self::Legacy { payload, .. } => payload.clone(),
            Self::Unexpected(_) | Self::Unknown { .. } => Value::Null,
        };
        Envelope::new(self.kind(), Some(payload))
    }
}

/// A client-to-server request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// `LOBBY_CREATE_MATCH`
    CreateMatch(CreateMatch),
    /// `LOBBY_JOIN_MATCH`
    JoinMatch(JoinMatch),
    /// `LOBBY_SET_READY`
    SetReady(SetReady),
    /// `LOBBY_START_MATCH`
    StartMatch(StartMatch),
    /// `GAME_SUBMIT_MOVE`
    SubmitMove(SubmitMove),
}

impl Outbound {
    /// Message type of this request.
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::CreateMatch(_) => MessageType::LobbyCreateMatch,
            Self::JoinMatch(_) => MessageType::LobbyJoinMatch,
            Self::SetReady(_) => MessageType::LobbySetReady,
            Self::StartMatch(_) => MessageType::LobbyStartMatch,
            Self::SubmitMove(_) => MessageType::GameSubmitMove,
        }
    }

    /// Payload as a JSON value.
    pub fn payload(&self) -> Value {
        match self {
            Self::CreateMatch(p) => p.to_value(),
            Self::JoinMatch(p) => p.to_value(),
            Self::SetReady(p) => p.to_value(),
            Self::StartMatch(p) => p.to_value(),
            Self::SubmitMove(p) => p.to_value(),
        }
    }

    /// Wrap into an envelope.
    pub fn to_envelope(&self) -> Envelope {
        Envelope::new(self.message_type().as_str(), Some(self.payload()))
    }

    /// Encode to wire text.
    pub fn encode(&self) -> Result<String> {
        self.to_envelope().to_text()
    }

    /// Parse a request from an envelope. `None` if it is not a request type.
    ///
    /// Used by simulation servers.
    pub fn from_envelope(envelope: Envelope) -> Option<Self> {
        let Envelope { kind, payload } = envelope;
        let message = match MessageType::parse(&kind)? {
            MessageType::LobbyCreateMatch => Self::CreateMatch(Payload::from_value(payload)),
            MessageType::LobbyJoinMatch => Self::JoinMatch(Payload::from_value(payload)),
            MessageType::LobbySetReady => Self::SetReady(Payload::from_value(payload)),
            MessageType::LobbyStartMatch => Self::StartMatch(Payload::from_value(payload)),
            MessageType::GameSubmitMove => Self::SubmitMove(Payload::from_value(payload)),
            _ => return None,
        };
        Some(message)
    }
}
