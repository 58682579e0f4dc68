//! Message type registry.
//!
//! Two naming schemes exist on the wire. The prefixed scheme
//! (`LOBBY_*`, `GAME_*`, `SYS_*`) is protocol v2 and carries moves, the
//! scramble and per-player cube state. The bare scheme (`CREATE_MATCH`,
//! `MATCH_CREATED`, ...) is protocol v1. Both are recognized so a v1 frame is
//! reported as such instead of being lumped in with unknown traffic.

use std::fmt;

/// Protocol generation a type name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolVersion {
    /// Bare names (`MATCH_CREATED`).
    V1,
    /// Prefixed names (`LOBBY_MATCH_CREATED`).
    V2,
}

/// Prefixed (v2) message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageType {
    /// Client asks the server to create a match.
    LobbyCreateMatch,
    /// Server acknowledges a newly created match.
    LobbyMatchCreated,
    /// Client asks to join an existing match.
    LobbyJoinMatch,
    /// Server reports a player leaving.
    LobbyLeftMatch,
    /// Server reports a player joining.
    LobbyPlayerJoined,
    /// Client toggles readiness.
    LobbySetReady,
    /// Server echoes readiness changes.
    LobbyReadyUpdated,
    /// Host asks the server to start the match.
    LobbyStartMatch,
    /// Client submits a move.
    GameSubmitMove,
    /// Server reports an applied move.
    GameMoveApplied,
    /// Server reports the end of a match.
    GameMatchEnded,
    /// Server reports the start of a match.
    GameMatchStarted,
    /// Server pushes a player's cube state.
    GameCubeState,
    /// Server reports a domain error.
    SysError,
}

impl MessageType {
    /// Every v2 type, in registry order.
    pub const ALL: [Self; 14] = [
        Self::LobbyCreateMatch,
        Self::LobbyMatchCreated,
        Self::LobbyJoinMatch,
        Self::LobbyLeftMatch,
        Self::LobbyPlayerJoined,
        Self::LobbySetReady,
        Self::LobbyReadyUpdated,
        Self::LobbyStartMatch,
        Self::GameSubmitMove,
        Self::GameMoveApplied,
        Self::GameMatchEnded,
        Self::GameMatchStarted,
        Self::GameCubeState,
        Self::SysError,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::LobbyCreateMatch => "LOBBY_CREATE_MATCH",
            Self::LobbyMatchCreated => "LOBBY_MATCH_CREATED",
            Self::LobbyJoinMatch => "LOBBY_JOIN_MATCH",
            Self::LobbyLeftMatch => "LOBBY_LEFT_MATCH",
            Self::LobbyPlayerJoined => "LOBBY_PLAYER_JOINED",
            Self::LobbySetReady => "LOBBY_SET_READY",
            Self::LobbyReadyUpdated => "LOBBY_READY_UPDATED",
            Self::LobbyStartMatch => "LOBBY_START_MATCH",
            Self::GameSubmitMove => "GAME_SUBMIT_MOVE",
            Self::GameMoveApplied => "GAME_MOVE_APPLIED",
            Self::GameMatchEnded => "GAME_MATCH_ENDED",
            Self::GameMatchStarted => "GAME_MATCH_STARTED",
            Self::GameCubeState => "GAME_CUBE_STATE",
            Self::SysError => "SYS_ERROR",
        }
    }

    /// Look up a wire name. `None` for anything outside the v2 registry.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// Whether the server sends this type to clients.
    pub fn is_server_to_client(self) -> bool {
        matches!(
            self,
            Self::LobbyMatchCreated
                | Self::LobbyLeftMatch
                | Self::LobbyPlayerJoined
                | Self::LobbyReadyUpdated
                | Self::GameMoveApplied
                | Self::GameMatchEnded
                | Self::GameMatchStarted
                | Self::GameCubeState
                | Self::SysError
        )
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bare (v1) message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LegacyMessageType {
    /// `CREATE_MATCH`
    CreateMatch,
    /// `MATCH_CREATED`
    MatchCreated,
    /// `JOIN_MATCH`
    JoinMatch,
    /// `PLAYER_JOINED`
    PlayerJoined,
    /// `LEFT_MATCH`
    LeftMatch,
    /// `SET_READY`
    SetReady,
    /// `READY_UPDATED`
    ReadyUpdated,
    /// `START_MATCH`
    StartMatch,
    /// `MATCH_STARTED`
    MatchStarted,
    /// `ERROR`
    Error,
}

impl LegacyMessageType {
    /// Every v1 type.
    pub const ALL: [Self; 10] = [
        Self::CreateMatch,
        Self::MatchCreated,
        Self::JoinMatch,
        Self::PlayerJoined,
        Self::LeftMatch,
        Self::SetReady,
        Self::ReadyUpdated,
        Self::StartMatch,
        Self::MatchStarted,
        Self::Error,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateMatch => "CREATE_MATCH",
            Self::MatchCreated => "MATCH_CREATED",
            Self::JoinMatch => "JOIN_MATCH",
            Self::PlayerJoined => "PLAYER_JOINED",
            Self::LeftMatch => "LEFT_MATCH",
            Self::SetReady => "SET_READY",
            Self::ReadyUpdated => "READY_UPDATED",
            Self::StartMatch => "START_MATCH",
            Self::MatchStarted => "MATCH_STARTED",
            Self::Error => "ERROR",
        }
    }

    /// Look up a wire name.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    /// The v2 type with the same meaning.
    pub fn successor(self) -> MessageType {
        match self {
            Self::CreateMatch => MessageType::LobbyCreateMatch,
            Self::MatchCreated => MessageType::LobbyMatchCreated,
            Self::JoinMatch => MessageType::LobbyJoinMatch,
            Self::PlayerJoined => MessageType::LobbyPlayerJoined,
            Self::LeftMatch => MessageType::LobbyLeftMatch,
            Self::SetReady => MessageType::LobbySetReady,
            Self::ReadyUpdated => MessageType::LobbyReadyUpdated,
            Self::StartMatch => MessageType::LobbyStartMatch,
            Self::MatchStarted => MessageType::GameMatchStarted,
            Self::Error => MessageType::SysError,
        }
    }
}

impl fmt::Display for LegacyMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
