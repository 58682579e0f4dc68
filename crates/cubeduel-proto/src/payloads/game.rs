//! In-game payloads: start, moves and cube state.

use serde::{Deserialize, Serialize};

use super::{
    Payload, PlayerInfo,
    lenient::{lenient, lenient_opt_seq, lenient_seq},
};

/// `GAME_MATCH_STARTED`
///
/// `players` is optional: when absent the client keeps its current list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchStarted {
    /// Match that started.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
    /// Server start timestamp (Unix millis).
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    /// Seed the scramble was generated from.
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub scramble_seed: Option<i64>,
    /// Scramble in move notation, in application order.
    #[serde(deserialize_with = "lenient_seq")]
    pub scramble: Vec<String>,
    /// Player list at start, if provided.
    #[serde(deserialize_with = "lenient_opt_seq", skip_serializing_if = "Option::is_none")]
    pub players: Option<Vec<PlayerInfo>>,
}

/// `GAME_MOVE_APPLIED`
///
/// `seq` is assigned by the server and is the only ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoveApplied {
    /// Match the move belongs to.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
    /// Player who made the move.
    #[serde(deserialize_with = "lenient")]
    pub player_id: String,
    /// Move in standard notation (`R`, `U'`, `F2`).
    #[serde(rename = "move", deserialize_with = "lenient")]
    pub notation: String,
    /// Server-assigned sequence number.
    #[serde(deserialize_with = "lenient")]
    pub seq: u64,
    /// Server timestamp (Unix millis).
    #[serde(deserialize_with = "lenient")]
    pub server_ts: i64,
}

/// `GAME_CUBE_STATE`: one player's cube as computed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CubeState {
    /// Match the cube belongs to.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
    /// Owner of the cube.
    #[serde(deserialize_with = "lenient")]
    pub player_id: String,
    /// 54 sticker letters in `U D L R F B` face order.
    #[serde(deserialize_with = "lenient")]
    pub facelets: String,
    /// Moves applied by the owner so far.
    #[serde(deserialize_with = "lenient")]
    pub move_count: u32,
    /// Whether the cube is solved.
    #[serde(deserialize_with = "lenient")]
    pub solved: bool,
}

/// `GAME_MATCH_ENDED`
///
/// The server registry reserves this type without a fixed payload; only the
/// match id is read.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchEnded {
    /// Match that ended.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
}

/// `GAME_SUBMIT_MOVE`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubmitMove {
    /// Match the move is for.
    pub match_id: String,
    /// Move in standard notation.
    #[serde(rename = "move")]
    pub notation: String,
}

impl Payload for MatchStarted {}
impl Payload for MoveApplied {}
impl Payload for CubeState {}
impl Payload for MatchEnded {}
impl Payload for SubmitMove {}
