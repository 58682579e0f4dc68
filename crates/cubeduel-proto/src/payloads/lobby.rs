//! Lobby payloads: creating, joining, leaving and readiness.

use serde::{Deserialize, Serialize};

use super::{
    Payload, PlayerInfo,
    lenient::{lenient, lenient_seq},
};

/// `LOBBY_MATCH_CREATED`: acknowledgement of a new match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatchCreated {
    /// Identifier of the new match.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
}

/// `LOBBY_PLAYER_JOINED`: a player entered the match.
///
/// `players` is the complete, authoritative list after the join.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerJoined {
    /// Match that was joined.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
    /// Player that joined.
    #[serde(deserialize_with = "lenient")]
    pub joined_player_id: String,
    /// Full player list.
    #[serde(deserialize_with = "lenient_seq")]
    pub players: Vec<PlayerInfo>,
}

/// `LOBBY_LEFT_MATCH`: a player left the match.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerLeft {
    /// Match that was left.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
    /// Player that left.
    #[serde(deserialize_with = "lenient")]
    pub left_player_id: String,
    /// Remaining players.
    #[serde(deserialize_with = "lenient_seq")]
    pub players: Vec<PlayerInfo>,
}

/// `LOBBY_READY_UPDATED`: a player's readiness changed.
///
/// Some servers name the changed player `playerId` instead of
/// `changedPlayerId`; use [`ReadyUpdated::changed_player`] to read either.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReadyUpdated {
    /// Match the update belongs to.
    #[serde(deserialize_with = "lenient")]
    pub match_id: String,
    /// Player whose readiness changed.
    #[serde(deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub changed_player_id: String,
    /// Player whose readiness changed (alternate spelling).
    #[serde(deserialize_with = "lenient", skip_serializing_if = "String::is_empty")]
    pub player_id: String,
    /// New readiness of that player.
    #[serde(deserialize_with = "lenient")]
    pub ready: bool,
    /// Full player list with updated flags and roles.
    #[serde(deserialize_with = "lenient_seq")]
    pub players: Vec<PlayerInfo>,
}

/// `LOBBY_CREATE_MATCH`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateMatch {
    /// Requesting player.
    pub player_id: String,
}

/// `LOBBY_JOIN_MATCH`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct JoinMatch {
    /// Match to join.
    pub match_id: String,
    /// Requesting player.
    pub player_id: String,
}

/// `LOBBY_SET_READY`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SetReady {
    /// Match the player is in.
    pub match_id: String,
    /// Requesting player.
    pub player_id: String,
    /// Requested readiness.
    pub ready: bool,
}

/// `LOBBY_START_MATCH`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StartMatch {
    /// Match to start.
    pub match_id: String,
}

impl ReadyUpdated {
    /// The changed player under whichever spelling the server used.
    pub fn changed_player(&self) -> &str {
        if self.changed_player_id.is_empty() { &self.player_id } else { &self.changed_player_id }
    }
}

impl Payload for MatchCreated {}
impl Payload for PlayerJoined {}
impl Payload for PlayerLeft {}
impl Payload for ReadyUpdated {}
impl Payload for CreateMatch {}
impl Payload for JoinMatch {}
impl Payload for SetReady {}
impl Payload for StartMatch {}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::payloads::Role;

    #[test]
    fn player_joined_reads_full_list() {
        let p = PlayerJoined::from_value(json!({
            "matchId": "m1",
            "joinedPlayerId": "p2",
            "players": [
                {"playerId": "p1", "ready": true, "role": "HOST"},
                {"playerId": "p2", "ready": false, "role": "GUEST"}
            ]
        }));
        assert_eq!(p.match_id, "m1");
        assert_eq!(p.joined_player_id, "p2");
        assert_eq!(p.players.len(), 2);
        assert_eq!(p.players[0].role, Role::Host);
    }

    #[test]
    fn malformed_list_entries_are_dropped() {
        let p = PlayerLeft::from_value(json!({
            "matchId": "m1",
            "leftPlayerId": "p2",
            "players": [42, {"playerId": "p1", "ready": false, "role": "HOST"}]
        }));
        assert_eq!(p.players, vec![PlayerInfo::new("p1", false, Role::Host)]);
    }

    #[test]
    fn players_not_a_list_reads_as_empty() {
        let p = ReadyUpdated::from_value(json!({"matchId": "m1", "players": "nope"}));
        assert!(p.players.is_empty());
    }

    #[test]
    fn ready_updated_accepts_both_player_spellings() {
        let new = ReadyUpdated::from_value(json!({"changedPlayerId": "p1", "ready": true}));
        let old = ReadyUpdated::from_value(json!({"playerId": "p1", "ready": true}));
        assert_eq!(new.changed_player(), "p1");
        assert_eq!(old.changed_player(), "p1");
    }

    #[test]
    fn non_object_payload_defaults() {
        assert_eq!(MatchCreated::from_value(json!(null)), MatchCreated::default());
        assert_eq!(MatchCreated::from_value(json!([1, 2])), MatchCreated::default());
    }

    #[test]
    fn outbound_uses_camel_case() {
        let v = SetReady { match_id: "m1".into(), player_id: "p1".into(), ready: true }.to_value();
        assert_eq!(v, json!({"matchId": "m1", "playerId": "p1", "ready": true}));
    }
}
