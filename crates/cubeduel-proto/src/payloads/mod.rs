//! Typed message payloads.
//!
//! Inbound payloads are parsed through [`Payload::from_value`], which never
//! fails: a payload that is not an object, or a field that is absent or of the
//! wrong JSON type, yields the default for that field. Outbound payloads are
//! plain serializable structs.
//!
//! All payloads use camelCase field names on the wire.

pub mod game;
mod lenient;
pub mod lobby;
pub mod system;

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;

use self::lenient::lenient;

/// Conversion between payload structs and JSON values.
pub trait Payload: Serialize + DeserializeOwned + Default {
    /// Parse a payload, defaulting anything that does not fit.
    fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// Serialize into a JSON value.
    ///
    /// Payload structs contain only strings, numbers, booleans and lists, so
    /// serialization cannot fail; `Value::Null` is returned if it somehow does.
    fn to_value(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

/// Player role inside a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    /// Created the match; the only role allowed to start it.
    Host,
    /// Joined an existing match.
    Guest,
    /// Role missing or not recognized.
    #[default]
    #[serde(other)]
    Unknown,
}

/// One entry of a server-broadcast player list.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PlayerInfo {
    /// Opaque client-generated player token.
    #[serde(deserialize_with = "lenient")]
    pub player_id: String,
    /// Readiness as last echoed by the server.
    #[serde(deserialize_with = "lenient")]
    pub ready: bool,
    /// Server-assigned role.
    #[serde(deserialize_with = "lenient")]
    pub role: Role,
}

impl PlayerInfo {
    /// Build a player entry.
    pub fn new(player_id: impl Into<String>, ready: bool, role: Role) -> Self {
        Self { player_id: player_id.into(), ready, role }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn role_parses_known_and_unknown() {
        let host: Role = serde_json::from_value(json!("HOST")).unwrap();
        let guest: Role = serde_json::from_value(json!("GUEST")).unwrap();
        let other: Role = serde_json::from_value(json!("SPECTATOR")).unwrap();
        assert_eq!((host, guest, other), (Role::Host, Role::Guest, Role::Unknown));
    }

    #[test]
    fn player_info_tolerates_missing_and_mistyped_fields() {
        let p: PlayerInfo =
            serde_json::from_value(json!({"playerId": "p1", "ready": "yes", "role": 3})).unwrap();
        assert_eq!(p, PlayerInfo::new("p1", false, Role::Unknown));

        let empty: PlayerInfo = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, PlayerInfo::default());
    }

    #[test]
    fn player_info_null_role_is_unknown() {
        let p: PlayerInfo =
            serde_json::from_value(json!({"playerId": "p1", "ready": true, "role": null}))
                .unwrap();
        assert_eq!(p.role, Role::Unknown);
        assert!(p.ready);
    }
}
