//! Untyped `{type, payload}` envelope codec.
//!
//! The envelope is the unit exchanged over the persistent connection. The
//! codec only checks structure: the frame must be a JSON object with a string
//! `type`. Interpreting the payload is left to [`crate::Inbound`].
//!
//! # Invariants
//!
//! - [`decode`] never panics. Anything it cannot interpret comes back as a
//!   [`DecodeFailure`] holding the exact input text so the caller can log it
//!   verbatim.
//! - [`encode`] always emits both keys. A missing payload is written as `{}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{ProtocolError, Result};

/// A decoded wire message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope {
    /// Message type name, e.g. `LOBBY_MATCH_CREATED`.
    #[serde(rename = "type")]
    pub kind: String,

    /// Message payload. `Value::Null` when the frame carried none.
    #[serde(default)]
    pub payload: Value,
}

impl Envelope {
    /// Build an envelope. `None` becomes an empty object.
    pub fn new(kind: impl Into<String>, payload: Option<Value>) -> Self {
        Self { kind: kind.into(), payload: payload.unwrap_or_else(empty_payload) }
    }

    /// Payload as compact JSON, `{}` when absent. Used for log lines.
    pub fn payload_text(&self) -> String {
        if self.payload.is_null() { "{}".to_string() } else { self.payload.to_string() }
    }

    /// Serialize to the canonical wire form.
    pub fn to_text(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// A frame that could not be decoded.
///
/// Carries the raw text untouched so it can be surfaced in a diagnostic log.
#[derive(Debug)]
pub struct DecodeFailure {
    /// The frame exactly as received.
    pub raw: String,
    /// Why decoding failed.
    pub reason: ProtocolError,
}

impl std::fmt::Display for DecodeFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "undecodable frame ({}): {}", self.reason, self.raw)
    }
}

impl std::error::Error for DecodeFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.reason)
    }
}

/// Decode a raw text frame into an [`Envelope`].
pub fn decode(raw: &str) -> std::result::Result<Envelope, DecodeFailure> {
    parse(raw).map_err(|reason| DecodeFailure { raw: raw.to_string(), reason })
}

fn parse(raw: &str) -> Result<Envelope> {
    let value: Value = serde_json::from_str(raw)?;
    let Value::Object(mut object) = value else {
        return Err(ProtocolError::NotAnObject);
    };

    let kind = match object.remove("type") {
        Some(Value::String(kind)) => kind,
        _ => return Err(ProtocolError::MissingType),
    };
    let payload = object.remove("payload").unwrap_or(Value::Null);

    Ok(Envelope { kind, payload })
}

/// Encode a message type and optional payload into wire text.
pub fn encode(kind: &str, payload: Option<Value>) -> Result<String> {
    Envelope::new(kind, payload).to_text()
}

fn empty_payload() -> Value {
    Value::Object(Map::new())
}
