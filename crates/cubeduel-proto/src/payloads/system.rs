//! System payloads.

use serde::{Deserialize, Serialize};

use super::{Payload, lenient::lenient};

/// Severity attached to a server-reported error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// The request could not be processed at all.
    Critical,
    /// The request was rejected.
    Warning,
    /// Informational, e.g. "already in match".
    Info,
    /// Missing or unrecognized severity.
    #[default]
    #[serde(other)]
    Unknown,
}

/// `SYS_ERROR`
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ErrorReport {
    /// Human-readable message.
    #[serde(deserialize_with = "lenient", skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Severity classification.
    #[serde(deserialize_with = "lenient")]
    pub error_type: Severity,
}

impl Payload for ErrorReport {}
