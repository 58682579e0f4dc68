//! CubeDuel wire protocol
//!
//! Every message on the persistent connection is a JSON text frame shaped as
//! an [`Envelope`]: `{"type": "...", "payload": {...}}`. This crate owns the
//! envelope codec, the registry of message type names, and the typed payloads
//! carried by each message.
//!
//! # Layers
//!
//! - [`envelope`]: untyped `{type, payload}` codec. Malformed text is reported
//!   as a [`DecodeFailure`] carrying the raw frame, never as a panic.
//! - [`MessageType`] / [`LegacyMessageType`]: the prefixed (v2) and bare (v1)
//!   naming schemes.
//! - [`payloads`]: payload structs. Deserialization is lenient: a field that is
//!   absent or mistyped takes its default value.
//! - [`Inbound`] / [`Outbound`]: closed enums over everything the client
//!   consumes and produces.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod envelope;
pub mod errors;
mod message;
mod message_type;
pub mod payloads;

pub use envelope::{DecodeFailure, Envelope, decode, encode};
pub use errors::{ProtocolError, Result};
pub use message::{Inbound, Outbound};
pub use message_type::{LegacyMessageType, MessageType, ProtocolVersion};
