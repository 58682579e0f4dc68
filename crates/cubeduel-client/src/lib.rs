//! Client
//!
//! Action-based client state machine for CubeDuel. Tracks the current match,
//! its players, the move history and the local player's cube, and turns user
//! intents into requests.
//!
//! # Architecture
//!
//! The client follows the same Sans-IO and Action-Based patterns as
//! [`cubeduel_core`]. It receives events ([`ClientEvent`]), processes them
//! through pure state machine logic, and returns actions ([`ClientAction`]) for
//! the caller to execute.
//!
//! # Components
//!
//! - [`Client`]: Connection lifecycle, view state and intent gating
//! - [`reduce`]: Pure fold of one server message into [`ClientViewState`]
//! - [`View`]: Derived predicates (`is_host`, `can_start`, ...)
//!
//! # Transport (optional)
//!
//! With the `transport` feature enabled, this crate also provides:
//! - [`transport::ConnectedClient`]: Channels bridged to a WebSocket
//! - [`transport::connect`]: Connect to a server

#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod client;
mod config;
mod error;
mod event;
pub mod reducer;
mod state;
mod view;

#[cfg(feature = "transport")]
pub mod transport;

pub use client::{Client, MOVE_PRESETS};
pub use config::{ClientConfig, DEFAULT_DIAGNOSTIC_CAPACITY, DEFAULT_RECENT_MOVES};
pub use cubeduel_core::{Environment, Identity, PlayerId};
pub use error::ClientError;
pub use event::{ClientAction, ClientEvent};
pub use reducer::{Outcome, apply, reduce};
pub use state::{ClientViewState, CubeView, LastError, Phase};
pub use view::{MATCH_SIZE, View};
