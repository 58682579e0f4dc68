//! CubeDuel core
//!
//! Pure building blocks shared by the client state machine and the runtime.
//! Nothing in this crate performs I/O on its own: time and randomness come
//! from an [`env::Environment`], and the connection lifecycle is an
//! action-returning state machine that a driver executes.
//!
//! # Components
//!
//! - [`env::Environment`]: time and randomness abstraction
//! - [`identity`]: the per-session player token and its session store
//! - [`connection::Connection`]: `Connecting -> Open -> Closed` lifecycle with
//!   send gating
//! - [`move_log::MoveLog`]: `seq`-ordered, de-duplicated move history
//! - [`facelets`]: sticker string to six named faces

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod connection;
pub mod env;
pub mod error;
pub mod facelets;
pub mod identity;
pub mod move_log;

pub use connection::{Connection, ConnectionAction, ConnectionState};
pub use env::Environment;
pub use error::IdentityError;
pub use facelets::{Face, FaceName, Faces, Sticker};
pub use identity::{Identity, IdentityStore, PlayerId};
pub use move_log::{Append, MoveLog};
