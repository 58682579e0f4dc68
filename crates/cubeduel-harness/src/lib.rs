//! Deterministic simulation harness for CubeDuel client testing.
//!
//! In-process implementations of the environment, the game server and the
//! I/O driver, so whole client runs are deterministic and reproducible from
//! a seed.
//!
//! # Components
//!
//! - [`SimEnv`]: virtual clock and seeded RNG
//! - [`SimServer`]: authoritative match server with per-player cubes
//! - [`SimDriver`]: scripted [`cubeduel_app::Driver`] talking to a
//!   [`SharedSimServer`]
//!
//! # Invariant Testing
//!
//! The `invariants` module provides behavioral testing through invariant
//! checks. Invariants verify WHAT must be true across all execution paths, not
//! specific scenarios. Use [`InvariantRegistry::standard()`] for the client
//! view invariants.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cube;
pub mod invariants;
pub mod sim_driver;
pub mod sim_env;
pub mod sim_server;

pub use cube::{CubeModel, Turn};
pub use invariants::{
    AtMostOneHost, AtMostTwoPlayers, ClientSnapshot, CubeStateIsOwn, Invariant, InvariantRegistry,
    InvariantResult, MovesOrdered, StartedIsMonotonic, SystemSnapshot, Violation,
};
pub use sim_driver::{Condition, SimDriver, SimDriverError, Step};
pub use sim_env::SimEnv;
pub use sim_server::{SessionId, SharedSimServer, SimServer, create_shared_server};
