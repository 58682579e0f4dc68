//! Match and lobby reducer.
//!
//! Folds one inbound message into the view state. Pure: no I/O, no clock, no
//! randomness. The server is the authority for players, roles, readiness,
//! sequence numbers and cube state, so each message replaces what it covers
//! rather than merging with it.
//!
//! # Invariants
//!
//! - The move log is sorted ascending by `seq` and holds each `seq` once.
//! - `started` only becomes true through a start message and only becomes
//!   false through a reset (new match, or the local player leaving).
//! - The retained cube state always belongs to the local player.
//! - Malformed payloads were already defaulted by the codec; nothing here
//!   fails.

use cubeduel_core::{Append, Identity};
use cubeduel_proto::{
    Inbound, LegacyMessageType,
    payloads::{
        game::{CubeState, MatchStarted, MoveApplied},
        lobby::{MatchCreated, PlayerJoined, PlayerLeft, ReadyUpdated},
        system::ErrorReport,
    },
};

use crate::state::{ClientViewState, CubeView, LastError};

/// Fallback text for a server error without a message.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// What applying a message did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// State changed.
    Applied,
    /// The message was understood but left the state as it was.
    Unchanged,
    /// A move with an already-stored `seq` was dropped.
    DuplicateMove {
        /// The repeated sequence number.
        seq: u64,
    },
    /// A protocol v1 message was received and not applied.
    Legacy(LegacyMessageType),
    /// The type is not part of the protocol.
    Unrecognized,
}

/// Fold `inbound` into `state`, returning the next state.
pub fn reduce(mut state: ClientViewState, identity: &Identity, inbound: &Inbound) -> ClientViewState {
    apply(&mut state, identity, inbound);
    state
}

/// Fold `inbound` into `state` in place.
pub fn apply(state: &mut ClientViewState, identity: &Identity, inbound: &Inbound) -> Outcome {
    match inbound {
        Inbound::MatchCreated(p) => match_created(state, p),
        Inbound::PlayerJoined(p) => player_joined(state, p),
        Inbound::PlayerLeft(p) => player_left(state, identity, p),
        Inbound::ReadyUpdated(p) => ready_updated(state, p),
        Inbound::MatchStarted(p) => match_started(state, p),
        Inbound::MoveApplied(p) => move_applied(state, p),
        Inbound::CubeState(p) => cube_state(state, identity, p),
        Inbound::Error(p) => error(state, p),
        Inbound::MatchEnded(p) => {
            tracing::debug!(match_id = %p.match_id, "match ended");
            Outcome::Unchanged
        },
        Inbound::Legacy { kind, .. } => {
            tracing::warn!(kind = %kind, successor = %kind.successor(), "protocol v1 message not applied");
            Outcome::Legacy(*kind)
        },
        Inbound::Unexpected(kind) => {
            tracing::debug!(kind = %kind, "client-to-server type received from server");
            Outcome::Unrecognized
        },
        Inbound::Unknown { kind } => {
            tracing::debug!(kind = %kind, "unrecognized message type");
            Outcome::Unrecognized
        },
    }
}

fn match_created(state: &mut ClientViewState, p: &MatchCreated) -> Outcome {
    state.reset_match();
    state.last_error = None;
    state.adopt_match_id(&p.match_id);
    state.join_target.clone_from(&p.match_id);
    Outcome::Applied
}

fn player_joined(state: &mut ClientViewState, p: &PlayerJoined) -> Outcome {
    state.adopt_match_id(&p.match_id);
    state.players.clone_from(&p.players);
    state.last_error = None;
    Outcome::Applied
}

fn player_left(state: &mut ClientViewState, identity: &Identity, p: &PlayerLeft) -> Outcome {
    state.adopt_match_id(&p.match_id);
    state.players.clone_from(&p.players);
    state.last_error = None;

    if identity.is(&p.left_player_id) {
        tracing::debug!(match_id = %p.match_id, "local player left match");
        state.reset_match();
    }
    Outcome::Applied
}

fn ready_updated(state: &mut ClientViewState, p: &ReadyUpdated) -> Outcome {
    state.adopt_match_id(&p.match_id);
    state.players.clone_from(&p.players);
    state.last_error = None;
    Outcome::Applied
}

fn match_started(state: &mut ClientViewState, p: &MatchStarted) -> Outcome {
    state.adopt_match_id(&p.match_id);
    if let Some(players) = &p.players {
        state.players.clone_from(players);
    }
    state.started = true;
    state.started_at = p.started_at;
    state.scramble.clone_from(&p.scramble);
    state.scramble_seed = p.scramble_seed;
    state.last_error = None;
    Outcome::Applied
}

fn move_applied(state: &mut ClientViewState, p: &MoveApplied) -> Outcome {
    match state.moves.append(p.clone()) {
        Append::Inserted { .. } => {
            state.last_error = None;
            Outcome::Applied
        },
        Append::Duplicate => Outcome::DuplicateMove { seq: p.seq },
    }
}

fn cube_state(state: &mut ClientViewState, identity: &Identity, p: &CubeState) -> Outcome {
    if !identity.is(&p.player_id) {
        return Outcome::Unchanged;
    }

    state.cube = Some(CubeView::from(p));
    state.last_error = None;
    Outcome::Applied
}

fn error(state: &mut ClientViewState, p: &ErrorReport) -> Outcome {
    let message = p.message.clone().unwrap_or_else(|| UNKNOWN_ERROR.to_string());
    tracing::debug!(severity = ?p.error_type, %message, "server error");
    state.last_error = Some(LastError { message, severity: p.error_type });
    Outcome::Applied
}
