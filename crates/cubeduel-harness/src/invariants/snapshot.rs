//! Observable state snapshots for invariant checking.
//!
//! Snapshots capture the observable state of the system at a point in time.
//! Invariants operate on snapshots rather than live state to ensure
//! consistent, atomic checks.

use cubeduel_client::ClientViewState;
use cubeduel_proto::payloads::PlayerInfo;

/// Snapshot of the entire system state.
///
/// Contains observable state from one or more clients for invariant checking.
#[derive(Debug, Clone, Default)]
pub struct SystemSnapshot {
    /// Per-client state snapshots.
    pub clients: Vec<ClientSnapshot>,
}

impl SystemSnapshot {
    /// Create an empty snapshot (no clients).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Create a snapshot with a single client.
    pub fn single(client: ClientSnapshot) -> Self {
        Self { clients: vec![client] }
    }

    /// Create a snapshot from multiple clients.
    pub fn from_clients(clients: Vec<ClientSnapshot>) -> Self {
        Self { clients }
    }

    /// Add a client snapshot.
    pub fn add_client(&mut self, client: ClientSnapshot) {
        self.clients.push(client);
    }
}

/// Snapshot of a single client's observable state.
///
/// Besides the current view it carries two histories: every `(match, started)`
/// pair observed so far, and every cube the server pushed to this player.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientSnapshot {
    /// Local player id.
    pub player_id: String,
    /// Current match. `None` if idle.
    pub match_id: Option<String>,
    /// Players as displayed.
    pub players: Vec<PlayerInfo>,
    /// Whether the match has started.
    pub started: bool,
    /// Move log seqs in display order.
    pub move_seqs: Vec<u64>,
    /// Displayed cube facelets. `None` if no cube is shown.
    pub cube: Option<String>,
    /// Facelets of every cube pushed to this player.
    pub cube_pushes: Vec<String>,
    /// Observed `(match, started)` pairs, oldest first.
    pub started_history: Vec<(Option<String>, bool)>,
}

impl ClientSnapshot {
    /// Create an empty snapshot for `player_id`.
    pub fn new(player_id: impl Into<String>) -> Self {
        Self { player_id: player_id.into(), ..Default::default() }
    }

    /// Create a snapshot from a single view state.
    pub fn from_state(player_id: impl Into<String>, state: &ClientViewState) -> Self {
        let mut snapshot = Self::new(player_id);
        snapshot.observe(state);
        snapshot
    }

    /// Record the cubes pushed to this player.
    #[must_use]
    pub fn with_cube_pushes(mut self, pushes: impl IntoIterator<Item = String>) -> Self {
        self.cube_pushes.extend(pushes);
        self
    }

    /// Update the current view from `state` and extend the history.
    pub fn observe(&mut self, state: &ClientViewState) {
        self.match_id.clone_from(&state.match_id);
        self.players.clone_from(&state.players);
        self.started = state.started;
        self.move_seqs = state.moves.iter().map(|m| m.seq).collect();
        self.cube = state.cube.as_ref().map(|c| c.facelets.clone());
        self.started_history.push((state.match_id.clone(), state.started));
    }
}
