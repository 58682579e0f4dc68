//! Client view state.
//!
//! [`ClientViewState`] is everything the client knows about the current
//! match, built purely from server messages. It is replaced, never shared
//! mutably: readers get `&ClientViewState` or a [`crate::View`].

use cubeduel_core::{MoveLog, facelets::{self, Faces}};
use cubeduel_proto::payloads::{PlayerInfo, game::CubeState, system::Severity};

/// Coarse match phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// No current match.
    Idle,
    /// In a match that has not started.
    Lobby,
    /// Match running.
    Running,
}

impl Phase {
    /// Upper-case label for status lines.
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "IDLE",
            Self::Lobby => "LOBBY",
            Self::Running => "RUNNING",
        }
    }
}

/// The local player's cube as last pushed by the server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CubeView {
    /// Sticker string, `U D L R F B` order.
    pub facelets: String,
    /// Moves applied so far.
    pub move_count: u32,
    /// Whether the cube is solved.
    pub solved: bool,
}

impl CubeView {
    /// Decoded faces.
    pub fn faces(&self) -> Faces {
        facelets::decode(&self.facelets)
    }
}

impl From<&CubeState> for CubeView {
    fn from(state: &CubeState) -> Self {
        Self { facelets: state.facelets.clone(), move_count: state.move_count, solved: state.solved }
    }
}

/// Last server-reported error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LastError {
    /// Human-readable message.
    pub message: String,
    /// Server-assigned severity.
    pub severity: Severity,
}

/// Aggregate client view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientViewState {
    /// Current match. `None` when idle.
    pub match_id: Option<String>,
    /// Default target for the next join.
    pub join_target: String,
    /// Players as last broadcast. At most two.
    pub players: Vec<PlayerInfo>,
    /// Whether the match has started.
    pub started: bool,
    /// Server start timestamp.
    pub started_at: Option<i64>,
    /// Seed of the scramble.
    pub scramble_seed: Option<i64>,
    /// Scramble moves.
    pub scramble: Vec<String>,
    /// Applied moves, ordered by `seq`.
    pub moves: MoveLog,
    /// Local player's cube. `None` until the server pushes one.
    pub cube: Option<CubeView>,
    /// Last server error.
    pub last_error: Option<LastError>,
}

impl ClientViewState {
    /// Empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        if self.started {
            Phase::Running
        } else if self.match_id.is_some() {
            Phase::Lobby
        } else {
            Phase::Idle
        }
    }

    /// Current match id, empty when idle.
    pub fn match_id_str(&self) -> &str {
        self.match_id.as_deref().unwrap_or_default()
    }

    /// Adopt a match id from a server message. Empty ids clear the match.
    pub(crate) fn adopt_match_id(&mut self, id: &str) {
        self.match_id = (!id.is_empty()).then(|| id.to_string());
    }

    /// Forget the current match: players, start data, moves and cube.
    ///
    /// The join target and last error are left alone.
    pub(crate) fn reset_match(&mut self) {
        self.match_id = None;
        self.players.clear();
        self.started = false;
        self.started_at = None;
        self.scramble_seed = None;
        self.scramble.clear();
        self.moves.clear();
        self.cube = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phase_follows_match_and_started() {
        let mut state = ClientViewState::new();
        assert_eq!(state.phase(), Phase::Idle);

        state.adopt_match_id("m1");
        assert_eq!(state.phase(), Phase::Lobby);

        state.started = true;
        assert_eq!(state.phase(), Phase::Running);
    }

    #[test]
    fn empty_match_id_clears() {
        let mut state = ClientViewState::new();
        state.adopt_match_id("m1");
        state.adopt_match_id("");
        assert_eq!(state.match_id, None);
        assert_eq!(state.match_id_str(), "");
    }

    #[test]
    fn reset_keeps_join_target_and_error() {
        let mut state = ClientViewState {
            match_id: Some("m1".into()),
            join_target: "m1".into(),
            started: true,
            scramble: vec!["R".into()],
            cube: Some(CubeView::default()),
            last_error: Some(LastError { message: "x".into(), severity: Severity::Info }),
            ..Default::default()
        };
        state.reset_match();

        assert_eq!(state.phase(), Phase::Idle);
        assert!(state.scramble.is_empty());
        assert!(state.cube.is_none());
        assert_eq!(state.join_target, "m1");
        assert!(state.last_error.is_some());
    }
}
