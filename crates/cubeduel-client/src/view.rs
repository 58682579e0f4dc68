//! Derived predicates over the view state.
//!
//! Nothing here is stored: every answer is recomputed from the state and the
//! local identity, so predicates cannot drift from the data they describe.

use cubeduel_core::Identity;
use cubeduel_proto::payloads::{PlayerInfo, Role};

use crate::state::{ClientViewState, Phase};

/// Players in a full match.
pub const MATCH_SIZE: usize = 2;

/// Read-only view of the state from the local player's perspective.
#[derive(Debug, Clone, Copy)]
pub struct View<'a> {
    state: &'a ClientViewState,
    identity: &'a Identity,
}

impl<'a> View<'a> {
    /// View `state` as `identity`.
    pub fn new(state: &'a ClientViewState, identity: &'a Identity) -> Self {
        Self { state, identity }
    }

    /// Underlying state.
    pub fn state(&self) -> &'a ClientViewState {
        self.state
    }

    /// Local identity.
    pub fn identity(&self) -> &'a Identity {
        self.identity
    }

    /// The local player's entry in the player list.
    pub fn me(&self) -> Option<&'a PlayerInfo> {
        self.state.players.iter().find(|p| self.identity.is(&p.player_id))
    }

    /// Current phase.
    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    /// Local player is listed and is host.
    pub fn is_host(&self) -> bool {
        self.me().is_some_and(|p| p.role == Role::Host)
    }

    /// There is a current match and the local player is listed in it.
    pub fn is_in_match(&self) -> bool {
        self.state.match_id.as_deref().is_some_and(|id| !id.is_empty()) && self.me().is_some()
    }

    /// Exactly two players, both ready.
    pub fn all_ready(&self) -> bool {
        self.state.players.len() == MATCH_SIZE && self.state.players.iter().all(|p| p.ready)
    }

    /// Host may start: in match, host, all ready, not started.
    pub fn can_start(&self) -> bool {
        self.is_in_match() && self.is_host() && self.all_ready() && !self.state.started
    }

    /// Moves may be submitted.
    pub fn can_send_move(&self) -> bool {
        self.is_in_match() && self.state.started
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(players: Vec<PlayerInfo>) -> ClientViewState {
        ClientViewState { match_id: Some("m1".into()), players, ..Default::default() }
    }

    #[test]
    fn all_ready_needs_exactly_two() {
        let me = Identity::new("p1");

        let one = state(vec![PlayerInfo::new("p1", true, Role::Host)]);
        assert!(!View::new(&one, &me).all_ready());

        let two = state(vec![
            PlayerInfo::new("p1", true, Role::Host),
            PlayerInfo::new("p2", true, Role::Guest),
        ]);
        assert!(View::new(&two, &me).all_ready());

        let half = state(vec![
            PlayerInfo::new("p1", true, Role::Host),
            PlayerInfo::new("p2", false, Role::Guest),
        ]);
        assert!(!View::new(&half, &me).all_ready());
    }

    #[test]
    fn can_start_only_for_ready_host() {
        let players = vec![PlayerInfo::new("p1", true, Role::Host), PlayerInfo::new("p2", true, Role::Guest)];
        let s = state(players);

        assert!(View::new(&s, &Identity::new("p1")).can_start());
        assert!(!View::new(&s, &Identity::new("p2")).can_start());
        assert!(!View::new(&s, &Identity::new("p3")).can_start());

        let started = ClientViewState { started: true, ..s.clone() };
        assert!(!View::new(&started, &Identity::new("p1")).can_start());

        let no_match = ClientViewState { match_id: None, ..s };
        assert!(!View::new(&no_match, &Identity::new("p1")).can_start());
    }

    #[test]
    fn can_send_move_needs_running_match() {
        let me = Identity::new("p2");
        let s = state(vec![PlayerInfo::new("p1", true, Role::Host), PlayerInfo::new("p2", true, Role::Guest)]);
        assert!(!View::new(&s, &me).can_send_move());

        let running = ClientViewState { started: true, ..s };
        let view = View::new(&running, &me);
        assert!(view.can_send_move());
        assert!(!view.is_host());
        assert_eq!(view.phase(), Phase::Running);
    }

    #[test]
    fn unknown_role_is_not_host() {
        let s = state(vec![PlayerInfo::new("p1", true, Role::Unknown)]);
        let me = Identity::new("p1");
        let view = View::new(&s, &me);
        assert!(view.is_in_match());
        assert!(!view.is_host());
    }
}
