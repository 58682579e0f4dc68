//! Standard invariant checks.
//!
//! These invariants capture behavioral properties that must always hold.
//! They verify WHAT must be true, not specific test scenarios.

use cubeduel_client::MATCH_SIZE;
use cubeduel_proto::payloads::Role;

use super::{Invariant, InvariantResult, SystemSnapshot, Violation};

/// The move log is strictly ascending by seq.
///
/// Out-of-order arrivals are inserted in place and duplicates dropped, so
/// two equal or descending neighbours mean the log was corrupted.
pub struct MovesOrdered;

impl Invariant for MovesOrdered {
    fn name(&self) -> &'static str {
        "MovesOrdered"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if let Some(pair) = client.move_seqs.windows(2).find(|w| w[0] >= w[1]) {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: seq {} followed by {} in {:?}",
                        client.player_id, pair[0], pair[1], client.move_seqs
                    ),
                });
            }
        }
        Ok(())
    }
}

/// A match shows at most two players.
pub struct AtMostTwoPlayers;

impl Invariant for AtMostTwoPlayers {
    fn name(&self) -> &'static str {
        "AtMostTwoPlayers"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if client.players.len() > MATCH_SIZE {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: {} players in match {:?}",
                        client.player_id,
                        client.players.len(),
                        client.match_id
                    ),
                });
            }
        }
        Ok(())
    }
}

/// At most one player holds the host role.
pub struct AtMostOneHost;

impl Invariant for AtMostOneHost {
    fn name(&self) -> &'static str {
        "AtMostOneHost"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            let hosts: Vec<&str> = client
                .players
                .iter()
                .filter(|p| p.role == Role::Host)
                .map(|p| p.player_id.as_str())
                .collect();
            if hosts.len() > 1 {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!("client {}: hosts {:?}", client.player_id, hosts),
                });
            }
        }
        Ok(())
    }
}

/// Within one match, `started` never goes from true back to false.
///
/// Leaving or creating a match clears the match id, which ends the window.
pub struct StartedIsMonotonic;

impl Invariant for StartedIsMonotonic {
    fn name(&self) -> &'static str {
        "StartedIsMonotonic"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            for window in client.started_history.windows(2) {
                let (before_match, before_started) = &window[0];
                let (after_match, after_started) = &window[1];
                if before_match.is_some()
                    && before_match == after_match
                    && *before_started
                    && !*after_started
                {
                    return Err(Violation {
                        invariant: self.name(),
                        message: format!(
                            "client {}: match {:?} went from started to not started",
                            client.player_id, after_match
                        ),
                    });
                }
            }
        }
        Ok(())
    }
}

/// The displayed cube is one the server pushed to this player.
///
/// Other players' cube pushes must never replace the local cube.
pub struct CubeStateIsOwn;

impl Invariant for CubeStateIsOwn {
    fn name(&self) -> &'static str {
        "CubeStateIsOwn"
    }

    fn check(&self, state: &SystemSnapshot) -> InvariantResult {
        for client in &state.clients {
            if let Some(cube) = &client.cube
                && !client.cube_pushes.contains(cube)
            {
                return Err(Violation {
                    invariant: self.name(),
                    message: format!(
                        "client {}: displayed cube {cube} was never pushed to it",
                        client.player_id
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use cubeduel_proto::payloads::PlayerInfo;

    use super::*;
    use crate::invariants::ClientSnapshot;

    fn single(client: ClientSnapshot) -> SystemSnapshot {
        SystemSnapshot::single(client)
    }

    #[test]
    fn moves_ordered_accepts_ascending() {
        let mut client = ClientSnapshot::new("p1");
        client.move_seqs = vec![1, 2, 5];
        assert!(MovesOrdered.check(&single(client)).is_ok());
    }

    #[test]
    fn moves_ordered_rejects_duplicates_and_descents() {
        for seqs in [vec![1, 1], vec![3, 2]] {
            let mut client = ClientSnapshot::new("p1");
            client.move_seqs = seqs;
            let violation = MovesOrdered.check(&single(client)).unwrap_err();
            assert_eq!(violation.invariant, "MovesOrdered");
        }
    }

    #[test]
    fn player_count_and_hosts() {
        let mut client = ClientSnapshot::new("p1");
        client.players = vec![
            PlayerInfo::new("p1", false, Role::Host),
            PlayerInfo::new("p2", false, Role::Guest),
        ];
        assert!(AtMostTwoPlayers.check(&single(client.clone())).is_ok());
        assert!(AtMostOneHost.check(&single(client.clone())).is_ok());

        client.players.push(PlayerInfo::new("p3", false, Role::Host));
        assert!(AtMostTwoPlayers.check(&single(client.clone())).is_err());
        let violation = AtMostOneHost.check(&single(client)).unwrap_err();
        assert!(violation.message.contains("p1"));
        assert!(violation.message.contains("p3"));
    }

    #[test]
    fn started_may_reset_only_with_the_match() {
        let m1 = Some("m1".to_string());
        let mut client = ClientSnapshot::new("p1");
        client.started_history = vec![(m1.clone(), false), (m1.clone(), true), (None, false)];
        assert!(StartedIsMonotonic.check(&single(client.clone())).is_ok());

        client.started_history.push((m1.clone(), true));
        client.started_history.push((m1, false));
        assert!(StartedIsMonotonic.check(&single(client)).is_err());
    }

    #[test]
    fn cube_must_have_been_pushed() {
        let client = ClientSnapshot::new("p1").with_cube_pushes(["WWW".to_string()]);
        assert!(CubeStateIsOwn.check(&single(client.clone())).is_ok());

        let mut shown = client.clone();
        shown.cube = Some("WWW".into());
        assert!(CubeStateIsOwn.check(&single(shown)).is_ok());

        let mut foreign = client;
        foreign.cube = Some("YYY".into());
        assert!(CubeStateIsOwn.check(&single(foreign)).is_err());
    }
}
