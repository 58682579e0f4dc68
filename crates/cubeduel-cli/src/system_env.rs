//! Production environment using system time and OS randomness.
//!
//! `SystemEnv` backs identity generation in the terminal client. Time comes
//! from `std::time::Instant` and the wall clock, randomness from getrandom,
//! so nothing here is reproducible. Simulation uses the harness `SimEnv`
//! instead.

use std::time::{SystemTime, UNIX_EPOCH};

use cubeduel_core::Environment;

/// Production environment using system time and the OS RNG.
///
/// # Panics
///
/// `random_bytes` panics if the OS RNG fails. Identity tokens drawn from a
/// broken RNG could collide with other players'.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemEnv;

impl SystemEnv {
    /// Create a new system environment.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl Environment for SystemEnv {
    type Instant = std::time::Instant;

    fn now(&self) -> Self::Instant {
        std::time::Instant::now()
    }

    fn wall_clock_millis(&self) -> u64 {
        SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis() as u64)
    }

    #[allow(clippy::expect_used)]
    fn random_bytes(&self, buffer: &mut [u8]) {
        getrandom::fill(buffer).expect("invariant: OS RNG failure is unrecoverable");
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn time_advances() {
        let env = SystemEnv::new();

        let t1 = env.now();
        std::thread::sleep(Duration::from_millis(5));
        let t2 = env.now();

        assert!(t2 > t1);
    }

    #[test]
    fn wall_clock_is_after_2020() {
        assert!(SystemEnv::new().wall_clock_millis() > 1_577_836_800_000);
    }

    #[test]
    fn random_bytes_differ() {
        let env = SystemEnv::new();

        let mut a = [0u8; 32];
        let mut b = [0u8; 32];
        env.random_bytes(&mut a);
        env.random_bytes(&mut b);

        assert_ne!(a, b);
    }

    #[test]
    fn generated_identities_differ() {
        let env = SystemEnv::new();
        let a = cubeduel_core::Identity::generate(&env);
        let b = cubeduel_core::Identity::generate(&env);
        assert_ne!(a.player_id(), b.player_id());
    }
}
