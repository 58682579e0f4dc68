//! Client tuning.

/// Default number of diagnostic lines kept.
pub const DEFAULT_DIAGNOSTIC_CAPACITY: usize = 500;

/// Default number of moves shown in the recent-move list.
pub const DEFAULT_RECENT_MOVES: usize = 20;

/// Client configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Diagnostic log lines kept before the oldest are dropped.
    pub diagnostic_capacity: usize,
    /// Moves shown in the recent-move list.
    pub recent_moves: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self { diagnostic_capacity: DEFAULT_DIAGNOSTIC_CAPACITY, recent_moves: DEFAULT_RECENT_MOVES }
    }
}
