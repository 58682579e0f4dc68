//! Observable application state types.
//!
//! These are the parts of the UI model that the client state machine does not
//! own: the high-level connection status and the diagnostic log.

use std::collections::VecDeque;

/// Connection status as shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// Not connected to server.
    Disconnected,
    /// Connection in progress.
    Connecting,
    /// Socket open.
    Connected,
}

/// Bounded diagnostic log, newest line first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagnosticLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl DiagnosticLog {
    /// Empty log holding at most `capacity` lines.
    pub fn new(capacity: usize) -> Self {
        Self { lines: VecDeque::with_capacity(capacity.min(64)), capacity }
    }

    /// Add a line at the front, dropping the oldest line when full.
    pub fn push(&mut self, line: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.lines.len() == self.capacity {
            self.lines.pop_back();
        }
        self.lines.push_front(line.into());
    }

    /// Lines, newest first.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Newest line.
    pub fn latest(&self) -> Option<&str> {
        self.lines.front().map(String::as_str)
    }

    /// Number of lines held.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Maximum number of lines.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_first() {
        let mut log = DiagnosticLog::new(10);
        log.push("a");
        log.push("b");
        assert_eq!(log.iter().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(log.latest(), Some("b"));
    }

    #[test]
    fn drops_oldest_when_full() {
        let mut log = DiagnosticLog::new(2);
        log.push("a");
        log.push("b");
        log.push("c");
        assert_eq!(log.iter().collect::<Vec<_>>(), vec!["c", "b"]);
    }

    #[test]
    fn zero_capacity_keeps_nothing() {
        let mut log = DiagnosticLog::new(0);
        log.push("a");
        assert!(log.is_empty());
    }
}
