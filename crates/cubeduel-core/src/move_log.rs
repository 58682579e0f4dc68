//! Move history ordered by server sequence number.
//!
//! Moves can arrive out of order; the log keeps them sorted ascending by
//! `seq` at all times. A `seq` is assigned once by the server, so a second
//! move carrying an already-present `seq` is a duplicate and is rejected.

use cubeduel_proto::payloads::game::MoveApplied;

/// Outcome of [`MoveLog::append`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Append {
    /// Stored at this position.
    Inserted {
        /// Index of the new entry.
        index: usize,
    },
    /// A move with the same `seq` is already stored; the log is unchanged.
    Duplicate,
}

/// Ordered, de-duplicated move history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MoveLog {
    moves: Vec<MoveApplied>,
}

impl MoveLog {
    /// Empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a move at its `seq` position. First arrival wins.
    pub fn append(&mut self, applied: MoveApplied) -> Append {
        match self.moves.binary_search_by_key(&applied.seq, |m| m.seq) {
            Ok(_) => {
                tracing::debug!(seq = applied.seq, "duplicate move ignored");
                Append::Duplicate
            },
            Err(index) => {
                self.moves.insert(index, applied);
                Append::Inserted { index }
            },
        }
    }

    /// The last `n` moves, oldest first.
    pub fn recent(&self, n: usize) -> &[MoveApplied] {
        let start = self.moves.len().saturating_sub(n);
        &self.moves[start..]
    }

    /// All moves in `seq` order.
    pub fn iter(&self) -> impl Iterator<Item = &MoveApplied> {
        self.moves.iter()
    }

    /// All moves as a slice.
    pub fn as_slice(&self) -> &[MoveApplied] {
        &self.moves
    }

    /// Number of stored moves.
    pub fn len(&self) -> usize {
        self.moves.len()
    }

    /// Whether the log is empty.
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// Highest stored `seq`.
    pub fn last_seq(&self) -> Option<u64> {
        self.moves.last().map(|m| m.seq)
    }

    /// Drop every move.
    pub fn clear(&mut self) {
        self.moves.clear();
    }
}

impl<'a> IntoIterator for &'a MoveLog {
    type IntoIter = std::slice::Iter<'a, MoveApplied>;
    type Item = &'a MoveApplied;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mv(seq: u64, notation: &str) -> MoveApplied {
        MoveApplied {
            match_id: "m1".into(),
            player_id: "p1".into(),
            notation: notation.into(),
            seq,
            server_ts: 0,
        }
    }

    fn seqs(log: &MoveLog) -> Vec<u64> {
        log.iter().map(|m| m.seq).collect()
    }

    #[test]
    fn out_of_order_moves_are_sorted() {
        let mut log = MoveLog::new();
        assert_eq!(log.append(mv(2, "U")), Append::Inserted { index: 0 });
        assert_eq!(log.append(mv(1, "R")), Append::Inserted { index: 0 });
        assert_eq!(log.append(mv(5, "F")), Append::Inserted { index: 2 });
        assert_eq!(log.append(mv(3, "L")), Append::Inserted { index: 2 });

        assert_eq!(seqs(&log), vec![1, 2, 3, 5]);
        assert_eq!(log.last_seq(), Some(5));
    }

    #[test]
    fn duplicate_seq_keeps_first() {
        let mut log = MoveLog::new();
        log.append(mv(1, "R"));
        assert_eq!(log.append(mv(1, "L")), Append::Duplicate);

        assert_eq!(log.len(), 1);
        assert_eq!(log.as_slice()[0].notation, "R");
    }

    #[test]
    fn recent_returns_tail() {
        let mut log = MoveLog::new();
        for seq in 1..=30 {
            log.append(mv(seq, "R"));
        }

        let recent = log.recent(20);
        assert_eq!(recent.len(), 20);
        assert_eq!(recent[0].seq, 11);
        assert_eq!(recent[19].seq, 30);

        assert_eq!(log.recent(100).len(), 30);
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn clear_empties() {
        let mut log = MoveLog::new();
        log.append(mv(1, "R"));
        log.clear();
        assert!(log.is_empty());
        assert_eq!(log.last_seq(), None);
    }
}
