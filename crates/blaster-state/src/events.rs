use blaster_core::event::{Event, LogEntry};
use blaster_core::types::Timestamp;

/// Append-only audit log held next to the world state, not inside it.
///
/// A log resumed from storage keeps only the entries appended since, so its
/// sequence numbers start at `base`. Reverting an operation truncates back
/// to the length it started at.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventLog {
    base: u64,
    entries: Vec<LogEntry>,
}

impl EventLog {
    /// Empty log whose first entry will carry `next_seq`.
    pub fn resume(next_seq: u64) -> Self {
        Self { base: next_seq, entries: Vec::new() }
    }

    pub fn append(&mut self, event: Event, timestamp: Timestamp) -> u64 {
        let seq = self.next_seq();
        self.entries.push(LogEntry { seq, timestamp, event });
        seq
    }

    /// Sequence number the next appended entry will carry.
    pub fn next_seq(&self) -> u64 {
        self.base + self.entries.len() as u64
    }

    /// Drop every entry numbered `next_seq` or later.
    pub fn truncate(&mut self, next_seq: u64) {
        let keep = next_seq.saturating_sub(self.base) as usize;
        self.entries.truncate(keep);
    }

    /// In-memory entries numbered `seq` or later.
    pub fn since(&self, seq: u64) -> &[LogEntry] {
        let start = (seq.saturating_sub(self.base) as usize).min(self.entries.len());
        &self.entries[start..]
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blaster_core::types::Address;

    fn ev(n: u128) -> Event {
        Event::Transfer {
            token: Address::from_label("t"),
            from: Address::ZERO,
            to: Address::from_label("a"),
            amount: n,
        }
    }

    #[test]
    fn sequence_numbers_are_dense() {
        let mut log = EventLog::default();
        assert_eq!(log.append(ev(1), 10), 0);
        assert_eq!(log.append(ev(2), 11), 1);
        assert_eq!(log.next_seq(), 2);
        assert_eq!(log.since(1).len(), 1);
        assert_eq!(log.since(1)[0].timestamp, 11);
        assert!(log.since(99).is_empty());
    }

    #[test]
    fn resumed_log_continues_numbering() {
        let mut log = EventLog::resume(40);
        assert!(log.is_empty());
        assert_eq!(log.append(ev(1), 10), 40);
        assert_eq!(log.append(ev(2), 11), 41);
        assert_eq!(log.since(0).len(), 2);
        assert_eq!(log.since(41)[0].seq, 41);

        log.truncate(41);
        assert_eq!(log.next_seq(), 41);
        log.truncate(7);
        assert_eq!(log.next_seq(), 40);
    }
}
