use std::collections::HashSet;

use engagement_common::EngagementRecord;

/// Set of (post, user) keys already delivered to the sink.
///
/// Grows monotonically until `reset()`. Each key passes `filter_new` at most
/// once between resets.
#[derive(Debug, Default)]
pub struct Ledger {
    seen: HashSet<(String, String)>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep only records whose key has not been seen, and mark them seen.
    ///
    /// Processed in order, so a key repeated within one batch is delivered
    /// once, as its first occurrence.
    pub fn filter_new(&mut self, records: Vec<EngagementRecord>) -> Vec<EngagementRecord> {
        records
            .into_iter()
            .filter(|record| self.seen.insert(owned_key(record)))
            .collect()
    }

    pub fn contains(&self, record: &EngagementRecord) -> bool {
        self.seen.contains(&owned_key(record))
    }

    /// Forget every key. Only a full reload does this.
    pub fn reset(&mut self) {
        self.seen.clear();
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

fn owned_key(record: &EngagementRecord) -> (String, String) {
    let (post, user) = record.key();
    (post.to_string(), user.to_string())
}
