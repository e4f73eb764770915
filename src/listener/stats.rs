use serde::{Deserialize, Serialize};

/// Point-in-time copy of a listener's counters and flags.
///
/// Each field is read independently, so a snapshot taken while events are
/// still arriving may mix values from before and after a given event.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListenerStats {
    pub total: u64,
    pub creates: u64,
    pub updates: u64,
    pub deletes: u64,
    pub invalidates: u64,
    pub errors: u64,
    pub query_inserts: u64,
    pub query_updates: u64,
    pub query_deletes: u64,
    pub query_invalidates: u64,
    pub cqs_connected: u64,
    pub cqs_disconnected: u64,
    pub closed: bool,
    pub region_cleared: bool,
    pub region_invalidated: bool,
}

/// Targets for [`wait_for_events`](crate::CqTestListener::wait_for_events).
///
/// A target of zero leaves that counter unchecked; every other target must
/// equal the live counter exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedEvents {
    pub creates: u64,
    pub updates: u64,
    pub deletes: u64,
    pub query_inserts: u64,
    pub query_updates: u64,
    pub query_deletes: u64,
    pub total: u64,
}

impl ExpectedEvents {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn creates(mut self, n: u64) -> Self {
        self.creates = n;
        self
    }

    pub fn updates(mut self, n: u64) -> Self {
        self.updates = n;
        self
    }

    pub fn deletes(mut self, n: u64) -> Self {
        self.deletes = n;
        self
    }

    pub fn query_inserts(mut self, n: u64) -> Self {
        self.query_inserts = n;
        self
    }

    pub fn query_updates(mut self, n: u64) -> Self {
        self.query_updates = n;
        self
    }

    pub fn query_deletes(mut self, n: u64) -> Self {
        self.query_deletes = n;
        self
    }

    pub fn total(mut self, n: u64) -> Self {
        self.total = n;
        self
    }

    fn dimensions(&self, stats: &ListenerStats) -> [(&'static str, u64, u64); 7] {
        [
            ("creates", self.creates, stats.creates),
            ("updates", self.updates, stats.updates),
            ("deletes", self.deletes, stats.deletes),
            ("query inserts", self.query_inserts, stats.query_inserts),
            ("query updates", self.query_updates, stats.query_updates),
            ("query deletes", self.query_deletes, stats.query_deletes),
            ("total", self.total, stats.total),
        ]
    }

    /// True when every non-zero target equals the matching counter in `stats`
    pub fn is_met_by(&self, stats: &ListenerStats) -> bool {
        self.dimensions(stats)
            .iter()
            .all(|(_, expected, actual)| *expected == 0 || expected == actual)
    }

    /// Describe each checked counter that differs from its target
    pub fn mismatches(&self, stats: &ListenerStats) -> Vec<String> {
        self.dimensions(stats)
            .iter()
            .filter(|(_, expected, actual)| *expected != 0 && expected != actual)
            .map(|(name, expected, actual)| format!("{} expected: {} received: {}", name, expected, actual))
            .collect()
    }
}
