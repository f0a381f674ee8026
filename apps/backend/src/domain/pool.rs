use std::collections::HashSet;

use crate::domain::GolferId;

/// One eligible golfer in a draft pool, with its ranking key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolEntry {
    pub golfer_id: GolferId,
    pub rank: u32,
}

/// Ranked set of golfers still available in one draft.
///
/// Loaded once at draft start and owned by the running draft instance; a
/// golfer removed by a selection never becomes eligible again. Entries are
/// kept sorted by `(rank, golfer_id)` so the auto-select choice is always the
/// head of the list.
#[derive(Debug, Default)]
pub struct PoolSnapshot {
    entries: Vec<PoolEntry>,
}

impl PoolSnapshot {
    pub fn new(mut entries: Vec<PoolEntry>) -> Self {
        entries.sort_by(|a, b| {
            a.rank
                .cmp(&b.rank)
                .then_with(|| a.golfer_id.cmp(&b.golfer_id))
        });
        // Duplicate ids may arrive with differing ranks; keep only the
        // best-ranked copy so a taken golfer can never resurface.
        let mut seen = HashSet::new();
        entries.retain(|e| seen.insert(e.golfer_id.clone()));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, golfer_id: &str) -> bool {
        self.entries.iter().any(|e| e.golfer_id == golfer_id)
    }

    /// Remove a golfer from the pool; `None` if it was not eligible.
    pub fn take(&mut self, golfer_id: &str) -> Option<PoolEntry> {
        let idx = self.entries.iter().position(|e| e.golfer_id == golfer_id)?;
        Some(self.entries.remove(idx))
    }

    /// Deterministic auto-select choice: lowest rank, ties broken by golfer
    /// id.
    pub fn best_available(&self) -> Option<&PoolEntry> {
        self.entries.first()
    }
}
