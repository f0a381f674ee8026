//! In-memory data gateway.
//!
//! Reference implementation of the `DataGateway` contract, used by the
//! binary for local runs and by the test suites. Supports write fault
//! injection so stall handling can be exercised.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use time::OffsetDateTime;

use crate::config::draft::StoredDraftSettings;
use crate::domain::{
    DraftId, DraftRecord, GolferId, LeagueId, PeriodId, PoolEntry, RosterDelta, Selection, TeamId,
};
use crate::gateway::{DataGateway, StorageError};

#[derive(Default)]
struct Store {
    drafts: HashMap<DraftId, DraftRecord>,
    settings: HashMap<LeagueId, StoredDraftSettings>,
    teams: HashMap<LeagueId, Vec<TeamId>>,
    pools: HashMap<PeriodId, Vec<PoolEntry>>,
    rosters: HashMap<TeamId, HashSet<GolferId>>,
    selections: HashMap<DraftId, Vec<Selection>>,
}

#[derive(Default)]
pub struct InMemoryGateway {
    store: Mutex<Store>,
    /// Remaining writes that should fail with a transient error.
    failing_writes: AtomicU32,
    write_attempts: AtomicU32,
}

impl InMemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_draft(&self, draft: DraftRecord) {
        self.store.lock().drafts.insert(draft.id.clone(), draft);
    }

    pub fn put_settings(&self, league_id: &str, settings: StoredDraftSettings) {
        self.store
            .lock()
            .settings
            .insert(league_id.to_string(), settings);
    }

    pub fn put_teams(&self, league_id: &str, teams: Vec<TeamId>) {
        self.store.lock().teams.insert(league_id.to_string(), teams);
    }

    pub fn put_pool(&self, period_id: &str, pool: Vec<PoolEntry>) {
        self.store.lock().pools.insert(period_id.to_string(), pool);
    }

    /// Make the next `count` durable writes fail with a transient error.
    pub fn fail_next_writes(&self, count: u32) {
        self.failing_writes.store(count, Ordering::SeqCst);
    }

    /// Total `record_selection` + `mark_complete` attempts, including failed
    /// ones.
    pub fn write_attempts(&self) -> u32 {
        self.write_attempts.load(Ordering::SeqCst)
    }

    pub fn draft(&self, draft_id: &str) -> Option<DraftRecord> {
        self.store.lock().drafts.get(draft_id).cloned()
    }

    pub fn selections(&self, draft_id: &str) -> Vec<Selection> {
        self.store
            .lock()
            .selections
            .get(draft_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn roster(&self, team_id: &str) -> HashSet<GolferId> {
        self.store
            .lock()
            .rosters
            .get(team_id)
            .cloned()
            .unwrap_or_default()
    }

    fn check_write_fault(&self) -> Result<(), StorageError> {
        self.write_attempts.fetch_add(1, Ordering::SeqCst);
        let mut remaining = self.failing_writes.load(Ordering::SeqCst);
        loop {
            if remaining == 0 {
                return Ok(());
            }
            match self.failing_writes.compare_exchange(
                remaining,
                remaining - 1,
                Ordering::SeqCst,
                Ordering::SeqCst,
            ) {
                Ok(_) => {
                    return Err(StorageError::Unavailable(
                        "injected write failure".to_string(),
                    ))
                }
                Err(actual) => remaining = actual,
            }
        }
    }
}

#[async_trait]
impl DataGateway for InMemoryGateway {
    async fn load_draft(&self, draft_id: &str) -> Result<DraftRecord, StorageError> {
        self.store
            .lock()
            .drafts
            .get(draft_id)
            .cloned()
            .ok_or_else(|| StorageError::DraftNotFound(draft_id.to_string()))
    }

    async fn load_rules(&self, league_id: &str) -> Result<StoredDraftSettings, StorageError> {
        Ok(self
            .store
            .lock()
            .settings
            .get(league_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn load_teams(&self, league_id: &str) -> Result<Vec<TeamId>, StorageError> {
        Ok(self
            .store
            .lock()
            .teams
            .get(league_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn load_pool(
        &self,
        period_id: &str,
        league_id: &str,
    ) -> Result<Vec<PoolEntry>, StorageError> {
        let store = self.store.lock();
        let rostered: HashSet<&GolferId> = store
            .teams
            .get(league_id)
            .into_iter()
            .flatten()
            .filter_map(|team_id| store.rosters.get(team_id))
            .flatten()
            .collect();
        Ok(store
            .pools
            .get(period_id)
            .into_iter()
            .flatten()
            .filter(|entry| !rostered.contains(&entry.golfer_id))
            .cloned()
            .collect())
    }

    async fn save_draft_order(
        &self,
        draft_id: &str,
        order: &[TeamId],
        started_at: OffsetDateTime,
    ) -> Result<(), StorageError> {
        let mut store = self.store.lock();
        let draft = store
            .drafts
            .get_mut(draft_id)
            .ok_or_else(|| StorageError::DraftNotFound(draft_id.to_string()))?;
        // First writer wins; a retried start reuses the stored order.
        if draft.draft_order.is_empty() {
            draft.draft_order = order.to_vec();
        }
        draft.start_date.get_or_insert(started_at);
        Ok(())
    }

    async fn record_selection(
        &self,
        selection: &Selection,
        delta: &RosterDelta,
    ) -> Result<(), StorageError> {
        self.check_write_fault()?;
        let mut store = self.store.lock();
        store
            .selections
            .entry(selection.draft_id.clone())
            .or_default()
            .push(selection.clone());
        if let Some(golfer_id) = &delta.add_golfer {
            store
                .rosters
                .entry(delta.team_id.clone())
                .or_default()
                .insert(golfer_id.clone());
        }
        Ok(())
    }

    async fn mark_complete(
        &self,
        draft_id: &str,
        ended_at: OffsetDateTime,
    ) -> Result<(), StorageError> {
        self.check_write_fault()?;
        let mut store = self.store.lock();
        let draft = store
            .drafts
            .get_mut(draft_id)
            .ok_or_else(|| StorageError::DraftNotFound(draft_id.to_string()))?;
        draft.is_complete = true;
        draft.end_date = Some(ended_at);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SelectionSource;

    fn draft(id: &str) -> DraftRecord {
        DraftRecord {
            id: id.to_string(),
            league_id: "league-1".to_string(),
            period_id: "period-1".to_string(),
            draft_order: Vec::new(),
            total_rounds: 2,
            current_round: 1,
            current_pick: 1,
            is_complete: false,
            start_date: None,
            end_date: None,
        }
    }

    fn selection(draft_id: &str, team_id: &str, golfer_id: &str, pick_no: u32) -> Selection {
        Selection {
            draft_id: draft_id.to_string(),
            league_id: "league-1".to_string(),
            team_id: team_id.to_string(),
            golfer_id: Some(golfer_id.to_string()),
            round: 1,
            pick_no,
            source: SelectionSource::Manual,
            skipped: false,
            picked_at: OffsetDateTime::now_utc(),
        }
    }

    #[tokio::test]
    async fn record_selection_writes_pick_and_roster_together() {
        let gw = InMemoryGateway::new();
        gw.put_draft(draft("d1"));
        let sel = selection("d1", "t1", "g1", 1);
        let delta = RosterDelta {
            team_id: "t1".to_string(),
            add_golfer: Some("g1".to_string()),
        };
        gw.record_selection(&sel, &delta).await.unwrap();

        assert_eq!(gw.selections("d1").len(), 1);
        assert!(gw.roster("t1").contains("g1"));
    }

    #[tokio::test]
    async fn injected_faults_fail_writes_then_recover() {
        let gw = InMemoryGateway::new();
        gw.put_draft(draft("d1"));
        gw.fail_next_writes(2);

        let sel = selection("d1", "t1", "g1", 1);
        let delta = RosterDelta {
            team_id: "t1".to_string(),
            add_golfer: Some("g1".to_string()),
        };
        assert!(gw.record_selection(&sel, &delta).await.is_err());
        assert!(gw.record_selection(&sel, &delta).await.is_err());
        gw.record_selection(&sel, &delta).await.unwrap();
        assert_eq!(gw.write_attempts(), 3);
        // Failed attempts must not leave partial writes behind.
        assert_eq!(gw.selections("d1").len(), 1);
    }

    #[tokio::test]
    async fn load_pool_excludes_rostered_golfers() {
        let gw = InMemoryGateway::new();
        gw.put_draft(draft("d1"));
        gw.put_teams("league-1", vec!["t1".to_string(), "t2".to_string()]);
        gw.put_pool(
            "period-1",
            vec![
                PoolEntry {
                    golfer_id: "g1".to_string(),
                    rank: 1,
                },
                PoolEntry {
                    golfer_id: "g2".to_string(),
                    rank: 2,
                },
            ],
        );
        let sel = selection("d1", "t1", "g1", 1);
        let delta = RosterDelta {
            team_id: "t1".to_string(),
            add_golfer: Some("g1".to_string()),
        };
        gw.record_selection(&sel, &delta).await.unwrap();

        let pool = gw.load_pool("period-1", "league-1").await.unwrap();
        assert_eq!(pool.len(), 1);
        assert_eq!(pool[0].golfer_id, "g2");
    }

    #[tokio::test]
    async fn save_draft_order_is_first_writer_wins() {
        let gw = InMemoryGateway::new();
        gw.put_draft(draft("d1"));
        let now = OffsetDateTime::now_utc();

        gw.save_draft_order("d1", &["t1".to_string(), "t2".to_string()], now)
            .await
            .unwrap();
        gw.save_draft_order("d1", &["t2".to_string(), "t1".to_string()], now)
            .await
            .unwrap();

        let stored = gw.draft("d1").unwrap();
        assert_eq!(stored.draft_order, vec!["t1".to_string(), "t2".to_string()]);
        assert!(stored.start_date.is_some());
    }
}
