//! Live draft flow: turn-based, time-boxed draft orchestration.
//!
//! One `DraftRun` task drives each active draft end to end; distinct drafts
//! are fully independent. Websocket sessions interact with a running draft
//! only through `DraftCoordinator::submit_selection`, which validates
//! against the currently open turn and races its clock.

mod auto_pick;
mod orchestration;
mod selections;
mod turn_clock;

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use parking_lot::RwLock;
use rand::seq::SliceRandom;
use time::OffsetDateTime;
use tokio::time::sleep;
use tracing::warn;

use crate::config::draft::DraftRules;
use crate::domain::{DraftId, PoolSnapshot, TeamId, TurnCursor};
use crate::errors::DraftError;
use crate::gateway::{DataGateway, StorageError};
use crate::ws::hub::DraftSessionRegistry;

use orchestration::DraftRun;

pub use turn_clock::{ManualPick, TurnClock};

// Durable-write retry configuration.
const PERSIST_MAX_ATTEMPTS: u32 = 3;
const PERSIST_INITIAL_RETRY_DELAY_MS: u64 = 50;
const PERSIST_MAX_RETRY_DELAY_MS: u64 = 200;

/// Shared state of one running draft, readable by websocket sessions.
#[derive(Default)]
pub struct DraftHandle {
    open_turn: RwLock<Option<Arc<OpenTurn>>>,
    stalled: AtomicBool,
}

/// The turn currently racing its clock.
pub struct OpenTurn {
    pub round: u32,
    pub pick_no: u32,
    pub team_id: TeamId,
    pub(super) clock: Arc<TurnClock>,
    pub(super) pool: Arc<RwLock<PoolSnapshot>>,
}

pub struct DraftCoordinator {
    gateway: Arc<dyn DataGateway>,
    registry: Arc<DraftSessionRegistry>,
    defaults: DraftRules,
    active: DashMap<DraftId, Arc<DraftHandle>>,
}

impl DraftCoordinator {
    pub fn new(
        gateway: Arc<dyn DataGateway>,
        registry: Arc<DraftSessionRegistry>,
        defaults: DraftRules,
    ) -> Arc<Self> {
        Arc::new(Self {
            gateway,
            registry,
            defaults,
            active: DashMap::new(),
        })
    }

    /// Start the draft's run loop. Idempotent: a draft that is already
    /// running, stalled, or complete is rejected with `AlreadyStarted`;
    /// a second concurrent run can never be spawned.
    ///
    /// Returns as soon as the loop is spawned; completion is observed on the
    /// broadcast channel.
    pub async fn start(self: &Arc<Self>, draft_id: &str) -> Result<(), DraftError> {
        let handle = Arc::new(DraftHandle::default());
        match self.active.entry(draft_id.to_string()) {
            Entry::Occupied(_) => return Err(DraftError::AlreadyStarted),
            Entry::Vacant(slot) => {
                slot.insert(Arc::clone(&handle));
            }
        }

        match self.prepare(draft_id, Arc::clone(&handle)).await {
            Ok(run) => {
                let coordinator = Arc::clone(self);
                let id = draft_id.to_string();
                tokio::spawn(async move {
                    run.run().await;
                    // Stalled drafts keep their handle so retried starts are
                    // rejected until someone intervenes.
                    if !handle.stalled.load(Ordering::SeqCst) {
                        coordinator.active.remove(&id);
                    }
                });
                Ok(())
            }
            Err(err) => {
                self.active.remove(draft_id);
                Err(err)
            }
        }
    }

    /// Load everything the run loop needs and persist the started
    /// transition. No turn opens until this succeeds.
    async fn prepare(
        &self,
        draft_id: &str,
        handle: Arc<DraftHandle>,
    ) -> Result<DraftRun, DraftError> {
        let draft = self.gateway.load_draft(draft_id).await?;
        if draft.is_complete {
            return Err(DraftError::AlreadyStarted);
        }

        // Per-league clock settings are re-read at every start.
        let stored = self.gateway.load_rules(&draft.league_id).await?;
        let rules = self.defaults.overlay(&stored);

        let mut order = draft.draft_order.clone();
        if order.is_empty() {
            order = self.gateway.load_teams(&draft.league_id).await?;
            order.shuffle(&mut rand::rng());
        }
        if order.is_empty() {
            return Err(StorageError::Corrupt(format!(
                "draft {draft_id} has no participating teams"
            ))
            .into());
        }

        // Order and started transition persist in one durable write before
        // any turn opens; the gateway keeps the first stored order, so a
        // crashed-and-retried start cannot produce two different orders.
        self.gateway
            .save_draft_order(draft_id, &order, OffsetDateTime::now_utc())
            .await?;

        let pool_entries = self
            .gateway
            .load_pool(&draft.period_id, &draft.league_id)
            .await?;

        Ok(DraftRun {
            gateway: Arc::clone(&self.gateway),
            registry: Arc::clone(&self.registry),
            draft_id: draft.id.clone(),
            league_id: draft.league_id.clone(),
            handle,
            cursor: TurnCursor::new(order, draft.total_rounds, rules.snake),
            pool: Arc::new(RwLock::new(PoolSnapshot::new(pool_entries))),
            window: rules.pick_window(),
        })
    }

    /// The turn currently awaiting a pick, if any.
    pub fn open_turn(&self, draft_id: &str) -> Option<(u32, u32, TeamId)> {
        let handle = self.active.get(draft_id)?;
        let turn = handle.open_turn.read().clone()?;
        Some((turn.round, turn.pick_no, turn.team_id.clone()))
    }

    pub fn is_running(&self, draft_id: &str) -> bool {
        self.active.contains_key(draft_id)
    }

    pub fn is_stalled(&self, draft_id: &str) -> bool {
        self.active
            .get(draft_id)
            .map(|h| h.stalled.load(Ordering::SeqCst))
            .unwrap_or(false)
    }
}

/// Bounded retry for durable gateway writes: 3 attempts, 50ms doubling
/// delay capped at 200ms. Only transient errors are retried.
pub(super) async fn with_retry<T, F, Fut>(op: &'static str, mut attempt_fn: F) -> Result<T, StorageError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, StorageError>>,
{
    let mut attempt = 0u32;
    loop {
        attempt += 1;
        match attempt_fn().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if attempt >= PERSIST_MAX_ATTEMPTS || !err.is_transient() {
                    return Err(err);
                }
                let delay_ms = PERSIST_INITIAL_RETRY_DELAY_MS
                    .saturating_mul(2_u64.pow(attempt - 1))
                    .min(PERSIST_MAX_RETRY_DELAY_MS);
                warn!(
                    error = %err,
                    op,
                    attempt,
                    retry_delay_ms = delay_ms,
                    "durable write failed, retrying"
                );
                sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
