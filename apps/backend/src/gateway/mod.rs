//! Data gateway: the external persistence contract the draft coordinator
//! consumes.
//!
//! Document schemas, transactions and CRUD endpoints live behind this seam;
//! the coordinator only needs the handful of reads and atomic writes below.
//! Every call may fail with a `StorageError`; the coordinator treats
//! `Unavailable` as transient and retries bounded.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::config::draft::StoredDraftSettings;
use crate::domain::{DraftId, DraftRecord, PoolEntry, RosterDelta, Selection, TeamId};

pub mod memory;

pub use memory::InMemoryGateway;

#[derive(Debug, Error)]
pub enum StorageError {
    /// Transient infrastructure failure; safe to retry.
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("draft {0} not found")]
    DraftNotFound(DraftId),
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

impl StorageError {
    pub fn is_transient(&self) -> bool {
        matches!(self, StorageError::Unavailable(_))
    }
}

#[async_trait]
pub trait DataGateway: Send + Sync {
    async fn load_draft(&self, draft_id: &str) -> Result<DraftRecord, StorageError>;

    /// League-stored draft clock settings; absent fields fall back to
    /// process defaults.
    async fn load_rules(&self, league_id: &str) -> Result<StoredDraftSettings, StorageError>;

    /// Teams participating in the league, used to generate a draft order
    /// when none was pre-specified.
    async fn load_teams(&self, league_id: &str) -> Result<Vec<TeamId>, StorageError>;

    /// Ranked pool of golfers eligible for the period, excluding golfers
    /// already rostered in the league.
    async fn load_pool(
        &self,
        period_id: &str,
        league_id: &str,
    ) -> Result<Vec<PoolEntry>, StorageError>;

    /// Persist the draft order together with the started transition, in one
    /// durable write. First writer wins: if an order is already stored it is
    /// kept, so a crashed-and-retried start never produces two orders.
    async fn save_draft_order(
        &self,
        draft_id: &str,
        order: &[TeamId],
        started_at: OffsetDateTime,
    ) -> Result<(), StorageError>;

    /// Persist a selection and its roster delta atomically: both succeed or
    /// neither does.
    async fn record_selection(
        &self,
        selection: &Selection,
        delta: &RosterDelta,
    ) -> Result<(), StorageError>;

    async fn mark_complete(
        &self,
        draft_id: &str,
        ended_at: OffsetDateTime,
    ) -> Result<(), StorageError>;
}
