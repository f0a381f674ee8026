//! Domain-level error type for the draft coordinator.
//!
//! HTTP- and transport-agnostic. Route handlers return
//! `Result<T, crate::error::AppError>` and convert via the provided
//! `From<DraftError> for AppError` implementation; websocket sessions map
//! these onto wire error codes instead.

use thiserror::Error;

use crate::domain::{GolferId, TeamId};
use crate::gateway::StorageError;

#[derive(Debug, Error)]
pub enum DraftError {
    /// `start` was called for a draft that is already running or complete.
    #[error("draft already started")]
    AlreadyStarted,

    /// A selection arrived for a draft with no running coordinator.
    #[error("draft is not running")]
    DraftNotRunning,

    /// The submitting team is not the team the current turn belongs to.
    #[error("not your turn: expected team {expected}")]
    NotYourTurn { expected: TeamId },

    /// The golfer is not (or no longer) eligible in this draft's pool.
    #[error("golfer {0} is not available")]
    GolferUnavailable(GolferId),

    /// The turn's clock already resolved (earlier manual pick or timeout).
    #[error("turn already resolved")]
    TurnAlreadyResolved,

    /// A selection could not be durably persisted after bounded retries; the
    /// draft is parked and needs external intervention.
    #[error("draft stalled")]
    Stalled,

    #[error(transparent)]
    Storage(#[from] StorageError),
}
