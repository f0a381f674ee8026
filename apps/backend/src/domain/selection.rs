use time::OffsetDateTime;

use crate::domain::{DraftId, GolferId, LeagueId, TeamId};

/// Who made the pick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionSource {
    Manual,
    Auto,
}

impl SelectionSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionSource::Manual => "manual",
            SelectionSource::Auto => "auto",
        }
    }
}

/// One recorded draft pick.
///
/// `golfer_id` is `None` only for a pool-exhausted turn, which is recorded
/// with the explicit `skipped` marker instead of silently dropping the slot.
#[derive(Debug, Clone)]
pub struct Selection {
    pub draft_id: DraftId,
    pub league_id: LeagueId,
    pub team_id: TeamId,
    pub golfer_id: Option<GolferId>,
    /// 1-based round number.
    pub round: u32,
    /// 1-based pick number, contiguous across the whole draft.
    pub pick_no: u32,
    pub source: SelectionSource,
    pub skipped: bool,
    pub picked_at: OffsetDateTime,
}

/// Effect of a selection on the picking team's roster, persisted atomically
/// with the selection record by the data gateway.
#[derive(Debug, Clone)]
pub struct RosterDelta {
    pub team_id: TeamId,
    pub add_golfer: Option<GolferId>,
}
