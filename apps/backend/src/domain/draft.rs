use time::OffsetDateTime;

use crate::domain::{DraftId, LeagueId, PeriodId, TeamId};

/// Draft document as stored by the data gateway.
#[derive(Debug, Clone)]
pub struct DraftRecord {
    pub id: DraftId,
    pub league_id: LeagueId,
    /// Scheduling period this draft assigns golfers for.
    pub period_id: PeriodId,
    /// Fixed pick order; empty until the draft is started (a uniform random
    /// permutation is generated and persisted at start).
    pub draft_order: Vec<TeamId>,
    pub total_rounds: u32,
    pub current_round: u32,
    pub current_pick: u32,
    pub is_complete: bool,
    pub start_date: Option<OffsetDateTime>,
    pub end_date: Option<OffsetDateTime>,
}

/// Turn cursor for a running draft.
///
/// This is the only place that decides whose turn is next. The cursor walks
/// `(round, slot)` positions over the fixed draft order, reversing direction
/// on even rounds when snake ordering is enabled.
#[derive(Debug, Clone)]
pub struct TurnCursor {
    order: Vec<TeamId>,
    total_rounds: u32,
    snake: bool,
    /// 1-based round number.
    round: u32,
    /// 1-based position within the round.
    slot: u32,
    complete: bool,
}

impl TurnCursor {
    pub fn new(order: Vec<TeamId>, total_rounds: u32, snake: bool) -> Self {
        let complete = order.is_empty() || total_rounds == 0;
        Self {
            order,
            total_rounds,
            snake,
            round: 1,
            slot: 1,
            complete,
        }
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn slot(&self) -> u32 {
        self.slot
    }

    pub fn team_count(&self) -> u32 {
        self.order.len() as u32
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Pick number of the current slot, 1-based and contiguous across the
    /// whole draft.
    pub fn overall_pick(&self) -> u32 {
        (self.round - 1) * self.team_count() + self.slot
    }

    /// Team expected to pick at the current `(round, slot)`, or `None` once
    /// the draft is complete.
    pub fn expected_team(&self) -> Option<&TeamId> {
        if self.complete {
            return None;
        }
        let idx = if self.snake && self.round % 2 == 0 {
            self.order.len() - self.slot as usize
        } else {
            self.slot as usize - 1
        };
        self.order.get(idx)
    }

    /// Advance past the current slot, wrapping to the next round and marking
    /// the cursor complete after the final round.
    pub fn advance(&mut self) {
        if self.complete {
            return;
        }
        self.slot += 1;
        if self.slot > self.team_count() {
            self.slot = 1;
            self.round += 1;
            if self.round > self.total_rounds {
                self.complete = true;
            }
        }
    }
}
