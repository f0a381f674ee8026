use std::sync::atomic::Ordering;
use std::sync::Arc;

use time::OffsetDateTime;
use tracing::{error, info};

use super::orchestration::DraftRun;
use super::{with_retry, DraftCoordinator, ManualPick};
use crate::domain::{GolferId, RosterDelta, Selection, SelectionSource, TeamId};
use crate::errors::DraftError;
use crate::ws::hub::DraftEvent;

impl DraftCoordinator {
    /// Session-facing manual pick path: validate against the open turn, then
    /// claim its clock. Rejections go back to the submitting channel only
    /// and leave draft state untouched.
    pub fn submit_selection(
        &self,
        draft_id: &str,
        team_id: &str,
        golfer_id: &str,
    ) -> Result<(), DraftError> {
        let handle = self
            .active
            .get(draft_id)
            .map(|h| Arc::clone(h.value()))
            .ok_or(DraftError::DraftNotRunning)?;
        if handle.stalled.load(Ordering::SeqCst) {
            return Err(DraftError::Stalled);
        }
        // Between turns (or after completion) there is nothing to claim.
        let turn = handle
            .open_turn
            .read()
            .clone()
            .ok_or(DraftError::TurnAlreadyResolved)?;

        if turn.team_id != team_id {
            return Err(DraftError::NotYourTurn {
                expected: turn.team_id.clone(),
            });
        }
        if !turn.pool.read().contains(golfer_id) {
            return Err(DraftError::GolferUnavailable(golfer_id.to_string()));
        }

        turn.clock.submit(ManualPick {
            team_id: team_id.to_string(),
            golfer_id: golfer_id.to_string(),
        })
    }
}

impl DraftRun {
    /// Apply one selection: validate, shrink the pool, persist durably,
    /// broadcast, then advance the cursor. The cursor is never advanced past
    /// a selection that failed to persist.
    pub(super) async fn apply_selection(
        &mut self,
        team_id: TeamId,
        golfer_id: Option<GolferId>,
        source: SelectionSource,
    ) -> Result<(), DraftError> {
        let expected = self
            .cursor
            .expected_team()
            .cloned()
            .ok_or(DraftError::DraftNotRunning)?;
        if expected != team_id {
            return Err(DraftError::NotYourTurn { expected });
        }
        if let Some(id) = &golfer_id {
            if self.pool.write().take(id).is_none() {
                return Err(DraftError::GolferUnavailable(id.clone()));
            }
        }

        let round = self.cursor.round();
        let pick_no = self.cursor.overall_pick();
        let selection = Selection {
            draft_id: self.draft_id.clone(),
            league_id: self.league_id.clone(),
            team_id: team_id.clone(),
            golfer_id: golfer_id.clone(),
            round,
            pick_no,
            source,
            skipped: golfer_id.is_none(),
            picked_at: OffsetDateTime::now_utc(),
        };
        let delta = RosterDelta {
            team_id: team_id.clone(),
            add_golfer: golfer_id.clone(),
        };
        self.persist_selection(&selection, &delta).await?;

        self.registry.broadcast(
            &self.draft_id,
            DraftEvent::SelectionMade {
                draft_id: self.draft_id.clone(),
                round,
                pick_no,
                team_id: team_id.clone(),
                golfer_id: golfer_id.clone(),
                source,
                skipped: selection.skipped,
            },
        );
        info!(
            draft_id = %self.draft_id,
            round,
            pick_no,
            team_id = %team_id,
            golfer_id = golfer_id.as_deref().unwrap_or("-"),
            source = source.as_str(),
            "selection applied"
        );

        self.cursor.advance();
        Ok(())
    }

    /// Durably record a selection and its roster delta. Exhausting the
    /// bounded retries stalls the draft.
    pub(super) async fn persist_selection(
        &self,
        selection: &Selection,
        delta: &RosterDelta,
    ) -> Result<(), DraftError> {
        let gateway = Arc::clone(&self.gateway);
        with_retry("record_selection", || {
            let gateway = Arc::clone(&gateway);
            let selection = selection.clone();
            let delta = delta.clone();
            async move { gateway.record_selection(&selection, &delta).await }
        })
        .await
        .map_err(|err| {
            error!(
                draft_id = %self.draft_id,
                pick_no = selection.pick_no,
                error = %err,
                "failed to persist selection"
            );
            DraftError::Stalled
        })
    }
}
