use time::OffsetDateTime;
use tracing::{info, warn};

use super::orchestration::DraftRun;
use crate::domain::{RosterDelta, Selection, SelectionSource, TeamId};
use crate::errors::DraftError;
use crate::ws::hub::DraftEvent;

impl DraftRun {
    /// Deadline fallback: deterministically pick on the expected team's
    /// behalf (lowest rank, ties by golfer id), or record a skipped turn
    /// when no eligible golfers remain.
    pub(super) async fn auto_pick(&mut self) -> Result<(), DraftError> {
        let Some(team_id) = self.cursor.expected_team().cloned() else {
            return Ok(());
        };
        let choice = self.pool.read().best_available().cloned();
        match choice {
            Some(entry) => {
                info!(
                    draft_id = %self.draft_id,
                    round = self.cursor.round(),
                    pick_no = self.cursor.overall_pick(),
                    team_id = %team_id,
                    golfer_id = %entry.golfer_id,
                    rank = entry.rank,
                    "clock expired, auto-selecting"
                );
                self.apply_selection(team_id, Some(entry.golfer_id), SelectionSource::Auto)
                    .await
            }
            None => self.skip_exhausted_turn(team_id).await,
        }
    }

    /// Pool exhausted: the turn still must advance to avoid deadlock. The
    /// slot is recorded with no golfer and an explicit skipped marker, and
    /// surfaced to participants as an anomaly.
    async fn skip_exhausted_turn(&mut self, team_id: TeamId) -> Result<(), DraftError> {
        let round = self.cursor.round();
        let pick_no = self.cursor.overall_pick();
        warn!(
            draft_id = %self.draft_id,
            round,
            pick_no,
            team_id = %team_id,
            "pool exhausted, skipping turn"
        );

        let selection = Selection {
            draft_id: self.draft_id.clone(),
            league_id: self.league_id.clone(),
            team_id: team_id.clone(),
            golfer_id: None,
            round,
            pick_no,
            source: SelectionSource::Auto,
            skipped: true,
            picked_at: OffsetDateTime::now_utc(),
        };
        let delta = RosterDelta {
            team_id,
            add_golfer: None,
        };
        self.persist_selection(&selection, &delta).await?;

        self.registry.broadcast(
            &self.draft_id,
            DraftEvent::Anomaly {
                draft_id: self.draft_id.clone(),
                round,
                pick_no,
                reason: "pool_exhausted".to_string(),
            },
        );
        self.cursor.advance();
        Ok(())
    }
}
