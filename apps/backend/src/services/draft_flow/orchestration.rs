use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use time::OffsetDateTime;
use tracing::{error, info, warn};

use super::{with_retry, DraftHandle, ManualPick, OpenTurn, TurnClock};
use crate::domain::{DraftId, LeagueId, PoolSnapshot, SelectionSource, TurnCursor};
use crate::errors::DraftError;
use crate::gateway::DataGateway;
use crate::ws::hub::{DraftEvent, DraftSessionRegistry};

/// One draft's run loop state. Owned by the spawned task; turn progression
/// within a draft is strictly sequential.
pub(super) struct DraftRun {
    pub(super) gateway: Arc<dyn DataGateway>,
    pub(super) registry: Arc<DraftSessionRegistry>,
    pub(super) draft_id: DraftId,
    pub(super) league_id: LeagueId,
    pub(super) handle: Arc<DraftHandle>,
    pub(super) cursor: TurnCursor,
    pub(super) pool: Arc<RwLock<PoolSnapshot>>,
    pub(super) window: Duration,
}

pub(super) enum TurnOutcome {
    Manual(ManualPick),
    Expired,
}

impl DraftRun {
    pub(super) async fn run(mut self) {
        info!(
            draft_id = %self.draft_id,
            rounds = self.cursor.total_rounds(),
            teams = self.cursor.team_count(),
            pool = self.pool.read().len(),
            window_secs = self.window.as_secs(),
            "draft started"
        );
        match self.run_to_completion().await {
            Ok(()) => info!(draft_id = %self.draft_id, "draft completed"),
            Err(DraftError::Stalled) => {
                self.handle.stalled.store(true, Ordering::SeqCst);
                let round = self.cursor.round();
                let pick_no = self.cursor.overall_pick();
                // No internal failure detail leaks to participants.
                self.registry.broadcast(
                    &self.draft_id,
                    DraftEvent::Anomaly {
                        draft_id: self.draft_id.clone(),
                        round,
                        pick_no,
                        reason: "draft_stalled".to_string(),
                    },
                );
                warn!(
                    draft_id = %self.draft_id,
                    round,
                    pick_no,
                    "draft stalled, awaiting external intervention"
                );
            }
            Err(err) => {
                error!(draft_id = %self.draft_id, error = %err, "draft loop aborted");
            }
        }
    }

    async fn run_to_completion(&mut self) -> Result<(), DraftError> {
        while let Some(team_id) = self.cursor.expected_team().cloned() {
            match self.open_turn(team_id).await {
                TurnOutcome::Manual(pick) => {
                    let ManualPick { team_id, golfer_id } = pick;
                    match self
                        .apply_selection(team_id, Some(golfer_id), SelectionSource::Manual)
                        .await
                    {
                        Ok(()) => {}
                        Err(DraftError::Stalled) => return Err(DraftError::Stalled),
                        Err(err) => {
                            // The clock was claimed but the pick no longer
                            // validates; the turn still must resolve exactly
                            // once.
                            warn!(
                                draft_id = %self.draft_id,
                                round = self.cursor.round(),
                                pick_no = self.cursor.overall_pick(),
                                error = %err,
                                "claimed manual pick failed validation, falling back to auto-select"
                            );
                            self.auto_pick().await?;
                        }
                    }
                }
                TurnOutcome::Expired => self.auto_pick().await?,
            }
        }

        let gateway = Arc::clone(&self.gateway);
        let draft_id = self.draft_id.clone();
        with_retry("mark_complete", || {
            let gateway = Arc::clone(&gateway);
            let draft_id = draft_id.clone();
            async move {
                gateway
                    .mark_complete(&draft_id, OffsetDateTime::now_utc())
                    .await
            }
        })
        .await
        .map_err(|err| {
            error!(draft_id = %self.draft_id, error = %err, "failed to persist draft completion");
            DraftError::Stalled
        })?;

        self.registry.broadcast(
            &self.draft_id,
            DraftEvent::DraftComplete {
                draft_id: self.draft_id.clone(),
            },
        );
        Ok(())
    }

    /// Open the current turn: publish it for session-side validation,
    /// broadcast the deadline, and race a manual pick against the clock.
    async fn open_turn(&mut self, team_id: crate::domain::TeamId) -> TurnOutcome {
        let round = self.cursor.round();
        let pick_no = self.cursor.overall_pick();
        let (clock, mut rx) = TurnClock::new();
        let deadline = OffsetDateTime::now_utc() + self.window;

        *self.handle.open_turn.write() = Some(Arc::new(OpenTurn {
            round,
            pick_no,
            team_id: team_id.clone(),
            clock: Arc::clone(&clock),
            pool: Arc::clone(&self.pool),
        }));
        self.registry.broadcast(
            &self.draft_id,
            DraftEvent::TurnOpened {
                draft_id: self.draft_id.clone(),
                round,
                pick_no,
                team_id: team_id.clone(),
                deadline_ms: unix_ms(deadline),
            },
        );
        info!(
            draft_id = %self.draft_id,
            round,
            pick_no,
            team_id = %team_id,
            "turn opened"
        );

        let outcome = tokio::select! {
            res = &mut rx => match res {
                Ok(pick) => TurnOutcome::Manual(pick),
                // The clock holds the sender until a submission claims it,
                // so the channel cannot close while the turn is open.
                Err(_) => TurnOutcome::Expired,
            },
            _ = tokio::time::sleep(self.window) => {
                if clock.expire() {
                    TurnOutcome::Expired
                } else {
                    // A manual pick claimed the clock right at the deadline;
                    // honor it.
                    match rx.await {
                        Ok(pick) => TurnOutcome::Manual(pick),
                        Err(_) => TurnOutcome::Expired,
                    }
                }
            }
        };

        // The turn is no longer open; late submissions get
        // TurnAlreadyResolved from the discarded clock or miss the handle
        // entirely.
        *self.handle.open_turn.write() = None;
        outcome
    }
}

fn unix_ms(at: OffsetDateTime) -> i64 {
    (at.unix_timestamp_nanos() / 1_000_000) as i64
}
