use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::domain::{GolferId, TeamId};
use crate::errors::DraftError;

/// A validated manual pick that claimed a turn's clock.
#[derive(Debug)]
pub struct ManualPick {
    pub team_id: TeamId,
    pub golfer_id: GolferId,
}

/// Single-turn race between a manual selection and the deadline.
///
/// Created fresh for every turn and discarded after resolution, so a stale
/// signal from a prior turn can never resolve the next one. The compare-and-
/// set on `resolved` guarantees at-most-once resolution: when a manual pick
/// and the deadline fire near-simultaneously, exactly one is honored.
pub struct TurnClock {
    resolved: AtomicBool,
    slot: Mutex<Option<oneshot::Sender<ManualPick>>>,
}

impl TurnClock {
    pub fn new() -> (Arc<Self>, oneshot::Receiver<ManualPick>) {
        let (tx, rx) = oneshot::channel();
        let clock = Arc::new(Self {
            resolved: AtomicBool::new(false),
            slot: Mutex::new(Some(tx)),
        });
        (clock, rx)
    }

    /// Claim the clock for a manual pick. A submission that loses the race
    /// (to the deadline or to an earlier manual pick) gets
    /// `TurnAlreadyResolved` and is never applied.
    pub fn submit(&self, pick: ManualPick) -> Result<(), DraftError> {
        if self
            .resolved
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(DraftError::TurnAlreadyResolved);
        }
        let sender = self.slot.lock().take();
        match sender {
            Some(tx) => tx.send(pick).map_err(|_| DraftError::DraftNotRunning),
            None => Err(DraftError::TurnAlreadyResolved),
        }
    }

    /// Claim the clock for the deadline. `false` means a manual pick won the
    /// race; the turn's receiver will still yield that pick.
    pub fn expire(&self) -> bool {
        self.resolved
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
    }

    pub fn is_resolved(&self) -> bool {
        self.resolved.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pick(golfer: &str) -> ManualPick {
        ManualPick {
            team_id: "t1".to_string(),
            golfer_id: golfer.to_string(),
        }
    }

    #[tokio::test]
    async fn first_submission_wins_second_is_stale() {
        let (clock, rx) = TurnClock::new();
        clock.submit(pick("g1")).unwrap();
        assert!(matches!(
            clock.submit(pick("g2")),
            Err(DraftError::TurnAlreadyResolved)
        ));
        assert_eq!(rx.await.unwrap().golfer_id, "g1");
    }

    #[tokio::test]
    async fn submission_after_expiry_is_rejected() {
        let (clock, _rx) = TurnClock::new();
        assert!(clock.expire());
        assert!(matches!(
            clock.submit(pick("g1")),
            Err(DraftError::TurnAlreadyResolved)
        ));
    }

    #[tokio::test]
    async fn expiry_after_submission_defers_to_the_manual_pick() {
        let (clock, rx) = TurnClock::new();
        clock.submit(pick("g1")).unwrap();
        assert!(!clock.expire());
        assert!(clock.is_resolved());
        assert_eq!(rx.await.unwrap().golfer_id, "g1");
    }

    #[tokio::test]
    async fn expiry_claims_at_most_once() {
        let (clock, _rx) = TurnClock::new();
        assert!(clock.expire());
        assert!(!clock.expire());
    }
}
