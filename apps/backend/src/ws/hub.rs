use actix::prelude::*;
use dashmap::DashMap;
use tracing::warn;
use uuid::Uuid;

use crate::domain::{DraftId, GolferId, SelectionSource, TeamId};

/// Draft lifecycle event fanned out to every channel attached to a draft.
#[derive(Message, Clone, Debug)]
#[rtype(result = "()")]
pub enum DraftEvent {
    TurnOpened {
        draft_id: DraftId,
        round: u32,
        pick_no: u32,
        team_id: TeamId,
        /// Unix milliseconds at which the turn auto-resolves.
        deadline_ms: i64,
    },
    SelectionMade {
        draft_id: DraftId,
        round: u32,
        pick_no: u32,
        team_id: TeamId,
        golfer_id: Option<GolferId>,
        source: SelectionSource,
        skipped: bool,
    },
    DraftComplete {
        draft_id: DraftId,
    },
    Anomaly {
        draft_id: DraftId,
        round: u32,
        pick_no: u32,
        reason: String,
    },
}

/// Per-draft fan-out groups of attached websocket sessions.
///
/// Groups are independent across drafts; mutation and broadcast iteration
/// are exclusive per group via the inner map's sharded locks.
#[derive(Default)]
pub struct DraftSessionRegistry {
    groups: DashMap<DraftId, DashMap<Uuid, Recipient<DraftEvent>>>,
}

impl DraftSessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a channel under a draft's fan-out group. Idempotent per
    /// token: re-attaching replaces the previous recipient, so a channel is
    /// never delivered to twice.
    pub fn attach(&self, draft_id: &str, token: Uuid, recipient: Recipient<DraftEvent>) {
        let group = self
            .groups
            .entry(draft_id.to_string())
            .or_insert_with(DashMap::new);
        group.insert(token, recipient);
    }

    /// Remove a channel; a no-op for unknown tokens. Empty groups are
    /// dropped.
    pub fn detach(&self, draft_id: &str, token: Uuid) {
        if let Some(group) = self.groups.get(draft_id) {
            group.remove(&token);
            let empty = group.is_empty();
            drop(group);
            if empty {
                self.groups.remove_if(draft_id, |_, g| g.is_empty());
            }
        }
    }

    /// Deliver an event to every attached channel of the draft, in broadcast
    /// call order. A channel whose mailbox is gone is detached as a side
    /// effect; delivery to the rest is unaffected.
    pub fn broadcast(&self, draft_id: &str, event: DraftEvent) {
        let dead: Vec<Uuid> = {
            let Some(group) = self.groups.get(draft_id) else {
                return;
            };
            group
                .iter()
                .filter(|entry| entry.value().try_send(event.clone()).is_err())
                .map(|entry| *entry.key())
                .collect()
        };
        for token in dead {
            warn!(draft_id, token = %token, "dropping dead draft channel");
            self.detach(draft_id, token);
        }
    }

    pub fn attached(&self, draft_id: &str) -> usize {
        self.groups.get(draft_id).map(|g| g.len()).unwrap_or(0)
    }
}
