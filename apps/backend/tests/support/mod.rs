#![allow(dead_code)]

pub mod logging;

use std::sync::Arc;

use fairway_backend::config::draft::StoredDraftSettings;
use fairway_backend::domain::{DraftRecord, PoolEntry, TeamId};
use fairway_backend::ws::hub::DraftSessionRegistry;
use fairway_backend::{DraftCoordinator, DraftRules, InMemoryGateway};

pub const DRAFT_ID: &str = "draft-1";
pub const LEAGUE_ID: &str = "league-1";
pub const PERIOD_ID: &str = "period-1";

pub fn draft_record(order: Vec<TeamId>, total_rounds: u32) -> DraftRecord {
    DraftRecord {
        id: DRAFT_ID.to_string(),
        league_id: LEAGUE_ID.to_string(),
        period_id: PERIOD_ID.to_string(),
        draft_order: order,
        total_rounds,
        current_round: 1,
        current_pick: 1,
        is_complete: false,
        start_date: None,
        end_date: None,
    }
}

/// Golfers `g01..gNN`, ranked in id order so the auto-select choice is
/// deterministic.
pub fn ranked_pool(count: u32) -> Vec<PoolEntry> {
    (1..=count)
        .map(|rank| PoolEntry {
            golfer_id: format!("g{rank:02}"),
            rank,
        })
        .collect()
}

pub struct Fixture {
    pub gateway: Arc<InMemoryGateway>,
    pub registry: Arc<DraftSessionRegistry>,
    pub coordinator: Arc<DraftCoordinator>,
}

/// A seeded draft with a fixed order, ready to start.
pub fn fixture(order: &[&str], total_rounds: u32, pool_size: u32) -> Fixture {
    fixture_with_settings(order, total_rounds, pool_size, StoredDraftSettings::default())
}

pub fn fixture_with_settings(
    order: &[&str],
    total_rounds: u32,
    pool_size: u32,
    settings: StoredDraftSettings,
) -> Fixture {
    let gateway = Arc::new(InMemoryGateway::new());
    gateway.put_draft(draft_record(
        order.iter().map(|t| t.to_string()).collect(),
        total_rounds,
    ));
    gateway.put_teams(LEAGUE_ID, order.iter().map(|t| t.to_string()).collect());
    gateway.put_pool(PERIOD_ID, ranked_pool(pool_size));
    gateway.put_settings(LEAGUE_ID, settings);

    let registry = Arc::new(DraftSessionRegistry::new());
    let coordinator = DraftCoordinator::new(
        gateway.clone(),
        Arc::clone(&registry),
        DraftRules::default(),
    );
    Fixture {
        gateway,
        registry,
        coordinator,
    }
}

/// Poll a condition while letting paused-clock auto-advance fire pending
/// timers between checks. Each sleep moves virtual time forward, so full
/// pick windows elapse within a few polls.
pub async fn wait_until(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if cond() {
            return;
        }
        tokio::time::sleep(std::time::Duration::from_millis(250)).await;
    }
    panic!("timed out waiting for {what}");
}

/// Poll a condition without sleeping, so a paused clock stays frozen while
/// other ready tasks run.
pub async fn wait_until_yielding(what: &str, cond: impl Fn() -> bool) {
    for _ in 0..10_000 {
        if cond() {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("timed out waiting for {what}");
}
