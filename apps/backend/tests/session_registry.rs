//! Fan-out behavior of the draft session registry.

mod support;

use std::sync::Arc;
use std::time::Duration;

use actix::prelude::*;
use fairway_backend::domain::SelectionSource;
use fairway_backend::{DraftEvent, DraftSessionRegistry};
use parking_lot::Mutex;
use uuid::Uuid;

/// Records every event its mailbox receives.
struct Collector {
    events: Arc<Mutex<Vec<DraftEvent>>>,
}

impl Collector {
    fn start_new() -> (Addr<Self>, Arc<Mutex<Vec<DraftEvent>>>) {
        let events = Arc::new(Mutex::new(Vec::new()));
        let addr = Collector {
            events: Arc::clone(&events),
        }
        .start();
        (addr, events)
    }
}

impl Actor for Collector {
    type Context = Context<Self>;
}

impl Handler<DraftEvent> for Collector {
    type Result = ();

    fn handle(&mut self, msg: DraftEvent, _ctx: &mut Context<Self>) {
        self.events.lock().push(msg);
    }
}

#[derive(Message)]
#[rtype(result = "()")]
struct Stop;

impl Handler<Stop> for Collector {
    type Result = ();

    fn handle(&mut self, _msg: Stop, ctx: &mut Context<Self>) {
        ctx.stop();
    }
}

fn turn_opened(draft_id: &str, pick_no: u32) -> DraftEvent {
    DraftEvent::TurnOpened {
        draft_id: draft_id.to_string(),
        round: 1,
        pick_no,
        team_id: "t1".to_string(),
        deadline_ms: 0,
    }
}

async fn drain_mailboxes() {
    tokio::time::sleep(Duration::from_millis(20)).await;
}

#[actix_web::test]
async fn broadcast_reaches_only_the_drafts_sessions() {
    let registry = DraftSessionRegistry::new();
    let (a, a_events) = Collector::start_new();
    let (b, b_events) = Collector::start_new();
    let (c, c_events) = Collector::start_new();

    registry.attach("d1", Uuid::new_v4(), a.recipient());
    registry.attach("d1", Uuid::new_v4(), b.recipient());
    registry.attach("d2", Uuid::new_v4(), c.recipient());
    assert_eq!(registry.attached("d1"), 2);
    assert_eq!(registry.attached("d2"), 1);

    registry.broadcast("d1", turn_opened("d1", 1));
    drain_mailboxes().await;

    assert_eq!(a_events.lock().len(), 1);
    assert_eq!(b_events.lock().len(), 1);
    assert!(c_events.lock().is_empty());
}

#[actix_web::test]
async fn events_arrive_in_broadcast_order() {
    let registry = DraftSessionRegistry::new();
    let (a, events) = Collector::start_new();
    registry.attach("d1", Uuid::new_v4(), a.recipient());

    registry.broadcast("d1", turn_opened("d1", 1));
    registry.broadcast(
        "d1",
        DraftEvent::SelectionMade {
            draft_id: "d1".to_string(),
            round: 1,
            pick_no: 1,
            team_id: "t1".to_string(),
            golfer_id: Some("g01".to_string()),
            source: SelectionSource::Manual,
            skipped: false,
        },
    );
    drain_mailboxes().await;

    let seen = events.lock();
    assert_eq!(seen.len(), 2);
    assert!(matches!(seen[0], DraftEvent::TurnOpened { .. }));
    assert!(matches!(seen[1], DraftEvent::SelectionMade { .. }));
}

#[actix_web::test]
async fn reattaching_a_token_replaces_its_channel() {
    let registry = DraftSessionRegistry::new();
    let token = Uuid::new_v4();
    let (a, a_events) = Collector::start_new();
    let (b, b_events) = Collector::start_new();

    registry.attach("d1", token, a.recipient());
    registry.attach("d1", token, b.recipient());
    assert_eq!(registry.attached("d1"), 1);

    registry.broadcast("d1", turn_opened("d1", 1));
    drain_mailboxes().await;

    assert!(a_events.lock().is_empty());
    assert_eq!(b_events.lock().len(), 1);
}

#[actix_web::test]
async fn detach_is_idempotent_and_drops_empty_groups() {
    let registry = DraftSessionRegistry::new();
    let token = Uuid::new_v4();
    let (a, events) = Collector::start_new();

    registry.attach("d1", token, a.recipient());
    registry.detach("d1", token);
    registry.detach("d1", token);
    assert_eq!(registry.attached("d1"), 0);

    registry.broadcast("d1", turn_opened("d1", 1));
    drain_mailboxes().await;
    assert!(events.lock().is_empty());
}

#[actix_web::test]
async fn dead_channels_are_pruned_on_broadcast() {
    let registry = DraftSessionRegistry::new();
    let (dead, _dead_events) = Collector::start_new();
    let (live, live_events) = Collector::start_new();

    registry.attach("d1", Uuid::new_v4(), dead.clone().recipient());
    registry.attach("d1", Uuid::new_v4(), live.recipient());

    dead.send(Stop).await.unwrap();
    drain_mailboxes().await;

    registry.broadcast("d1", turn_opened("d1", 1));
    drain_mailboxes().await;

    // The closed mailbox was detached; delivery to the rest is unaffected.
    assert_eq!(registry.attached("d1"), 1);
    assert_eq!(live_events.lock().len(), 1);
}
