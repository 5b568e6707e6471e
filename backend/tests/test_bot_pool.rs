//! Tests for BotPool

use std::cell::RefCell;
use std::rc::Rc;

use kitchen_simulator_core_rs::{
    AcceptedOrder, BotPool, CookingError, EventBus, EventKind, KitchenEvent, LocalEventBus, Order,
    OrderQueue, Scheduler, COOKING_TIME_MS,
};

struct Harness {
    scheduler: Rc<Scheduler>,
    queue: OrderQueue,
    pool: BotPool,
    events: Rc<RefCell<Vec<KitchenEvent>>>,
}

impl Harness {
    fn new() -> Self {
        let bus = Rc::new(LocalEventBus::new());
        let scheduler = Rc::new(Scheduler::new());
        let pool = BotPool::new(bus.clone(), scheduler.clone());

        let events = Rc::new(RefCell::new(Vec::new()));
        for kind in [
            EventKind::BotAdded,
            EventKind::BotRemoved,
            EventKind::CookingCompleted,
        ] {
            let events = Rc::clone(&events);
            bus.listen(kind, Box::new(move |event| events.borrow_mut().push(event.clone())));
        }

        Self {
            queue: OrderQueue::new(bus),
            scheduler,
            pool,
            events,
        }
    }

    fn accepted_order(&mut self) -> AcceptedOrder {
        self.queue.add_order(Order::normal(self.scheduler.now()));
        self.queue
            .process_next_order()
            .expect("order was just added")
    }

    fn event_count(&self) -> usize {
        self.events.borrow().len()
    }
}

// ============================================================================
// add_bot / remove_bot
// ============================================================================

#[test]
fn test_add_bot_appends() {
    let mut harness = Harness::new();
    assert_eq!(harness.pool.len(), 0);

    harness.pool.add_bot();
    assert_eq!(harness.pool.len(), 1);

    harness.pool.add_bot();
    assert_eq!(harness.pool.len(), 2);
}

#[test]
fn test_add_bot_dispatches_event() {
    let mut harness = Harness::new();
    harness.pool.add_bot();

    assert_eq!(*harness.events.borrow(), vec![KitchenEvent::BotAdded]);
}

#[test]
fn test_remove_bot_shrinks_pool() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    harness.pool.add_bot();

    harness.pool.remove_bot();
    assert_eq!(harness.pool.len(), 1);

    harness.pool.remove_bot();
    assert_eq!(harness.pool.len(), 0);
}

#[test]
fn test_remove_bot_is_last_in_first_out() {
    let mut harness = Harness::new();
    let first = harness.pool.add_bot();
    harness.pool.add_bot();
    harness.pool.remove_bot();

    assert_eq!(harness.pool.bots()[0].id(), first);
}

#[test]
fn test_remove_bot_dispatches_event() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    assert_eq!(harness.event_count(), 1);

    harness.pool.remove_bot();
    assert_eq!(harness.event_count(), 2);
}

#[test]
fn test_remove_bot_without_bots_is_silent() {
    let mut harness = Harness::new();

    harness.pool.remove_bot();
    assert_eq!(harness.event_count(), 0);

    harness.pool.add_bot();
    assert_eq!(harness.event_count(), 1);

    harness.pool.remove_bot();
    assert_eq!(harness.event_count(), 2);

    harness.pool.remove_bot();
    assert_eq!(harness.event_count(), 2);
}

#[test]
fn test_removing_cooking_bot_cancels_its_completion() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    let order = harness.accepted_order();
    harness.pool.cook(order).unwrap();

    harness.pool.remove_bot();
    harness.scheduler.advance(COOKING_TIME_MS);

    assert_eq!(
        *harness.events.borrow(),
        vec![
            KitchenEvent::BotAdded,
            KitchenEvent::BotRemoved {
                order_id: Some(order.id())
            },
        ]
    );
    assert_eq!(harness.pool.busy_count(), 0);
}

// ============================================================================
// cook
// ============================================================================

#[test]
fn test_cook_runs_on_a_bot() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    let order = harness.accepted_order();
    harness.pool.cook(order).unwrap();

    assert_eq!(harness.pool.bots()[0].order(), Some(order));
    assert_eq!(harness.pool.busy_count(), 1);
}

#[test]
fn test_cook_without_bots_fails() {
    let mut harness = Harness::new();
    let order = harness.accepted_order();

    let err = harness.pool.cook(order).unwrap_err();
    assert_eq!(err, CookingError::NoCapacity);
    assert_eq!(err.to_string(), "No cooking bots available");
}

#[test]
fn test_cook_with_all_bots_busy_fails() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    harness.pool.add_bot();
    let first = harness.accepted_order();
    let second = harness.accepted_order();
    let third = harness.accepted_order();
    harness.pool.cook(first).unwrap();
    harness.pool.cook(second).unwrap();

    assert_eq!(harness.pool.cook(third), Err(CookingError::NoCapacity));
    assert_eq!(harness.pool.busy_count(), 2);
}

// ============================================================================
// can_cook
// ============================================================================

#[test]
fn test_can_cook_false_without_bots() {
    let harness = Harness::new();
    assert!(!harness.pool.can_cook());
}

#[test]
fn test_can_cook_true_with_idle_bot() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    assert!(harness.pool.can_cook());
}

#[test]
fn test_can_cook_false_when_all_bots_cooking() {
    let mut harness = Harness::new();

    harness.pool.add_bot();
    let first = harness.accepted_order();
    harness.pool.cook(first).unwrap();
    assert!(!harness.pool.can_cook());

    harness.pool.add_bot();
    let second = harness.accepted_order();
    harness.pool.cook(second).unwrap();
    assert!(!harness.pool.can_cook());
}

#[test]
fn test_can_cook_true_when_one_bot_idle() {
    let mut harness = Harness::new();

    harness.pool.add_bot();
    assert!(harness.pool.can_cook());

    harness.pool.add_bot();
    let order = harness.accepted_order();
    harness.pool.cook(order).unwrap();
    assert!(harness.pool.can_cook());
}

#[test]
fn test_can_cook_false_after_removing_all_bots() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    harness.pool.add_bot();
    harness.pool.remove_bot();
    harness.pool.remove_bot();

    assert!(!harness.pool.can_cook());
}

#[test]
fn test_can_cook_tracks_removal_of_busy_bot() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    harness.pool.add_bot();
    let first = harness.accepted_order();
    let second = harness.accepted_order();
    harness.pool.cook(first).unwrap();
    harness.pool.cook(second).unwrap();
    assert!(!harness.pool.can_cook());

    // The removed bot was busy: one busy bot left out of one.
    harness.pool.remove_bot();
    assert!(!harness.pool.can_cook());
    assert_eq!(harness.pool.busy_count(), 1);
}

#[test]
fn test_completion_frees_capacity() {
    let mut harness = Harness::new();
    harness.pool.add_bot();
    let order = harness.accepted_order();
    harness.pool.cook(order).unwrap();

    harness.scheduler.advance(COOKING_TIME_MS);
    assert!(harness.pool.can_cook());
    assert!(!harness.pool.bots()[0].is_cooking());
}
