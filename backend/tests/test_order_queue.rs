//! Tests for the order queue
//!
//! Covers priority insertion, the pending → processing → completed moves and
//! the lookup failures.

use std::cell::RefCell;
use std::rc::Rc;

use kitchen_simulator_core_rs::{
    EventBus, EventKind, KitchenEvent, LocalEventBus, Order, OrderError, OrderId, OrderQueue,
    OrderStage,
};

fn new_queue() -> (OrderQueue, Rc<RefCell<Vec<KitchenEvent>>>) {
    let bus = Rc::new(LocalEventBus::new());
    let events = Rc::new(RefCell::new(Vec::new()));
    for kind in EventKind::ALL {
        let events = Rc::clone(&events);
        bus.listen(kind, Box::new(move |event| events.borrow_mut().push(event.clone())));
    }
    (OrderQueue::new(bus), events)
}

fn pending_ids(queue: &OrderQueue) -> Vec<OrderId> {
    queue.pending().iter().map(|order| order.id()).collect()
}

// ============================================================================
// add_order
// ============================================================================

#[test]
fn test_vip_order_added_first() {
    let (mut queue, _) = new_queue();
    queue.add_order(Order::vip(0));

    assert_eq!(queue.pending().len(), 1);
}

#[test]
fn test_vip_jumps_ahead_of_normal() {
    let (mut queue, _) = new_queue();
    queue.add_order(Order::normal(0));
    assert_eq!(queue.pending().len(), 1);

    queue.add_order(Order::vip(1));
    assert_eq!(queue.pending().len(), 2);

    let flags: Vec<bool> = queue.pending().iter().map(|o| o.is_vip()).collect();
    assert_eq!(flags, vec![true, false]);
}

#[test]
fn test_orders_keep_vip_status() {
    let (mut queue, _) = new_queue();
    let normal = queue.add_order(Order::normal(0));
    let vip = queue.add_order(Order::vip(1));

    for order in queue.pending() {
        assert_eq!(order.is_vip(), order.id() == vip);
        assert_ne!(order.is_vip(), order.id() == normal);
    }
}

#[test]
fn test_ids_increment_from_one() {
    let (mut queue, _) = new_queue();
    queue.add_order(Order::normal(0));
    queue.add_order(Order::vip(1));
    queue.add_order(Order::normal(2));

    let mut ids = pending_ids(&queue);
    ids.sort_unstable();
    assert_eq!(ids, vec![1, 2, 3]);
}

#[test]
fn test_vips_keep_submission_order_among_themselves() {
    let (mut queue, _) = new_queue();
    queue.add_order(Order::normal(0)); // 1
    queue.add_order(Order::normal(1)); // 2
    queue.add_order(Order::vip(2)); // 3
    queue.add_order(Order::vip(3)); // 4
    queue.add_order(Order::normal(4)); // 5
    queue.add_order(Order::vip(5)); // 6

    assert_eq!(pending_ids(&queue), vec![3, 4, 6, 1, 2, 5]);
}

#[test]
fn test_add_dispatches_one_event_per_order() {
    let (mut queue, events) = new_queue();
    queue.add_order(Order::normal(0));
    queue.add_order(Order::vip(0));

    assert_eq!(events.borrow().len(), 2);
    assert!(events
        .borrow()
        .iter()
        .all(|event| *event == KitchenEvent::OrderAdded));
}

// ============================================================================
// next_order_id / process_next_order
// ============================================================================

#[test]
fn test_next_order_id_is_head_of_pending() {
    let (mut queue, _) = new_queue();
    queue.add_order(Order::normal(0));
    let vip = queue.add_order(Order::vip(1));

    assert_eq!(queue.next_order_id(), Some(vip));
    // Pure query.
    assert_eq!(queue.next_order_id(), Some(vip));
    assert_eq!(queue.pending().len(), 2);
}

#[test]
fn test_process_next_moves_orders_one_by_one() {
    let (mut queue, _) = new_queue();
    queue.add_order(Order::normal(0));
    queue.add_order(Order::vip(1));

    queue.process_next_order();
    assert_eq!(queue.processing().len(), 1);
    assert_eq!(queue.pending().len(), 1);

    queue.process_next_order();
    assert_eq!(queue.processing().len(), 2);
    assert_eq!(queue.pending().len(), 0);
}

#[test]
fn test_process_next_returns_orders_by_priority() {
    let (mut queue, _) = new_queue();
    let normal = queue.add_order(Order::normal(0));
    let vip = queue.add_order(Order::vip(1));

    let first = queue.process_next_order().unwrap();
    assert_eq!((first.id(), first.is_vip()), (vip, true));

    let second = queue.process_next_order().unwrap();
    assert_eq!((second.id(), second.is_vip()), (normal, false));
}

#[test]
fn test_process_next_returns_none_when_empty() {
    let (mut queue, _) = new_queue();
    assert!(queue.process_next_order().is_none());

    queue.add_order(Order::normal(0));
    queue.process_next_order();
    assert!(queue.process_next_order().is_none());
}

// ============================================================================
// cancel_processing_order
// ============================================================================

#[test]
fn test_cancel_returns_vip_to_front() {
    let (mut queue, events) = new_queue();
    queue.add_order(Order::normal(0));
    queue.add_order(Order::normal(1));
    let to_cancel = queue.add_order(Order::vip(2));
    queue.add_order(Order::normal(3));

    for _ in 0..4 {
        queue.process_next_order();
    }
    queue.cancel_processing_order(to_cancel).unwrap();

    assert!(queue.processing().iter().all(|o| o.id() != to_cancel));
    assert_eq!(queue.pending()[0].id(), to_cancel);
    assert_eq!(
        events.borrow().last(),
        Some(&KitchenEvent::ProcessingOrderCancelled)
    );
}

#[test]
fn test_cancel_restores_submission_order_within_class() {
    let (mut queue, _) = new_queue();
    let first = queue.add_order(Order::normal(0));
    let second = queue.add_order(Order::normal(1));
    let third = queue.add_order(Order::normal(2));

    queue.process_next_order(); // first
    queue.process_next_order(); // second
    queue.cancel_processing_order(second).unwrap();
    queue.cancel_processing_order(first).unwrap();

    assert_eq!(pending_ids(&queue), vec![first, second, third]);
}

#[test]
fn test_cannot_cancel_pending_order() {
    let (mut queue, _) = new_queue();
    let id = queue.add_order(Order::vip(0));

    assert_eq!(
        queue.cancel_processing_order(id),
        Err(OrderError::NotProcessing(id))
    );
}

#[test]
fn test_cannot_cancel_unknown_order() {
    let (mut queue, _) = new_queue();
    let err = queue.cancel_processing_order(99).unwrap_err();
    assert_eq!(err, OrderError::NotProcessing(99));
    assert_eq!(err.to_string(), "Order 99 not processing");
}

// ============================================================================
// complete_order
// ============================================================================

#[test]
fn test_complete_removes_only_that_order() {
    let (mut queue, _) = new_queue();
    queue.add_order(Order::normal(0));
    queue.add_order(Order::normal(1));
    let to_complete = queue.add_order(Order::vip(2));
    queue.add_order(Order::normal(3));

    for _ in 0..4 {
        queue.process_next_order();
    }
    queue.complete_order(to_complete).unwrap();

    assert_eq!(queue.processing().len(), 3);
    assert!(queue.processing().iter().all(|o| o.id() != to_complete));
}

#[test]
fn test_complete_appends_in_completion_order() {
    let (mut queue, _) = new_queue();
    assert!(queue.completed().is_empty());

    queue.add_order(Order::normal(0));
    let second_to_complete = queue.add_order(Order::normal(1));
    let first_to_complete = queue.add_order(Order::vip(2));
    queue.add_order(Order::normal(3));

    for _ in 0..4 {
        queue.process_next_order();
    }

    queue.complete_order(first_to_complete).unwrap();
    assert_eq!(queue.completed().len(), 1);
    assert_eq!(queue.completed()[0].id(), first_to_complete);

    queue.complete_order(second_to_complete).unwrap();
    assert_eq!(queue.completed().len(), 2);
    assert_eq!(queue.completed()[1].id(), second_to_complete);
}

#[test]
fn test_cannot_complete_same_order_twice() {
    let (mut queue, _) = new_queue();
    let id = queue.add_order(Order::normal(0));
    queue.process_next_order();
    queue.complete_order(id).unwrap();

    assert_eq!(queue.complete_order(id), Err(OrderError::NotProcessing(id)));
}

#[test]
fn test_complete_dispatches_event() {
    let (mut queue, events) = new_queue();
    let id = queue.add_order(Order::normal(0));
    queue.process_next_order();
    assert_eq!(events.borrow().len(), 1);

    queue.complete_order(id).unwrap();
    assert_eq!(events.borrow().len(), 2);
    assert_eq!(events.borrow()[1], KitchenEvent::OrderCompleted);
}

// ============================================================================
// locate
// ============================================================================

#[test]
fn test_locate_follows_the_lifecycle() {
    let (mut queue, _) = new_queue();
    let id = queue.add_order(Order::normal(0));
    assert_eq!(queue.locate(id), Ok(OrderStage::Pending));

    queue.process_next_order();
    assert_eq!(queue.locate(id), Ok(OrderStage::Processing));

    queue.complete_order(id).unwrap();
    assert_eq!(queue.locate(id), Ok(OrderStage::Completed));

    assert_eq!(queue.locate(id + 1), Err(OrderError::NotFound(id + 1)));
}
