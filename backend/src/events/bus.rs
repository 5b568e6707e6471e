//! Publish/subscribe bus
//!
//! Components publish through the `EventBus` trait and never see each other
//! directly. `LocalEventBus` is the in-process implementation: delivery is
//! synchronous, to the listeners of the event's kind, in registration order,
//! and finishes before `dispatch` returns.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

use crate::events::types::{EventKind, KitchenEvent};

/// Callback invoked for every event of the kind it was registered for
pub type Listener = Box<dyn Fn(&KitchenEvent)>;

/// Channel used for all cross-component notification
pub trait EventBus {
    /// Deliver `event` to every current listener of its kind
    fn dispatch(&self, event: KitchenEvent);

    /// Register `listener` for events of `kind`
    fn listen(&self, kind: EventKind, listener: Listener);
}

/// Synchronous in-process event bus
///
/// Listeners may dispatch further events or register new listeners while
/// being notified. A listener registered mid-dispatch only sees later events.
///
/// # Example
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use kitchen_simulator_core_rs::events::{EventBus, EventKind, KitchenEvent, LocalEventBus};
///
/// let bus = LocalEventBus::new();
/// let added = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&added);
/// bus.listen(EventKind::BotAdded, Box::new(move |_| counter.set(counter.get() + 1)));
///
/// bus.dispatch(KitchenEvent::BotAdded);
/// bus.dispatch(KitchenEvent::OrderAdded);
/// assert_eq!(added.get(), 1);
/// ```
#[derive(Default)]
pub struct LocalEventBus {
    listeners: RefCell<Vec<(EventKind, Rc<dyn Fn(&KitchenEvent)>)>>,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of listeners registered for `kind`
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(registered, _)| *registered == kind)
            .count()
    }
}

impl EventBus for LocalEventBus {
    fn dispatch(&self, event: KitchenEvent) {
        let kind = event.kind();
        // Snapshot the targets so listeners can re-enter the bus.
        let targets: Vec<Rc<dyn Fn(&KitchenEvent)>> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(registered, _)| *registered == kind)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        debug!(event = kind.as_str(), listeners = targets.len(), "dispatch");
        for listener in targets {
            listener(&event);
        }
    }

    fn listen(&self, kind: EventKind, listener: Listener) {
        self.listeners.borrow_mut().push((kind, Rc::from(listener)));
    }
}

impl fmt::Debug for LocalEventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalEventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
