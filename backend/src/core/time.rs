//! Time management for the simulation
//!
//! The kitchen runs on virtual milliseconds. A single global timer queue holds
//! one-shot deferred callbacks, and advancing the clock fires them in due
//! order. Nothing here reads the wall clock, so every run is deterministic.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Virtual time in milliseconds since the simulation started
pub type Timestamp = u64;

/// Handle to a scheduled timer
///
/// Handles are allocated in increasing order and never reused, so they also
/// break ties between timers due at the same instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimerHandle(u64);

type Callback = Box<dyn FnOnce()>;

/// Virtual clock plus the timer queue driven by it
///
/// All methods take `&self` so the scheduler can be shared (`Rc<Scheduler>`)
/// between the components that arm timers and the loop that advances time.
/// Callbacks run with no internal borrow held: they may schedule or cancel
/// other timers.
///
/// # Example
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use kitchen_simulator_core_rs::Scheduler;
///
/// let scheduler = Scheduler::new();
/// let fired = Rc::new(Cell::new(false));
/// let flag = Rc::clone(&fired);
/// scheduler.schedule(100, move || flag.set(true));
///
/// scheduler.advance(99);
/// assert!(!fired.get());
///
/// scheduler.advance(1);
/// assert!(fired.get());
/// assert_eq!(scheduler.now(), 100);
/// ```
pub struct Scheduler {
    /// Current virtual time
    now: Cell<Timestamp>,
    /// Next handle to hand out
    next_handle: Cell<u64>,
    /// Armed timers ordered by (due time, handle)
    timers: RefCell<BTreeMap<(Timestamp, TimerHandle), Callback>>,
    /// Due time of every armed timer, for cancellation
    due_times: RefCell<HashMap<TimerHandle, Timestamp>>,
}

impl Scheduler {
    /// Create a scheduler at time zero with no timers armed
    pub fn new() -> Self {
        Self {
            now: Cell::new(0),
            next_handle: Cell::new(1),
            timers: RefCell::new(BTreeMap::new()),
            due_times: RefCell::new(HashMap::new()),
        }
    }

    /// Current virtual time
    pub fn now(&self) -> Timestamp {
        self.now.get()
    }

    /// Number of armed timers
    pub fn pending(&self) -> usize {
        self.timers.borrow().len()
    }

    /// Due time of the earliest armed timer
    pub fn next_due(&self) -> Option<Timestamp> {
        self.timers.borrow().keys().next().map(|(due, _)| *due)
    }

    /// Arm a one-shot timer firing `delay` milliseconds from now
    ///
    /// # Example
    /// ```
    /// use kitchen_simulator_core_rs::Scheduler;
    ///
    /// let scheduler = Scheduler::new();
    /// scheduler.schedule(10_000, || {});
    /// assert_eq!(scheduler.next_due(), Some(10_000));
    /// ```
    pub fn schedule(&self, delay: u64, callback: impl FnOnce() + 'static) -> TimerHandle {
        let handle = TimerHandle(self.next_handle.get());
        self.next_handle.set(handle.0 + 1);

        let due = self.now.get().saturating_add(delay);
        self.timers
            .borrow_mut()
            .insert((due, handle), Box::new(callback));
        self.due_times.borrow_mut().insert(handle, due);
        handle
    }

    /// Disarm a timer
    ///
    /// Returns `false` when the timer already fired or was cancelled before.
    pub fn cancel(&self, handle: TimerHandle) -> bool {
        let Some(due) = self.due_times.borrow_mut().remove(&handle) else {
            return false;
        };
        self.timers.borrow_mut().remove(&(due, handle)).is_some()
    }

    /// Fire the earliest timer due at or before `target`
    ///
    /// Moves the clock to the timer's due time before running its callback.
    /// Returns `false` (and leaves the clock alone) when nothing is due.
    pub fn fire_next_until(&self, target: Timestamp) -> bool {
        let entry = {
            let mut timers = self.timers.borrow_mut();
            let is_due = timers
                .keys()
                .next()
                .is_some_and(|(due, _)| *due <= target);
            if is_due {
                timers.pop_first()
            } else {
                None
            }
        };

        let Some(((due, handle), callback)) = entry else {
            return false;
        };
        self.due_times.borrow_mut().remove(&handle);
        self.now.set(self.now.get().max(due));
        callback();
        true
    }

    /// Fire every timer due up to `target`, then move the clock to `target`
    ///
    /// A target in the past only fires overdue timers; time never moves
    /// backwards.
    pub fn advance_to(&self, target: Timestamp) {
        while self.fire_next_until(target) {}
        self.now.set(self.now.get().max(target));
    }

    /// Advance the clock by `delta` milliseconds, firing due timers on the way
    pub fn advance(&self, delta: u64) {
        self.advance_to(self.now.get().saturating_add(delta));
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Scheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("now", &self.now.get())
            .field("pending", &self.pending())
            .finish()
    }
}
