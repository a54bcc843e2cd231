//! Timer controller: one schedulable unit of work per controller.
//!
//! A controller owns a single mutable slot. Scheduling anything new first
//! cancels whatever the slot holds (with an `on_cancel` notification), so
//! at most one timer is ever armed per controller — no queueing, no
//! overlap. One-shots and bounded repeats clear the slot themselves when
//! they run out; unbounded repeats stay armed until cancelled.
//!
//! While a timer with a known total duration is armed and `on_progress`
//! is set, a secondary poller samples elapsed time on its own cadence and
//! reports fractional progress. The poller is lifecycle-bound to the
//! slot: every path that clears the slot also stops it.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cadence_core::{ScheduleError, TaskId, clock, driver, scope};
use web_time::{Duration, Instant};

/// Fallback period when a repeating schedule is handed an absolute
/// deadline, which has no meaningful recurrence semantics.
const DEFAULT_PERIOD: Duration = Duration::from_millis(1000);

const MIN_POLL: Duration = Duration::from_millis(100);
const MAX_POLL: Duration = Duration::from_millis(1000);

/// A delay expressed either as a span from now or a point in time.
#[derive(Clone, Copy, Debug)]
pub enum Delay {
    For(Duration),
    Until(Instant),
}

impl Delay {
    /// Span until the target; deadlines already in the past collapse to
    /// zero (immediate execution on the next pump).
    fn resolve(self) -> Duration {
        match self {
            Delay::For(d) => d,
            Delay::Until(t) => t.saturating_duration_since(clock::now()),
        }
    }
}

impl From<Duration> for Delay {
    fn from(d: Duration) -> Self {
        Delay::For(d)
    }
}

impl From<Instant> for Delay {
    fn from(t: Instant) -> Self {
        Delay::Until(t)
    }
}

pub type TimerEvent = Rc<dyn Fn(TaskId)>;
pub type ProgressEvent = Rc<dyn Fn(f64, Duration, Duration)>;

/// Lifecycle notifications, all optional.
#[derive(Clone, Default)]
pub struct TimerEvents {
    /// Fired right after a new timer is armed.
    pub on_set: Option<TimerEvent>,
    /// Fired when an active timer is cleared by explicit cancellation,
    /// replacement, or owner teardown. Not fired for natural completion.
    pub on_cancel: Option<TimerEvent>,
    /// Fired each time the scheduled callback actually runs.
    pub on_complete: Option<TimerEvent>,
    /// Fired periodically with `(progress, elapsed, total)` while a timer
    /// with a known total duration is armed.
    pub on_progress: Option<ProgressEvent>,
}

impl TimerEvents {
    pub fn on_set(mut self, f: impl Fn(TaskId) + 'static) -> Self {
        self.on_set = Some(Rc::new(f));
        self
    }

    pub fn on_cancel(mut self, f: impl Fn(TaskId) + 'static) -> Self {
        self.on_cancel = Some(Rc::new(f));
        self
    }

    pub fn on_complete(mut self, f: impl Fn(TaskId) + 'static) -> Self {
        self.on_complete = Some(Rc::new(f));
        self
    }

    pub fn on_progress(mut self, f: impl Fn(f64, Duration, Duration) + 'static) -> Self {
        self.on_progress = Some(Rc::new(f));
        self
    }
}

// The slot is a tagged union so state that only exists for one kind of
// timer (iteration counts, progress bookkeeping) cannot leak into another.
enum Slot {
    Idle,
    OneShot {
        id: TaskId,
        started: Instant,
        total: Duration,
        poller: Option<TaskId>,
    },
    Interval {
        id: TaskId,
    },
    Bounded {
        id: TaskId,
        remaining: u32,
        poller: Option<TaskId>,
    },
}

struct Inner {
    slot: RefCell<Slot>,
    events: TimerEvents,
}

/// Schedules, inspects, and cancels at most one active timer.
///
/// Cloning shares the same slot. Constructing a controller while a
/// [`Scope`](cadence_core::Scope) is current registers teardown there:
/// disposing the scope cancels whatever is armed (firing `on_cancel`
/// once), after which nothing ever fires again.
pub struct TimerController {
    inner: Rc<Inner>,
}

impl TimerController {
    pub fn new(events: TimerEvents) -> Self {
        let inner = Rc::new(Inner {
            slot: RefCell::new(Slot::Idle),
            events,
        });
        let weak = Rc::downgrade(&inner);
        scope::on_cleanup(move || {
            if let Some(inner) = weak.upgrade() {
                inner.clear();
            }
        });
        Self { inner }
    }

    /// Arms a one-shot timer. Any previously active timer is cancelled
    /// first. On firing, the callback runs, the slot clears, and
    /// `on_complete` is notified with the handle.
    pub fn schedule_once(
        &self,
        callback: impl FnMut() + 'static,
        delay: impl Into<Delay>,
    ) -> TaskId {
        self.inner.clear();

        let total = delay.into().resolve();
        let started = clock::now();
        // armed before the timeout so an equal-deadline final sample
        // still sees the slot occupied
        let poller = self.inner.start_poller(started, total);

        let inner = self.inner.clone();
        let mut callback = callback;
        let id_cell: Rc<Cell<Option<TaskId>>> = Rc::new(Cell::new(None));
        let cell = id_cell.clone();
        let id = driver::set_timeout(total, move || {
            callback();
            let Some(own) = cell.get() else { return };
            let poller = {
                let mut slot = inner.slot.borrow_mut();
                // the callback may have rescheduled on this controller;
                // only the firing that still owns the slot completes it
                if !matches!(&*slot, Slot::OneShot { id, .. } if *id == own) {
                    return;
                }
                match std::mem::replace(&mut *slot, Slot::Idle) {
                    Slot::OneShot { poller, .. } => poller,
                    _ => None,
                }
            };
            if let Some(p) = poller {
                driver::clear(p);
            }
            if let Some(on_complete) = &inner.events.on_complete {
                on_complete(own);
            }
        });
        id_cell.set(Some(id));

        *self.inner.slot.borrow_mut() = Slot::OneShot {
            id,
            started,
            total,
            poller,
        };
        self.inner.notify_set(id);
        id
    }

    /// Arms a one-shot timer for an absolute point in time.
    pub fn schedule_at(&self, callback: impl FnMut() + 'static, deadline: Instant) -> TaskId {
        self.schedule_once(callback, Delay::Until(deadline))
    }

    /// Arms a repeating timer. Each firing runs the callback and notifies
    /// `on_complete`; the slot stays armed until [`cancel`](Self::cancel).
    ///
    /// An absolute deadline is rejected with a logged
    /// [`ScheduleError::DeadlineForInterval`] and the 1000ms default
    /// period is used instead.
    pub fn schedule_repeating(
        &self,
        callback: impl FnMut() + 'static,
        delay: impl Into<Delay>,
    ) -> TaskId {
        self.inner.clear();

        let period = resolve_period(delay.into(), "schedule_repeating");
        let inner = self.inner.clone();
        let mut callback = callback;
        let id_cell: Rc<Cell<Option<TaskId>>> = Rc::new(Cell::new(None));
        let cell = id_cell.clone();
        let id = driver::set_interval(period, move || {
            callback();
            let Some(own) = cell.get() else { return };
            // skipped when the callback replaced this timer
            let still_armed =
                matches!(&*inner.slot.borrow(), Slot::Interval { id } if *id == own);
            if still_armed
                && let Some(on_complete) = &inner.events.on_complete
            {
                on_complete(own);
            }
        });
        id_cell.set(Some(id));

        *self.inner.slot.borrow_mut() = Slot::Interval { id };
        self.inner.notify_set(id);
        id
    }

    /// Arms a repeating timer that runs exactly `iterations` times, then
    /// clears itself without an `on_cancel` notification.
    ///
    /// `iterations == 0` logs [`ScheduleError::ZeroIterations`] and
    /// returns `None`; the previously active timer is still cleared as a
    /// side effect of entering the call.
    pub fn schedule_limited(
        &self,
        callback: impl FnMut() + 'static,
        delay: impl Into<Delay>,
        iterations: u32,
    ) -> Option<TaskId> {
        self.inner.clear();

        if iterations == 0 {
            log::warn!("schedule_limited: {}", ScheduleError::ZeroIterations);
            return None;
        }

        let period = resolve_period(delay.into(), "schedule_limited");
        let total = period * iterations;
        let started = clock::now();
        let poller = self.inner.start_poller(started, total);

        let inner = self.inner.clone();
        let mut callback = callback;
        let id_cell: Rc<Cell<Option<TaskId>>> = Rc::new(Cell::new(None));
        let cell = id_cell.clone();
        let id = driver::set_interval(period, move || {
            callback();
            let Some(own) = cell.get() else { return };
            let finished = {
                let mut slot = inner.slot.borrow_mut();
                match &mut *slot {
                    Slot::Bounded { id, remaining, .. } if *id == own => {
                        *remaining -= 1;
                        *remaining == 0
                    }
                    // the callback rescheduled; this firing no longer
                    // owns the slot
                    _ => return,
                }
            };
            if finished {
                let prev = std::mem::replace(&mut *inner.slot.borrow_mut(), Slot::Idle);
                driver::clear(own);
                if let Slot::Bounded {
                    poller: Some(p), ..
                } = prev
                {
                    driver::clear(p);
                }
            }
            if let Some(on_complete) = &inner.events.on_complete {
                on_complete(own);
            }
        });
        id_cell.set(Some(id));

        *self.inner.slot.borrow_mut() = Slot::Bounded {
            id,
            remaining: iterations,
            poller,
        };
        self.inner.notify_set(id);
        Some(id)
    }

    /// Cancels the active timer, notifying `on_cancel` with its handle.
    /// No-op (and no notification) when idle.
    pub fn cancel(&self) {
        self.inner.clear();
    }

    pub fn is_active(&self) -> bool {
        !matches!(&*self.inner.slot.borrow(), Slot::Idle)
    }

    pub fn current_id(&self) -> Option<TaskId> {
        match &*self.inner.slot.borrow() {
            Slot::Idle => None,
            Slot::OneShot { id, .. } | Slot::Interval { id } | Slot::Bounded { id, .. } => {
                Some(*id)
            }
        }
    }

    /// Firings left on a bounded repeating timer; `None` for every other
    /// kind (and when idle).
    pub fn remaining_iterations(&self) -> Option<u32> {
        match &*self.inner.slot.borrow() {
            Slot::Bounded { remaining, .. } => Some(*remaining),
            _ => None,
        }
    }

    /// Time left on an armed one-shot. Repeating timers have no single
    /// deadline, so this is `None` for them and when idle.
    pub fn remaining_time(&self) -> Option<Duration> {
        match &*self.inner.slot.borrow() {
            Slot::OneShot { started, total, .. } => {
                let elapsed = clock::now().saturating_duration_since(*started);
                Some(total.saturating_sub(elapsed))
            }
            _ => None,
        }
    }
}

impl Clone for TimerController {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

fn resolve_period(delay: Delay, op: &str) -> Duration {
    match delay {
        Delay::For(d) => d,
        Delay::Until(_) => {
            log::warn!("{op}: {}", ScheduleError::DeadlineForInterval);
            DEFAULT_PERIOD
        }
    }
}

impl Inner {
    /// Cancels whatever is armed, poller included, and notifies
    /// `on_cancel` if a timer was actually active.
    fn clear(&self) {
        let prev = std::mem::replace(&mut *self.slot.borrow_mut(), Slot::Idle);
        let (id, poller) = match prev {
            Slot::Idle => return,
            Slot::OneShot { id, poller, .. } => (id, poller),
            Slot::Interval { id } => (id, None),
            Slot::Bounded { id, poller, .. } => (id, poller),
        };
        driver::clear(id);
        if let Some(p) = poller {
            driver::clear(p);
        }
        if let Some(on_cancel) = &self.events.on_cancel {
            on_cancel(id);
        }
    }

    fn notify_set(&self, id: TaskId) {
        if let Some(on_set) = &self.events.on_set {
            on_set(id);
        }
    }

    /// Arms the progress poller: roughly ten samples over `total`,
    /// cadence bounded to [100ms, 1000ms]. Skipped entirely without an
    /// `on_progress` subscriber or a measurable duration.
    fn start_poller(self: &Rc<Self>, started: Instant, total: Duration) -> Option<TaskId> {
        let on_progress = self.events.on_progress.clone()?;
        if total.is_zero() {
            return None;
        }
        let cadence = (total / 10).clamp(MIN_POLL, MAX_POLL);

        let weak = Rc::downgrade(self);
        let pid_cell: Rc<Cell<Option<TaskId>>> = Rc::new(Cell::new(None));
        let cell = pid_cell.clone();
        let pid = driver::set_interval(cadence, move || {
            let Some(pid) = cell.get() else { return };
            let Some(inner) = weak.upgrade() else {
                driver::clear(pid);
                return;
            };
            let owned = {
                let slot = inner.slot.borrow();
                matches!(
                    &*slot,
                    Slot::OneShot { poller: Some(p), .. } | Slot::Bounded { poller: Some(p), .. }
                        if *p == pid
                )
            };
            if !owned {
                // stale sample: the owning timer completed or was
                // replaced since the last one
                driver::clear(pid);
                return;
            }
            let elapsed = clock::now().saturating_duration_since(started);
            let progress = (elapsed.as_secs_f64() / total.as_secs_f64()).min(1.0);
            on_progress(progress, elapsed, total);
            if progress >= 0.999 {
                driver::clear(pid);
            }
        });
        pid_cell.set(Some(pid));
        Some(pid)
    }
}
