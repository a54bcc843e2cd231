use std::cell::RefCell;
use std::rc::Rc;

use slotmap::SlotMap;
use smallvec::SmallVec;
use web_time::{Duration, Instant};

use crate::clock::{self, Clock, TestClock};

slotmap::new_key_type! {
    /// Opaque handle to a scheduled task. Versioned: a slot reused by a
    /// later task yields a different id, so stale handles never alias.
    pub struct TaskId;
}

struct Task {
    deadline: Instant,
    period: Option<Duration>,
    // arm order; breaks deadline ties so firing order is deterministic
    seq: u64,
    callback: Rc<RefCell<dyn FnMut()>>,
}

#[derive(Default)]
struct Driver {
    tasks: SlotMap<TaskId, Task>,
    next_seq: u64,
}

thread_local! {
    static DRIVER: RefCell<Driver> = RefCell::new(Driver::default());
}

fn arm(deadline: Instant, period: Option<Duration>, callback: impl FnMut() + 'static) -> TaskId {
    DRIVER.with(|d| {
        let mut d = d.borrow_mut();
        let seq = d.next_seq;
        d.next_seq += 1;
        d.tasks.insert(Task {
            deadline,
            period,
            seq,
            callback: Rc::new(RefCell::new(callback)),
        })
    })
}

/// Arms a one-shot task that fires once `delay` has elapsed.
pub fn set_timeout(delay: Duration, callback: impl FnMut() + 'static) -> TaskId {
    arm(clock::now() + delay, None, callback)
}

/// Arms a repeating task that fires every `period`.
///
/// A zero period is clamped to 1ms so a pump always advances.
pub fn set_interval(period: Duration, callback: impl FnMut() + 'static) -> TaskId {
    let period = if period.is_zero() {
        log::warn!("set_interval: zero period clamped to 1ms");
        Duration::from_millis(1)
    } else {
        period
    };
    arm(clock::now() + period, Some(period), callback)
}

/// Cancels a task. Synchronous: once this returns the task cannot fire
/// again. Returns false for unknown or already-finished ids.
pub fn clear(id: TaskId) -> bool {
    DRIVER.with(|d| d.borrow_mut().tasks.remove(id).is_some())
}

/// Earliest pending deadline, if any task is armed.
pub fn next_deadline() -> Option<Instant> {
    DRIVER.with(|d| d.borrow().tasks.values().map(|t| t.deadline).min())
}

/// Number of armed tasks.
pub fn pending() -> usize {
    DRIVER.with(|d| d.borrow().tasks.len())
}

/// Fires every task due at the current clock time, earliest deadline first
/// (arm order breaks ties). One-shots are removed before their callback
/// runs; intervals are re-armed first, so a given interval's firings are
/// strict FIFO. Callbacks may schedule and clear freely: the registry
/// borrow is released around every invocation, and anything newly due is
/// picked up before the pump returns.
pub fn pump() {
    loop {
        let now = clock::now();
        let mut due: SmallVec<[(Instant, u64, TaskId); 8]> = DRIVER.with(|d| {
            d.borrow()
                .tasks
                .iter()
                .filter(|(_, t)| t.deadline <= now)
                .map(|(id, t)| (t.deadline, t.seq, id))
                .collect()
        });
        if due.is_empty() {
            break;
        }
        due.sort_unstable_by_key(|&(deadline, seq, _)| (deadline, seq));

        for (_, _, id) in due {
            // a callback earlier in this round may have cleared it
            let callback = DRIVER.with(|d| {
                let mut d = d.borrow_mut();
                let task = d.tasks.get(id)?;
                let callback = task.callback.clone();
                let period = task.period;
                match period {
                    Some(period) => d.tasks[id].deadline += period,
                    None => {
                        d.tasks.remove(id);
                    }
                }
                Some(callback)
            });
            if let Some(callback) = callback {
                (callback.borrow_mut())();
            }
        }
    }
}

/// Advances a `TestClock` by `by`, pumping at every intermediate deadline
/// in order, then settles on the target time and pumps once more. `clock`
/// must be the clock installed via [`set_clock`](crate::clock::set_clock).
///
/// This is what deterministic timer tests drive instead of sleeping.
pub fn advance(clock: &TestClock, by: Duration) {
    let target = clock.now() + by;
    while let Some(deadline) = next_deadline() {
        if deadline > target {
            break;
        }
        if deadline > clock.now() {
            clock.set(deadline);
        }
        pump();
    }
    clock.set(target);
    pump();
}
