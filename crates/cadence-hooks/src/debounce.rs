//! Debounced value: writes settle into the output signal only after a
//! quiet period with no further writes.

use std::cell::RefCell;
use std::rc::Rc;

use cadence_core::{Signal, TaskId, driver, scope, signal};
use web_time::Duration;

pub struct Debounced<T: Clone + 'static> {
    out: Signal<T>,
    delay: Duration,
    pending: Rc<RefCell<Option<TaskId>>>,
}

impl<T: Clone> Debounced<T> {
    /// A zero `delay` disables debouncing; writes commit synchronously.
    pub fn new(initial: T, delay: Duration) -> Self {
        let pending: Rc<RefCell<Option<TaskId>>> = Rc::new(RefCell::new(None));
        let weak = Rc::downgrade(&pending);
        scope::on_cleanup(move || {
            if let Some(pending) = weak.upgrade()
                && let Some(id) = pending.borrow_mut().take()
            {
                driver::clear(id);
            }
        });
        Self {
            out: signal(initial),
            delay,
            pending,
        }
    }

    /// Re-arms the quiet-period timer; only the last value written before
    /// the delay elapses is committed.
    pub fn set(&self, value: T) {
        if let Some(id) = self.pending.borrow_mut().take() {
            driver::clear(id);
        }
        if self.delay.is_zero() {
            self.out.set(value);
            return;
        }
        let out = self.out.clone();
        let pending = self.pending.clone();
        let id = driver::set_timeout(self.delay, move || {
            pending.borrow_mut().take();
            out.set(value.clone());
        });
        *self.pending.borrow_mut() = Some(id);
    }

    /// The settled value.
    pub fn get(&self) -> T {
        self.out.get()
    }

    /// The output signal, for subscribing to settled values.
    pub fn signal(&self) -> Signal<T> {
        self.out.clone()
    }

    /// True while a write is waiting out its quiet period.
    pub fn is_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }
}
