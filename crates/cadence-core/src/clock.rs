use std::cell::{Cell, RefCell};
use std::rc::Rc;
use web_time::{Duration, Instant};

thread_local! {
    static CLOCK: RefCell<Rc<dyn Clock>> = RefCell::new(Rc::new(SystemClock));
}

/// Time source read by the driver and everything built on it.
pub trait Clock: 'static {
    fn now(&self) -> Instant;
}

pub struct SystemClock;
impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock tests can drive deterministically.
pub struct TestClock {
    t: Cell<Instant>,
}

impl TestClock {
    pub fn start_now() -> Self {
        Self {
            t: Cell::new(Instant::now()),
        }
    }

    pub fn set(&self, t: Instant) {
        self.t.set(t);
    }

    pub fn advance(&self, by: Duration) {
        self.t.set(self.t.get() + by);
    }
}

impl Clock for TestClock {
    fn now(&self) -> Instant {
        self.t.get()
    }
}

/// Install the clock for the current thread. The platform installs
/// `SystemClock` (also the default); tests install a `TestClock`.
pub fn set_clock(clock: Rc<dyn Clock>) {
    CLOCK.with(|c| *c.borrow_mut() = clock);
}

/// Current time as reported by the installed clock.
pub fn now() -> Instant {
    CLOCK.with(|c| c.borrow().now())
}
