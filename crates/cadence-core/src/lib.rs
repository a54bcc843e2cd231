//! # Clock, Driver, Scopes, and Signals
//!
//! Cadence is single-threaded and cooperative. Instead of an explicit event
//! loop owned by a platform, the substrate is a pumpable **timer driver**
//! plus a few small pieces:
//!
//! - `Clock` — thread-installed time source (`SystemClock` / `TestClock`).
//! - `driver` — cancellable one-shot and repeating tasks (`set_timeout`,
//!   `set_interval`, `clear`, `pump`).
//! - `Scope` — ownership context; disposing it runs registered cleanups.
//! - `Signal<T>` — observable, reactive value.
//!
//! ## Driving the driver
//!
//! A host loop sleeps until the next deadline and pumps:
//!
//! ```rust,no_run
//! use cadence_core::*;
//! use web_time::Duration;
//!
//! set_timeout(Duration::from_millis(100), || log::info!("hello"));
//! while let Some(deadline) = next_deadline() {
//!     let now = now();
//!     if deadline > now {
//!         std::thread::sleep(deadline - now);
//!     }
//!     pump();
//! }
//! ```
//!
//! Tests install a `TestClock` and step it deterministically:
//!
//! ```rust
//! use cadence_core::*;
//! use std::rc::Rc;
//! use web_time::Duration;
//!
//! let clock = Rc::new(TestClock::start_now());
//! set_clock(clock.clone());
//!
//! let fired = signal(false);
//! let fired2 = fired.clone();
//! set_timeout(Duration::from_millis(50), move || fired2.set(true));
//!
//! advance(&clock, Duration::from_millis(50));
//! assert!(fired.get());
//! ```
//!
//! Cancellation is synchronous: once `clear(id)` returns, that task can
//! never fire again, even if its deadline has already passed.

pub mod clock;
pub mod driver;
pub mod error;
pub mod scope;
pub mod signal;
pub mod tests;

pub use clock::*;
pub use driver::*;
pub use error::*;
pub use scope::*;
pub use signal::*;
