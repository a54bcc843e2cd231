//! # Timer, Debounce, and List Hooks
//!
//! Small state-bookkeeping hooks built on the `cadence-core` substrate.
//! The centerpiece is [`TimerController`]: a single-slot scheduler that
//! unifies one-shot, absolute-deadline, repeating, and bounded-repeating
//! timers behind one cancel-and-replace lifecycle, with optional progress
//! reporting.
//!
//! ```rust
//! use cadence_hooks::{TimerController, TimerEvents};
//! use web_time::Duration;
//!
//! let timer = TimerController::new(
//!     TimerEvents::default()
//!         .on_complete(|id| log::info!("{id:?} done"))
//!         .on_progress(|p, _, _| log::info!("{:.0}%", p * 100.0)),
//! );
//! timer.schedule_once(|| log::info!("ding"), Duration::from_secs(5));
//! ```
//!
//! Every hook registers its teardown in the current
//! [`Scope`](cadence_core::Scope) when one is installed, so disposing the
//! owning scope cancels pending work.

pub mod debounce;
pub mod list;
pub mod timer;

pub use debounce::*;
pub use list::*;
pub use timer::*;
