//! Five ticks with progress, then a farewell one-shot, on the real clock.

use cadence_core::{next_deadline, now, pump};
use cadence_hooks::{TimerController, TimerEvents};
use std::cell::RefCell;
use std::rc::Rc;
use web_time::Duration;

fn main() {
    env_logger::init();

    let timer = Rc::new(TimerController::new(
        TimerEvents::default()
            .on_set(|id| log::info!("armed {id:?}"))
            .on_cancel(|id| log::info!("cancelled {id:?}"))
            .on_complete(|id| log::debug!("fired {id:?}"))
            .on_progress(|p, elapsed, total| {
                println!(
                    "{:>3.0}%  ({:.1}s / {:.1}s)",
                    p * 100.0,
                    elapsed.as_secs_f64(),
                    total.as_secs_f64()
                );
            }),
    ));

    let ticks = Rc::new(RefCell::new(0u32));
    {
        let timer2 = timer.clone();
        let ticks = ticks.clone();
        timer.schedule_limited(
            move || {
                *ticks.borrow_mut() += 1;
                println!("tick {}", ticks.borrow());
                if *ticks.borrow() == 5 {
                    // replaces the (exhausting) bounded timer from inside
                    // its own last firing
                    timer2.schedule_once(|| println!("liftoff"), Duration::from_millis(400));
                }
            },
            Duration::from_millis(500),
            5,
        );
    }

    // host loop: sleep until the next deadline, then pump
    while let Some(deadline) = next_deadline() {
        let now = now();
        if deadline > now {
            std::thread::sleep(deadline - now);
        }
        pump();
    }
}
