#[cfg(test)]
mod tests {
    use crate::clock::*;
    use crate::driver;
    use crate::scope::*;
    use crate::signal::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use web_time::Duration;

    fn install_clock() -> Rc<TestClock> {
        let clock = Rc::new(TestClock::start_now());
        set_clock(clock.clone());
        clock
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_timeout_fires_once_at_deadline() {
        let clock = install_clock();
        let fired = Rc::new(RefCell::new(0));

        let fired2 = fired.clone();
        driver::set_timeout(ms(100), move || *fired2.borrow_mut() += 1);

        driver::advance(&clock, ms(99));
        assert_eq!(*fired.borrow(), 0);
        assert_eq!(driver::pending(), 1);

        driver::advance(&clock, ms(1));
        assert_eq!(*fired.borrow(), 1);
        assert_eq!(driver::pending(), 0);

        driver::advance(&clock, ms(1000));
        assert_eq!(*fired.borrow(), 1);
    }

    #[test]
    fn test_clear_is_synchronous() {
        let clock = install_clock();
        let fired = Rc::new(RefCell::new(false));

        let fired2 = fired.clone();
        let id = driver::set_timeout(ms(50), move || *fired2.borrow_mut() = true);

        // past the deadline, but cleared before the pump
        clock.advance(ms(100));
        assert!(driver::clear(id));
        driver::pump();

        assert!(!*fired.borrow());
        assert!(!driver::clear(id));
    }

    #[test]
    fn test_interval_rearms_and_catches_up() {
        let clock = install_clock();
        let count = Rc::new(RefCell::new(0));

        let count2 = count.clone();
        let id = driver::set_interval(ms(100), move || *count2.borrow_mut() += 1);

        driver::advance(&clock, ms(350));
        assert_eq!(*count.borrow(), 3);

        driver::clear(id);
        driver::advance(&clock, ms(1000));
        assert_eq!(*count.borrow(), 3);
    }

    #[test]
    fn test_zero_period_is_clamped() {
        let clock = install_clock();
        let count = Rc::new(RefCell::new(0));

        let count2 = count.clone();
        let id = driver::set_interval(Duration::ZERO, move || *count2.borrow_mut() += 1);

        driver::advance(&clock, ms(3));
        assert_eq!(*count.borrow(), 3);
        driver::clear(id);
    }

    #[test]
    fn test_deadline_order_with_arm_order_ties() {
        let clock = install_clock();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        driver::set_timeout(ms(200), move || l.borrow_mut().push("b"));
        let l = log.clone();
        driver::set_timeout(ms(100), move || l.borrow_mut().push("a"));
        let l = log.clone();
        driver::set_timeout(ms(200), move || l.borrow_mut().push("c"));

        driver::advance(&clock, ms(200));
        assert_eq!(*log.borrow(), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_callback_can_schedule() {
        let clock = install_clock();
        let log: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let l = log.clone();
        driver::set_timeout(ms(100), move || {
            l.borrow_mut().push("outer");
            let l = l.clone();
            driver::set_timeout(Duration::ZERO, move || l.borrow_mut().push("inner"));
        });

        driver::advance(&clock, ms(100));
        assert_eq!(*log.borrow(), vec!["outer", "inner"]);
    }

    #[test]
    fn test_callback_can_clear_sibling() {
        let clock = install_clock();
        let fired = Rc::new(RefCell::new(false));

        let fired2 = fired.clone();
        let victim = driver::set_timeout(ms(100), move || *fired2.borrow_mut() = true);
        driver::set_timeout(ms(50), move || {
            driver::clear(victim);
        });

        driver::advance(&clock, ms(200));
        assert!(!*fired.borrow());
        assert_eq!(driver::pending(), 0);
    }

    #[test]
    fn test_next_deadline_tracks_earliest() {
        let clock = install_clock();
        assert_eq!(driver::next_deadline(), None);

        let start = now();
        driver::set_timeout(ms(500), || {});
        let id = driver::set_timeout(ms(200), || {});
        assert_eq!(driver::next_deadline(), Some(start + ms(200)));

        driver::clear(id);
        assert_eq!(driver::next_deadline(), Some(start + ms(500)));
        let _ = clock;
    }

    #[test]
    fn test_advance_steps_intermediate_deadlines() {
        // each firing must observe its own deadline as "now", not the target
        let clock = install_clock();
        let start = now();
        let seen: Rc<RefCell<Vec<Duration>>> = Rc::new(RefCell::new(Vec::new()));

        let s = seen.clone();
        let id = driver::set_interval(ms(100), move || {
            s.borrow_mut().push(now() - start);
        });

        driver::advance(&clock, ms(300));
        assert_eq!(*seen.borrow(), vec![ms(100), ms(200), ms(300)]);
        driver::clear(id);
    }

    #[test]
    fn test_signal_basic() {
        let sig = signal(42);
        assert_eq!(sig.get(), 42);

        sig.set(100);
        assert_eq!(sig.get(), 100);

        sig.update(|v| *v += 1);
        assert_eq!(sig.get(), 101);

        assert_eq!(sig.with(|v| v * 2), 202);
    }

    #[test]
    fn test_signal_subscription() {
        let sig = signal(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen2 = seen.clone();
        sig.subscribe(move |v| seen2.borrow_mut().push(*v));

        sig.set(1);
        sig.update(|v| *v += 1);
        assert_eq!(*seen.borrow(), vec![1, 2]);
    }

    #[test]
    fn test_signal_subscriber_can_write_back() {
        let sig = signal(0);

        let sig2 = sig.clone();
        sig.subscribe(move |v| {
            if *v == 1 {
                sig2.set(2);
            }
        });

        sig.set(1);
        assert_eq!(sig.get(), 2);
    }

    #[test]
    fn test_scope_explicit_dispose() {
        let cleaned = Rc::new(RefCell::new(false));

        let scope = Scope::new();
        let cleaned2 = cleaned.clone();
        scope.add_cleanup(move || *cleaned2.borrow_mut() = true);

        assert!(!*cleaned.borrow());
        scope.dispose();
        assert!(*cleaned.borrow());

        // second dispose is a no-op
        scope.dispose();
    }

    #[test]
    fn test_scope_children_dispose_first() {
        let order: Rc<RefCell<Vec<&'static str>>> = Rc::new(RefCell::new(Vec::new()));

        let parent = Scope::new();
        let o = order.clone();
        parent.add_cleanup(move || o.borrow_mut().push("parent"));

        let child = parent.child();
        let o = order.clone();
        child.add_cleanup(move || o.borrow_mut().push("child"));

        parent.dispose();
        assert_eq!(*order.borrow(), vec!["child", "parent"]);
    }

    #[test]
    fn test_current_scope_nesting() {
        assert!(current_scope().is_none());

        let outer = Scope::new();
        outer.run(|| {
            assert!(current_scope().is_some());
            let inner = Scope::new();
            inner.run(|| {
                assert!(current_scope().is_some());
            });
        });
        assert!(current_scope().is_none());
    }

    #[test]
    fn test_on_cleanup_requires_scope() {
        assert!(!on_cleanup(|| {}));

        let ran = Rc::new(RefCell::new(false));
        let scope = Scope::new();
        scope.run(|| {
            let ran2 = ran.clone();
            assert!(on_cleanup(move || *ran2.borrow_mut() = true));
        });
        scope.dispose();
        assert!(*ran.borrow());
    }

    #[test]
    fn test_test_clock_advances() {
        let clock = TestClock::start_now();
        let t0 = clock.now();
        clock.advance(ms(250));
        assert_eq!(clock.now() - t0, ms(250));
    }
}
