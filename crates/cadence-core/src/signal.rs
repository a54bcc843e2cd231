use std::cell::RefCell;
use std::rc::Rc;

/// Observable, reactive value. Cloning shares the same storage.
pub struct Signal<T: 'static>(Rc<RefCell<Inner<T>>>);

struct Inner<T> {
    value: T,
    subs: Vec<Rc<dyn Fn(&T)>>,
}

impl<T> Signal<T> {
    pub fn new(value: T) -> Self {
        Self(Rc::new(RefCell::new(Inner {
            value,
            subs: Vec::new(),
        })))
    }

    pub fn get(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().value.clone()
    }

    /// Reads the value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow().value)
    }

    pub fn set(&self, value: T)
    where
        T: Clone,
    {
        self.0.borrow_mut().value = value;
        self.notify();
    }

    pub fn update<F: FnOnce(&mut T)>(&self, f: F)
    where
        T: Clone,
    {
        f(&mut self.0.borrow_mut().value);
        self.notify();
    }

    pub fn subscribe(&self, f: impl Fn(&T) + 'static) {
        self.0.borrow_mut().subs.push(Rc::new(f));
    }

    fn notify(&self)
    where
        T: Clone,
    {
        // subscribers may read or even write the signal again, so call
        // them on a snapshot with no borrow held
        let (subs, value) = {
            let inner = self.0.borrow();
            (inner.subs.clone(), inner.value.clone())
        };
        for sub in subs {
            sub(&value);
        }
    }
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

pub fn signal<T>(t: T) -> Signal<T> {
    Signal::new(t)
}
