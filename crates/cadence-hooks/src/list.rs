//! List state with helpers for the usual index- and predicate-based
//! edits. Subscribers are only notified when the list actually changed.

use cadence_core::{Signal, signal};

pub struct ListState<T: Clone + 'static> {
    items: Signal<Vec<T>>,
}

impl<T: Clone> ListState<T> {
    pub fn new(initial: Vec<T>) -> Self {
        Self {
            items: signal(initial),
        }
    }

    /// The backing signal, for subscriptions.
    pub fn items(&self) -> Signal<Vec<T>> {
        self.items.clone()
    }

    pub fn get(&self) -> Vec<T> {
        self.items.get()
    }

    pub fn len(&self) -> usize {
        self.items.with(|v| v.len())
    }

    pub fn is_empty(&self) -> bool {
        self.items.with(|v| v.is_empty())
    }

    pub fn push(&self, item: T) {
        self.items.update(|v| v.push(item));
    }

    /// Inserts at `index`, clamped into `0..=len`.
    pub fn insert(&self, index: usize, item: T) {
        self.items.update(|v| {
            let index = index.min(v.len());
            v.insert(index, item);
        });
    }

    /// Appends all of `items`; an empty batch does not notify.
    pub fn extend(&self, items: Vec<T>) {
        if items.is_empty() {
            return;
        }
        self.items.update(|v| v.extend(items));
    }

    /// Removes and returns the item at `index`; out of bounds is a no-op.
    pub fn remove_at(&self, index: usize) -> Option<T> {
        if index >= self.len() {
            return None;
        }
        let mut removed = None;
        self.items.update(|v| removed = Some(v.remove(index)));
        removed
    }

    /// Removes the first item matching `pred`. Returns whether anything
    /// was removed.
    pub fn remove_first_by(&self, pred: impl Fn(&T) -> bool) -> bool {
        let Some(index) = self.items.with(|v| v.iter().position(&pred)) else {
            return false;
        };
        self.items.update(|v| {
            v.remove(index);
        });
        true
    }

    /// Removes every item matching `pred`, returning how many went.
    pub fn remove_all_by(&self, pred: impl Fn(&T) -> bool) -> usize {
        let matches = self.items.with(|v| v.iter().filter(|i| pred(i)).count());
        if matches == 0 {
            return 0;
        }
        self.items.update(|v| v.retain(|i| !pred(i)));
        matches
    }

    /// Updates the item at `index` in place; out of bounds is a no-op.
    pub fn update_at(&self, index: usize, f: impl FnOnce(&mut T)) -> bool {
        if index >= self.len() {
            return false;
        }
        self.items.update(|v| f(&mut v[index]));
        true
    }

    /// Updates the first item matching `pred`.
    pub fn update_first_by(&self, pred: impl Fn(&T) -> bool, f: impl FnOnce(&mut T)) -> bool {
        let Some(index) = self.items.with(|v| v.iter().position(&pred)) else {
            return false;
        };
        self.items.update(|v| f(&mut v[index]));
        true
    }

    /// Updates every item matching `pred`, returning how many changed.
    pub fn update_all_by(&self, pred: impl Fn(&T) -> bool, f: impl Fn(&mut T)) -> usize {
        let matches = self.items.with(|v| v.iter().filter(|i| pred(i)).count());
        if matches == 0 {
            return 0;
        }
        self.items.update(|v| {
            for item in v.iter_mut().filter(|i| pred(i)) {
                f(item);
            }
        });
        matches
    }

    /// Empties the list; already empty does not notify.
    pub fn clear(&self) {
        if self.is_empty() {
            return;
        }
        self.items.update(|v| v.clear());
    }

    pub fn replace(&self, items: Vec<T>) {
        self.items.set(items);
    }

    pub fn find_by(&self, pred: impl Fn(&T) -> bool) -> Option<T> {
        self.items.with(|v| v.iter().find(|i| pred(i)).cloned())
    }

    pub fn filter_by(&self, pred: impl Fn(&T) -> bool) -> Vec<T> {
        self.items
            .with(|v| v.iter().filter(|i| pred(i)).cloned().collect())
    }

    pub fn count_by(&self, pred: impl Fn(&T) -> bool) -> usize {
        self.items.with(|v| v.iter().filter(|i| pred(i)).count())
    }
}

impl<T: Clone> Default for ListState<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl<T: Clone> Clone for ListState<T> {
    fn clone(&self) -> Self {
        Self {
            items: self.items.clone(),
        }
    }
}
