//! Atomically replaceable read-only snapshots.

use std::sync::Arc;

use parking_lot::RwLock;

/// Holds an immutable value that readers share and writers replace wholesale.
///
/// Readers take an `Arc` clone and keep working against it even if a reload
/// swaps in a new value mid-call.
#[derive(Debug)]
pub struct SnapshotCell<T> {
    current: RwLock<Arc<T>>,
}

impl<T> SnapshotCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            current: RwLock::new(Arc::new(value)),
        }
    }

    /// The value as of now.
    pub fn load(&self) -> Arc<T> {
        self.current.read().clone()
    }

    /// Replace the value, returning the previous snapshot.
    pub fn replace(&self, value: T) -> Arc<T> {
        let mut guard = self.current.write();
        std::mem::replace(&mut *guard, Arc::new(value))
    }

    /// Derive the next value from the current one under the write lock.
    ///
    /// `f` returning `None` leaves the value untouched. Returns whether a new
    /// value was installed.
    pub fn update(&self, f: impl FnOnce(&T) -> Option<T>) -> bool {
        let mut guard = self.current.write();
        match f(&**guard) {
            Some(next) => {
                *guard = Arc::new(next);
                true
            }
            None => false,
        }
    }
}

impl<T: Default> Default for SnapshotCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn held_snapshot_survives_replace() {
        let cell = SnapshotCell::new(vec![1, 2, 3]);
        let before = cell.load();
        let previous = cell.replace(vec![4]);

        assert_eq!(*before, vec![1, 2, 3]);
        assert_eq!(*previous, vec![1, 2, 3]);
        assert_eq!(*cell.load(), vec![4]);
    }

    #[test]
    fn update_can_decline() {
        let cell = SnapshotCell::new(1);
        assert!(!cell.update(|_| None));
        assert!(cell.update(|n| Some(n + 1)));
        assert_eq!(*cell.load(), 2);
    }

    #[test]
    fn concurrent_updates_are_not_lost() {
        let cell = SnapshotCell::new(Vec::<usize>::new());
        std::thread::scope(|scope| {
            for worker in 0..8 {
                let cell = &cell;
                scope.spawn(move || {
                    for step in 0..50 {
                        cell.update(|items| {
                            let mut next = items.clone();
                            next.push(worker * 100 + step);
                            Some(next)
                        });
                    }
                });
            }
        });
        assert_eq!(cell.load().len(), 400);
    }
}
