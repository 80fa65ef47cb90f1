//! Observable state shared by a store and its clones.

use parking_lot::Mutex;
use tokio::sync::watch;

/// A snapshot type that exposes a loading flag.
pub(crate) trait Tracked: Clone + Send + Sync + 'static {
    /// Sets the loading flag.
    fn set_loading(&mut self, loading: bool);
}

struct Inner<S> {
    snapshot: S,
    in_flight: usize,
    epoch: u64,
}

/// Snapshot behind a mutex, republished on every change.
///
/// The lock is only held for synchronous edits, never across an await.
pub(crate) struct StateCell<S: Tracked> {
    inner: Mutex<Inner<S>>,
    tx: watch::Sender<S>,
}

impl<S: Tracked> StateCell<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _) = watch::channel(initial.clone());
        Self {
            inner: Mutex::new(Inner {
                snapshot: initial,
                in_flight: 0,
                epoch: 0,
            }),
            tx,
        }
    }

    /// Edits the snapshot and publishes the result.
    pub(crate) fn update<T>(&self, f: impl FnOnce(&mut S) -> T) -> T {
        let mut inner = self.inner.lock();
        let out = f(&mut inner.snapshot);
        self.tx.send_replace(inner.snapshot.clone());
        out
    }

    /// Edits the snapshot only if it was not reset since `epoch`.
    ///
    /// Returns `None` when the edit was dropped.
    pub(crate) fn update_in<T>(&self, epoch: u64, f: impl FnOnce(&mut S) -> T) -> Option<T> {
        let mut inner = self.inner.lock();
        if inner.epoch != epoch {
            return None;
        }
        let out = f(&mut inner.snapshot);
        self.tx.send_replace(inner.snapshot.clone());
        Some(out)
    }

    /// Current epoch; bumped by every [`reset`](Self::reset).
    pub(crate) fn epoch(&self) -> u64 {
        self.inner.lock().epoch
    }

    /// Replaces the snapshot and starts a new epoch.
    ///
    /// The loading flag keeps tracking operations still in flight.
    pub(crate) fn reset(&self, mut fresh: S) {
        let mut inner = self.inner.lock();
        inner.epoch += 1;
        fresh.set_loading(inner.in_flight > 0);
        inner.snapshot = fresh;
        self.tx.send_replace(inner.snapshot.clone());
    }

    /// Reads the snapshot without publishing.
    pub(crate) fn read<T>(&self, f: impl FnOnce(&S) -> T) -> T {
        f(&self.inner.lock().snapshot)
    }

    pub(crate) fn snapshot(&self) -> S {
        self.inner.lock().snapshot.clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Marks one more operation in flight until the guard drops.
    pub(crate) fn loading(&self) -> LoadingGuard<'_, S> {
        let mut inner = self.inner.lock();
        inner.in_flight += 1;
        inner.snapshot.set_loading(true);
        self.tx.send_replace(inner.snapshot.clone());
        LoadingGuard { cell: self }
    }
}

/// Clears the loading flag when the last in-flight operation finishes,
/// whichever way it exits.
pub(crate) struct LoadingGuard<'a, S: Tracked> {
    cell: &'a StateCell<S>,
}

impl<S: Tracked> Drop for LoadingGuard<'_, S> {
    fn drop(&mut self) {
        let mut inner = self.cell.inner.lock();
        inner.in_flight = inner.in_flight.saturating_sub(1);
        let loading = inner.in_flight > 0;
        inner.snapshot.set_loading(loading);
        self.cell.tx.send_replace(inner.snapshot.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        value: u32,
        loading: bool,
    }

    impl Tracked for Counter {
        fn set_loading(&mut self, loading: bool) {
            self.loading = loading;
        }
    }

    #[test]
    fn test_nested_guards() {
        let cell = StateCell::new(Counter::default());
        let outer = cell.loading();
        {
            let _inner = cell.loading();
            assert!(cell.snapshot().loading);
        }
        assert!(cell.snapshot().loading);
        drop(outer);
        assert!(!cell.snapshot().loading);
    }

    #[test]
    fn test_update_publishes() {
        let cell = StateCell::new(Counter::default());
        let rx = cell.subscribe();
        cell.update(|c| c.value = 7);
        assert_eq!(rx.borrow().value, 7);
        assert_eq!(cell.read(|c| c.value), 7);
    }

    #[test]
    fn test_reset_drops_older_edits() {
        let cell = StateCell::new(Counter::default());
        let guard = cell.loading();
        let epoch = cell.epoch();
        cell.update(|c| c.value = 3);

        cell.reset(Counter::default());
        assert_eq!(cell.update_in(epoch, |c| c.value = 9), None);
        assert_eq!(cell.snapshot().value, 0);
        assert!(cell.snapshot().loading);

        assert_eq!(cell.update_in(cell.epoch(), |c| c.value = 4), Some(()));
        assert_eq!(cell.snapshot().value, 4);
        drop(guard);
        assert!(!cell.snapshot().loading);
    }
}
