/// Thread-safe handle over a [`HistoryManager`].
///
/// All transitions happen under one mutex guarding the whole history triple,
/// so concurrent commits, undos and redos are serialized and never observe
/// a half-applied state.
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::manager::HistoryManager;

/// Cloneable, shareable history. Clones refer to the same history.
pub struct SharedHistory<D> {
    inner: Arc<Mutex<HistoryManager<D>>>,
}

impl<D> Clone for SharedHistory<D> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<D> std::fmt::Debug for SharedHistory<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SharedHistory")
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl<D> SharedHistory<D> {
    pub fn new(initial: D) -> Self {
        Self::from_manager(HistoryManager::new(initial))
    }

    /// Wraps an existing manager.
    pub fn from_manager(manager: HistoryManager<D>) -> Self {
        Self {
            inner: Arc::new(Mutex::new(manager)),
        }
    }

    /// Locks the history for the duration of the guard.
    ///
    /// Transitions never panic mid-update, so a poisoned lock still holds a
    /// consistent triple and is recovered rather than propagated.
    fn lock(&self) -> MutexGuard<'_, HistoryManager<D>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn commit(&self, doc: D) {
        self.lock().commit(doc);
    }

    pub fn undo(&self) -> bool {
        self.lock().undo()
    }

    pub fn redo(&self) -> bool {
        self.lock().redo()
    }

    pub fn can_undo(&self) -> bool {
        self.lock().can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.lock().can_redo()
    }

    /// Derives a new document from the present one and commits it, all
    /// under a single lock acquisition.
    pub fn update<F>(&self, edit: F)
    where
        F: FnOnce(&D) -> D,
    {
        let mut guard = self.lock();
        let next = edit(guard.current());
        guard.commit(next);
    }

    /// Runs `f` with read access to the manager while holding the lock.
    pub fn with<R>(&self, f: impl FnOnce(&HistoryManager<D>) -> R) -> R {
        f(&self.lock())
    }
}

impl<D: Clone> SharedHistory<D> {
    /// Returns a copy of the present document.
    pub fn current(&self) -> D {
        self.lock().current().clone()
    }
}
