/// Linear undo/redo manager over whole-document snapshots.
///
/// Every commit stores a full snapshot of the document. Undo and redo move
/// a cursor through the stored snapshots; a new commit after an undo
/// discards everything that could have been redone.
use crate::state::{HistoryAction, HistoryState};

/// Manages undo/redo history for a single editing session.
///
/// The manager owns its [`HistoryState`] exclusively; callers only ever see
/// the present document through a shared reference.
pub struct HistoryManager<D> {
    state: HistoryState<D>,
}

impl<D> std::fmt::Debug for HistoryManager<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryManager")
            .field("undo_depth", &self.state.undo_depth())
            .field("redo_depth", &self.state.redo_depth())
            .finish()
    }
}

impl<D> HistoryManager<D> {
    /// Starts a session whose present is `initial` and whose past and
    /// future are empty.
    pub fn new(initial: D) -> Self {
        Self {
            state: HistoryState::new(initial),
        }
    }

    /// Returns the present document.
    pub fn current(&self) -> &D {
        self.state.present()
    }

    /// Records `doc` as the new present.
    ///
    /// The old present becomes the nearest undo step and the redo branch is
    /// dropped. Documents equal to the present are stored all the same.
    pub fn commit(&mut self, doc: D) {
        let discarded = self.state.redo_depth();
        self.state.commit(doc);
        tracing::debug!(
            undo_depth = self.state.undo_depth(),
            discarded,
            "committed document"
        );
    }

    /// Steps back one document.
    ///
    /// Returns `false` if there was nothing to undo, in which case the
    /// history is left untouched.
    pub fn undo(&mut self) -> bool {
        if !self.state.undo() {
            tracing::trace!("undo ignored: history is at its oldest document");
            return false;
        }
        tracing::debug!(
            undo_depth = self.state.undo_depth(),
            redo_depth = self.state.redo_depth(),
            "undo"
        );
        true
    }

    /// Steps forward one document.
    ///
    /// Returns `false` if there was nothing to redo, in which case the
    /// history is left untouched.
    pub fn redo(&mut self) -> bool {
        if !self.state.redo() {
            tracing::trace!("redo ignored: history is at its newest document");
            return false;
        }
        tracing::debug!(
            undo_depth = self.state.undo_depth(),
            redo_depth = self.state.redo_depth(),
            "redo"
        );
        true
    }

    /// Applies a transition expressed as a [`HistoryAction`].
    ///
    /// Returns whether the history changed.
    pub fn dispatch(&mut self, action: HistoryAction<D>) -> bool {
        match action {
            HistoryAction::Commit(doc) => {
                self.commit(doc);
                true
            }
            HistoryAction::Undo => self.undo(),
            HistoryAction::Redo => self.redo(),
        }
    }

    pub fn can_undo(&self) -> bool {
        self.state.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.state.can_redo()
    }

    /// Read-only view of the full history triple.
    pub fn state(&self) -> &HistoryState<D> {
        &self.state
    }

    /// Consumes the manager, returning its history triple.
    pub fn into_state(self) -> HistoryState<D> {
        self.state
    }
}

impl<D: Default> Default for HistoryManager<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}
