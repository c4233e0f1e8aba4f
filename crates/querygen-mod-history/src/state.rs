/// The `(past, present, future)` triple and its pure transition function.
use std::collections::VecDeque;

/// A transition request for [`HistoryState::apply`].
#[derive(Debug, Clone, PartialEq)]
pub enum HistoryAction<D> {
    /// Record a new present, pushing the old one onto the past.
    Commit(D),
    /// Step back one document.
    Undo,
    /// Step forward one document.
    Redo,
}

/// Linear undo/redo position over a sequence of document snapshots.
///
/// Documents are stored whole and never compared or inspected. There is
/// always exactly one present document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryState<D> {
    /// Oldest first, nearest-previous last.
    past: Vec<D>,
    present: D,
    /// Nearest-next first.
    future: VecDeque<D>,
}

impl<D> HistoryState<D> {
    /// Creates a state with empty past and future.
    pub fn new(initial: D) -> Self {
        Self {
            past: Vec::new(),
            present: initial,
            future: VecDeque::new(),
        }
    }

    /// Returns the state that results from applying `action`.
    ///
    /// Undo with an empty past and redo with an empty future return the
    /// state unchanged.
    pub fn apply(mut self, action: HistoryAction<D>) -> Self {
        match action {
            HistoryAction::Commit(doc) => self.commit(doc),
            HistoryAction::Undo => {
                self.undo();
            }
            HistoryAction::Redo => {
                self.redo();
            }
        }
        self
    }

    /// Makes `doc` the present and discards the redo branch.
    pub fn commit(&mut self, doc: D) {
        let previous = std::mem::replace(&mut self.present, doc);
        self.past.push(previous);
        self.future.clear();
    }

    /// Moves one document from the past into the present.
    ///
    /// Returns `false` (and changes nothing) if the past is empty.
    pub fn undo(&mut self) -> bool {
        let Some(previous) = self.past.pop() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, previous);
        self.future.push_front(current);
        true
    }

    /// Moves one document from the future into the present.
    ///
    /// Returns `false` (and changes nothing) if the future is empty.
    pub fn redo(&mut self) -> bool {
        let Some(next) = self.future.pop_front() else {
            return false;
        };
        let current = std::mem::replace(&mut self.present, next);
        self.past.push(current);
        true
    }

    pub fn present(&self) -> &D {
        &self.present
    }

    pub fn past(&self) -> &[D] {
        &self.past
    }

    pub fn future(&self) -> &VecDeque<D> {
        &self.future
    }

    pub fn can_undo(&self) -> bool {
        !self.past.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.future.is_empty()
    }

    /// Number of undo steps available.
    pub fn undo_depth(&self) -> usize {
        self.past.len()
    }

    /// Number of redo steps available.
    pub fn redo_depth(&self) -> usize {
        self.future.len()
    }

    /// Total number of stored documents, present included.
    #[allow(clippy::len_without_is_empty)]
    pub fn len(&self) -> usize {
        self.past.len() + 1 + self.future.len()
    }

    /// Consumes the state, returning the present document.
    pub fn into_present(self) -> D {
        self.present
    }
}
