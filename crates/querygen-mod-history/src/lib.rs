/// Linear undo/redo history over whole-document snapshots.
///
/// Provides a `HistoryManager` that keeps the `(past, present, future)`
/// triple of an editing session in memory, a pure `HistoryState::apply`
/// transition function, and a `SharedHistory` handle for hosts that edit
/// from more than one thread. History lives only as long as the session.
pub mod manager;
pub mod shared;
pub mod state;

pub use manager::HistoryManager;
pub use shared::SharedHistory;
pub use state::{HistoryAction, HistoryState};
