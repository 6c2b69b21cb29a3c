use std::sync::Mutex;

use crate::{AppState, ScoringDomain};

/// Injected accessor pair for the single shared state cell.
///
/// The machine re-reads through `get` at every decision point so commit
/// checks always see the live value, never a cached one. Implementations may
/// piggyback side effects on `set` (e.g. a UI re-render trigger).
pub trait StateStore<D: ScoringDomain>: Send + Sync {
    fn get(&self) -> AppState<D>;
    fn set(&self, state: AppState<D>);
}

/// In-process store backed by a mutex-guarded cell.
pub struct MemoryStore<D: ScoringDomain> {
    cell: Mutex<AppState<D>>,
}

impl<D: ScoringDomain> MemoryStore<D> {
    pub fn new(initial: AppState<D>) -> Self {
        Self {
            cell: Mutex::new(initial),
        }
    }
}

impl<D: ScoringDomain> StateStore<D> for MemoryStore<D> {
    fn get(&self) -> AppState<D> {
        self.cell.lock().expect("lock state cell").clone()
    }

    fn set(&self, state: AppState<D>) {
        *self.cell.lock().expect("lock state cell") = state;
    }
}
