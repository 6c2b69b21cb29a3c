//! Graphrank core: address codec and the load/score application state machine.
mod address;
mod domain;
mod machine;
mod state;
mod store;

pub use address::{decode, encode, AddressError, EntityAddress, ADDRESS_DELIMITER};
pub use domain::{DatasetLoader, Scorer, ScoringDomain, ScoringOptions};
pub use machine::StateMachine;
pub use state::{AppState, LoadingStatus, Substate};
pub use store::{MemoryStore, StateStore};
