//! Graphrank engine: concrete dataset loader and scorer collaborators.
mod loader;
mod scorer;
mod types;

pub use loader::{JsonDatasetLoader, LoadError};
pub use scorer::IterativeScorer;
pub use types::{
    Assets, Dataset, EdgeEvaluator, EdgeRecord, EdgeWeights, Graph, GraphDomain,
    RankedDecomposition, RepoId, ScoredEntity,
};
