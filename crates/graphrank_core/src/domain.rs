use std::fmt::Debug;

use async_trait::async_trait;

/// The family of value types a concrete deployment plugs into the state
/// machine. The machine passes them through unchanged and never interprets
/// their internals; `PartialEq` is required because commit decisions compare
/// whole state snapshots structurally.
///
/// Implementors are marker types, so the `Clone + PartialEq + Debug` supertrait
/// bounds are trivially derivable; they let state values parameterized by the
/// domain derive the same traits.
pub trait ScoringDomain: Clone + PartialEq + Debug + Send + Sync + 'static {
    /// Repository identifier selecting which dataset to load.
    type Repo: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// Edge-weighting function handed to the scorer.
    type EdgeEvaluator: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// Locator for on-disk (or remote) dataset assets.
    type Assets: Clone + Send + Sync + 'static;
    /// Loaded-graph bundle produced by the loader.
    type Dataset: Clone + PartialEq + Debug + Send + Sync + 'static;
    /// Ranked decomposition produced by the scorer.
    type Ranking: Clone + PartialEq + Debug + Send + Sync + 'static;
}

/// Options forwarded verbatim to the scorer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoringOptions {
    /// Only entities whose encoded address starts with this prefix appear in
    /// the ranking. Empty means no filtering.
    pub score_root_prefix: String,
    pub verbose: bool,
}

/// External collaborator that turns a repository identifier plus asset
/// locations into an in-memory dataset. May fail with any error; the state
/// machine performs no retries.
#[async_trait]
pub trait DatasetLoader<D: ScoringDomain>: Send + Sync {
    async fn load(&self, assets: &D::Assets, repo: &D::Repo) -> anyhow::Result<D::Dataset>;
}

/// External collaborator that scores a loaded dataset with an edge evaluator.
#[async_trait]
pub trait Scorer<D: ScoringDomain>: Send + Sync {
    async fn score(
        &self,
        dataset: &D::Dataset,
        evaluator: &D::EdgeEvaluator,
        options: ScoringOptions,
    ) -> anyhow::Result<D::Ranking>;
}
