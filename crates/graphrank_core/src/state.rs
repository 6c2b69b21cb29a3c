use crate::ScoringDomain;

/// Progress marker shared by every substate variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStatus {
    Idle,
    InProgress,
    Failed,
}

/// Phase of the load/score workflow once the machine is initialized.
///
/// Substates advance monotonically (`ReadyToLoad` → `ReadyToScore` →
/// `Scored`), except that replacing the repository resets the substate to
/// `ReadyToLoad` and re-scoring from `Scored` replaces the ranking in place.
#[derive(Debug, Clone, PartialEq)]
pub enum Substate<D: ScoringDomain> {
    ReadyToLoad {
        loading: LoadingStatus,
    },
    ReadyToScore {
        dataset: D::Dataset,
        loading: LoadingStatus,
    },
    Scored {
        dataset: D::Dataset,
        ranking: D::Ranking,
        loading: LoadingStatus,
    },
}

impl<D: ScoringDomain> Substate<D> {
    pub fn loading_status(&self) -> LoadingStatus {
        match self {
            Substate::ReadyToLoad { loading }
            | Substate::ReadyToScore { loading, .. }
            | Substate::Scored { loading, .. } => *loading,
        }
    }

    /// Same variant with the loading marker replaced.
    pub(crate) fn with_loading(self, loading: LoadingStatus) -> Self {
        match self {
            Substate::ReadyToLoad { .. } => Substate::ReadyToLoad { loading },
            Substate::ReadyToScore { dataset, .. } => Substate::ReadyToScore { dataset, loading },
            Substate::Scored {
                dataset, ranking, ..
            } => Substate::Scored {
                dataset,
                ranking,
                loading,
            },
        }
    }
}

/// The single application state value.
///
/// `Uninitialized` collects the repository and evaluator independently and
/// promotes to `Initialized` the instant both are present; it never reverts.
#[derive(Debug, Clone, PartialEq)]
pub enum AppState<D: ScoringDomain> {
    Uninitialized {
        repo: Option<D::Repo>,
        edge_evaluator: Option<D::EdgeEvaluator>,
    },
    Initialized {
        repo: D::Repo,
        edge_evaluator: D::EdgeEvaluator,
        substate: Substate<D>,
    },
}

impl<D: ScoringDomain> AppState<D> {
    /// The starting value: nothing configured yet.
    pub fn initial() -> Self {
        AppState::Uninitialized {
            repo: None,
            edge_evaluator: None,
        }
    }

    /// Promotes to `Initialized` when both fields are present; checked after
    /// every mutation of either `Uninitialized` field.
    pub(crate) fn from_parts(repo: Option<D::Repo>, edge_evaluator: Option<D::EdgeEvaluator>) -> Self {
        match (repo, edge_evaluator) {
            (Some(repo), Some(edge_evaluator)) => AppState::Initialized {
                repo,
                edge_evaluator,
                substate: Substate::ReadyToLoad {
                    loading: LoadingStatus::Idle,
                },
            },
            (repo, edge_evaluator) => AppState::Uninitialized {
                repo,
                edge_evaluator,
            },
        }
    }
}
