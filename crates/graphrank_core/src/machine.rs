use std::sync::Arc;

use crate::{
    AppState, DatasetLoader, LoadingStatus, Scorer, ScoringDomain, ScoringOptions, StateStore,
    Substate,
};

/// Controller for the two-phase load/score workflow.
///
/// Holds no state of its own beyond the injected store and the two
/// collaborators; all observable state lives in the store's single cell and
/// is replaced wholesale on each commit.
///
/// Asynchronous operations use an optimistic snapshot-compare-commit
/// discipline: each one captures the state it committed before suspending and
/// discards its result if the live state no longer equals that snapshot when
/// it resumes. Synchronous mutations therefore always win against in-flight
/// asynchronous work that started earlier.
pub struct StateMachine<D: ScoringDomain> {
    store: Arc<dyn StateStore<D>>,
    loader: Arc<dyn DatasetLoader<D>>,
    scorer: Arc<dyn Scorer<D>>,
}

impl<D: ScoringDomain> StateMachine<D> {
    pub fn new(
        store: Arc<dyn StateStore<D>>,
        loader: Arc<dyn DatasetLoader<D>>,
        scorer: Arc<dyn Scorer<D>>,
    ) -> Self {
        Self {
            store,
            loader,
            scorer,
        }
    }

    /// The `Uninitialized` starting value for seeding a fresh store.
    pub fn initial_state() -> AppState<D> {
        AppState::initial()
    }

    /// Sets the repository. While `Initialized` this resets the substate to
    /// `ReadyToLoad`, abandoning any loaded dataset or ranking; in-flight
    /// asynchronous operations observe the change and discard themselves.
    pub fn set_repo(&self, repo: D::Repo) {
        let next = match self.store.get() {
            AppState::Uninitialized { edge_evaluator, .. } => {
                AppState::from_parts(Some(repo), edge_evaluator)
            }
            AppState::Initialized { edge_evaluator, .. } => AppState::Initialized {
                repo,
                edge_evaluator,
                substate: Substate::ReadyToLoad {
                    loading: LoadingStatus::Idle,
                },
            },
        };
        self.store.set(next);
    }

    /// Sets the edge evaluator. Unlike [`set_repo`](Self::set_repo) this
    /// never resets the substate: a new evaluator does not invalidate an
    /// already-loaded dataset, only a re-score.
    pub fn set_edge_evaluator(&self, edge_evaluator: D::EdgeEvaluator) {
        let next = match self.store.get() {
            AppState::Uninitialized { repo, .. } => {
                AppState::from_parts(repo, Some(edge_evaluator))
            }
            AppState::Initialized {
                repo, substate, ..
            } => AppState::Initialized {
                repo,
                edge_evaluator,
                substate,
            },
        };
        self.store.set(next);
    }

    /// Loads the dataset for the current repository.
    ///
    /// Returns whether the load succeeded *and* was committed. A `false`
    /// return with a `Failed` loading status means the loader failed; a
    /// `false` return with unchanged-by-us state means the result went stale
    /// and was discarded.
    ///
    /// # Panics
    ///
    /// Panics unless the state is `Initialized` with substate `ReadyToLoad`;
    /// calling this from any other state is a caller bug.
    pub async fn load_dataset(&self, assets: D::Assets) -> bool {
        let (repo, edge_evaluator, substate) = match self.store.get() {
            AppState::Uninitialized { .. } => {
                panic!("load_dataset called before initialization")
            }
            AppState::Initialized {
                repo,
                edge_evaluator,
                substate,
            } => (repo, edge_evaluator, substate),
        };
        match substate {
            Substate::ReadyToLoad { .. } => {}
            Substate::ReadyToScore { .. } | Substate::Scored { .. } => {
                panic!("load_dataset called with a dataset already loaded")
            }
        }

        let expected = AppState::Initialized {
            repo: repo.clone(),
            edge_evaluator: edge_evaluator.clone(),
            substate: Substate::ReadyToLoad {
                loading: LoadingStatus::InProgress,
            },
        };
        self.store.set(expected.clone());

        let outcome = self.loader.load(&assets, &repo).await;

        let (substate, succeeded) = match outcome {
            Ok(dataset) => (
                Substate::ReadyToScore {
                    dataset,
                    loading: LoadingStatus::Idle,
                },
                true,
            ),
            Err(err) => {
                log::error!("dataset load failed: {err:#}");
                (
                    Substate::ReadyToLoad {
                        loading: LoadingStatus::Failed,
                    },
                    false,
                )
            }
        };

        if !self.commit_if_fresh(
            &expected,
            AppState::Initialized {
                repo,
                edge_evaluator,
                substate,
            },
        ) {
            return false;
        }
        succeeded
    }

    /// Runs the scoring computation over the loaded dataset. Re-running from
    /// `Scored` replaces the previous ranking.
    ///
    /// Return value follows the same committed-success contract as
    /// [`load_dataset`](Self::load_dataset).
    ///
    /// # Panics
    ///
    /// Panics unless the state is `Initialized` with substate `ReadyToScore`
    /// or `Scored`.
    pub async fn run_scoring(&self, score_root_prefix: &str) -> bool {
        let (repo, edge_evaluator, substate) = match self.store.get() {
            AppState::Uninitialized { .. } => {
                panic!("run_scoring called before initialization")
            }
            AppState::Initialized {
                repo,
                edge_evaluator,
                substate,
            } => (repo, edge_evaluator, substate),
        };
        let dataset = match &substate {
            Substate::ReadyToLoad { .. } => {
                panic!("run_scoring called with no dataset loaded")
            }
            Substate::ReadyToScore { dataset, .. } | Substate::Scored { dataset, .. } => {
                dataset.clone()
            }
        };

        // Mark in-progress on the current variant, preserving any prior
        // ranking until the new one commits.
        let expected = AppState::Initialized {
            repo: repo.clone(),
            edge_evaluator: edge_evaluator.clone(),
            substate: substate.clone().with_loading(LoadingStatus::InProgress),
        };
        self.store.set(expected.clone());

        let options = ScoringOptions {
            score_root_prefix: score_root_prefix.to_string(),
            verbose: true,
        };
        let outcome = self.scorer.score(&dataset, &edge_evaluator, options).await;

        let (substate, succeeded) = match outcome {
            Ok(ranking) => (
                Substate::Scored {
                    dataset,
                    ranking,
                    loading: LoadingStatus::Idle,
                },
                true,
            ),
            Err(err) => {
                log::error!("scoring failed: {err:#}");
                (substate.with_loading(LoadingStatus::Failed), false)
            }
        };

        if !self.commit_if_fresh(
            &expected,
            AppState::Initialized {
                repo,
                edge_evaluator,
                substate,
            },
        ) {
            return false;
        }
        succeeded
    }

    /// Loads if necessary, then scores. Each sub-operation re-validates
    /// freshness before committing, so no additional guarding is needed here.
    ///
    /// # Panics
    ///
    /// Panics if the state is `Uninitialized`.
    pub async fn load_dataset_and_run_scoring(
        &self,
        assets: D::Assets,
        score_root_prefix: &str,
    ) -> bool {
        let substate = match self.store.get() {
            AppState::Uninitialized { .. } => {
                panic!("load_dataset_and_run_scoring called before initialization")
            }
            AppState::Initialized { substate, .. } => substate,
        };
        match substate {
            Substate::ReadyToLoad { .. } => {
                if !self.load_dataset(assets).await {
                    return false;
                }
                self.run_scoring(score_root_prefix).await
            }
            Substate::ReadyToScore { .. } | Substate::Scored { .. } => {
                self.run_scoring(score_root_prefix).await
            }
        }
    }

    /// Commits `candidate` only if the live state still equals the snapshot
    /// taken when this operation suspended. A mismatch means some other
    /// operation mutated state in the meantime; the candidate is discarded,
    /// which is routine, not a fault.
    fn commit_if_fresh(&self, expected: &AppState<D>, candidate: AppState<D>) -> bool {
        if self.store.get() != *expected {
            log::info!("state changed mid-operation; discarding stale result");
            return false;
        }
        self.store.set(candidate);
        true
    }
}
