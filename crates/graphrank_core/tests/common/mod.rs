//! Shared harness for state-machine tests: a toy domain with scriptable,
//! gateable collaborators.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};

use async_trait::async_trait;
use graphrank_core::{
    AppState, DatasetLoader, MemoryStore, Scorer, ScoringDomain, ScoringOptions, StateMachine,
};
use tokio::sync::Notify;

pub fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(rank_logging::initialize_for_tests);
}

#[derive(Clone, Debug, PartialEq)]
pub struct TestDomain;

impl ScoringDomain for TestDomain {
    type Repo = String;
    type EdgeEvaluator = String;
    type Assets = String;
    type Dataset = String;
    type Ranking = String;
}

/// Loader returning a scripted outcome, optionally parking at a gate so a
/// test can interleave other operations while the load is in flight.
pub struct StubLoader {
    reply: Result<String, String>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl StubLoader {
    pub fn ok(dataset: &str) -> Self {
        Self {
            reply: Ok(dataset.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(self, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..self
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetLoader<TestDomain> for StubLoader {
    async fn load(&self, _assets: &String, _repo: &String) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Ok(dataset) => Ok(dataset.clone()),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

/// Scorer counterpart to [`StubLoader`]; records the options it was given.
pub struct StubScorer {
    reply: Result<String, String>,
    gate: Option<Arc<Notify>>,
    calls: AtomicUsize,
}

impl StubScorer {
    pub fn ok(ranking: &str) -> Self {
        Self {
            reply: Ok(ranking.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            gate: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn gated(self, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..self
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Scorer<TestDomain> for StubScorer {
    async fn score(
        &self,
        dataset: &String,
        _evaluator: &String,
        options: ScoringOptions,
    ) -> anyhow::Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        match &self.reply {
            Ok(ranking) => Ok(format!(
                "{ranking}({dataset},prefix={})",
                options.score_root_prefix
            )),
            Err(message) => Err(anyhow::anyhow!(message.clone())),
        }
    }
}

pub struct Harness {
    pub machine: Arc<StateMachine<TestDomain>>,
    pub store: Arc<MemoryStore<TestDomain>>,
    pub loader: Arc<StubLoader>,
    pub scorer: Arc<StubScorer>,
}

pub fn harness(loader: StubLoader, scorer: StubScorer) -> Harness {
    let store = Arc::new(MemoryStore::new(AppState::initial()));
    let loader = Arc::new(loader);
    let scorer = Arc::new(scorer);
    let machine = Arc::new(StateMachine::new(
        store.clone(),
        loader.clone(),
        scorer.clone(),
    ));
    Harness {
        machine,
        store,
        loader,
        scorer,
    }
}

/// Spins until `ready` holds, yielding to let spawned operations progress to
/// their suspension points.
pub async fn wait_until(ready: impl Fn() -> bool) {
    while !ready() {
        tokio::task::yield_now().await;
    }
}
