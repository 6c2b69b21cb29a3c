//! Races between in-flight asynchronous operations and other mutations. The
//! stubs park on a `Notify` gate so each test controls exactly when a
//! collaborator call resolves.
mod common;

use std::sync::Arc;

use common::{harness, init_logging, wait_until, StubLoader, StubScorer};
use graphrank_core::{AppState, LoadingStatus, StateStore, Substate};
use pretty_assertions::assert_eq;
use tokio::sync::Notify;

#[tokio::test]
async fn set_repo_during_load_discards_the_load_result() {
    init_logging();
    let gate = Arc::new(Notify::new());
    let h = harness(
        StubLoader::ok("D").gated(gate.clone()),
        StubScorer::ok("R"),
    );
    h.machine.set_edge_evaluator("eval".to_string());
    h.machine.set_repo("repo".to_string());

    let machine = h.machine.clone();
    let load = tokio::spawn(async move { machine.load_dataset("assets".to_string()).await });
    let loader = h.loader.clone();
    wait_until(|| loader.calls() == 1).await;

    // The synchronous mutation lands while the load is suspended.
    h.machine.set_repo("other".to_string());
    gate.notify_one();

    assert!(!load.await.expect("load task"));
    assert_eq!(
        h.store.get(),
        AppState::Initialized {
            repo: "other".to_string(),
            edge_evaluator: "eval".to_string(),
            substate: Substate::ReadyToLoad {
                loading: LoadingStatus::Idle,
            },
        }
    );
}

#[tokio::test]
async fn set_repo_during_failing_load_still_wins() {
    init_logging();
    let gate = Arc::new(Notify::new());
    let h = harness(
        StubLoader::failing("timeout").gated(gate.clone()),
        StubScorer::ok("R"),
    );
    h.machine.set_edge_evaluator("eval".to_string());
    h.machine.set_repo("repo".to_string());

    let machine = h.machine.clone();
    let load = tokio::spawn(async move { machine.load_dataset("assets".to_string()).await });
    let loader = h.loader.clone();
    wait_until(|| loader.calls() == 1).await;

    h.machine.set_repo("other".to_string());
    gate.notify_one();

    assert!(!load.await.expect("load task"));
    // The Failed marker from the stale load must not leak into live state.
    let AppState::Initialized { repo, substate, .. } = h.store.get() else {
        panic!("expected initialized state");
    };
    assert_eq!(repo, "other".to_string());
    assert_eq!(substate.loading_status(), LoadingStatus::Idle);
}

#[tokio::test]
async fn set_repo_during_scoring_discards_the_ranking() {
    init_logging();
    let gate = Arc::new(Notify::new());
    let h = harness(
        StubLoader::ok("D"),
        StubScorer::ok("R").gated(gate.clone()),
    );
    h.machine.set_edge_evaluator("eval".to_string());
    h.machine.set_repo("repo".to_string());
    assert!(h.machine.load_dataset("assets".to_string()).await);

    let machine = h.machine.clone();
    let scoring = tokio::spawn(async move { machine.run_scoring("git").await });
    let scorer = h.scorer.clone();
    wait_until(|| scorer.calls() == 1).await;

    h.machine.set_repo("other".to_string());
    gate.notify_one();

    assert!(!scoring.await.expect("scoring task"));
    let AppState::Initialized { repo, substate, .. } = h.store.get() else {
        panic!("expected initialized state");
    };
    assert_eq!(repo, "other".to_string());
    assert_eq!(
        substate,
        Substate::ReadyToLoad {
            loading: LoadingStatus::Idle,
        }
    );
}

#[tokio::test]
async fn first_of_two_racing_scorings_wins() {
    init_logging();
    let gate = Arc::new(Notify::new());
    let h = harness(
        StubLoader::ok("D"),
        StubScorer::ok("R").gated(gate.clone()),
    );
    h.machine.set_edge_evaluator("eval".to_string());
    h.machine.set_repo("repo".to_string());
    assert!(h.machine.load_dataset("assets".to_string()).await);

    let machine = h.machine.clone();
    let first = tokio::spawn(async move { machine.run_scoring("a").await });
    let scorer = h.scorer.clone();
    wait_until(|| scorer.calls() == 1).await;

    let machine = h.machine.clone();
    let second = tokio::spawn(async move { machine.run_scoring("b").await });
    let scorer = h.scorer.clone();
    wait_until(|| scorer.calls() == 2).await;

    // Release in submission order: the first commit flips the state, so the
    // second operation's guard sees a mismatch and discards itself.
    gate.notify_one();
    assert!(first.await.expect("first scoring"));
    gate.notify_one();
    assert!(!second.await.expect("second scoring"));

    let AppState::Initialized { substate, .. } = h.store.get() else {
        panic!("expected initialized state");
    };
    assert_eq!(
        substate,
        Substate::Scored {
            dataset: "D".to_string(),
            ranking: "R(D,prefix=a)".to_string(),
            loading: LoadingStatus::Idle,
        }
    );
}

#[tokio::test]
async fn undisturbed_load_commits_even_with_concurrent_reads() {
    init_logging();
    let gate = Arc::new(Notify::new());
    let h = harness(
        StubLoader::ok("D").gated(gate.clone()),
        StubScorer::ok("R"),
    );
    h.machine.set_edge_evaluator("eval".to_string());
    h.machine.set_repo("repo".to_string());

    let machine = h.machine.clone();
    let load = tokio::spawn(async move { machine.load_dataset("assets".to_string()).await });
    let loader = h.loader.clone();
    wait_until(|| loader.calls() == 1).await;

    // Reads are not mutations; the guard must not trip.
    let AppState::Initialized { substate, .. } = h.store.get() else {
        panic!("expected initialized state");
    };
    assert_eq!(substate.loading_status(), LoadingStatus::InProgress);
    gate.notify_one();

    assert!(load.await.expect("load task"));
    let AppState::Initialized { substate, .. } = h.store.get() else {
        panic!("expected initialized state");
    };
    assert!(matches!(substate, Substate::ReadyToScore { .. }));
}
