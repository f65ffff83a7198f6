//! Search driver: display window and retrieval run independently.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::core::latency::Fixed;
use crate::core::models::SearchMode;
use crate::core::results::{ResultsState, ResultsStatus};
use crate::core::search::{drive_search, SearchGate, SearchSignal};
use crate::core::simulated::SimulatedRetriever;
use crate::tests::mocks::{failing_retriever, retriever_with_samples};

fn drain(rx: &mut mpsc::UnboundedReceiver<SearchSignal>) -> Vec<SearchSignal> {
    let mut signals = Vec::new();
    while let Ok(signal) = rx.try_recv() {
        signals.push(signal);
    }
    signals
}

/// Apply signals the way the event loop does.
fn apply(gate: &mut SearchGate, results: &mut ResultsState, signals: Vec<SearchSignal>) {
    for signal in signals {
        match signal {
            SearchSignal::DisplayElapsed { ticket } => {
                gate.finish_display(ticket);
            }
            SearchSignal::Completed { ticket, outcome } => {
                results.apply(ticket, outcome);
            }
        }
    }
}

#[tokio::test(start_paused = true)]
async fn test_fast_retrieval_lands_before_display_window_closes() {
    let mut gate = SearchGate::new();
    let mut results = ResultsState::new();
    let ticket = gate.submit_search("coral reefs", SearchMode::Hybrid).unwrap();
    results.begin(ticket.id, &ticket.query, ticket.mode);
    let id = ticket.id;

    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = tokio::spawn(drive_search(
        ticket,
        Arc::new(retriever_with_samples()),
        Duration::from_millis(1500),
        tx,
    ));

    tokio::time::sleep(Duration::from_millis(10)).await;
    let early = drain(&mut rx);
    assert!(matches!(early.as_slice(), [SearchSignal::Completed { ticket, .. }] if *ticket == id));
    apply(&mut gate, &mut results, early);
    assert_eq!(results.status(), &ResultsStatus::Ready);
    assert!(gate.is_searching());

    driver.await.unwrap();
    apply(&mut gate, &mut results, drain(&mut rx));
    assert!(!gate.is_searching());
}

#[tokio::test(start_paused = true)]
async fn test_display_window_closes_before_slow_retrieval() {
    let mut gate = SearchGate::new();
    let mut results = ResultsState::new();
    let ticket = gate.submit_search("coral reefs", SearchMode::Web).unwrap();
    results.begin(ticket.id, &ticket.query, ticket.mode);

    let retriever = Arc::new(SimulatedRetriever::new(Arc::new(Fixed::millis(2000))));
    let (tx, mut rx) = mpsc::unbounded_channel();
    let driver = tokio::spawn(drive_search(ticket, retriever, Duration::from_millis(1500), tx));

    tokio::time::sleep(Duration::from_millis(1600)).await;
    apply(&mut gate, &mut results, drain(&mut rx));
    assert!(!gate.is_searching());
    assert_eq!(results.status(), &ResultsStatus::Loading);

    // A second search may start while the first retrieval is still out.
    let second = gate.submit_search("kelp forests", SearchMode::Web).unwrap();
    results.begin(second.id, &second.query, second.mode);

    driver.await.unwrap();
    apply(&mut gate, &mut results, drain(&mut rx));
    // The first ticket's completion is stale now.
    assert_eq!(results.status(), &ResultsStatus::Loading);
    assert_eq!(results.query(), "kelp forests");
}

#[tokio::test(start_paused = true)]
async fn test_retrieval_failure_marks_results_failed() {
    let mut gate = SearchGate::new();
    let mut results = ResultsState::new();
    let ticket = gate.submit_search("anything", SearchMode::Documents).unwrap();
    results.begin(ticket.id, &ticket.query, ticket.mode);

    let (tx, mut rx) = mpsc::unbounded_channel();
    drive_search(
        ticket,
        Arc::new(failing_retriever()),
        Duration::from_millis(1500),
        tx,
    )
    .await;

    apply(&mut gate, &mut results, drain(&mut rx));
    assert!(!gate.is_searching());
    assert!(matches!(results.status(), ResultsStatus::Failed(m) if m.contains("index offline")));
}
