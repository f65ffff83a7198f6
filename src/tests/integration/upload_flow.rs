//! Upload driver against real and mocked processors.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::Instant;

use crate::core::error::CollaboratorError;
use crate::core::latency::Fixed;
use crate::core::models::FileHandle;
use crate::core::simulated::SimulatedUploadProcessor;
use crate::core::upload::{
    drive_upload, UploadSignal, UploadStatus, UploadTask, UploadTiming, UploadTransition,
};
use crate::tests::mocks::{accepting_uploads, MockUploadProcessor};

fn pdf() -> FileHandle {
    FileHandle::from_path("/nonexistent/paper.pdf")
}

fn drain(rx: &mut mpsc::UnboundedReceiver<UploadSignal>) -> Vec<UploadSignal> {
    let mut signals = Vec::new();
    while let Ok(signal) = rx.try_recv() {
        signals.push(signal);
    }
    signals
}

#[tokio::test(start_paused = true)]
async fn test_two_second_processor_yields_nine_ticks_then_expiry() {
    let mut task = UploadTask::default();
    let ticket = task.select(vec![pdf()]).unwrap();
    let task_id = ticket.task_id;

    let processor = Arc::new(SimulatedUploadProcessor::new(Arc::new(Fixed::millis(2000)), 0.0));
    let (tx, mut rx) = mpsc::unbounded_channel();

    let start = Instant::now();
    drive_upload(ticket, processor, UploadTiming::default(), tx).await;
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_millis(4000));
    assert!(elapsed < Duration::from_millis(4100));

    let signals = drain(&mut rx);
    assert_eq!(signals.len(), 11);
    assert!(signals[..9]
        .iter()
        .all(|s| *s == UploadSignal::Tick { task_id }));
    assert_eq!(
        signals[9],
        UploadSignal::Finished {
            task_id,
            outcome: Ok(())
        }
    );
    assert_eq!(signals[10], UploadSignal::Expired { task_id });

    let mut progress = Vec::new();
    let mut transitions = Vec::new();
    for signal in signals {
        let transition = task.apply(signal);
        if let UploadTransition::Progressed(p) = transition {
            progress.push(p);
        } else {
            transitions.push(transition);
        }
    }
    assert_eq!(progress, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    assert_eq!(
        transitions,
        vec![
            UploadTransition::Succeeded(vec![pdf()]),
            UploadTransition::Reset
        ]
    );
    assert_eq!(task.status(), UploadStatus::Idle);
    assert_eq!(task.progress(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_failed_processing_reports_error_then_resets() {
    let mut processor = MockUploadProcessor::new();
    processor
        .expect_process_upload()
        .times(1)
        .returning(|files| Err(CollaboratorError::Upload(format!("{} rejected", files.len()))));

    let mut task = UploadTask::default();
    let ticket = task.select(vec![pdf()]).unwrap();
    let task_id = ticket.task_id;
    let (tx, mut rx) = mpsc::unbounded_channel();

    drive_upload(ticket, Arc::new(processor), UploadTiming::default(), tx).await;

    let signals = drain(&mut rx);
    assert_eq!(signals.len(), 2);

    assert_eq!(
        task.apply(signals[0].clone()),
        UploadTransition::Failed("Upload processing failed: 1 rejected".into())
    );
    assert_eq!(task.status(), UploadStatus::Error);
    assert_eq!(task.progress(), 100);
    assert_eq!(task.last_error(), Some("Upload processing failed: 1 rejected"));

    assert_eq!(task.apply(signals[1].clone()), UploadTransition::Reset);
    assert_eq!(task.status(), UploadStatus::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_driver_stops_when_receiver_dropped() {
    let mut task = UploadTask::default();
    let ticket = task.select(vec![pdf()]).unwrap();
    let (tx, rx) = mpsc::unbounded_channel::<UploadSignal>();
    drop(rx);

    let start = Instant::now();
    drive_upload(ticket, Arc::new(accepting_uploads()), UploadTiming::default(), tx).await;
    // No dwell once nobody is listening.
    assert!(start.elapsed() < Duration::from_millis(2000));
}

#[tokio::test(start_paused = true)]
async fn test_custom_timing_controls_tick_count() {
    let mut task = UploadTask::default();
    let ticket = task.select(vec![pdf()]).unwrap();
    let processor = Arc::new(SimulatedUploadProcessor::new(Arc::new(Fixed::millis(1000)), 0.0));
    let timing = UploadTiming {
        tick: Duration::from_millis(300),
        dwell: Duration::from_millis(500),
    };
    let (tx, mut rx) = mpsc::unbounded_channel();

    drive_upload(ticket, processor, timing, tx).await;

    let ticks = drain(&mut rx)
        .into_iter()
        .filter(|s| matches!(s, UploadSignal::Tick { .. }))
        .count();
    // 300, 600, 900
    assert_eq!(ticks, 3);
}
