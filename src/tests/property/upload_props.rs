//! Property-based tests for upload progress
//!
//! Tests invariants:
//! - Progress never decreases while uploading
//! - Progress stays at or below the cap until the processor answers
//! - Only accepted files are ever retained

use proptest::prelude::*;

use crate::core::error::CollaboratorError;
use crate::core::models::FileHandle;
use crate::core::upload::{UploadPolicy, UploadSignal, UploadStatus, UploadTask};

fn arb_file() -> impl Strategy<Value = FileHandle> {
    ("[a-z]{1,8}", prop::sample::select(vec!["pdf", "PDF", "txt", "docx", "png"]))
        .prop_map(|(stem, ext)| FileHandle::from_path(format!("/nonexistent/{stem}.{ext}")))
}

proptest! {
    #[test]
    fn prop_progress_monotonic_and_capped(
        step in 1u8..=50,
        cap in 1u8..=120,
        ticks in 0usize..40,
    ) {
        let mut task = UploadTask::new(UploadPolicy {
            step,
            cap,
            ..UploadPolicy::default()
        });
        let ticket = task
            .select(vec![FileHandle::from_path("/nonexistent/a.pdf")])
            .unwrap();

        let mut last = task.progress();
        for _ in 0..ticks {
            task.apply(UploadSignal::Tick { task_id: ticket.task_id });
            prop_assert!(task.progress() >= last);
            prop_assert!(task.progress() <= cap.min(99));
            prop_assert_eq!(task.status(), UploadStatus::Uploading);
            last = task.progress();
        }

        task.apply(UploadSignal::Finished { task_id: ticket.task_id, outcome: Ok(()) });
        prop_assert_eq!(task.progress(), 100);
    }

    #[test]
    fn prop_only_accepted_files_retained(files in prop::collection::vec(arb_file(), 0..8)) {
        let mut task = UploadTask::default();
        let expected = files
            .iter()
            .filter(|f| f.name.to_lowercase().ends_with(".pdf"))
            .count();

        match task.select(files) {
            Ok(ticket) => {
                prop_assert_eq!(ticket.files.len(), expected);
                prop_assert!(task.files().iter().all(|f| f.is_type("application/pdf")));
            }
            Err(_) => {
                prop_assert_eq!(expected, 0);
                prop_assert_eq!(task.status(), UploadStatus::Idle);
                prop_assert!(task.files().is_empty());
            }
        }
    }

    #[test]
    fn prop_stale_signals_never_change_state(
        ticks in 0usize..12,
        fail in any::<bool>(),
    ) {
        let mut task = UploadTask::default();
        let pdf = FileHandle::from_path("/nonexistent/a.pdf");
        let first = task.select(vec![pdf.clone()]).unwrap();
        task.apply(UploadSignal::Finished { task_id: first.task_id, outcome: Ok(()) });
        task.apply(UploadSignal::Expired { task_id: first.task_id });
        let second = task.select(vec![pdf]).unwrap();

        for _ in 0..ticks {
            task.apply(UploadSignal::Tick { task_id: second.task_id });
        }
        let progress = task.progress();

        let outcome = if fail {
            Err(CollaboratorError::Upload("late".into()))
        } else {
            Ok(())
        };
        task.apply(UploadSignal::Tick { task_id: first.task_id });
        task.apply(UploadSignal::Finished { task_id: first.task_id, outcome });
        task.apply(UploadSignal::Expired { task_id: first.task_id });

        prop_assert_eq!(task.status(), UploadStatus::Uploading);
        prop_assert_eq!(task.progress(), progress);
    }
}
