//! Mock collaborators for testing
//!
//! The `Mock*` types are generated by mockall from the collaborator traits;
//! the helpers here wire them into a `Services` handle without a terminal.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;

use crate::core::collaborators::OnUpload;
pub use crate::core::collaborators::{MockReplyGenerator, MockRetriever, MockUploadProcessor};
use crate::core::error::CollaboratorError;
use crate::core::models::{FileHandle, SearchOutcome};
use crate::core::simulated::sample_sources;
use crate::core::upload::UploadTiming;
use crate::tui::clipboard::MemoryClipboard;
use crate::tui::events::AppEvent;
use crate::tui::services::Services;

// ============================================================================
// Collaborator builders
// ============================================================================

/// A retriever that answers every query with the sample corpus.
pub fn retriever_with_samples() -> MockRetriever {
    let mut retriever = MockRetriever::new();
    retriever.expect_search().returning(|_, _| {
        Ok(SearchOutcome {
            sources: sample_sources(),
            summary: "Mock summary".to_string(),
        })
    });
    retriever
}

pub fn failing_retriever() -> MockRetriever {
    let mut retriever = MockRetriever::new();
    retriever
        .expect_search()
        .returning(|_, _| Err(CollaboratorError::Retrieval("index offline".into())));
    retriever
}

/// A generator that always answers with `reply`.
pub fn replies_with(reply: &'static str) -> MockReplyGenerator {
    let mut generator = MockReplyGenerator::new();
    generator
        .expect_generate_reply()
        .returning(move |_, _| Ok(reply.to_string()));
    generator
}

pub fn accepting_uploads() -> MockUploadProcessor {
    let mut processor = MockUploadProcessor::new();
    processor.expect_process_upload().returning(|_| Ok(()));
    processor
}

// ============================================================================
// Services wiring
// ============================================================================

/// Every file handed to `on_upload`, in call order.
pub type UploadLog = Arc<Mutex<Vec<Vec<FileHandle>>>>;

pub fn recording_on_upload() -> (OnUpload, UploadLog) {
    let log: UploadLog = Arc::new(Mutex::new(Vec::new()));
    let sink = log.clone();
    let on_upload: OnUpload = Arc::new(move |files: &[FileHandle]| {
        sink.lock().unwrap().push(files.to_vec());
    });
    (on_upload, log)
}

pub struct TestServices {
    pub services: Services,
    pub event_rx: mpsc::UnboundedReceiver<AppEvent>,
    pub uploads: UploadLog,
    pub clipboard: Arc<MemoryClipboard>,
}

/// Build `Services` around the given collaborators with short timings.
pub fn test_services(
    retriever: MockRetriever,
    replies: MockReplyGenerator,
    uploads: MockUploadProcessor,
) -> TestServices {
    let (event_tx, event_rx) = mpsc::unbounded_channel();
    let (on_upload, log) = recording_on_upload();
    let clipboard = Arc::new(MemoryClipboard::new());
    let services = Services {
        retriever: Arc::new(retriever),
        replies: Arc::new(replies),
        uploads: Arc::new(uploads),
        on_upload,
        clipboard: clipboard.clone(),
        search_display: Duration::from_millis(1500),
        upload_timing: UploadTiming::default(),
        event_tx,
    };
    TestServices {
        services,
        event_rx,
        uploads: log,
        clipboard,
    }
}
