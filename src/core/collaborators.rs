//! Trait seams for the external systems the core drives but does not own.
//!
//! Implementations live in `simulated` for the demo shell; tests use the
//! mockall-generated `Mock*` types.

use std::sync::Arc;

use async_trait::async_trait;

use super::error::Result;
use super::models::{FileHandle, ResearchContext, SearchMode, SearchOutcome};

/// Retrieval backend: ranked sources plus a narrative summary.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Retriever: Send + Sync {
    async fn search(&self, query: String, mode: SearchMode) -> Result<SearchOutcome>;
}

/// Produces the assistant's answer to one user turn.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReplyGenerator: Send + Sync {
    async fn generate_reply(
        &self,
        user_text: String,
        context: Option<ResearchContext>,
    ) -> Result<String>;
}

/// Processes accepted documents once they have been handed over.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UploadProcessor: Send + Sync {
    async fn process_upload(&self, files: Vec<FileHandle>) -> Result<()>;
}

/// Called once with the accepted files after an upload succeeds.
pub type OnUpload = Arc<dyn Fn(&[FileHandle]) + Send + Sync>;

/// Default `OnUpload`: record what was uploaded.
pub fn log_uploaded_files() -> OnUpload {
    Arc::new(|files: &[FileHandle]| {
        for file in files {
            log::info!(
                "Uploaded file: {} ({} bytes, {})",
                file.name,
                file.size_bytes,
                file.mime_type
            );
        }
    })
}
