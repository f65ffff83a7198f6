//! Error types for the research assistant core.
//!
//! Nothing here is fatal. Rejections are silent no-ops at the UI level,
//! collaborator failures become a user-visible terminal state.

use thiserror::Error;

/// Why a submission or selection was turned away without a state change.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    #[error("input is empty")]
    EmptyInput,

    #[error("a submission is already in flight")]
    ConcurrentSubmission,

    #[error("no file matched the accepted document type")]
    NoAcceptedFiles,
}

/// Failure reported (or simulated) by an external collaborator.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CollaboratorError {
    #[error("Retrieval failed: {0}")]
    Retrieval(String),

    #[error("Reply generation failed: {0}")]
    Reply(String),

    #[error("Upload processing failed: {0}")]
    Upload(String),
}

/// Result type alias for collaborator calls
pub type Result<T> = std::result::Result<T, CollaboratorError>;
