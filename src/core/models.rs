//! Concrete records shared by the state machines and the views.

use std::fmt;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Conversation
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

/// One entry in a conversation transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub id: String,
    pub role: TurnRole,
    pub text: String,
    pub created_at: DateTime<Utc>,
    /// Ids of the sources this turn refers to, in citation order.
    #[serde(default)]
    pub source_refs: Vec<String>,
    /// True only for the in-flight assistant placeholder.
    #[serde(default)]
    pub pending: bool,
}

impl ConversationTurn {
    fn with_role(role: TurnRole, text: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role,
            text: text.into(),
            created_at: Utc::now(),
            source_refs: Vec::new(),
            pending: false,
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::with_role(TurnRole::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::with_role(TurnRole::Assistant, text)
    }

    /// Empty assistant turn reserving the reply slot.
    pub fn placeholder() -> Self {
        Self {
            pending: true,
            ..Self::with_role(TurnRole::Assistant, String::new())
        }
    }

    pub fn with_sources(mut self, source_refs: Vec<String>) -> Self {
        self.source_refs = source_refs;
        self
    }
}

// ============================================================================
// Sources
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Document,
    Web,
    Academic,
}

impl SourceKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Document => "Document",
            Self::Web => "Web",
            Self::Academic => "Academic",
        }
    }
}

/// A retrieved reference item. Read-only once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceRecord {
    pub id: String,
    pub title: String,
    pub kind: SourceKind,
    pub snippet: String,
    /// 0-100
    pub relevance_score: u8,
    /// 0-100
    pub credibility_score: u8,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
    #[serde(default)]
    pub citation_count: Option<u32>,
    #[serde(default)]
    pub url: Option<String>,
}

impl SourceRecord {
    pub fn credibility_tier(&self) -> CredibilityTier {
        CredibilityTier::from_score(self.credibility_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredibilityTier {
    High,
    Good,
    Fair,
    Low,
}

impl CredibilityTier {
    pub fn from_score(score: u8) -> Self {
        match score {
            90..=u8::MAX => Self::High,
            75..=89 => Self::Good,
            60..=74 => Self::Fair,
            _ => Self::Low,
        }
    }
}

// ============================================================================
// Search
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    Documents,
    Web,
    #[default]
    Hybrid,
}

impl SearchMode {
    pub const ALL: [SearchMode; 3] = [Self::Documents, Self::Web, Self::Hybrid];

    pub fn label(self) -> &'static str {
        match self {
            Self::Documents => "Documents",
            Self::Web => "Web",
            Self::Hybrid => "Hybrid",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Self::Documents => Self::Web,
            Self::Web => Self::Hybrid,
            Self::Hybrid => Self::Documents,
        }
    }

    /// Whether a source of this kind belongs in results for this mode.
    /// Academic papers show up for both narrow modes.
    pub fn admits(self, kind: SourceKind) -> bool {
        match self {
            Self::Documents => matches!(kind, SourceKind::Document | SourceKind::Academic),
            Self::Web => matches!(kind, SourceKind::Web | SourceKind::Academic),
            Self::Hybrid => true,
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What the retrieval collaborator hands back for one query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchOutcome {
    pub sources: Vec<SourceRecord>,
    pub summary: String,
}

/// Prior research a conversation is grounded in.
#[derive(Debug, Clone, PartialEq)]
pub struct ResearchContext {
    pub query: String,
    pub sources: Vec<SourceRecord>,
    pub summary: String,
}

// ============================================================================
// Uploads
// ============================================================================

pub const PDF_MIME: &str = "application/pdf";
const FALLBACK_MIME: &str = "application/octet-stream";

/// A file offered to the uploader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHandle {
    pub name: String,
    pub path: PathBuf,
    pub mime_type: String,
    pub size_bytes: u64,
}

impl FileHandle {
    /// Build a handle from a path, reading the size when the file exists.
    pub fn from_path(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let size_bytes = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

        Self {
            name,
            path: path.to_path_buf(),
            mime_type: mime_for_path(path).to_string(),
            size_bytes,
        }
    }

    pub fn is_type(&self, mime: &str) -> bool {
        self.mime_type.eq_ignore_ascii_case(mime)
    }
}

/// Guess a MIME type from the file extension.
pub fn mime_for_path(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("pdf") => PDF_MIME,
        Some("txt") => "text/plain",
        Some("md") | Some("markdown") => "text/markdown",
        Some("html") | Some("htm") => "text/html",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("epub") => "application/epub+zip",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        _ => FALLBACK_MIME,
    }
}
