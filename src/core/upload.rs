//! Upload progress state machine and its async driver.
//!
//! `idle -> uploading -> success|error -> idle`. Progress climbs in fixed
//! steps on a tick, held below 100 until the processor answers, then snaps to
//! 100. After a dwell window the terminal state resets to idle on its own.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, MissedTickBehavior};
use url::Url;

use super::collaborators::UploadProcessor;
use super::error::{CollaboratorError, Rejection};
use super::models::{FileHandle, PDF_MIME};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadStatus {
    Idle,
    Uploading,
    Success,
    Error,
}

impl UploadStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Success | Self::Error)
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::Idle => "Drop PDF files here or type a path to browse",
            Self::Uploading => "Processing document...",
            Self::Success => "Document uploaded successfully!",
            Self::Error => "Upload failed. Please try again.",
        }
    }
}

/// What files are accepted and how fast simulated progress moves.
#[derive(Debug, Clone)]
pub struct UploadPolicy {
    pub accepted_mime: String,
    pub step: u8,
    /// Highest progress reachable before the processor confirms.
    pub cap: u8,
}

impl Default for UploadPolicy {
    fn default() -> Self {
        Self {
            accepted_mime: PDF_MIME.to_string(),
            step: 10,
            cap: 90,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct UploadTiming {
    pub tick: Duration,
    pub dwell: Duration,
}

impl Default for UploadTiming {
    fn default() -> Self {
        Self {
            tick: Duration::from_millis(200),
            dwell: Duration::from_millis(2000),
        }
    }
}

/// Handed out by `select`, consumed by `drive_upload`.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTicket {
    pub task_id: u64,
    pub files: Vec<FileHandle>,
}

/// Signals emitted by the driver task, applied by the state owner.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadSignal {
    Tick {
        task_id: u64,
    },
    Finished {
        task_id: u64,
        outcome: Result<(), CollaboratorError>,
    },
    Expired {
        task_id: u64,
    },
}

/// Effect of applying one signal.
#[derive(Debug, Clone, PartialEq)]
pub enum UploadTransition {
    Ignored,
    Progressed(u8),
    /// Files to hand to the `on_upload` callback.
    Succeeded(Vec<FileHandle>),
    Failed(String),
    Reset,
}

#[derive(Debug, Clone)]
pub struct UploadTask {
    files: Vec<FileHandle>,
    status: UploadStatus,
    progress: u8,
    task_id: u64,
    next_task_id: u64,
    last_error: Option<String>,
    policy: UploadPolicy,
}

impl Default for UploadTask {
    fn default() -> Self {
        Self::new(UploadPolicy::default())
    }
}

impl UploadTask {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            files: Vec::new(),
            status: UploadStatus::Idle,
            progress: 0,
            task_id: 0,
            next_task_id: 1,
            last_error: None,
            policy,
        }
    }

    pub fn status(&self) -> UploadStatus {
        self.status
    }

    pub fn progress(&self) -> u8 {
        self.progress
    }

    pub fn files(&self) -> &[FileHandle] {
        &self.files
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn policy(&self) -> &UploadPolicy {
        &self.policy
    }

    fn cap(&self) -> u8 {
        self.policy.cap.min(99)
    }

    /// Offer files. Only accepted types are kept; nothing happens unless at
    /// least one survives and the machine is idle.
    pub fn select(&mut self, files: Vec<FileHandle>) -> Result<UploadTicket, Rejection> {
        if self.status != UploadStatus::Idle {
            return Err(Rejection::ConcurrentSubmission);
        }

        let offered = files.len();
        let accepted: Vec<FileHandle> = files
            .into_iter()
            .filter(|f| f.is_type(&self.policy.accepted_mime))
            .collect();

        if accepted.is_empty() {
            log::debug!("No accepted files among {offered} offered");
            return Err(Rejection::NoAcceptedFiles);
        }

        self.task_id = self.next_task_id;
        self.next_task_id += 1;
        self.status = UploadStatus::Uploading;
        self.progress = 0;
        self.last_error = None;
        self.files = accepted.clone();

        log::info!(
            "Upload {} started with {} of {offered} file(s)",
            self.task_id,
            accepted.len()
        );

        Ok(UploadTicket {
            task_id: self.task_id,
            files: accepted,
        })
    }

    pub fn apply(&mut self, signal: UploadSignal) -> UploadTransition {
        match signal {
            UploadSignal::Tick { task_id } => self.on_tick(task_id),
            UploadSignal::Finished { task_id, outcome } => self.finish(task_id, outcome),
            UploadSignal::Expired { task_id } => self.expire(task_id),
        }
    }

    fn is_current(&self, task_id: u64) -> bool {
        task_id == self.task_id && self.status != UploadStatus::Idle
    }

    fn on_tick(&mut self, task_id: u64) -> UploadTransition {
        if !self.is_current(task_id) || self.status != UploadStatus::Uploading {
            return UploadTransition::Ignored;
        }
        let cap = self.cap();
        if self.progress >= cap {
            return UploadTransition::Ignored;
        }
        self.progress = self.progress.saturating_add(self.policy.step.max(1)).min(cap);
        UploadTransition::Progressed(self.progress)
    }

    fn finish(
        &mut self,
        task_id: u64,
        outcome: Result<(), CollaboratorError>,
    ) -> UploadTransition {
        if !self.is_current(task_id) || self.status != UploadStatus::Uploading {
            return UploadTransition::Ignored;
        }

        self.progress = 100;
        match outcome {
            Ok(()) => {
                self.status = UploadStatus::Success;
                log::info!("Upload {task_id} succeeded");
                UploadTransition::Succeeded(self.files.clone())
            }
            Err(e) => {
                self.status = UploadStatus::Error;
                log::warn!("Upload {task_id} failed: {e}");
                let message = e.to_string();
                self.last_error = Some(message.clone());
                UploadTransition::Failed(message)
            }
        }
    }

    fn expire(&mut self, task_id: u64) -> UploadTransition {
        if !self.is_current(task_id) || !self.status.is_terminal() {
            return UploadTransition::Ignored;
        }
        self.status = UploadStatus::Idle;
        self.progress = 0;
        self.files.clear();
        log::debug!("Upload {task_id} reset to idle");
        UploadTransition::Reset
    }
}

/// Split pasted or dropped text into file paths.
///
/// Terminals deliver a drag-and-drop as a paste of one or more paths,
/// separated by whitespace or newlines, sometimes quoted and sometimes with
/// backslash-escaped spaces. `file://` URIs are decoded to paths.
pub fn parse_dropped_paths(text: &str) -> Vec<PathBuf> {
    let mut paths = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match (quote, c) {
            (Some(q), c) if c == q => quote = None,
            (Some(_), c) => current.push(c),
            (None, '\\') => {
                if let Some(next) = chars.next() {
                    current.push(next);
                }
            }
            (None, '\'' | '"') => quote = Some(c),
            (None, c) if c.is_whitespace() => {
                if !current.is_empty() {
                    paths.push(std::mem::take(&mut current));
                }
            }
            (None, c) => current.push(c),
        }
    }
    if !current.is_empty() {
        paths.push(current);
    }

    paths.into_iter().map(|p| dropped_path(&p)).collect()
}

/// File managers drop percent-encoded `file://` URIs; anything else is a
/// plain path.
fn dropped_path(entry: &str) -> PathBuf {
    if !entry.starts_with("file://") {
        return PathBuf::from(entry);
    }
    match Url::parse(entry).map(|u| u.to_file_path()) {
        Ok(Ok(path)) => path,
        _ => {
            log::debug!("Unresolvable file URI {entry:?}, using it verbatim");
            PathBuf::from(entry.trim_start_matches("file://"))
        }
    }
}

/// Run one upload: tick until the processor answers, report the outcome,
/// then report expiry after the dwell window.
///
/// Stops early if the receiving side has gone away.
pub async fn drive_upload<E>(
    ticket: UploadTicket,
    processor: Arc<dyn UploadProcessor>,
    timing: UploadTiming,
    tx: mpsc::UnboundedSender<E>,
) where
    E: From<UploadSignal> + Send + 'static,
{
    let task_id = ticket.task_id;
    let processing = processor.process_upload(ticket.files);
    tokio::pin!(processing);

    let mut ticker = tokio::time::interval_at(Instant::now() + timing.tick, timing.tick);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let outcome = loop {
        tokio::select! {
            biased;
            outcome = &mut processing => break outcome,
            _ = ticker.tick() => {
                if tx.send(UploadSignal::Tick { task_id }.into()).is_err() {
                    return;
                }
            }
        }
    };

    if tx
        .send(UploadSignal::Finished { task_id, outcome }.into())
        .is_err()
    {
        return;
    }

    tokio::time::sleep(timing.dwell).await;
    let _ = tx.send(UploadSignal::Expired { task_id }.into());
}
