use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::config::AppConfig;
use crate::core::collaborators::{
    log_uploaded_files, OnUpload, ReplyGenerator, Retriever, UploadProcessor,
};
use crate::core::conversation::{request_reply, PendingExchange};
use crate::core::latency::{Fixed, Jittered};
use crate::core::models::ResearchContext;
use crate::core::search::{drive_search, SearchTicket};
use crate::core::simulated::{
    SimulatedReplyGenerator, SimulatedRetriever, SimulatedUploadProcessor,
};
use crate::core::upload::{drive_upload, UploadTicket, UploadTiming};

use super::clipboard::{Clipboard, Osc52Clipboard};
use super::events::{AppEvent, Notification, NotificationLevel};

/// Centralized handle to the collaborators and the event channel.
///
/// Views never mutate state from background work; every spawn here reports
/// back through `event_tx`.
#[derive(Clone)]
pub struct Services {
    pub retriever: Arc<dyn Retriever>,
    pub replies: Arc<dyn ReplyGenerator>,
    pub uploads: Arc<dyn UploadProcessor>,
    pub on_upload: OnUpload,
    pub clipboard: Arc<dyn Clipboard>,
    pub search_display: Duration,
    pub upload_timing: UploadTiming,
    pub event_tx: mpsc::UnboundedSender<AppEvent>,
}

impl Services {
    /// Wire the simulated collaborators from config.
    pub fn simulated(config: &AppConfig, event_tx: mpsc::UnboundedSender<AppEvent>) -> Self {
        let sim = &config.simulation;
        log::info!(
            "Initializing simulated services (search {}ms, reply {}+{}ms, upload {}ms)",
            sim.search_latency_ms,
            sim.reply_base_ms,
            sim.reply_jitter_ms,
            sim.upload_processing_ms
        );

        Self {
            retriever: Arc::new(SimulatedRetriever::new(Arc::new(Fixed::millis(
                sim.search_latency_ms,
            )))),
            replies: Arc::new(SimulatedReplyGenerator::new(
                Arc::new(Jittered::millis(sim.reply_base_ms, sim.reply_jitter_ms)),
                sim.reply_failure_rate,
            )),
            uploads: Arc::new(SimulatedUploadProcessor::new(
                Arc::new(Fixed::millis(sim.upload_processing_ms)),
                sim.upload_failure_rate,
            )),
            on_upload: log_uploaded_files(),
            clipboard: Arc::new(Osc52Clipboard),
            search_display: config.search_display(),
            upload_timing: config.upload_timing(),
            event_tx,
        }
    }

    pub fn spawn_search(&self, ticket: SearchTicket) {
        tokio::spawn(drive_search(
            ticket,
            self.retriever.clone(),
            self.search_display,
            self.event_tx.clone(),
        ));
    }

    pub fn spawn_reply(&self, exchange: PendingExchange, context: Option<ResearchContext>) {
        let generator = self.replies.clone();
        let tx = self.event_tx.clone();

        tokio::spawn(async move {
            let outcome = request_reply(generator, &exchange, context).await;
            let _ = tx.send(AppEvent::ReplyReady {
                placeholder_id: exchange.placeholder_id,
                outcome,
            });
        });
    }

    pub fn spawn_upload(&self, ticket: UploadTicket) {
        tokio::spawn(drive_upload(
            ticket,
            self.uploads.clone(),
            self.upload_timing,
            self.event_tx.clone(),
        ));
    }

    pub fn copy_to_clipboard(&self, text: &str) {
        match self.clipboard.copy(text) {
            Ok(()) => self.notify("Copied to clipboard", NotificationLevel::Success),
            Err(e) => {
                log::warn!("Clipboard copy failed: {e}");
                self.notify("Could not copy to clipboard", NotificationLevel::Error);
            }
        }
    }

    pub fn notify(&self, message: impl Into<String>, level: NotificationLevel) {
        let _ = self
            .event_tx
            .send(AppEvent::Notification(Notification::new(message, level)));
    }
}
