//! Search submission gate.
//!
//! Holds the query being typed, the mode, suggestions and history, and the
//! `searching` flag. The flag is a fixed display window: it clears on its own
//! timer no matter when retrieval actually answers.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use super::collaborators::Retriever;
use super::error::{CollaboratorError, Rejection};
use super::models::{SearchMode, SearchOutcome};

pub const SUGGESTIONS: [&str; 4] = [
    "climate change research",
    "artificial intelligence ethics",
    "quantum computing applications",
    "renewable energy technologies",
];

/// Most recent first.
const SEED_HISTORY: [&str; 3] = [
    "machine learning algorithms",
    "sustainable development goals",
    "neural network architectures",
];

pub const HISTORY_CAP: usize = 10;

pub const DEFAULT_DISPLAY: Duration = Duration::from_millis(1500);

/// One accepted submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTicket {
    pub id: u64,
    pub query: String,
    pub mode: SearchMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SearchSignal {
    DisplayElapsed {
        ticket: u64,
    },
    Completed {
        ticket: u64,
        outcome: Result<SearchOutcome, CollaboratorError>,
    },
}

#[derive(Debug, Clone)]
pub struct SearchGate {
    query: String,
    mode: SearchMode,
    searching: Option<u64>,
    show_suggestions: bool,
    next_ticket: u64,
    history: VecDeque<String>,
}

impl Default for SearchGate {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchGate {
    pub fn new() -> Self {
        Self {
            query: String::new(),
            mode: SearchMode::default(),
            searching: None,
            show_suggestions: true,
            next_ticket: 1,
            history: SEED_HISTORY.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: SearchMode) {
        self.mode = mode;
    }

    pub fn cycle_mode(&mut self) -> SearchMode {
        self.mode = self.mode.next();
        self.mode
    }

    pub fn is_searching(&self) -> bool {
        self.searching.is_some()
    }

    pub fn shows_suggestions(&self) -> bool {
        self.show_suggestions
    }

    pub fn suggestions(&self) -> &'static [&'static str] {
        &SUGGESTIONS
    }

    pub fn history(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.history.iter().map(String::as_str)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    /// Accept the current query under the current mode.
    pub fn submit(&mut self) -> Result<SearchTicket, Rejection> {
        let query = self.query.clone();
        self.submit_search(&query, self.mode)
    }

    /// Accept a search. The caller runs retrieval exactly once per ticket.
    pub fn submit_search(&mut self, query: &str, mode: SearchMode) -> Result<SearchTicket, Rejection> {
        let query = query.trim();
        if query.is_empty() {
            return Err(Rejection::EmptyInput);
        }
        if self.is_searching() {
            return Err(Rejection::ConcurrentSubmission);
        }

        let id = self.next_ticket;
        self.next_ticket += 1;
        self.searching = Some(id);
        self.query = query.to_string();
        self.mode = mode;
        self.push_history(query);

        log::info!("Search {id} accepted: {query:?} ({mode})");

        Ok(SearchTicket {
            id,
            query: query.to_string(),
            mode,
        })
    }

    /// End the display window for `ticket`. Returns false if it was not the
    /// active one.
    pub fn finish_display(&mut self, ticket: u64) -> bool {
        if self.searching != Some(ticket) {
            return false;
        }
        self.searching = None;
        self.show_suggestions = false;
        true
    }

    pub fn select_suggestion(&mut self, index: usize) -> bool {
        if self.is_searching() {
            return false;
        }
        match SUGGESTIONS.get(index) {
            Some(s) => {
                self.query = s.to_string();
                self.show_suggestions = false;
                true
            }
            None => false,
        }
    }

    /// Fill the query from history. Refused while a search is in flight.
    pub fn select_history(&mut self, index: usize) -> bool {
        if self.is_searching() {
            return false;
        }
        match self.history.get(index) {
            Some(entry) => {
                self.query = entry.clone();
                self.show_suggestions = false;
                true
            }
            None => false,
        }
    }

    fn push_history(&mut self, query: &str) {
        let lowered = query.to_lowercase();
        self.history.retain(|h| h.to_lowercase() != lowered);
        self.history.push_front(query.to_string());
        self.history.truncate(HISTORY_CAP);
    }
}

/// Run retrieval and the display timer side by side for one ticket.
///
/// Both signals are always sent; which arrives first depends on the
/// collaborator.
pub async fn drive_search<E>(
    ticket: SearchTicket,
    retriever: Arc<dyn Retriever>,
    display: Duration,
    tx: mpsc::UnboundedSender<E>,
) where
    E: From<SearchSignal> + Send + 'static,
{
    let id = ticket.id;

    let display_tx = tx.clone();
    let window = async move {
        tokio::time::sleep(display).await;
        let _ = display_tx.send(SearchSignal::DisplayElapsed { ticket: id }.into());
    };

    let retrieval = async move {
        let outcome = retriever.search(ticket.query, ticket.mode).await;
        if let Err(ref e) = outcome {
            log::warn!("Search {id} failed: {e}");
        }
        let _ = tx.send(SearchSignal::Completed { ticket: id, outcome }.into());
    };

    tokio::join!(window, retrieval);
}
