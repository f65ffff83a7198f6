//! Results of the most recent search and the discussion built on them.

use super::conversation::Conversation;
use super::error::CollaboratorError;
use super::models::{ResearchContext, SearchMode, SearchOutcome, SourceRecord};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsStatus {
    Empty,
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResultsTab {
    #[default]
    Results,
    Discussion,
}

impl ResultsTab {
    pub fn label(self) -> &'static str {
        match self {
            Self::Results => "Research Results",
            Self::Discussion => "Continue Discussion",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Self::Results => Self::Discussion,
            Self::Discussion => Self::Results,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ResultsState {
    ticket: Option<u64>,
    query: String,
    mode: SearchMode,
    status: ResultsStatus,
    sources: Vec<SourceRecord>,
    summary: String,
    selected: usize,
    tab: ResultsTab,
    discussion: Conversation,
}

impl Default for ResultsState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsState {
    pub fn new() -> Self {
        Self {
            ticket: None,
            query: String::new(),
            mode: SearchMode::default(),
            status: ResultsStatus::Empty,
            sources: Vec::new(),
            summary: String::new(),
            selected: 0,
            tab: ResultsTab::default(),
            discussion: Conversation::new(),
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn status(&self) -> &ResultsStatus {
        &self.status
    }

    pub fn sources(&self) -> &[SourceRecord] {
        &self.sources
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn footer(&self) -> String {
        format!("Generated from {} sources", self.sources.len())
    }

    pub fn tab(&self) -> ResultsTab {
        self.tab
    }

    pub fn set_tab(&mut self, tab: ResultsTab) {
        self.tab = tab;
    }

    pub fn toggle_tab(&mut self) -> ResultsTab {
        self.tab = self.tab.toggle();
        self.tab
    }

    pub fn discussion(&self) -> &Conversation {
        &self.discussion
    }

    pub fn discussion_mut(&mut self) -> &mut Conversation {
        &mut self.discussion
    }

    pub fn selected(&self) -> Option<&SourceRecord> {
        self.sources.get(self.selected)
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    pub fn select_next(&mut self) {
        if !self.sources.is_empty() {
            self.selected = (self.selected + 1) % self.sources.len();
        }
    }

    pub fn select_prev(&mut self) {
        if !self.sources.is_empty() {
            self.selected = self
                .selected
                .checked_sub(1)
                .unwrap_or(self.sources.len() - 1);
        }
    }

    /// Start waiting on `ticket`. Any older ticket is superseded.
    pub fn begin(&mut self, ticket: u64, query: &str, mode: SearchMode) {
        self.ticket = Some(ticket);
        self.query = query.to_string();
        self.mode = mode;
        self.status = ResultsStatus::Loading;
        self.tab = ResultsTab::Results;
        self.sources.clear();
        self.summary.clear();
        self.selected = 0;
        self.discussion = Conversation::new();
    }

    /// Land the outcome for `ticket`. Returns false for a stale ticket.
    pub fn apply(
        &mut self,
        ticket: u64,
        outcome: Result<SearchOutcome, CollaboratorError>,
    ) -> bool {
        if self.ticket != Some(ticket) {
            log::debug!("Dropping results for superseded search {ticket}");
            return false;
        }

        match outcome {
            Ok(outcome) => {
                let mut sources = outcome.sources;
                // stable: equal scores keep retrieval order
                sources.sort_by(|a, b| b.relevance_score.cmp(&a.relevance_score));

                self.discussion = Conversation::with_context(ResearchContext {
                    query: self.query.clone(),
                    sources: sources.clone(),
                    summary: outcome.summary.clone(),
                });
                self.sources = sources;
                self.summary = outcome.summary;
                self.selected = 0;
                self.status = ResultsStatus::Ready;
            }
            Err(e) => {
                self.status = ResultsStatus::Failed(e.to_string());
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::SourceKind;
    use crate::core::simulated::sample_sources;

    fn source(id: &str, relevance: u8) -> SourceRecord {
        SourceRecord {
            id: id.into(),
            title: format!("Source {id}"),
            kind: SourceKind::Web,
            snippet: String::new(),
            relevance_score: relevance,
            credibility_score: 70,
            author: None,
            published_date: None,
            citation_count: None,
            url: None,
        }
    }

    #[test]
    fn test_begin_then_apply_ready() {
        let mut results = ResultsState::new();
        assert_eq!(results.status(), &ResultsStatus::Empty);

        results.begin(1, "ai climate", SearchMode::Hybrid);
        assert_eq!(results.status(), &ResultsStatus::Loading);

        let applied = results.apply(
            1,
            Ok(SearchOutcome {
                sources: sample_sources(),
                summary: "summary".into(),
            }),
        );
        assert!(applied);
        assert_eq!(results.status(), &ResultsStatus::Ready);
        assert_eq!(results.footer(), "Generated from 3 sources");
        assert_eq!(results.discussion().len(), 1);
        assert_eq!(
            results.discussion().context().map(|c| c.query.as_str()),
            Some("ai climate")
        );
    }

    #[test]
    fn test_sources_sorted_by_relevance_stably() {
        let mut results = ResultsState::new();
        results.begin(1, "q", SearchMode::Web);
        results.apply(
            1,
            Ok(SearchOutcome {
                sources: vec![source("a", 50), source("b", 90), source("c", 50), source("d", 70)],
                summary: String::new(),
            }),
        );
        let ids: Vec<_> = results.sources().iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn test_stale_ticket_ignored() {
        let mut results = ResultsState::new();
        results.begin(1, "old", SearchMode::Hybrid);
        results.begin(2, "new", SearchMode::Hybrid);

        assert!(!results.apply(1, Ok(SearchOutcome::default())));
        assert_eq!(results.status(), &ResultsStatus::Loading);
        assert_eq!(results.query(), "new");
    }

    #[test]
    fn test_failure_keeps_message() {
        let mut results = ResultsState::new();
        results.begin(4, "q", SearchMode::Hybrid);
        results.apply(4, Err(CollaboratorError::Retrieval("offline".into())));
        assert_eq!(
            results.status(),
            &ResultsStatus::Failed("Retrieval failed: offline".into())
        );
    }

    fn ready(results: &mut ResultsState, ticket: u64, query: &str) {
        results.begin(ticket, query, SearchMode::Hybrid);
        results.apply(
            ticket,
            Ok(SearchOutcome {
                sources: sample_sources(),
                summary: "old summary".into(),
            }),
        );
    }

    #[test]
    fn test_begin_after_ready_drops_previous_results() {
        let mut results = ResultsState::new();
        ready(&mut results, 1, "old query");
        results.select_next();

        results.begin(2, "new query", SearchMode::Web);
        assert_eq!(results.status(), &ResultsStatus::Loading);
        assert_eq!(results.query(), "new query");
        assert!(results.sources().is_empty());
        assert!(results.summary().is_empty());
        assert_eq!(results.selected_index(), 0);
        assert!(results.selected().is_none());
        assert!(results.discussion().context().is_none());
        assert!(results.discussion().is_empty());
    }

    #[test]
    fn test_failure_after_ready_keeps_nothing_from_previous_search() {
        let mut results = ResultsState::new();
        ready(&mut results, 1, "old query");

        results.begin(2, "new query", SearchMode::Hybrid);
        results.apply(2, Err(CollaboratorError::Retrieval("offline".into())));
        assert!(matches!(results.status(), ResultsStatus::Failed(_)));
        assert!(results.sources().is_empty());
        assert_eq!(results.footer(), "Generated from 0 sources");
        assert!(results.discussion().context().is_none());
    }

    #[test]
    fn test_selection_wraps() {
        let mut results = ResultsState::new();
        results.select_next();
        assert!(results.selected().is_none());

        results.begin(1, "q", SearchMode::Hybrid);
        results.apply(
            1,
            Ok(SearchOutcome {
                sources: vec![source("a", 10), source("b", 20)],
                summary: String::new(),
            }),
        );
        assert_eq!(results.selected().map(|s| s.id.as_str()), Some("b"));
        results.select_prev();
        assert_eq!(results.selected_index(), 1);
        results.select_next();
        assert_eq!(results.selected_index(), 0);
    }

    #[test]
    fn test_tab_toggle_and_reset_on_begin() {
        let mut results = ResultsState::new();
        assert_eq!(results.toggle_tab(), ResultsTab::Discussion);
        results.begin(1, "q", SearchMode::Hybrid);
        assert_eq!(results.tab(), ResultsTab::Results);
    }
}
