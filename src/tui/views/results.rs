//! Ranked sources, the summary, and the discussion tab built on them.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use super::super::theme;
use super::conversation::ConversationView;
use super::{spinner, InputMode};
use crate::core::error::CollaboratorError;
use crate::core::models::{CredibilityTier, SearchMode, SearchOutcome, SourceRecord};
use crate::core::results::{ResultsState, ResultsStatus, ResultsTab};
use crate::tui::services::Services;

fn tier_label(tier: CredibilityTier) -> &'static str {
    match tier {
        CredibilityTier::High => "High credibility",
        CredibilityTier::Good => "Good credibility",
        CredibilityTier::Fair => "Fair credibility",
        CredibilityTier::Low => "Low credibility",
    }
}

pub struct ResultsViewState {
    results: ResultsState,
    discussion: ConversationView,
}

impl Default for ResultsViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsViewState {
    pub fn new() -> Self {
        Self {
            results: ResultsState::new(),
            discussion: ConversationView::new(),
        }
    }

    pub fn results(&self) -> &ResultsState {
        &self.results
    }

    pub fn results_mut(&mut self) -> &mut ResultsState {
        &mut self.results
    }

    /// Insert mode of the discussion composer, if that tab is showing.
    pub fn input_mode(&self) -> InputMode {
        match self.results.tab() {
            ResultsTab::Discussion => self.discussion.input_mode(),
            ResultsTab::Results => InputMode::Normal,
        }
    }

    pub fn begin(&mut self, ticket: u64, query: &str, mode: SearchMode) {
        self.results.begin(ticket, query, mode);
    }

    /// Land a search outcome. A fresh result set starts a fresh discussion.
    pub fn apply(&mut self, ticket: u64, outcome: Result<SearchOutcome, CollaboratorError>) -> bool {
        let fresh = outcome.is_ok();
        let applied = self.results.apply(ticket, outcome);
        if applied && fresh {
            self.discussion.reset();
        }
        applied
    }

    pub fn resolve_reply(
        &mut self,
        placeholder_id: &str,
        outcome: Result<String, CollaboratorError>,
    ) -> bool {
        self.results.discussion_mut().resolve(placeholder_id, outcome)
    }

    // ── Input handling ───────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event, services: &Services) -> bool {
        if self.results.tab() == ResultsTab::Discussion {
            let (results, discussion) = (&mut self.results, &mut self.discussion);
            if discussion.handle_input(event, results.discussion_mut(), services) {
                return true;
            }
        }

        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };
        if *modifiers != KeyModifiers::NONE && *modifiers != KeyModifiers::SHIFT {
            return false;
        }

        match code {
            KeyCode::Char('t') | KeyCode::Char(']') | KeyCode::Char('[') => {
                self.results.toggle_tab();
                true
            }
            KeyCode::Char('d') if self.results.status() == &ResultsStatus::Ready => {
                self.results.set_tab(ResultsTab::Discussion);
                true
            }
            KeyCode::Char('j') | KeyCode::Down if self.results.tab() == ResultsTab::Results => {
                self.results.select_next();
                true
            }
            KeyCode::Char('k') | KeyCode::Up if self.results.tab() == ResultsTab::Results => {
                self.results.select_prev();
                true
            }
            _ => false,
        }
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, tick: u64) {
        let chunks = Layout::vertical([
            Constraint::Length(2), // Query header
            Constraint::Length(1), // Tabs
            Constraint::Min(1),
        ])
        .split(area);

        self.render_header(frame, chunks[0]);

        let selected = match self.results.tab() {
            ResultsTab::Results => 0,
            ResultsTab::Discussion => 1,
        };
        let tabs = Tabs::new(vec![
            ResultsTab::Results.label(),
            ResultsTab::Discussion.label(),
        ])
        .select(selected)
        .style(theme::muted())
        .highlight_style(theme::highlight())
        .divider("│");
        frame.render_widget(tabs, chunks[1]);

        match self.results.tab() {
            ResultsTab::Results => self.render_results(frame, chunks[2], tick),
            ResultsTab::Discussion => {
                self.discussion
                    .render(frame, chunks[2], self.results.discussion(), tick)
            }
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let lines = if self.results.query().is_empty() {
            vec![Line::styled(" No search yet", theme::muted())]
        } else {
            vec![
                Line::from(vec![
                    Span::styled(" Results for ", theme::muted()),
                    Span::styled(format!("\"{}\"", self.results.query()), theme::title()),
                    Span::styled(format!("  ({})", self.results.mode()), theme::muted()),
                ]),
                Line::styled(
                    format!(" Found {} relevant sources", self.results.sources().len()),
                    theme::dim(),
                ),
            ]
        };
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_results(&self, frame: &mut Frame, area: Rect, tick: u64) {
        match self.results.status() {
            ResultsStatus::Empty => {
                let p = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled("Run a search to see ranked sources here.", theme::muted()),
                ])
                .alignment(Alignment::Center);
                frame.render_widget(p, area);
            }
            ResultsStatus::Loading => {
                let p = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        format!("{} Gathering sources...", spinner(tick)),
                        Style::default().fg(theme::PRIMARY_LIGHT),
                    ),
                ])
                .alignment(Alignment::Center);
                frame.render_widget(p, area);
            }
            ResultsStatus::Failed(message) => {
                let p = Paragraph::new(vec![
                    Line::raw(""),
                    Line::styled(
                        "Search failed",
                        Style::default().fg(theme::ERROR).add_modifier(Modifier::BOLD),
                    ),
                    Line::styled(message.clone(), theme::muted()),
                ])
                .alignment(Alignment::Center);
                frame.render_widget(p, area);
            }
            ResultsStatus::Ready => {
                let cols = Layout::horizontal([
                    Constraint::Percentage(45),
                    Constraint::Percentage(55),
                ])
                .split(area);
                self.render_source_list(frame, cols[0]);

                let right = Layout::vertical([Constraint::Percentage(50), Constraint::Percentage(50)])
                    .split(cols[1]);
                self.render_summary(frame, right[0]);
                self.render_source_detail(frame, right[1]);
            }
        }
    }

    fn render_source_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .results
            .sources()
            .iter()
            .map(|s| {
                ListItem::new(vec![
                    Line::styled(s.title.clone(), Style::default().fg(theme::TEXT)),
                    Line::from(vec![
                        Span::styled(
                            format!(" {} ", s.kind.label()),
                            Style::default().fg(theme::source_kind(s.kind)),
                        ),
                        Span::styled(format!("{}% relevant", s.relevance_score), theme::muted()),
                    ]),
                ])
            })
            .collect();

        let list = List::new(items)
            .block(theme::block_focused("Sources"))
            .highlight_style(Style::default().add_modifier(Modifier::BOLD).fg(theme::ACCENT))
            .highlight_symbol("▸ ");

        let mut state = ListState::default().with_selected(Some(self.results.selected_index()));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_summary(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_default("AI Research Summary").title_bottom(Line::styled(
            format!(" {} ", self.results.footer()),
            theme::dim(),
        ));
        frame.render_widget(
            Paragraph::new(self.results.summary().to_string())
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    }

    fn render_source_detail(&self, frame: &mut Frame, area: Rect) {
        let block = theme::block_default("Source");
        let Some(source) = self.results.selected() else {
            frame.render_widget(block, area);
            return;
        };
        frame.render_widget(
            Paragraph::new(source_detail_lines(source))
                .wrap(Wrap { trim: true })
                .block(block),
            area,
        );
    }
}

fn source_detail_lines(source: &SourceRecord) -> Vec<Line<'static>> {
    let tier = source.credibility_tier();
    let mut lines = vec![
        Line::styled(source.title.clone(), theme::title()),
        Line::from(vec![
            Span::styled(
                format!("{} ", source.kind.label()),
                Style::default().fg(theme::source_kind(source.kind)),
            ),
            Span::styled(
                format!("{} ({}%)", tier_label(tier), source.credibility_score),
                Style::default().fg(theme::credibility(tier)),
            ),
        ]),
    ];

    let mut meta = Vec::new();
    if let Some(ref author) = source.author {
        meta.push(author.clone());
    }
    if let Some(ref date) = source.published_date {
        meta.push(date.clone());
    }
    if let Some(citations) = source.citation_count {
        meta.push(format!("{citations} citations"));
    }
    if !meta.is_empty() {
        lines.push(Line::styled(meta.join(" · "), theme::muted()));
    }

    lines.push(Line::raw(""));
    lines.push(Line::raw(source.snippet.clone()));

    if let Some(ref url) = source.url {
        lines.push(Line::raw(""));
        lines.push(Line::styled(url.clone(), Style::default().fg(theme::INFO)));
    }
    lines
}
