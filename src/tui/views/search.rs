//! Search bar: query input, mode selector, suggestions.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use super::super::theme;
use super::{spinner, InputMode};
use crate::core::error::Rejection;
use crate::core::models::SearchMode;
use crate::core::search::{SearchGate, SearchTicket};
use crate::tui::widgets::input_buffer::InputBuffer;

/// What the search bar did with an input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchInput {
    Ignored,
    Consumed,
    Submitted(SearchTicket),
}

pub struct SearchViewState {
    gate: SearchGate,
    input: InputBuffer,
    input_mode: InputMode,
    suggestion_cursor: usize,
}

impl Default for SearchViewState {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchViewState {
    pub fn new() -> Self {
        Self {
            gate: SearchGate::new(),
            input: InputBuffer::new(),
            input_mode: InputMode::Normal,
            suggestion_cursor: 0,
        }
    }

    pub fn gate(&self) -> &SearchGate {
        &self.gate
    }

    pub fn gate_mut(&mut self) -> &mut SearchGate {
        &mut self.gate
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn input_text(&self) -> &str {
        self.input.text()
    }

    fn suggestions_visible(&self) -> bool {
        self.gate.shows_suggestions() && !self.gate.is_searching()
    }

    /// Submit whatever is in the input under the current mode.
    pub fn submit(&mut self) -> Result<SearchTicket, Rejection> {
        if self.gate.is_searching() {
            return Err(Rejection::ConcurrentSubmission);
        }
        self.gate.set_query(self.input.text());
        let ticket = self.gate.submit()?;
        self.input.set(ticket.query.clone());
        self.input_mode = InputMode::Normal;
        Ok(ticket)
    }

    /// Re-run a history entry.
    pub fn rerun_history(&mut self, index: usize) -> Result<SearchTicket, Rejection> {
        if self.gate.is_searching() {
            return Err(Rejection::ConcurrentSubmission);
        }
        if !self.gate.select_history(index) {
            return Err(Rejection::EmptyInput);
        }
        self.input.set(self.gate.query().to_string());
        self.submit()
    }

    fn pick_suggestion(&mut self) {
        if self.gate.select_suggestion(self.suggestion_cursor) {
            self.input.set(self.gate.query().to_string());
            self.input_mode = InputMode::Insert;
        }
    }

    // ── Input handling ───────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> SearchInput {
        if let Event::Paste(text) = event {
            if self.input_mode == InputMode::Insert {
                self.input.insert_str(text);
                return SearchInput::Consumed;
            }
            return SearchInput::Ignored;
        }

        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return SearchInput::Ignored;
        };

        match self.input_mode {
            InputMode::Insert => self.handle_insert_input(*code, *modifiers),
            InputMode::Normal => self.handle_normal_input(*code, *modifiers),
        }
    }

    fn handle_insert_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> SearchInput {
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return SearchInput::Ignored,
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => return SearchInput::Ignored,
            _ => {}
        }

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => {
                self.input_mode = InputMode::Normal;
            }
            (KeyModifiers::NONE, KeyCode::Enter) => match self.submit() {
                Ok(ticket) => return SearchInput::Submitted(ticket),
                Err(reason) => log::debug!("Search not submitted: {reason}"),
            },
            (KeyModifiers::CONTROL, KeyCode::Char('t')) => {
                self.gate.cycle_mode();
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => self.input.backspace(),
            (KeyModifiers::NONE, KeyCode::Delete) => self.input.delete(),
            (KeyModifiers::NONE, KeyCode::Left) => self.input.move_left(),
            (KeyModifiers::NONE, KeyCode::Right) => self.input.move_right(),
            (KeyModifiers::NONE, KeyCode::Home) | (KeyModifiers::CONTROL, KeyCode::Char('a')) => {
                self.input.move_home()
            }
            (KeyModifiers::NONE, KeyCode::End) | (KeyModifiers::CONTROL, KeyCode::Char('e')) => {
                self.input.move_end()
            }
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.input.clear(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input.insert_char(c)
            }
            _ => {}
        }
        SearchInput::Consumed
    }

    fn handle_normal_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> SearchInput {
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return SearchInput::Ignored;
        }

        match code {
            KeyCode::Char('i') | KeyCode::Char('/') | KeyCode::Enter => {
                self.input_mode = InputMode::Insert;
            }
            KeyCode::Char('m') => {
                self.gate.cycle_mode();
            }
            KeyCode::Char('j') | KeyCode::Down if self.suggestions_visible() => {
                self.suggestion_cursor = (self.suggestion_cursor + 1) % self.gate.suggestions().len();
            }
            KeyCode::Char('k') | KeyCode::Up if self.suggestions_visible() => {
                let len = self.gate.suggestions().len();
                self.suggestion_cursor = (self.suggestion_cursor + len - 1) % len;
            }
            KeyCode::Char('s') if self.suggestions_visible() => self.pick_suggestion(),
            _ => return SearchInput::Ignored,
        }
        SearchInput::Consumed
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, tick: u64) {
        let chunks = Layout::vertical([
            Constraint::Length(3), // Input
            Constraint::Length(1), // Modes
            Constraint::Length(2), // Status
            Constraint::Min(1),    // Suggestions
            Constraint::Length(1), // Help
        ])
        .split(area);

        self.render_input(frame, chunks[0], tick);
        self.render_modes(frame, chunks[1]);
        self.render_status(frame, chunks[2], tick);
        if self.suggestions_visible() {
            self.render_suggestions(frame, chunks[3]);
        }
        self.render_help(frame, chunks[4]);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, tick: u64) {
        let editing = self.input_mode == InputMode::Insert;
        let border = if editing { theme::ACCENT } else { theme::TEXT_MUTED };
        let title = if editing {
            " Search (Esc to exit) "
        } else {
            " Search "
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(title)
            .title(
                Line::styled(
                    format!(" {} ", self.gate.mode()),
                    Style::default().fg(theme::PRIMARY_LIGHT),
                )
                .alignment(Alignment::Right),
            );
        if self.gate.is_searching() {
            block = block.title_bottom(Line::styled(
                format!(" {} searching... ", spinner(tick)),
                Style::default().fg(theme::PRIMARY_LIGHT),
            ));
        }

        let line = self.input.line(
            editing,
            "Search your documents and the web... (i to type)",
        );
        frame.render_widget(Paragraph::new(line).block(block), area);
    }

    fn render_modes(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::styled(" Mode: ", theme::muted())];
        for mode in SearchMode::ALL {
            let style = if mode == self.gate.mode() {
                Style::default()
                    .fg(theme::BG_BASE)
                    .bg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD)
            } else {
                theme::muted()
            };
            spans.push(Span::styled(format!(" {} ", mode.label()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, tick: u64) {
        let line = if self.gate.is_searching() {
            Line::styled(
                format!(
                    " {} Searching {} sources for \"{}\"",
                    spinner(tick),
                    self.gate.mode().label().to_lowercase(),
                    self.gate.query()
                ),
                Style::default().fg(theme::PRIMARY_LIGHT),
            )
        } else {
            Line::raw("")
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_suggestions(&self, frame: &mut Frame, area: Rect) {
        let mut lines = vec![Line::styled(" Popular searches", theme::heading())];
        for (i, suggestion) in self.gate.suggestions().iter().enumerate() {
            let (prefix, style) = if i == self.suggestion_cursor {
                ("▸ ", theme::highlight())
            } else {
                ("  ", Style::default().fg(theme::TEXT))
            };
            lines.push(Line::styled(format!(" {prefix}{suggestion}"), style));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_help(&self, frame: &mut Frame, area: Rect) {
        let help = Line::from(vec![
            Span::styled("i", theme::key_hint()),
            Span::raw(":type "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":search "),
            Span::styled("m/Ctrl+T", theme::key_hint()),
            Span::raw(":mode "),
            Span::styled("j/k s", theme::key_hint()),
            Span::raw(":suggestion"),
        ]);
        frame.render_widget(Paragraph::new(help), area);
    }
}
