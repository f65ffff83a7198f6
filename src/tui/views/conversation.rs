//! Discussion panel: transcript display, composer and follow-up suggestions.
//!
//! The transcript itself lives in `core::conversation::Conversation`; this
//! view only owns editing and scrolling state.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
    Frame,
};

use super::super::theme;
use super::{spinner, InputMode};
use crate::core::conversation::Conversation;
use crate::core::error::Rejection;
use crate::core::models::{ConversationTurn, TurnRole};
use crate::tui::events::NotificationLevel;
use crate::tui::services::Services;
use crate::tui::widgets::input_buffer::InputBuffer;

pub const THINKING: &str = "AI is thinking";

// ============================================================================
// Transcript lines
// ============================================================================

fn role_header(turn: &ConversationTurn) -> Line<'static> {
    let (label, color) = match turn.role {
        TurnRole::User => ("You", theme::SUCCESS),
        TurnRole::Assistant => ("Research Assistant", theme::PRIMARY_LIGHT),
    };
    Line::from(vec![
        Span::styled(
            format!("── {label} ──"),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" {}", turn.created_at.format("%H:%M")),
            theme::dim(),
        ),
    ])
}

/// Greedy word wrap. Words longer than `width` are split.
pub(crate) fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut out = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word = word;
            while word.chars().count() > width {
                if !line.is_empty() {
                    out.push(std::mem::take(&mut line));
                }
                let split = word
                    .char_indices()
                    .nth(width)
                    .map(|(i, _)| i)
                    .unwrap_or(word.len());
                out.push(word[..split].to_string());
                word = &word[split..];
            }
            if word.is_empty() {
                continue;
            }

            let needed = if line.is_empty() {
                word.chars().count()
            } else {
                line.chars().count() + 1 + word.chars().count()
            };
            if needed > width {
                out.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        out.push(line);
    }
    out
}

fn turn_lines(turn: &ConversationTurn, width: usize, tick: u64) -> Vec<Line<'static>> {
    let mut out = vec![role_header(turn)];

    if turn.pending {
        let dots = ".".repeat((tick / 4 % 4) as usize);
        out.push(Line::styled(
            format!("{} {THINKING}{dots}", spinner(tick)),
            Style::default()
                .fg(theme::TEXT_MUTED)
                .add_modifier(Modifier::ITALIC),
        ));
    } else {
        out.extend(wrap_text(&turn.text, width).into_iter().map(Line::raw));
    }

    if !turn.source_refs.is_empty() {
        out.push(Line::styled(
            format!("Sources: {}", turn.source_refs.join(", ")),
            Style::default().fg(theme::ACCENT),
        ));
    }
    out.push(Line::raw(""));
    out
}

// ============================================================================
// View state
// ============================================================================

pub struct ConversationView {
    input_mode: InputMode,
    input: InputBuffer,
    scroll_offset: usize,
    auto_scroll: bool,
    suggestion_cursor: usize,
}

impl Default for ConversationView {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationView {
    pub fn new() -> Self {
        Self {
            input_mode: InputMode::Normal,
            input: InputBuffer::new(),
            scroll_offset: 0,
            auto_scroll: true,
            suggestion_cursor: 0,
        }
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn input_text(&self) -> &str {
        self.input.text()
    }

    /// Forget scroll and draft, e.g. when a new search replaces the transcript.
    pub fn reset(&mut self) {
        self.input.clear();
        self.input_mode = InputMode::Normal;
        self.suggestion_cursor = 0;
        self.scroll_to_bottom();
    }

    // ── Input handling (two-phase) ───────────────────────────────────

    /// Returns true if the event was consumed.
    pub fn handle_input(
        &mut self,
        event: &Event,
        conversation: &mut Conversation,
        services: &Services,
    ) -> bool {
        if let Event::Paste(text) = event {
            if self.input_mode == InputMode::Insert {
                self.input.insert_str(text);
                return true;
            }
            return false;
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

        match self.input_mode {
            InputMode::Insert => {
                self.handle_insert_input(*code, *modifiers, conversation, services)
            }
            InputMode::Normal => {
                self.handle_normal_input(*code, *modifiers, conversation, services)
            }
        }
    }

    fn handle_insert_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        conversation: &mut Conversation,
        services: &Services,
    ) -> bool {
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return false,
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => return false,
            _ => {}
        }

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => self.input_mode = InputMode::Normal,
            (KeyModifiers::NONE, KeyCode::Enter) => self.send(conversation, services),
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
        true
    }

    fn handle_normal_input(
        &mut self,
        code: KeyCode,
        modifiers: KeyModifiers,
        conversation: &mut Conversation,
        services: &Services,
    ) -> bool {
        if modifiers != KeyModifiers::NONE && modifiers != KeyModifiers::SHIFT {
            return false;
        }

        match code {
            KeyCode::Char('i') | KeyCode::Char('a') | KeyCode::Enter => {
                self.input_mode = InputMode::Insert;
            }
            KeyCode::Char('s') => {
                let suggestions = conversation.suggestions();
                if suggestions.is_empty() {
                    return true;
                }
                let pick = suggestions[self.suggestion_cursor % suggestions.len()];
                self.suggestion_cursor = (self.suggestion_cursor + 1) % suggestions.len();
                self.input.set(pick);
                self.input_mode = InputMode::Insert;
            }
            KeyCode::Char('y') => match conversation.latest_reply() {
                Some(turn) => services.copy_to_clipboard(&turn.text),
                None => services.notify("No reply to copy yet", NotificationLevel::Info),
            },
            KeyCode::Char('c') => match conversation.clear() {
                Ok(()) => self.reset(),
                Err(_) => services.notify(
                    "Wait for the current reply before clearing",
                    NotificationLevel::Warning,
                ),
            },
            KeyCode::Char('j') | KeyCode::Down => self.scroll_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.scroll_up(1),
            KeyCode::Char('G') | KeyCode::End => self.scroll_to_bottom(),
            KeyCode::Char('g') | KeyCode::Home => self.scroll_to_top(),
            KeyCode::PageDown => self.scroll_down(10),
            KeyCode::PageUp => self.scroll_up(10),
            _ => return false,
        }
        true
    }

    fn send(&mut self, conversation: &mut Conversation, services: &Services) {
        match conversation.submit(self.input.text()) {
            Ok(exchange) => {
                self.input.clear();
                self.scroll_to_bottom();
                services.spawn_reply(exchange, conversation.context().cloned());
            }
            // Draft stays put until the reply lands.
            Err(Rejection::ConcurrentSubmission) => {}
            Err(_) => self.input.clear(),
        }
    }

    // ── Scrolling ────────────────────────────────────────────────────

    fn scroll_down(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
        self.auto_scroll = false;
    }

    fn scroll_up(&mut self, n: usize) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
        self.auto_scroll = false;
    }

    fn scroll_to_bottom(&mut self) {
        self.scroll_offset = usize::MAX;
        self.auto_scroll = true;
    }

    fn scroll_to_top(&mut self) {
        self.scroll_offset = 0;
        self.auto_scroll = false;
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, conversation: &Conversation, tick: u64) {
        let suggestions = conversation.suggestions();
        let suggestion_height = if suggestions.is_empty() {
            0
        } else {
            suggestions.len() as u16 + 1
        };

        let chunks = Layout::vertical([
            Constraint::Min(1),
            Constraint::Length(suggestion_height),
            Constraint::Length(4),
        ])
        .split(area);

        self.render_messages(frame, chunks[0], conversation, tick);
        if !suggestions.is_empty() {
            self.render_suggestions(frame, chunks[1], suggestions);
        }
        self.render_input(frame, chunks[2], conversation);
    }

    fn render_messages(
        &self,
        frame: &mut Frame,
        area: Rect,
        conversation: &Conversation,
        tick: u64,
    ) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::border_default())
            .title(" Discussion ");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if conversation.is_empty() {
            let welcome = Paragraph::new(vec![
                Line::raw(""),
                Line::styled("  Ask anything about your research.", theme::title()),
                Line::raw(""),
                Line::styled("  Press i or Enter to start typing.", theme::muted()),
            ]);
            frame.render_widget(welcome, inner);
            return;
        }

        let width = inner.width.saturating_sub(1) as usize;
        let all_lines: Vec<Line> = conversation
            .turns()
            .iter()
            .flat_map(|t| turn_lines(t, width, tick))
            .collect();

        let visible_height = inner.height as usize;
        let total = all_lines.len();
        let max_scroll = total.saturating_sub(visible_height);
        let effective_scroll = if self.auto_scroll {
            max_scroll
        } else {
            self.scroll_offset.min(max_scroll)
        };

        let visible: Vec<Line> = all_lines
            .into_iter()
            .skip(effective_scroll)
            .take(visible_height)
            .collect();
        frame.render_widget(Paragraph::new(visible), inner);

        if total > visible_height {
            let mut scrollbar_state = ScrollbarState::new(total)
                .position(effective_scroll)
                .viewport_content_length(visible_height);
            frame.render_stateful_widget(
                Scrollbar::new(ScrollbarOrientation::VerticalRight),
                area,
                &mut scrollbar_state,
            );
        }
    }

    fn render_suggestions(&self, frame: &mut Frame, area: Rect, suggestions: &[&str]) {
        let mut lines = vec![Line::styled(" Suggested questions (s to use)", theme::heading())];
        let next = self.suggestion_cursor % suggestions.len();
        for (i, q) in suggestions.iter().enumerate() {
            let style = if i == next {
                theme::highlight()
            } else {
                theme::muted()
            };
            lines.push(Line::styled(format!("  • {q}"), style));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect, conversation: &Conversation) {
        let awaiting = conversation.is_awaiting_reply();
        let badge = match self.input_mode {
            InputMode::Insert => Span::styled(" -- INSERT -- ", theme::insert_badge()),
            InputMode::Normal => Span::styled(" -- NORMAL -- ", theme::normal_badge()),
        };
        let mut mode_spans = vec![badge];
        if awaiting {
            mode_spans.push(Span::raw(" "));
            mode_spans.push(Span::styled(
                "waiting for reply...",
                Style::default().fg(theme::PRIMARY_LIGHT),
            ));
        }

        let chunks = Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).split(area);
        frame.render_widget(Paragraph::new(Line::from(mode_spans)), chunks[0]);

        let editing = self.input_mode == InputMode::Insert;
        let block = if editing {
            theme::block_focused("Ask a follow-up (Esc to exit)")
        } else {
            theme::block_default("Ask a follow-up")
        };
        let line = self
            .input
            .line(editing, "Ask a follow-up question... (i to type)");
        frame.render_widget(Paragraph::new(line).block(block), chunks[1]);
    }
}
