//! Recent searches. Enter runs the highlighted one again.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, ListState, Paragraph},
    Frame,
};

use super::super::theme;
use crate::core::search::{SearchGate, HISTORY_CAP};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryInput {
    Ignored,
    Consumed,
    Rerun(usize),
}

#[derive(Debug, Default)]
pub struct HistoryViewState {
    selected: usize,
}

impl HistoryViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// `len` is the current history length; selection is clamped to it.
    pub fn handle_input(&mut self, event: &Event, len: usize) -> HistoryInput {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return HistoryInput::Ignored;
        };
        if *modifiers != KeyModifiers::NONE || len == 0 {
            return HistoryInput::Ignored;
        }
        self.selected = self.selected.min(len - 1);

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.selected = (self.selected + 1) % len;
                HistoryInput::Consumed
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.selected = (self.selected + len - 1) % len;
                HistoryInput::Consumed
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                let index = self.selected;
                // rerun moves the entry to the top
                self.selected = 0;
                HistoryInput::Rerun(index)
            }
            _ => HistoryInput::Ignored,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, gate: &SearchGate) {
        let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);

        let items: Vec<ListItem> = gate
            .history()
            .map(|q| ListItem::new(Line::from(vec![Span::raw("↺ "), Span::raw(q.to_string())])))
            .collect();
        let title = format!("Search History ({}/{HISTORY_CAP})", gate.history_len());
        let list = List::new(items)
            .block(theme::block_focused(&title))
            .style(Style::default().fg(theme::TEXT))
            .highlight_style(theme::highlight())
            .highlight_symbol("▸ ");

        let selected = (gate.history_len() > 0)
            .then(|| self.selected.min(gate.history_len() - 1));
        let mut state = ListState::default().with_selected(selected);
        frame.render_stateful_widget(list, chunks[0], &mut state);

        let help = Line::from(vec![
            Span::styled("j/k", theme::key_hint()),
            Span::raw(":select "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":search again"),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[1]);
    }
}
