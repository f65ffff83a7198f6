//! Document uploader.
//!
//! Dropping files onto the terminal arrives as a bracketed paste of their
//! paths; typing a path into the field does the same thing by hand.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, LineGauge, Paragraph},
    Frame,
};

use super::super::theme;
use super::{spinner, InputMode};
use crate::core::error::Rejection;
use crate::core::models::FileHandle;
use crate::core::upload::{
    parse_dropped_paths, UploadPolicy, UploadSignal, UploadStatus, UploadTask, UploadTicket,
    UploadTransition,
};
use crate::tui::widgets::input_buffer::InputBuffer;

#[derive(Debug, Clone, PartialEq)]
pub enum UploadInput {
    Ignored,
    Consumed,
    Started(UploadTicket),
    Rejected(Rejection),
}

pub struct UploadViewState {
    task: UploadTask,
    input: InputBuffer,
    input_mode: InputMode,
}

impl Default for UploadViewState {
    fn default() -> Self {
        Self::new(UploadPolicy::default())
    }
}

impl UploadViewState {
    pub fn new(policy: UploadPolicy) -> Self {
        Self {
            task: UploadTask::new(policy),
            input: InputBuffer::new(),
            input_mode: InputMode::Normal,
        }
    }

    pub fn task(&self) -> &UploadTask {
        &self.task
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn apply(&mut self, signal: UploadSignal) -> UploadTransition {
        self.task.apply(signal)
    }

    /// Treat `text` as a drop of one or more paths.
    pub fn drop_text(&mut self, text: &str) -> UploadInput {
        let files: Vec<FileHandle> = parse_dropped_paths(text)
            .into_iter()
            .map(FileHandle::from_path)
            .collect();
        if files.is_empty() {
            return UploadInput::Consumed;
        }

        match self.task.select(files) {
            Ok(ticket) => {
                self.input.clear();
                self.input_mode = InputMode::Normal;
                UploadInput::Started(ticket)
            }
            Err(reason) => UploadInput::Rejected(reason),
        }
    }

    // ── Input handling ───────────────────────────────────────────────

    pub fn handle_input(&mut self, event: &Event) -> UploadInput {
        if let Event::Paste(text) = event {
            return self.drop_text(text);
        }

        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return UploadInput::Ignored;
        };

        match self.input_mode {
            InputMode::Insert => self.handle_insert_input(*code, *modifiers),
            InputMode::Normal => match (*modifiers, *code) {
                (KeyModifiers::NONE, KeyCode::Char('i'))
                | (KeyModifiers::NONE, KeyCode::Char('o'))
                | (KeyModifiers::NONE, KeyCode::Enter) => {
                    self.input_mode = InputMode::Insert;
                    UploadInput::Consumed
                }
                _ => UploadInput::Ignored,
            },
        }
    }

    fn handle_insert_input(&mut self, code: KeyCode, modifiers: KeyModifiers) -> UploadInput {
        match (modifiers, code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => return UploadInput::Ignored,
            (_, KeyCode::Tab) | (_, KeyCode::BackTab) => return UploadInput::Ignored,
            _ => {}
        }

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Esc) => self.input_mode = InputMode::Normal,
            (KeyModifiers::NONE, KeyCode::Enter) => {
                let text = self.input.text().to_string();
                return self.drop_text(&text);
            }
            (KeyModifiers::NONE, KeyCode::Backspace) => self.input.backspace(),
            (KeyModifiers::NONE, KeyCode::Delete) => self.input.delete(),
            (KeyModifiers::NONE, KeyCode::Left) => self.input.move_left(),
            (KeyModifiers::NONE, KeyCode::Right) => self.input.move_right(),
            (KeyModifiers::CONTROL, KeyCode::Char('u')) => self.input.clear(),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, KeyCode::Char(c)) => {
                self.input.insert_char(c)
            }
            _ => {}
        }
        UploadInput::Consumed
    }

    // ── Rendering ────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame, area: Rect, tick: u64) {
        let block = theme::block_focused("Upload Documents");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::vertical([
            Constraint::Length(7), // Drop zone
            Constraint::Length(3), // Progress
            Constraint::Min(1),    // Files
            Constraint::Length(3), // Path input
            Constraint::Length(1), // Help
        ])
        .split(inner);

        self.render_drop_zone(frame, chunks[0], tick);
        if self.task.status() != UploadStatus::Idle {
            self.render_progress(frame, chunks[1]);
        }
        self.render_files(frame, chunks[2]);
        self.render_path_input(frame, chunks[3]);

        let help = Line::from(vec![
            Span::styled("drop/paste", theme::key_hint()),
            Span::raw(":upload "),
            Span::styled("i", theme::key_hint()),
            Span::raw(":type path "),
            Span::styled("Enter", theme::key_hint()),
            Span::raw(":submit path"),
        ]);
        frame.render_widget(Paragraph::new(help), chunks[4]);
    }

    fn render_drop_zone(&self, frame: &mut Frame, area: Rect, tick: u64) {
        let status = self.task.status();
        let color = theme::upload_status(status);

        let icon = match status {
            UploadStatus::Idle => "⇪".to_string(),
            UploadStatus::Uploading => spinner(tick).to_string(),
            UploadStatus::Success => "✓".to_string(),
            UploadStatus::Error => "✗".to_string(),
        };

        let mut lines = vec![
            Line::raw(""),
            Line::styled(
                format!("{icon}  {}", status.message()),
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ];
        match status {
            UploadStatus::Idle => {
                lines.push(Line::styled("Supports PDF files up to 10MB each", theme::muted()));
                lines.push(Line::styled(
                    format!("Accepted: {}", self.task.policy().accepted_mime),
                    theme::dim(),
                ));
            }
            UploadStatus::Error => {
                if let Some(reason) = self.task.last_error() {
                    lines.push(Line::styled(reason.to_string(), theme::muted()));
                }
            }
            _ => {}
        }

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(color));
        frame.render_widget(
            Paragraph::new(lines)
                .alignment(Alignment::Center)
                .block(block),
            area,
        );
    }

    fn render_progress(&self, frame: &mut Frame, area: Rect) {
        let status = self.task.status();
        let progress = self.task.progress();

        let gauge = LineGauge::default()
            .block(Block::default().borders(Borders::ALL).title(" Progress "))
            .ratio(f64::from(progress) / 100.0)
            .label(Span::styled(
                format!("{progress:3}%"),
                Style::default().fg(theme::TEXT).add_modifier(Modifier::BOLD),
            ))
            .filled_style(Style::default().fg(theme::upload_status(status)))
            .unfilled_style(Style::default().fg(theme::TEXT_DIM));
        frame.render_widget(gauge, area);
    }

    fn render_files(&self, frame: &mut Frame, area: Rect) {
        let files = self.task.files();
        if files.is_empty() {
            return;
        }

        let mut lines = vec![Line::styled(format!(" Files ({})", files.len()), theme::heading())];
        for file in files {
            lines.push(Line::from(vec![
                Span::raw("  "),
                Span::styled(file.name.clone(), Style::default().fg(theme::TEXT)),
                Span::raw("  "),
                Span::styled(format_size(file.size_bytes), theme::muted()),
            ]));
        }
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_path_input(&self, frame: &mut Frame, area: Rect) {
        let editing = self.input_mode == InputMode::Insert;
        let block = if editing {
            theme::block_focused("Path (Esc to exit)")
        } else {
            theme::block_default("Path")
        };
        let line = self.input.line(editing, "Type a file path... (i to edit)");
        frame.render_widget(Paragraph::new(line).block(block), area);
    }
}

pub(crate) fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    let b = bytes as f64;
    if b >= MB {
        format!("{:.1} MB", b / MB)
    } else if b >= KB {
        format!("{:.1} KB", b / KB)
    } else {
        format!("{bytes} B")
    }
}
