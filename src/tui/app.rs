use std::io;
use std::time::Duration;

use crossterm::event::{Event, EventStream, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use futures::StreamExt;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc;

use super::events::{Action, AppEvent, AreaFocus, Focus, Notification, NotificationLevel};
use super::layout::AppLayout;
use super::services::Services;
use super::sidebar::{Badge, SidebarState};
use super::theme;
use super::views::history::{HistoryInput, HistoryViewState};
use super::views::results::ResultsViewState;
use super::views::search::{SearchInput, SearchViewState};
use super::views::upload::{UploadInput, UploadViewState};
use super::views::InputMode;
use crate::core::error::Rejection;
use crate::core::results::ResultsStatus;
use crate::core::search::{SearchSignal, SearchTicket};
use crate::core::upload::{UploadPolicy, UploadSignal, UploadStatus, UploadTransition};

/// Maximum notifications on screen at once.
const MAX_NOTIFICATIONS: usize = 3;

/// Central application state (Elm architecture).
pub struct AppState {
    /// Whether the app is still running.
    pub running: bool,
    /// Currently focused top-level view.
    pub focus: Focus,
    /// Whether sidebar or main content has input focus.
    pub area_focus: AreaFocus,
    pub sidebar: SidebarState,
    pub search: SearchViewState,
    pub upload: UploadViewState,
    pub results: ResultsViewState,
    pub history: HistoryViewState,
    /// Active notifications (max 3 visible).
    pub notifications: Vec<Notification>,
    /// Monotonic counter for notification IDs.
    notification_counter: u64,
    pub show_help: bool,
    /// Drives spinners.
    tick_count: u64,
    /// Receiver for backend events.
    event_rx: mpsc::UnboundedReceiver<AppEvent>,
    services: Services,
}

impl AppState {
    pub fn new(
        event_rx: mpsc::UnboundedReceiver<AppEvent>,
        services: Services,
        upload_policy: UploadPolicy,
    ) -> Self {
        Self {
            running: true,
            focus: Focus::Search,
            area_focus: AreaFocus::Main,
            sidebar: SidebarState::new(),
            search: SearchViewState::new(),
            upload: UploadViewState::new(upload_policy),
            results: ResultsViewState::new(),
            history: HistoryViewState::new(),
            notifications: Vec::new(),
            notification_counter: 0,
            show_help: false,
            tick_count: 0,
            event_rx,
            services,
        }
    }

    // ── Elm event loop ──────────────────────────────────────────────────

    /// Main event loop: render → select → update → loop.
    pub async fn run(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        tick_rate: Duration,
    ) -> io::Result<()> {
        let mut tick_interval = tokio::time::interval(tick_rate);
        let mut event_stream = EventStream::new();

        while self.running {
            terminal.draw(|frame| self.render(frame))?;

            tokio::select! {
                _ = tick_interval.tick() => {
                    self.on_tick();
                }
                Some(event) = self.event_rx.recv() => {
                    self.handle_event(event);
                    self.drain_events();
                }
                Some(Ok(crossterm_event)) = event_stream.next() => {
                    self.handle_event(AppEvent::Input(crossterm_event));
                }
            }
        }

        Ok(())
    }

    /// Apply every backend event already queued, without waiting.
    pub fn drain_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.event_rx.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    // ── Event handling ──────────────────────────────────────────────────

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Input(crossterm_event) => {
                // Priority 1: Help modal
                if self.show_help {
                    if let Some(action) = self.map_help_input(&crossterm_event) {
                        self.handle_action(action);
                    }
                    return;
                }

                // Priority 2: Sidebar input (when focused)
                if self.area_focus == AreaFocus::Sidebar
                    && self.handle_sidebar_input(&crossterm_event)
                {
                    return;
                }

                // Priority 3: Focused view
                if self.dispatch_view_input(&crossterm_event) {
                    return;
                }

                // Priority 4: Global keybindings
                if let Some(action) = self.map_input_to_action(&crossterm_event) {
                    self.handle_action(action);
                }
            }
            AppEvent::Action(action) => self.handle_action(action),
            AppEvent::Tick => self.on_tick(),
            AppEvent::Search(SearchSignal::DisplayElapsed { ticket }) => {
                self.search.gate_mut().finish_display(ticket);
            }
            AppEvent::Search(SearchSignal::Completed { ticket, outcome }) => {
                let failure = outcome.as_ref().err().map(|e| e.to_string());
                if self.results.apply(ticket, outcome) {
                    match failure {
                        Some(message) => self.push_notification(message, NotificationLevel::Error),
                        None => log::info!(
                            "Search {ticket} ready with {} sources",
                            self.results.results().sources().len()
                        ),
                    }
                }
            }
            AppEvent::ReplyReady {
                placeholder_id,
                outcome,
            } => {
                self.results.resolve_reply(&placeholder_id, outcome);
            }
            AppEvent::Upload(signal) => self.on_upload_signal(signal),
            AppEvent::Notification(notification) => {
                self.push_notification(notification.message, notification.level);
            }
            AppEvent::Quit => {
                self.running = false;
            }
        }
    }

    fn on_upload_signal(&mut self, signal: UploadSignal) {
        match self.upload.apply(signal) {
            UploadTransition::Succeeded(files) => {
                (self.services.on_upload)(&files);
                self.push_notification(
                    format!("Uploaded {} document(s)", files.len()),
                    NotificationLevel::Success,
                );
            }
            UploadTransition::Failed(message) => {
                self.push_notification(message, NotificationLevel::Error);
            }
            UploadTransition::Ignored
            | UploadTransition::Progressed(_)
            | UploadTransition::Reset => {}
        }
    }

    /// Dispatch input to the currently focused view. Returns true if consumed.
    fn dispatch_view_input(&mut self, event: &Event) -> bool {
        match self.focus {
            Focus::Search => match self.search.handle_input(event) {
                SearchInput::Ignored => false,
                SearchInput::Consumed => true,
                SearchInput::Submitted(ticket) => {
                    self.start_search(ticket);
                    true
                }
            },
            Focus::Upload => match self.upload.handle_input(event) {
                UploadInput::Ignored => false,
                UploadInput::Consumed => true,
                UploadInput::Started(ticket) => {
                    self.services.spawn_upload(ticket);
                    true
                }
                UploadInput::Rejected(reason) => {
                    self.notify_rejection(reason);
                    true
                }
            },
            Focus::Results => self.results.handle_input(event, &self.services),
            Focus::History => {
                let len = self.search.gate().history_len();
                match self.history.handle_input(event, len) {
                    HistoryInput::Ignored => false,
                    HistoryInput::Consumed => true,
                    HistoryInput::Rerun(index) => {
                        match self.search.rerun_history(index) {
                            Ok(ticket) => self.start_search(ticket),
                            Err(reason) => self.notify_rejection(reason),
                        }
                        true
                    }
                }
            }
        }
    }

    /// One accepted search: results go to loading, retrieval and the display
    /// window start, and the results view takes focus.
    fn start_search(&mut self, ticket: SearchTicket) {
        self.results.begin(ticket.id, &ticket.query, ticket.mode);
        self.services.spawn_search(ticket);
        self.set_focus(Focus::Results);
    }

    fn notify_rejection(&mut self, reason: Rejection) {
        let (message, level) = match reason {
            Rejection::NoAcceptedFiles => (
                "Only PDF documents can be uploaded".to_string(),
                NotificationLevel::Warning,
            ),
            Rejection::ConcurrentSubmission => (
                "Still working on the previous request".to_string(),
                NotificationLevel::Info,
            ),
            Rejection::EmptyInput => return,
        };
        self.push_notification(message, level);
    }

    /// Handle sidebar-specific input. Returns true if consumed.
    fn handle_sidebar_input(&mut self, event: &Event) -> bool {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return false;
        };
        if *modifiers != KeyModifiers::NONE {
            return false;
        }

        match code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.sidebar.select_next();
                true
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.sidebar.select_prev();
                true
            }
            KeyCode::Enter | KeyCode::Char('l') => {
                let focus = self.sidebar.selected_focus();
                self.handle_action(focus.to_action());
                self.area_focus = AreaFocus::Main;
                true
            }
            KeyCode::Char('h') => {
                self.sidebar.user_collapsed = true;
                self.area_focus = AreaFocus::Main;
                true
            }
            KeyCode::Esc => {
                self.area_focus = AreaFocus::Main;
                true
            }
            _ => false,
        }
    }

    // ── Input mapping ───────────────────────────────────────────────────

    fn map_help_input(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };
        match code {
            KeyCode::Esc | KeyCode::Char('?') => Some(Action::CloseHelp),
            _ => None,
        }
    }

    fn map_input_to_action(&self, event: &Event) -> Option<Action> {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return None;
        };

        match (*modifiers, *code) {
            (KeyModifiers::CONTROL, KeyCode::Char('b')) => Some(Action::ToggleSidebar),
            (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(Action::Quit),
            (KeyModifiers::NONE | KeyModifiers::SHIFT, code) => match code {
                KeyCode::Char('q') => Some(Action::Quit),
                KeyCode::Char('?') => Some(Action::ShowHelp),
                KeyCode::Tab => Some(Action::TabNext),
                KeyCode::BackTab => Some(Action::TabPrev),
                KeyCode::Char('1') => Some(Action::FocusSearch),
                KeyCode::Char('2') => Some(Action::FocusResults),
                KeyCode::Char('3') => Some(Action::FocusHistory),
                KeyCode::Char('4') => Some(Action::FocusUpload),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn handle_action(&mut self, action: Action) {
        match action {
            Action::Quit => self.running = false,
            Action::FocusSearch => self.set_focus(Focus::Search),
            Action::FocusResults => self.set_focus(Focus::Results),
            Action::FocusHistory => self.set_focus(Focus::History),
            Action::FocusUpload => self.set_focus(Focus::Upload),
            Action::TabNext => self.set_focus(self.focus.next()),
            Action::TabPrev => self.set_focus(self.focus.prev()),
            Action::ToggleSidebar => {
                self.sidebar.toggle_collapse();
                if !self.sidebar.user_collapsed {
                    self.area_focus = AreaFocus::Sidebar;
                    self.sidebar.sync_to_focus(self.focus);
                }
            }
            Action::ShowHelp => self.show_help = true,
            Action::CloseHelp => self.show_help = false,
        }
    }

    /// Set focus and sync sidebar selection.
    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        self.sidebar.sync_to_focus(focus);
        self.area_focus = AreaFocus::Main;
    }

    /// Insert mode of whichever view has focus.
    pub fn input_mode(&self) -> InputMode {
        match self.focus {
            Focus::Search => self.search.input_mode(),
            Focus::Upload => self.upload.input_mode(),
            Focus::Results => self.results.input_mode(),
            Focus::History => InputMode::Normal,
        }
    }

    // ── Notifications ───────────────────────────────────────────────────

    /// Push a notification (dedup by message, max 3).
    pub fn push_notification(&mut self, message: String, level: NotificationLevel) {
        if self.notifications.iter().any(|n| n.message == message) {
            return;
        }

        self.notification_counter += 1;
        let mut notification = Notification::new(message, level);
        notification.id = self.notification_counter;
        self.notifications.push(notification);

        while self.notifications.len() > MAX_NOTIFICATIONS {
            self.notifications.remove(0);
        }
    }

    /// Tick: decrement notification TTLs, dismiss expired, advance spinners.
    fn on_tick(&mut self) {
        self.tick_count = self.tick_count.wrapping_add(1);
        for n in &mut self.notifications {
            n.ttl_ticks = n.ttl_ticks.saturating_sub(1);
        }
        self.notifications.retain(|n| n.ttl_ticks > 0);
    }

    // ── Rendering ───────────────────────────────────────────────────────

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let (layout, visibility) = AppLayout::compute(area, self.sidebar.user_collapsed);

        if let Some(header) = layout.header {
            self.render_header(frame, header);
        }

        if let Some(sidebar_area) = layout.sidebar {
            self.sidebar.render(
                frame,
                sidebar_area,
                visibility,
                self.focus,
                self.area_focus,
                &self.sidebar_badges(),
            );
        }

        self.render_content(frame, layout.main);
        self.render_status_bar(frame, layout.status);

        // Overlays
        self.render_notifications(frame, area);
        if self.show_help {
            self.render_help_modal(frame, area);
        }
    }

    fn sidebar_badges(&self) -> Vec<Badge> {
        let mut badges = Vec::new();
        match self.results.results().status() {
            ResultsStatus::Ready => badges.push((
                Focus::Results,
                self.results.results().sources().len().to_string(),
            )),
            ResultsStatus::Loading => badges.push((Focus::Results, "…".to_string())),
            ResultsStatus::Failed(_) => badges.push((Focus::Results, "!".to_string())),
            ResultsStatus::Empty => {}
        }
        if self.upload.task().status() == UploadStatus::Uploading {
            badges.push((Focus::Upload, format!("{}%", self.upload.task().progress())));
        }
        badges
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let header = Line::from(vec![
            Span::styled(" Research Assistant ", theme::title()),
            Span::styled(
                "AI-powered search across your documents and the web",
                theme::muted(),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(header).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }

    fn render_content(&self, frame: &mut Frame, area: Rect) {
        let tick = self.tick_count;
        match self.focus {
            Focus::Search => self.search.render(frame, area, tick),
            Focus::Results => self.results.render(frame, area, tick),
            Focus::History => self.history.render(frame, area, self.search.gate()),
            Focus::Upload => self.upload.render(frame, area, tick),
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let search_status = if self.search.gate().is_searching() {
            Span::styled("searching", Style::default().fg(theme::PRIMARY_LIGHT))
        } else {
            Span::styled("ready", theme::muted())
        };

        let mode_indicator = match self.input_mode() {
            InputMode::Insert => Span::styled(" INSERT ", theme::insert_badge()),
            InputMode::Normal => Span::raw(""),
        };

        let status = Line::from(vec![
            Span::styled(" RESEARCH ", theme::brand_badge()),
            Span::raw(" "),
            mode_indicator,
            Span::raw(" "),
            Span::styled(
                self.focus.label(),
                Style::default()
                    .fg(theme::PRIMARY_LIGHT)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::raw(" │ "),
            Span::styled("Search:", theme::key_hint()),
            Span::raw(" "),
            search_status,
            Span::raw(" │ "),
            Span::styled("Tab", theme::key_hint()),
            Span::raw(":nav "),
            Span::styled("Ctrl+B", theme::key_hint()),
            Span::raw(":sidebar "),
            Span::styled("?", theme::key_hint()),
            Span::raw(":help "),
            Span::styled("q", theme::key_hint()),
            Span::raw(":quit"),
        ]);

        frame.render_widget(Paragraph::new(status), area);
    }

    fn render_notifications(&self, frame: &mut Frame, area: Rect) {
        if self.notifications.is_empty() {
            return;
        }

        let max_width = 50.min(area.width.saturating_sub(2));
        let height = (self.notifications.len() as u16).min(area.height);
        let x = area.width.saturating_sub(max_width + 1);
        let y = 1u16.min(area.height.saturating_sub(height));
        let notification_area = Rect::new(x, y, max_width, height);

        let lines: Vec<Line> = self
            .notifications
            .iter()
            .map(|n| {
                let (prefix, color) = match n.level {
                    NotificationLevel::Info => ("ℹ", theme::INFO),
                    NotificationLevel::Success => ("✓", theme::SUCCESS),
                    NotificationLevel::Warning => ("⚠", theme::WARNING),
                    NotificationLevel::Error => ("✗", theme::ERROR),
                };
                Line::from(vec![
                    Span::styled(
                        format!(" {prefix} "),
                        Style::default().fg(color).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(n.message.as_str()),
                ])
            })
            .collect();

        frame.render_widget(Clear, notification_area);
        frame.render_widget(Paragraph::new(lines), notification_area);
    }

    fn render_help_modal(&self, frame: &mut Frame, area: Rect) {
        let modal = centered_rect(60, 80, area);

        let keybindings = [
            ("Global:", ""),
            ("q", "Quit application"),
            ("?", "Toggle this help"),
            ("Tab / Shift+Tab", "Next / previous view"),
            ("1-4", "Search / Results / History / Upload"),
            ("Ctrl+B", "Toggle sidebar collapse/expand"),
            ("Ctrl+C", "Force quit"),
            ("", ""),
            ("Search:", ""),
            ("i / Enter", "Type a query"),
            ("Enter (typing)", "Run the search"),
            ("m / Ctrl+T", "Cycle documents / web / hybrid"),
            ("j/k, s", "Highlight / use a suggestion"),
            ("", ""),
            ("Results:", ""),
            ("j/k", "Select source"),
            ("t", "Switch Results / Discussion tab"),
            ("d", "Open the discussion"),
            ("", ""),
            ("Discussion:", ""),
            ("i / Enter", "Write a follow-up"),
            ("s", "Use a suggested question"),
            ("y", "Copy the latest reply"),
            ("c", "Clear the transcript"),
            ("j/k, G/g", "Scroll"),
            ("", ""),
            ("Upload:", ""),
            ("drag & drop", "Drop PDF files onto the terminal"),
            ("i", "Type a file path"),
        ];

        let mut lines = vec![
            Line::raw(""),
            Line::from(Span::styled(" Keybindings", theme::title())),
            Line::raw(""),
        ];

        for (key, desc) in &keybindings {
            if key.is_empty() {
                lines.push(Line::raw(""));
            } else if desc.is_empty() {
                lines.push(Line::from(Span::styled(format!("  {key}"), theme::title())));
            } else {
                lines.push(Line::from(vec![
                    Span::raw("  "),
                    Span::styled(
                        format!("{:<18}", key),
                        Style::default()
                            .fg(theme::PRIMARY_LIGHT)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(*desc),
                ]));
            }
        }

        lines.push(Line::raw(""));
        lines.push(Line::from(vec![
            Span::raw("  Press "),
            Span::styled("?", theme::highlight()),
            Span::raw(" or "),
            Span::styled("Esc", theme::highlight()),
            Span::raw(" to close"),
        ]));

        let block = Block::default()
            .title(" Help ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme::ACCENT));

        frame.render_widget(Clear, modal);
        frame.render_widget(Paragraph::new(lines).block(block), modal);
    }
}

/// Calculate a centered rect using percentage of parent area.
pub(super) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);

    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}
