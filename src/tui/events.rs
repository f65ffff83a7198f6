use crate::core::error::CollaboratorError;
use crate::core::search::SearchSignal;
use crate::core::upload::UploadSignal;

/// Events flowing through the Elm-architecture event loop.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Periodic tick for notification TTLs and animation.
    Tick,
    /// Raw terminal input (keyboard/mouse/paste).
    Input(crossterm::event::Event),
    /// A resolved action to execute.
    Action(Action),
    /// Notification to display to the user.
    Notification(Notification),
    /// Request to quit the application.
    Quit,
    /// The reply generator answered (or failed) for a discussion turn.
    ReplyReady {
        placeholder_id: String,
        outcome: Result<String, CollaboratorError>,
    },
    Search(SearchSignal),
    Upload(UploadSignal),
}

impl From<SearchSignal> for AppEvent {
    fn from(signal: SearchSignal) -> Self {
        AppEvent::Search(signal)
    }
}

impl From<UploadSignal> for AppEvent {
    fn from(signal: UploadSignal) -> Self {
        AppEvent::Upload(signal)
    }
}

/// High-level actions dispatched by the input mapper.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // Navigation
    FocusSearch,
    FocusResults,
    FocusHistory,
    FocusUpload,
    TabNext,
    TabPrev,
    ToggleSidebar,

    // Modals
    ShowHelp,
    CloseHelp,

    // Application
    Quit,
}

/// Whether the sidebar or the main content has input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AreaFocus {
    Sidebar,
    Main,
}

/// Sidebar sections. Views are listed in `Focus::ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarGroup {
    Research,
    Documents,
}

impl SidebarGroup {
    pub const ALL: [SidebarGroup; 2] = [SidebarGroup::Research, SidebarGroup::Documents];

    pub fn label(self) -> &'static str {
        match self {
            SidebarGroup::Research => "RESEARCH",
            SidebarGroup::Documents => "DOCUMENTS",
        }
    }

    pub fn views(self) -> &'static [Focus] {
        match self {
            SidebarGroup::Research => &[Focus::Search, Focus::Results, Focus::History],
            SidebarGroup::Documents => &[Focus::Upload],
        }
    }
}

/// Which top-level view has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Focus {
    Search,
    Results,
    History,
    Upload,
}

impl Focus {
    pub const ALL: [Focus; 4] = [Focus::Search, Focus::Results, Focus::History, Focus::Upload];

    pub fn label(self) -> &'static str {
        match self {
            Focus::Search => "Search",
            Focus::Results => "Results",
            Focus::History => "Search History",
            Focus::Upload => "Upload Documents",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Focus::Search => "⌕",
            Focus::Results => "≡",
            Focus::History => "↺",
            Focus::Upload => "⇪",
        }
    }

    pub fn group(self) -> SidebarGroup {
        match self {
            Focus::Upload => SidebarGroup::Documents,
            _ => SidebarGroup::Research,
        }
    }

    pub fn to_action(self) -> Action {
        match self {
            Focus::Search => Action::FocusSearch,
            Focus::Results => Action::FocusResults,
            Focus::History => Action::FocusHistory,
            Focus::Upload => Action::FocusUpload,
        }
    }

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|&f| f == self).unwrap_or(0);
        Focus::ALL[(idx + Focus::ALL.len() - 1) % Focus::ALL.len()]
    }
}

/// Notification level for the overlay system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    Info,
    Success,
    Warning,
    Error,
}

/// A timed notification shown in the overlay.
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub level: NotificationLevel,
    /// Ticks remaining before auto-dismiss.
    pub ttl_ticks: u32,
}

pub const DEFAULT_NOTIFICATION_TTL: u32 = 100;

impl Notification {
    /// Id is assigned by `AppState` when the notification is shown.
    pub fn new(message: impl Into<String>, level: NotificationLevel) -> Self {
        Self {
            id: 0,
            message: message.into(),
            level,
            ttl_ticks: DEFAULT_NOTIFICATION_TTL,
        }
    }
}
