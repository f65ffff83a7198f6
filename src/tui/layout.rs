//! Root layout: header, sidebar, main content, status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Wide enough for "▸ ⇪ Upload Documents".
pub const SIDEBAR_EXPANDED_WIDTH: u16 = 24;
/// Single-char icons.
pub const SIDEBAR_COLLAPSED_WIDTH: u16 = 3;
/// Auto-collapse sidebar below this terminal width.
pub const AUTO_COLLAPSE_THRESHOLD: u16 = 70;
/// Hide sidebar entirely below this terminal width.
pub const HIDE_SIDEBAR_THRESHOLD: u16 = 24;
/// Drop the header below this terminal height.
pub const HEADER_MIN_HEIGHT: u16 = 12;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    pub header: Option<Rect>,
    /// None if hidden.
    pub sidebar: Option<Rect>,
    pub main: Rect,
    /// Bottom row.
    pub status: Rect,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SidebarVisibility {
    Expanded,
    Collapsed,
    Hidden,
}

impl SidebarVisibility {
    pub fn for_width(width: u16, user_collapsed: bool) -> Self {
        if width < HIDE_SIDEBAR_THRESHOLD {
            SidebarVisibility::Hidden
        } else if user_collapsed || width < AUTO_COLLAPSE_THRESHOLD {
            SidebarVisibility::Collapsed
        } else {
            SidebarVisibility::Expanded
        }
    }

    fn width(self) -> u16 {
        match self {
            SidebarVisibility::Expanded => SIDEBAR_EXPANDED_WIDTH,
            SidebarVisibility::Collapsed => SIDEBAR_COLLAPSED_WIDTH,
            SidebarVisibility::Hidden => 0,
        }
    }
}

impl AppLayout {
    /// Compute layout regions from the terminal area and sidebar preference.
    pub fn compute(area: Rect, user_collapsed: bool) -> (Self, SidebarVisibility) {
        let visibility = SidebarVisibility::for_width(area.width, user_collapsed);

        let header_height = if area.height >= HEADER_MIN_HEIGHT { 1 } else { 0 };
        let rows = Layout::vertical([
            Constraint::Length(header_height),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

        let header = (header_height > 0).then_some(rows[0]);
        let content_area = rows[1];
        let status = rows[2];

        let (sidebar, main) = if visibility == SidebarVisibility::Hidden {
            (None, content_area)
        } else {
            let cols = Layout::horizontal([
                Constraint::Length(visibility.width()),
                Constraint::Min(1),
            ])
            .split(content_area);
            (Some(cols[0]), cols[1])
        };

        (
            AppLayout {
                header,
                sidebar,
                main,
                status,
            },
            visibility,
        )
    }
}
