//! Collapsible left sidebar with grouped navigation.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::events::{AreaFocus, Focus, SidebarGroup};
use super::layout::SidebarVisibility;
use super::theme;

/// Short live status shown next to a view label, e.g. a result count.
pub type Badge = (Focus, String);

pub struct SidebarState {
    /// Whether the user has toggled collapse (Ctrl+B).
    pub user_collapsed: bool,
    /// Highlighted index into `Focus::ALL`.
    pub selected: usize,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarState {
    pub fn new() -> Self {
        Self {
            user_collapsed: false,
            selected: 0,
        }
    }

    pub fn toggle_collapse(&mut self) {
        self.user_collapsed = !self.user_collapsed;
    }

    pub fn select_next(&mut self) {
        self.selected = (self.selected + 1) % Focus::ALL.len();
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.checked_sub(1).unwrap_or(Focus::ALL.len() - 1);
    }

    pub fn selected_focus(&self) -> Focus {
        Focus::ALL[self.selected]
    }

    /// Sync selection to match the active focus (e.g., after Tab navigation).
    pub fn sync_to_focus(&mut self, focus: Focus) {
        if let Some(idx) = Focus::ALL.iter().position(|&f| f == focus) {
            self.selected = idx;
        }
    }

    pub fn render(
        &self,
        frame: &mut Frame,
        area: Rect,
        visibility: SidebarVisibility,
        current_focus: Focus,
        area_focus: AreaFocus,
        badges: &[Badge],
    ) {
        match visibility {
            SidebarVisibility::Hidden => {}
            SidebarVisibility::Collapsed => self.render_collapsed(frame, area, current_focus),
            SidebarVisibility::Expanded => {
                self.render_expanded(frame, area, current_focus, area_focus, badges)
            }
        }
    }

    fn render_collapsed(&self, frame: &mut Frame, area: Rect, current_focus: Focus) {
        let lines: Vec<Line> = Focus::ALL
            .iter()
            .take(area.height as usize)
            .map(|&view| {
                let style = if view == current_focus {
                    theme::highlight()
                } else {
                    theme::muted()
                };
                Line::from(Span::styled(format!(" {}", view.icon()), style))
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }

    fn render_expanded(
        &self,
        frame: &mut Frame,
        area: Rect,
        current_focus: Focus,
        area_focus: AreaFocus,
        badges: &[Badge],
    ) {
        let mut lines: Vec<Line> = Vec::new();
        let sidebar_focused = area_focus == AreaFocus::Sidebar;
        let width = area.width as usize;
        let mut focus_idx = 0usize;

        for group in SidebarGroup::ALL {
            lines.push(Line::from(Span::styled(
                format!(" {}", group.label()),
                theme::heading(),
            )));

            for &view in group.views() {
                let is_current = view == current_focus;
                let is_selected = sidebar_focused && focus_idx == self.selected;
                focus_idx += 1;

                let prefix = if is_selected { "▸ " } else { "  " };
                let style = match (is_selected, is_current) {
                    (_, true) => theme::highlight(),
                    (true, false) => Style::default()
                        .fg(theme::TEXT)
                        .add_modifier(Modifier::BOLD),
                    (false, false) => theme::muted(),
                };

                let label = format!("{prefix}{} {}", view.icon(), view.label());
                let mut spans = vec![Span::styled(label.clone(), style)];

                if let Some((_, badge)) = badges.iter().find(|(f, _)| *f == view) {
                    let used = label.chars().count() + badge.chars().count() + 1;
                    spans.push(Span::raw(" ".repeat(width.saturating_sub(used))));
                    spans.push(Span::styled(badge.clone(), Style::default().fg(theme::ACCENT)));
                }
                lines.push(Line::from(spans));
            }
            lines.push(Line::raw(""));
        }

        lines.truncate(area.height as usize);
        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(theme::BG_SURFACE)),
            area,
        );
    }
}
