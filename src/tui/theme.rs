//! Color theme for the research assistant TUI.
//!
//! All colors are RGB truecolor. Views import from here instead of using
//! inline `Color::*` literals.

use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, Borders};

use crate::core::models::{CredibilityTier, SourceKind};
use crate::core::upload::UploadStatus;

// ── Primary palette ─────────────────────────────────────────────────────────

/// Indigo: active items, focused borders.
pub const PRIMARY: Color = Color::Rgb(0x5C, 0x6B, 0xC0);
/// Light indigo: hints, secondary focus.
pub const PRIMARY_LIGHT: Color = Color::Rgb(0x79, 0x86, 0xCB);

// ── Accent ──────────────────────────────────────────────────────────────────

/// Amber for calls to action.
pub const ACCENT: Color = Color::Rgb(0xFF, 0xB3, 0x00);

// ── Backgrounds ─────────────────────────────────────────────────────────────

pub const BG_BASE: Color = Color::Rgb(0x12, 0x14, 0x1C);
/// Elevated panels, sidebar.
pub const BG_SURFACE: Color = Color::Rgb(0x1C, 0x1F, 0x2B);

// ── Text ────────────────────────────────────────────────────────────────────

pub const TEXT: Color = Color::Rgb(0xE0, 0xE0, 0xE0);
pub const TEXT_MUTED: Color = Color::Rgb(0x80, 0x80, 0x80);
pub const TEXT_DIM: Color = Color::Rgb(0x50, 0x50, 0x50);

// ── Semantic ────────────────────────────────────────────────────────────────

pub const ERROR: Color = Color::Rgb(0xEF, 0x53, 0x50);
pub const SUCCESS: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const WARNING: Color = Color::Rgb(0xFF, 0xA7, 0x26);
pub const INFO: Color = Color::Rgb(0x42, 0xA5, 0xF5);

// ── Domain ──────────────────────────────────────────────────────────────────

pub const SOURCE_DOCUMENT: Color = Color::Rgb(0x42, 0xA5, 0xF5);
pub const SOURCE_WEB: Color = Color::Rgb(0x66, 0xBB, 0x6A);
pub const SOURCE_ACADEMIC: Color = Color::Rgb(0xAB, 0x47, 0xBC);

pub fn source_kind(kind: SourceKind) -> Color {
    match kind {
        SourceKind::Document => SOURCE_DOCUMENT,
        SourceKind::Web => SOURCE_WEB,
        SourceKind::Academic => SOURCE_ACADEMIC,
    }
}

pub fn credibility(tier: CredibilityTier) -> Color {
    match tier {
        CredibilityTier::High => SUCCESS,
        CredibilityTier::Good => INFO,
        CredibilityTier::Fair => WARNING,
        CredibilityTier::Low => ERROR,
    }
}

pub fn upload_status(status: UploadStatus) -> Color {
    match status {
        UploadStatus::Idle => TEXT_MUTED,
        UploadStatus::Uploading => PRIMARY_LIGHT,
        UploadStatus::Success => SUCCESS,
        UploadStatus::Error => ERROR,
    }
}

// ── Style helpers ───────────────────────────────────────────────────────────

/// Accent bold text (titles, active items).
pub fn title() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn heading() -> Style {
    Style::default().fg(PRIMARY).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(PRIMARY)
}

pub fn border_default() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Highlighted/selected item.
pub fn highlight() -> Style {
    Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
}

pub fn muted() -> Style {
    Style::default().fg(TEXT_MUTED)
}

pub fn dim() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Key hint style (e.g., "[q]:quit").
pub fn key_hint() -> Style {
    Style::default().fg(TEXT_DIM)
}

/// Status bar brand badge.
pub fn brand_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(ACCENT)
        .add_modifier(Modifier::BOLD)
}

pub fn insert_badge() -> Style {
    Style::default()
        .fg(BG_BASE)
        .bg(PRIMARY_LIGHT)
        .add_modifier(Modifier::BOLD)
}

pub fn normal_badge() -> Style {
    Style::default().fg(BG_BASE).bg(TEXT_MUTED)
}

// ── Block builders ──────────────────────────────────────────────────────────

pub fn block_focused(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_focused())
}

pub fn block_default(title: &str) -> Block<'_> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(border_default())
}
