//! Terminal user interface.

pub mod app;
pub mod clipboard;
pub mod events;
pub mod layout;
pub mod services;
pub mod sidebar;
pub mod theme;
pub mod views;
pub mod widgets;
