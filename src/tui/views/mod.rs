pub mod conversation;
pub mod history;
pub mod results;
pub mod search;
pub mod upload;

/// Vim-style modal editing shared by every view with a text field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Normal,
    Insert,
}

pub(crate) const SPINNER: [&str; 4] = ["⠋", "⠙", "⠸", "⠴"];

/// Frame of the spinner for the current tick.
pub(crate) fn spinner(tick: u64) -> &'static str {
    SPINNER[(tick / 2) as usize % SPINNER.len()]
}
