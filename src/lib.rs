/// Research Assistant (TUI Edition)
///
/// Core library providing the search gate, upload tracking, ranked results
/// and source-grounded discussion behind the terminal research assistant.

pub mod config;
pub mod core;
pub mod tui;

#[cfg(test)]
mod tests;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
