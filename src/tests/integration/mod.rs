//! Integration tests
//!
//! Each flow runs on tokio's paused clock so timings are exact and the tests
//! never sleep for real.

mod app_flow;
mod search_flow;
mod upload_flow;
