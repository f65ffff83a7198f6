//! Test modules for the research assistant.
//!
//! - `mocks`: mockall collaborators and `Services` wiring for tests
//! - `property`: proptest invariants of the three state machines
//! - `integration`: paused-clock flows through the async drivers and the app

mod mocks;
mod property;
mod integration;
