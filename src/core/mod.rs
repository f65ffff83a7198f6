pub mod collaborators;
pub mod conversation;
pub mod error;
pub mod latency;
pub mod logging;
pub mod models;
pub mod results;
pub mod search;
pub mod simulated;
pub mod upload;
