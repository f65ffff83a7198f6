//! Property-based tests for the research assistant
//!
//! Properties verify invariants that should hold for every input sequence,
//! rather than for hand-picked cases.
//!
//! ## Test Modules
//!
//! - `conversation_props`: transcript turn-taking
//!   - At most one pending placeholder, always the last turn
//!   - Submissions while awaiting never change the transcript
//!   - Every accepted submission adds exactly two turns
//!
//! - `upload_props`: upload progress
//!   - Progress never decreases while uploading
//!   - Progress stays at or below the cap until the processor answers
//!   - Only accepted files are ever retained
//!
//! - `search_props`: the search gate and history
//!   - History never exceeds its cap
//!   - History has no case-insensitive duplicates
//!   - At most one search is in flight
//!
//! ## Running Property Tests
//!
//! ```sh
//! cargo test property
//! ```

mod conversation_props;
mod search_props;
mod upload_props;
