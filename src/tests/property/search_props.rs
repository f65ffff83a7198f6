//! Property-based tests for the search gate
//!
//! Tests invariants:
//! - History never exceeds its cap
//! - History has no case-insensitive duplicates
//! - At most one search is in flight

use std::collections::HashSet;

use proptest::prelude::*;

use crate::core::models::SearchMode;
use crate::core::search::{SearchGate, HISTORY_CAP};

fn arb_mode() -> impl Strategy<Value = SearchMode> {
    prop::sample::select(SearchMode::ALL.to_vec())
}

proptest! {
    #[test]
    fn prop_history_capped_and_deduplicated(
        queries in prop::collection::vec("[a-cA-C ]{0,4}", 0..40),
    ) {
        let mut gate = SearchGate::new();

        for query in &queries {
            if let Ok(ticket) = gate.submit_search(query, SearchMode::Hybrid) {
                gate.finish_display(ticket.id);
            }

            prop_assert!(gate.history_len() <= HISTORY_CAP);
            let lowered: HashSet<String> = gate.history().map(|h| h.to_lowercase()).collect();
            prop_assert_eq!(lowered.len(), gate.history_len());
        }
    }

    #[test]
    fn prop_single_search_in_flight(
        queries in prop::collection::vec(("[a-z]{1,6}", arb_mode(), any::<bool>()), 1..20),
    ) {
        let mut gate = SearchGate::new();
        let mut active: Option<u64> = None;

        for (query, mode, finish) in queries {
            match gate.submit_search(&query, mode) {
                Ok(ticket) => {
                    prop_assert!(active.is_none(), "accepted a second concurrent search");
                    prop_assert_eq!(gate.mode(), mode);
                    active = Some(ticket.id);
                }
                Err(_) => prop_assert!(active.is_some()),
            }
            if finish {
                if let Some(id) = active.take() {
                    prop_assert!(gate.finish_display(id));
                }
            }
            prop_assert_eq!(gate.is_searching(), active.is_some());
        }
    }
}
