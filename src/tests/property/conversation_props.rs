//! Property-based tests for conversation turn-taking
//!
//! Tests invariants:
//! - At most one pending placeholder, always the last turn
//! - Submissions while awaiting never change the transcript
//! - Every accepted submission adds exactly two turns

use proptest::prelude::*;

use crate::core::conversation::Conversation;
use crate::core::error::{CollaboratorError, Rejection};
use crate::core::models::TurnRole;

// ============================================================================
// Operation Strategy
// ============================================================================

#[derive(Debug, Clone)]
enum Op {
    Submit(String),
    ResolveOk(String),
    ResolveErr,
    ResolveStale,
    Clear,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => "[ a-z?]{0,12}".prop_map(Op::Submit),
        2 => "[a-z ]{1,20}".prop_map(Op::ResolveOk),
        1 => Just(Op::ResolveErr),
        1 => Just(Op::ResolveStale),
        1 => Just(Op::Clear),
    ]
}

fn pending_id(conversation: &Conversation) -> Option<String> {
    conversation
        .turns()
        .iter()
        .find(|t| t.pending)
        .map(|t| t.id.clone())
}

fn assert_transcript_invariants(conversation: &Conversation) -> Result<(), TestCaseError> {
    let pending: Vec<_> = conversation.turns().iter().filter(|t| t.pending).collect();
    prop_assert!(pending.len() <= 1, "more than one pending turn");
    prop_assert_eq!(pending.len() == 1, conversation.is_awaiting_reply());
    if let Some(p) = pending.first() {
        let last = conversation.turns().last().map(|t| t.id.clone());
        prop_assert_eq!(Some(p.id.clone()), last, "placeholder is not the last turn");
        prop_assert_eq!(p.role, TurnRole::Assistant);
    }
    Ok(())
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn prop_placeholder_is_unique_and_last(ops in prop::collection::vec(arb_op(), 0..40)) {
        let mut conversation = Conversation::new();

        for op in ops {
            match op {
                Op::Submit(text) => {
                    let _ = conversation.submit(&text);
                }
                Op::ResolveOk(reply) => {
                    if let Some(id) = pending_id(&conversation) {
                        prop_assert!(conversation.resolve(&id, Ok(reply)));
                    }
                }
                Op::ResolveErr => {
                    if let Some(id) = pending_id(&conversation) {
                        let outcome = Err(CollaboratorError::Reply("down".into()));
                        prop_assert!(conversation.resolve(&id, outcome));
                    }
                }
                Op::ResolveStale => {
                    let before = conversation.turns().to_vec();
                    prop_assert!(!conversation.resolve("not-a-placeholder", Ok("x".into())));
                    prop_assert_eq!(conversation.turns(), before.as_slice());
                }
                Op::Clear => {
                    let _ = conversation.clear();
                }
            }
            assert_transcript_invariants(&conversation)?;
        }
    }

    #[test]
    fn prop_submit_while_awaiting_is_noop(first in "[a-z]{1,10}", second in "[a-z ]{0,10}") {
        let mut conversation = Conversation::new();
        conversation.submit(&first).unwrap();
        let before = conversation.turns().to_vec();

        let result = conversation.submit(&second);
        prop_assert!(result.is_err());
        prop_assert_eq!(conversation.turns(), before.as_slice());
    }

    #[test]
    fn prop_accepted_submit_adds_two_turns(text in "[a-z][a-z ]{0,20}") {
        let mut conversation = Conversation::new();
        let before = conversation.len();
        let exchange = conversation.submit(&text).unwrap();

        prop_assert_eq!(conversation.len(), before + 2);
        prop_assert_eq!(exchange.prompt, text.trim());
        prop_assert_eq!(&conversation.turns()[before].text, text.trim());
    }

    #[test]
    fn prop_whitespace_never_submits(text in "[ \t\n]{0,10}") {
        let mut conversation = Conversation::new();
        prop_assert_eq!(conversation.submit(&text).err(), Some(Rejection::EmptyInput));
        prop_assert!(conversation.is_empty());
    }
}
