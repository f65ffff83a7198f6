//! Conversation turn-taking state machine.
//!
//! `idle -> awaiting-reply -> idle`. A submission appends the user turn and a
//! pending assistant placeholder; resolution swaps the placeholder for the
//! finalized reply (or the apology) in the same, last, position.

use std::sync::Arc;

use super::collaborators::ReplyGenerator;
use super::error::{CollaboratorError, Rejection};
use super::models::{ConversationTurn, ResearchContext, TurnRole};

/// Shown in place of a reply when the generator fails.
pub const APOLOGY: &str = "I apologize, but I encountered an issue processing your question. \
Please try again or rephrase your query.";

/// Follow-ups offered once the conversation has started.
pub const SUGGESTED_QUESTIONS: [&str; 6] = [
    "Can you elaborate on the methodology used in these studies?",
    "What are the limitations of this research?",
    "How does this compare to other research in the field?",
    "What are the practical applications of these findings?",
    "Are there any contradictory findings I should be aware of?",
    "Can you search for more recent studies on this topic?",
];

/// Number of suggestions shown at once.
pub const VISIBLE_SUGGESTIONS: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConversationPhase {
    Idle,
    AwaitingReply { placeholder_id: String },
}

/// Ticket for one in-flight exchange, handed to the reply generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingExchange {
    pub placeholder_id: String,
    pub prompt: String,
}

/// Ordered transcript plus the single-writer turn-taking state.
#[derive(Debug, Clone)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
    phase: ConversationPhase,
    context: Option<ResearchContext>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            turns: Vec::new(),
            phase: ConversationPhase::Idle,
            context: None,
        }
    }

    /// Start a conversation grounded in earlier research, seeded with one
    /// assistant turn summarizing it.
    pub fn with_context(context: ResearchContext) -> Self {
        let opening = ConversationTurn::assistant(context_summary(&context))
            .with_sources(context.sources.iter().map(|s| s.id.clone()).collect());

        Self {
            turns: vec![opening],
            phase: ConversationPhase::Idle,
            context: Some(context),
        }
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    pub fn phase(&self) -> &ConversationPhase {
        &self.phase
    }

    pub fn context(&self) -> Option<&ResearchContext> {
        self.context.as_ref()
    }

    pub fn is_awaiting_reply(&self) -> bool {
        matches!(self.phase, ConversationPhase::AwaitingReply { .. })
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Submit a user turn.
    ///
    /// Blank text and submissions while a reply is outstanding are rejected
    /// without touching the transcript.
    pub fn submit(&mut self, text: &str) -> Result<PendingExchange, Rejection> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Rejection::EmptyInput);
        }
        if self.is_awaiting_reply() {
            return Err(Rejection::ConcurrentSubmission);
        }

        let placeholder = ConversationTurn::placeholder();
        let placeholder_id = placeholder.id.clone();

        self.turns.push(ConversationTurn::user(text));
        self.turns.push(placeholder);
        self.phase = ConversationPhase::AwaitingReply {
            placeholder_id: placeholder_id.clone(),
        };

        log::debug!("Conversation awaiting reply (placeholder {placeholder_id})");

        Ok(PendingExchange {
            placeholder_id,
            prompt: text.to_string(),
        })
    }

    /// Replace the placeholder with the finalized reply or the apology.
    ///
    /// Returns false (and changes nothing) if `placeholder_id` is not the
    /// current in-flight exchange.
    pub fn resolve(
        &mut self,
        placeholder_id: &str,
        outcome: Result<String, CollaboratorError>,
    ) -> bool {
        match &self.phase {
            ConversationPhase::AwaitingReply { placeholder_id: current }
                if current == placeholder_id => {}
            _ => {
                log::debug!("Ignoring stale reply for placeholder {placeholder_id}");
                return false;
            }
        }

        let text = match outcome {
            Ok(reply) => reply,
            Err(e) => {
                log::warn!("Reply generation failed: {e}");
                APOLOGY.to_string()
            }
        };

        // The placeholder is always last while awaiting.
        if self
            .turns
            .last()
            .is_some_and(|t| t.pending && t.id == placeholder_id)
        {
            self.turns.pop();
        } else {
            self.turns.retain(|t| t.id != placeholder_id);
        }
        self.turns.push(ConversationTurn::assistant(text));
        self.phase = ConversationPhase::Idle;
        true
    }

    /// The most recent finished assistant turn.
    pub fn latest_reply(&self) -> Option<&ConversationTurn> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == TurnRole::Assistant && !t.pending)
    }

    /// Suggested follow-ups, offered only while idle with a started transcript.
    pub fn suggestions(&self) -> &'static [&'static str] {
        if self.turns.is_empty() || self.is_awaiting_reply() {
            &[]
        } else {
            &SUGGESTED_QUESTIONS[..VISIBLE_SUGGESTIONS]
        }
    }

    /// Drop all turns. Refused while a reply is outstanding.
    pub fn clear(&mut self) -> Result<(), Rejection> {
        if self.is_awaiting_reply() {
            return Err(Rejection::ConcurrentSubmission);
        }
        self.turns.clear();
        Ok(())
    }
}

/// The opening assistant turn for a conversation seeded with research.
pub fn context_summary(context: &ResearchContext) -> String {
    format!(
        "I've analyzed your search for \"{}\" and found {} relevant sources. Here's what I \
         discovered:\n\n{}\n\nFeel free to ask me follow-up questions about these findings, \
         request specific details about any source, or explore related topics!",
        context.query,
        context.sources.len(),
        context.summary
    )
}

/// Run one exchange against the generator. Never retries.
pub async fn request_reply(
    generator: Arc<dyn ReplyGenerator>,
    exchange: &PendingExchange,
    context: Option<ResearchContext>,
) -> Result<String, CollaboratorError> {
    generator
        .generate_reply(exchange.prompt.clone(), context)
        .await
}
