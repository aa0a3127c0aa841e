//! Hints and session feedback
//!
//! - **advisor**: deterministic hint and feedback text, displayed state
//! - **enrich**: optional async rewrite by an external text generator

pub mod advisor;
pub mod enrich;

pub use advisor::{fallback_feedback, fallback_hint, Displayed, HintAdvisor};
pub use enrich::{
    enrich_with_timeout, validate_reply, EnrichmentError, EnrichmentReply, EnrichmentRequest,
    FeedbackPrompt, HintPrompt, HintTicket, NoEnricher, SessionId, TextEnricher, FEEDBACK_LENGTH,
    HINT_LENGTH,
};
