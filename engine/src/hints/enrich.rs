//! Natural-language enrichment
//!
//! An external text generator may rewrite the deterministic hint or the
//! end-of-session feedback. Calls are async, may fail, and run off the
//! interactive path. Every request carries the identity of the round or
//! session it was made for so a late reply can be recognized as stale.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

use crate::models::{CoinDenomination, RoundId};

/// Replies outside these character bounds are rejected
pub const HINT_LENGTH: std::ops::Range<usize> = 5..100;
pub const FEEDBACK_LENGTH: std::ops::Range<usize> = 5..120;

/// Errors that can occur during enrichment
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EnrichmentError {
    #[error("Enrichment unavailable")]
    Unavailable,

    #[error("Enrichment timed out after {after_ms} ms")]
    TimedOut { after_ms: u128 },

    #[error("Enrichment reply rejected: {chars} chars outside {min}..{max}")]
    BadLength { chars: usize, min: usize, max: usize },

    #[error("Enrichment failed: {0}")]
    Failed(String),
}

/// Identity of one displayed hint.
///
/// Asking again in the same round issues a new `seq`, so a reply written
/// for an earlier tray state no longer matches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HintTicket {
    pub round: RoundId,
    pub seq: u64,
}

/// Generation counter for a play session. Bumped by every game reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(pub u64);

/// Input for a hint rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HintPrompt {
    pub remaining: i64,
    pub coins: Vec<CoinDenomination>,
}

impl HintPrompt {
    /// Plain-text prompt for a child-friendly one-sentence hint
    pub fn render(&self) -> String {
        let coins = if self.coins.is_empty() {
            "no coins yet".to_string()
        } else {
            self.coins
                .iter()
                .map(|c| format!("{} coin", c))
                .collect::<Vec<_>>()
                .join(", ")
        };
        format!(
            "Child has: {}. They still need {} more. Give one hint only.",
            coins, self.remaining
        )
    }
}

/// Input for a session feedback rewrite
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedbackPrompt {
    pub session_correct: u32,
    pub session_attempts: u32,
    pub total_correct_change_saved: i64,
    pub games_played: u32,
}

impl FeedbackPrompt {
    pub fn render(&self) -> String {
        let accuracy = if self.session_attempts == 0 {
            "no attempts yet".to_string()
        } else {
            format!(
                "{} correct out of {}",
                self.session_correct, self.session_attempts
            )
        };
        format!(
            "A child just finished a canteen coin-change game. Session result: {}. \
             Total correct change given across all games: {} coins. Games played: {}. \
             Write one warm, encouraging sentence.",
            accuracy, self.total_correct_change_saved, self.games_played
        )
    }
}

/// A request tagged with the identity it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentRequest {
    Hint { ticket: HintTicket, prompt: HintPrompt },
    Feedback { session: SessionId, prompt: FeedbackPrompt },
}

/// A validated reply, still tagged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentReply {
    Hint { ticket: HintTicket, text: String },
    Feedback { session: SessionId, text: String },
}

/// External text generator
#[async_trait]
pub trait TextEnricher: Send + Sync {
    /// Whether the generator can be called at all
    fn is_available(&self) -> bool;

    async fn enrich_hint(&self, prompt: &HintPrompt) -> Result<String, EnrichmentError>;

    async fn enrich_feedback(&self, prompt: &FeedbackPrompt) -> Result<String, EnrichmentError>;
}

/// Enricher for platforms without a text generator
#[derive(Debug, Clone, Copy, Default)]
pub struct NoEnricher;

#[async_trait]
impl TextEnricher for NoEnricher {
    fn is_available(&self) -> bool {
        false
    }

    async fn enrich_hint(&self, _prompt: &HintPrompt) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable)
    }

    async fn enrich_feedback(&self, _prompt: &FeedbackPrompt) -> Result<String, EnrichmentError> {
        Err(EnrichmentError::Unavailable)
    }
}

/// Trim a reply and check its length
pub fn validate_reply(
    text: &str,
    bounds: std::ops::Range<usize>,
) -> Result<String, EnrichmentError> {
    let trimmed = text.trim();
    let chars = trimmed.chars().count();
    if !bounds.contains(&chars) {
        return Err(EnrichmentError::BadLength {
            chars,
            min: bounds.start,
            max: bounds.end,
        });
    }
    Ok(trimmed.to_string())
}

/// Run one enrichment request with a time bound.
///
/// The reply keeps the request's hint ticket or session tag; deciding whether it
/// is still current is up to whoever applies it.
pub async fn enrich_with_timeout(
    enricher: &dyn TextEnricher,
    request: &EnrichmentRequest,
    timeout: Duration,
) -> Result<EnrichmentReply, EnrichmentError> {
    if !enricher.is_available() {
        return Err(EnrichmentError::Unavailable);
    }

    match tokio::time::timeout(timeout, call_enricher(enricher, request)).await {
        Ok(result) => result,
        Err(_) => Err(EnrichmentError::TimedOut {
            after_ms: timeout.as_millis(),
        }),
    }
}

async fn call_enricher(
    enricher: &dyn TextEnricher,
    request: &EnrichmentRequest,
) -> Result<EnrichmentReply, EnrichmentError> {
    match request {
        EnrichmentRequest::Hint { ticket, prompt } => {
            let text = enricher.enrich_hint(prompt).await?;
            Ok(EnrichmentReply::Hint {
                ticket: *ticket,
                text: validate_reply(&text, HINT_LENGTH)?,
            })
        }
        EnrichmentRequest::Feedback { session, prompt } => {
            let text = enricher.enrich_feedback(prompt).await?;
            Ok(EnrichmentReply::Feedback {
                session: *session,
                text: validate_reply(&text, FEEDBACK_LENGTH)?,
            })
        }
    }
}
