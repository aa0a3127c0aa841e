//! Hint advisor
//!
//! Produces the deterministic hint and summary feedback, and decides
//! whether an enrichment reply may replace the displayed text.

use super::enrich::{EnrichmentReply, HintTicket, SessionId};
use crate::models::{CoinDenomination, RoundId};

/// Deterministic hint for the amount still missing.
///
/// # Example
/// ```
/// use canteen_change_core::hints::fallback_hint;
///
/// assert_eq!(fallback_hint(7), "Try adding a 5 coin! You still need 7 more.");
/// assert_eq!(fallback_hint(0), "You've got the right amount!");
/// ```
pub fn fallback_hint(remaining: i64) -> String {
    if remaining == 0 {
        return "You've got the right amount!".to_string();
    }
    if remaining < 0 {
        return format!("That's {} too many. Try smaller coins!", -remaining);
    }
    match CoinDenomination::largest_at_most(remaining) {
        Some(coin) => format!(
            "Try adding a {} coin! You still need {} more.",
            coin, remaining
        ),
        None => format!("You need {} more. Try smaller coins!", remaining),
    }
}

/// Deterministic end-of-session message, tiered by session accuracy
pub fn fallback_feedback(session_accuracy: f64) -> &'static str {
    if session_accuracy >= 1.0 {
        "Perfect change every time! The canteen would never lose a single coin!"
    } else if session_accuracy >= 0.66 {
        "Great work! You're learning faster than anyone!"
    } else if session_accuracy >= 0.33 {
        "Keep going! Everyone makes mistakes at first, that's how we learn."
    } else {
        "Don't give up! Every wrong coin teaches you something new."
    }
}

/// Text on screen for a round or session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Displayed<Id> {
    pub owner: Id,
    pub text: String,
    pub enriched: bool,
}

/// Holds the displayed hint and feedback
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HintAdvisor {
    hint: Option<Displayed<HintTicket>>,
    feedback: Option<Displayed<SessionId>>,
    /// Bumped on every hint shown
    hint_seq: u64,
}

impl HintAdvisor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn hint(&self) -> Option<&Displayed<HintTicket>> {
        self.hint.as_ref()
    }

    pub fn feedback(&self) -> Option<&Displayed<SessionId>> {
        self.feedback.as_ref()
    }

    /// Show the deterministic hint for `round` under a fresh ticket
    pub fn show_hint(&mut self, round: RoundId, remaining: i64) -> String {
        let text = fallback_hint(remaining);
        self.hint_seq += 1;
        self.hint = Some(Displayed {
            owner: HintTicket {
                round,
                seq: self.hint_seq,
            },
            text: text.clone(),
            enriched: false,
        });
        text
    }

    /// Show the deterministic feedback for `session`
    pub fn show_feedback(&mut self, session: SessionId, session_accuracy: f64) -> String {
        let text = fallback_feedback(session_accuracy).to_string();
        self.feedback = Some(Displayed {
            owner: session,
            text: text.clone(),
            enriched: false,
        });
        text
    }

    /// Replace displayed text with an enrichment reply if it is still
    /// current. Returns whether the reply was applied.
    ///
    /// A hint reply applies only while `live_round` is the round it was
    /// requested for and the hint it was requested for is still the one on
    /// screen. Asking again in the same round retires the older ticket. A
    /// feedback reply
    /// applies only within the session it was requested for.
    pub fn accept(
        &mut self,
        reply: EnrichmentReply,
        live_round: Option<RoundId>,
        live_session: SessionId,
    ) -> bool {
        match reply {
            EnrichmentReply::Hint { ticket, text } => match &mut self.hint {
                Some(shown) if shown.owner == ticket && live_round == Some(ticket.round) => {
                    shown.text = text;
                    shown.enriched = true;
                    true
                }
                _ => false,
            },
            EnrichmentReply::Feedback { session, text } => match &mut self.feedback {
                Some(shown) if shown.owner == session && session == live_session => {
                    shown.text = text;
                    shown.enriched = true;
                    true
                }
                _ => false,
            },
        }
    }

    /// Forget the displayed hint (tray cleared, round ended)
    pub fn clear_hint(&mut self) {
        self.hint = None;
    }

    pub fn clear(&mut self) {
        self.hint = None;
        self.feedback = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_hint_picks_largest_fitting_coin() {
        assert_eq!(
            fallback_hint(25),
            "Try adding a 20 coin! You still need 25 more."
        );
        assert_eq!(fallback_hint(3), "Try adding a 1 coin! You still need 3 more.");
        assert_eq!(fallback_hint(-4), "That's 4 too many. Try smaller coins!");
    }

    #[test]
    fn test_feedback_tiers() {
        assert!(fallback_feedback(1.0).starts_with("Perfect"));
        assert!(fallback_feedback(0.7).starts_with("Great"));
        assert!(fallback_feedback(0.5).starts_with("Keep going"));
        assert!(fallback_feedback(0.0).starts_with("Don't give up"));
    }

    #[test]
    fn test_stale_hint_discarded() {
        let mut advisor = HintAdvisor::new();
        advisor.show_hint(RoundId(1), 5);
        let reply = EnrichmentReply::Hint {
            ticket: advisor.hint().unwrap().owner,
            text: "Pick one shiny coin!".to_string(),
        };
        // round 1 already replaced by round 2
        assert!(!advisor.accept(reply.clone(), Some(RoundId(2)), SessionId(0)));
        assert!(!advisor.hint().unwrap().enriched);

        assert!(advisor.accept(reply, Some(RoundId(1)), SessionId(0)));
        assert_eq!(advisor.hint().unwrap().text, "Pick one shiny coin!");
    }

    #[test]
    fn test_second_hint_in_round_retires_first_ticket() {
        let mut advisor = HintAdvisor::new();
        advisor.show_hint(RoundId(1), 10);
        let first = advisor.hint().unwrap().owner;
        advisor.show_hint(RoundId(1), 3);
        let second = advisor.hint().unwrap().owner;
        assert_ne!(first, second);

        let late = EnrichmentReply::Hint {
            ticket: first,
            text: "Grab a ten coin!".to_string(),
        };
        assert!(!advisor.accept(late, Some(RoundId(1)), SessionId(0)));
        assert_eq!(
            advisor.hint().unwrap().text,
            "Try adding a 1 coin! You still need 3 more."
        );
    }

    #[test]
    fn test_feedback_reply_needs_same_session() {
        let mut advisor = HintAdvisor::new();
        advisor.show_feedback(SessionId(3), 0.5);
        let reply = EnrichmentReply::Feedback {
            session: SessionId(3),
            text: "You are a canteen hero!".to_string(),
        };
        assert!(!advisor.accept(reply.clone(), None, SessionId(4)));
        assert!(advisor.accept(reply, None, SessionId(3)));
        assert!(advisor.feedback().unwrap().enriched);
    }
}
