//! Answer resolution - accept, defer, or discard extraction candidates
//!
//! The resolver decides what happens to each candidate answer arriving from
//! automated extraction, and reconciles answers from multiple sources:
//!
//! - A question already answered in the session discards later automated
//!   candidates (first accepted answer wins; an automated guess never
//!   silently replaces a confirmed fact).
//! - Candidates at or above the confidence threshold are accepted directly.
//! - Candidates below the threshold are parked for human review, the most
//!   recent candidate per question replacing any earlier one.
//! - User answers bypass the threshold entirely: they always win, including
//!   over prior user answers and parked candidates.

use tracing::debug;

use crate::catalog::Question;
use crate::validate::Finding;

use super::{Answer, PendingReview, Session};

/// Default acceptance threshold for automated candidates
pub const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.85;

/// Outcome of resolving one extraction candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Accepted directly into the session's answers
    Accepted,
    /// Parked in the pending-review cache for a human decision
    Deferred,
    /// Discarded: the question already has an accepted answer
    AlreadyAnswered,
}

/// Stateless resolution policy; the session and pending cache are owned by
/// the lifecycle manager and passed in by reference.
#[derive(Debug, Clone, Copy)]
pub struct Resolver {
    threshold: f64,
}

impl Resolver {
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
        }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Resolve one automated extraction candidate.
    pub fn resolve(
        &self,
        session: &mut Session,
        pending: &mut PendingReview,
        total_questions: usize,
        candidate: Answer,
    ) -> Resolution {
        debug_assert!(
            candidate.source.is_automated(),
            "user answers go through record_user_answer"
        );

        if session.is_answered(&candidate.question_id) {
            debug!(
                question_id = %candidate.question_id,
                "Discarding candidate for already-answered question"
            );
            return Resolution::AlreadyAnswered;
        }

        if candidate.confidence >= self.threshold {
            // Keep answers and the pending cache mutually exclusive
            pending.discard(&candidate.question_id);
            debug!(
                question_id = %candidate.question_id,
                confidence = candidate.confidence,
                "Auto-accepting candidate"
            );
            session.record(candidate, total_questions);
            Resolution::Accepted
        } else {
            debug!(
                question_id = %candidate.question_id,
                confidence = candidate.confidence,
                "Parking low-confidence candidate for review"
            );
            pending.park(candidate);
            Resolution::Deferred
        }
    }

    /// Record a user-supplied answer.
    ///
    /// Always writes at confidence 1.0, overwriting any existing answer and
    /// clearing any parked candidate for the question. Returns the recorded
    /// answer together with advisory validation findings; findings never
    /// prevent the write.
    pub fn record_user_answer(
        &self,
        session: &mut Session,
        pending: &mut PendingReview,
        total_questions: usize,
        question: &Question,
        text: &str,
    ) -> (Answer, Vec<Finding>) {
        pending.discard(&question.id);

        let answer = Answer::from_user(&question.id, text);
        session.record(answer.clone(), total_questions);

        let findings = question.validate(text);
        (answer, findings)
    }

    /// Promote a parked candidate into the session's answers.
    pub fn accept_pending(
        &self,
        session: &mut Session,
        pending: &mut PendingReview,
        total_questions: usize,
        question_id: &str,
    ) -> Option<Answer> {
        let answer = pending.take(question_id)?;
        session.record(answer.clone(), total_questions);
        Some(answer)
    }
}

impl Default for Resolver {
    fn default() -> Self {
        Self::new(DEFAULT_CONFIDENCE_THRESHOLD)
    }
}
