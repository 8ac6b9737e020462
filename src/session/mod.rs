//! Discovery session state
//!
//! A session holds the answers gathered so far, the set of documents that
//! contributed, and a derived completion percentage that is recomputed on
//! every mutation. Answers are immutable once created; a correction writes
//! a replacement answer for the same question id.

pub mod manager;
pub mod resolver;

use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use manager::{CheckpointHook, Workshop, WorkshopOptions};
pub use resolver::{Resolution, Resolver};

/// Where an answer came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnswerSource {
    Document,
    SearchIndex,
    UserInput,
    Assumption,
}

impl AnswerSource {
    /// Automated sources are subject to the confidence threshold and the
    /// first-accepted-wins rule; user input is not.
    pub fn is_automated(&self) -> bool {
        matches!(self, AnswerSource::Document | AnswerSource::SearchIndex)
    }
}

impl std::fmt::Display for AnswerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnswerSource::Document => write!(f, "document"),
            AnswerSource::SearchIndex => write!(f, "search_index"),
            AnswerSource::UserInput => write!(f, "user_input"),
            AnswerSource::Assumption => write!(f, "assumption"),
        }
    }
}

/// An answer to a discovery question
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub question_id: String,
    pub answer: String,
    pub source: AnswerSource,
    /// Extraction confidence in [0.0, 1.0]; user input is always 1.0
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub document_reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Answer {
    /// An answer produced by automated extraction
    pub fn extracted(
        question_id: impl Into<String>,
        answer: impl Into<String>,
        source: AnswerSource,
        confidence: f64,
        document_reference: Option<String>,
    ) -> Self {
        Self {
            question_id: question_id.into(),
            answer: answer.into(),
            source,
            confidence: confidence.clamp(0.0, 1.0),
            document_reference,
            notes: None,
        }
    }

    /// An answer typed by the user; confidence is fixed at 1.0
    pub fn from_user(question_id: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question_id: question_id.into(),
            answer: answer.into(),
            source: AnswerSource::UserInput,
            confidence: 1.0,
            document_reference: None,
            notes: Some("Provided during interactive discovery session".to_string()),
        }
    }
}

/// A discovery workshop session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    /// One current answer per question id; last write wins
    pub answers: HashMap<String, Answer>,
    /// Identifiers of documents that contributed answers
    pub documents_analyzed: BTreeSet<String>,
    /// Derived: 100 * answered / catalog size, recomputed on every mutation
    pub completion_percentage: f64,
}

impl Session {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            created_at: Utc::now(),
            answers: HashMap::new(),
            documents_analyzed: BTreeSet::new(),
            completion_percentage: 0.0,
        }
    }

    pub fn answered_count(&self) -> usize {
        self.answers.len()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answers.contains_key(question_id)
    }

    /// Record an answer and recompute completion against the catalog size.
    /// Overwrites any previous answer for the same question id.
    pub fn record(&mut self, answer: Answer, total_questions: usize) {
        self.answers.insert(answer.question_id.clone(), answer);
        self.recompute_completion(total_questions);
    }

    pub fn mark_document_analyzed(&mut self, document: impl Into<String>) {
        self.documents_analyzed.insert(document.into());
    }

    /// Recompute the derived completion percentage.
    pub fn recompute_completion(&mut self, total_questions: usize) {
        self.completion_percentage = if total_questions == 0 {
            0.0
        } else {
            100.0 * self.answers.len() as f64 / total_questions as f64
        };
    }
}

/// Low-confidence candidates parked for human review.
///
/// A question id in this cache is never simultaneously present in the
/// session's answers: accepting promotes the entry, rejecting discards it.
#[derive(Debug, Clone, Default)]
pub struct PendingReview {
    entries: HashMap<String, Answer>,
}

impl PendingReview {
    pub fn new() -> Self {
        Self::default()
    }

    /// Park a candidate, replacing any prior candidate for the same id.
    pub fn park(&mut self, candidate: Answer) {
        self.entries
            .insert(candidate.question_id.clone(), candidate);
    }

    /// Remove and return the entry for a question id.
    pub fn take(&mut self, question_id: &str) -> Option<Answer> {
        self.entries.remove(question_id)
    }

    /// Discard the entry for a question id. Returns whether one existed.
    pub fn discard(&mut self, question_id: &str) -> bool {
        self.entries.remove(question_id).is_some()
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.entries.contains_key(question_id)
    }

    pub fn get(&self, question_id: &str) -> Option<&Answer> {
        self.entries.get(question_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Snapshot of all parked candidates
    pub fn entries(&self) -> Vec<Answer> {
        let mut parked: Vec<Answer> = self.entries.values().cloned().collect();
        parked.sort_by(|a, b| a.question_id.cmp(&b.question_id));
        parked
    }
}
