//! Gap analysis - what the session still needs
//!
//! Everything here is computed fresh from the catalog and the current
//! session on every call; nothing is cached, so results always reflect the
//! latest recorded answer, including those applied by background extraction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, Category, Priority, Question};
use crate::session::Session;

/// Per-category answered/total tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryCompletion {
    pub category: String,
    pub answered: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Per-priority answered/total tally
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriorityCompletion {
    pub priority: String,
    pub answered: usize,
    pub total: usize,
    pub percentage: f64,
}

/// Read-only projection of a session's progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub timestamp: String,
    pub total_questions: usize,
    pub answered: usize,
    pub completion_percentage: f64,
    pub documents_analyzed: usize,
    /// Answer counts keyed by source name
    pub answers_by_source: BTreeMap<String, usize>,
    pub critical_answered: usize,
    pub critical_total: usize,
    pub critical_percentage: f64,
    pub by_category: Vec<CategoryCompletion>,
    pub by_priority: Vec<PriorityCompletion>,
    /// Prompts of unanswered CRITICAL questions
    pub missing_critical: Vec<String>,
}

/// Questions not yet answered, optionally filtered by priority, in catalog
/// definition order.
pub fn missing<'a>(
    catalog: &'a Catalog,
    session: &Session,
    priority: Option<Priority>,
) -> Vec<&'a Question> {
    catalog
        .iter()
        .filter(|q| priority.map_or(true, |p| q.priority == p))
        .filter(|q| !session.is_answered(&q.id))
        .collect()
}

/// Unanswered CRITICAL questions, in catalog order
pub fn missing_critical<'a>(catalog: &'a Catalog, session: &Session) -> Vec<&'a Question> {
    missing(catalog, session, Some(Priority::Critical))
}

/// Answered/total/percentage per category
pub fn completion_by_category(catalog: &Catalog, session: &Session) -> Vec<CategoryCompletion> {
    Category::ALL
        .iter()
        .map(|&category| {
            let questions = catalog.by_category(category);
            let answered = questions
                .iter()
                .filter(|q| session.is_answered(&q.id))
                .count();
            let total = questions.len();
            CategoryCompletion {
                category: category.to_string(),
                answered,
                total,
                percentage: if total == 0 {
                    0.0
                } else {
                    answered as f64 / total as f64 * 100.0
                },
            }
        })
        .collect()
}

/// Answered/total/percentage per priority, most urgent first
pub fn completion_by_priority(catalog: &Catalog, session: &Session) -> Vec<PriorityCompletion> {
    Priority::ALL
        .iter()
        .map(|&priority| {
            let questions = catalog.by_priority(priority);
            let answered = questions
                .iter()
                .filter(|q| session.is_answered(&q.id))
                .count();
            let total = questions.len();
            PriorityCompletion {
                priority: priority.to_string(),
                answered,
                total,
                percentage: if total == 0 {
                    0.0
                } else {
                    answered as f64 / total as f64 * 100.0
                },
            }
        })
        .collect()
}

/// Build the full summary projection for a session.
pub fn summarize(catalog: &Catalog, session: &Session) -> SessionSummary {
    let mut answers_by_source = BTreeMap::new();
    for answer in session.answers.values() {
        *answers_by_source
            .entry(answer.source.to_string())
            .or_insert(0) += 1;
    }

    let critical = catalog.critical_questions();
    let critical_total = critical.len();
    let critical_answered = critical
        .iter()
        .filter(|q| session.is_answered(&q.id))
        .count();

    SessionSummary {
        session_id: session.session_id.clone(),
        timestamp: session.created_at.to_rfc3339(),
        total_questions: catalog.len(),
        answered: session.answered_count(),
        completion_percentage: session.completion_percentage,
        documents_analyzed: session.documents_analyzed.len(),
        answers_by_source,
        critical_answered,
        critical_total,
        critical_percentage: if critical_total == 0 {
            0.0
        } else {
            critical_answered as f64 / critical_total as f64 * 100.0
        },
        by_category: completion_by_category(catalog, session),
        by_priority: completion_by_priority(catalog, session),
        missing_critical: missing_critical(catalog, session)
            .iter()
            .map(|q| q.prompt.clone())
            .collect(),
    }
}
