//! Question catalog - the fixed discovery framework
//!
//! The catalog is an immutable registry built once at startup and passed by
//! reference to every component. Questions carry their category, priority,
//! help text, examples, and (resolved at load time) an optional validator.

mod builtin;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validate::{self, Finding, ValidatorFn};

pub use builtin::builtin_questions;

/// Categories of information to discover
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Business Context")]
    BusinessContext,
    #[serde(rename = "Network Design")]
    NetworkDesign,
    #[serde(rename = "Security & Identity")]
    SecurityIdentity,
    #[serde(rename = "Governance")]
    Governance,
    #[serde(rename = "Compliance & Regulatory")]
    Compliance,
    #[serde(rename = "Operations & Management")]
    Operations,
    #[serde(rename = "Workload Planning")]
    WorkloadPlanning,
    #[serde(rename = "Cost & Budgeting")]
    CostBudgeting,
    #[serde(rename = "Integration & Connectivity")]
    Integration,
    #[serde(rename = "Disaster Recovery & Backup")]
    DisasterRecovery,
}

impl Category {
    /// All categories, in catalog presentation order
    pub const ALL: [Category; 10] = [
        Category::BusinessContext,
        Category::NetworkDesign,
        Category::SecurityIdentity,
        Category::Governance,
        Category::Compliance,
        Category::Operations,
        Category::WorkloadPlanning,
        Category::CostBudgeting,
        Category::Integration,
        Category::DisasterRecovery,
    ];
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Category::BusinessContext => "Business Context",
            Category::NetworkDesign => "Network Design",
            Category::SecurityIdentity => "Security & Identity",
            Category::Governance => "Governance",
            Category::Compliance => "Compliance & Regulatory",
            Category::Operations => "Operations & Management",
            Category::WorkloadPlanning => "Workload Planning",
            Category::CostBudgeting => "Cost & Budgeting",
            Category::Integration => "Integration & Connectivity",
            Category::DisasterRecovery => "Disaster Recovery & Backup",
        };
        write!(f, "{name}")
    }
}

/// Priority levels for discovery questions
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    /// Must have before deployment
    Critical,
    /// Should have, can proceed with assumptions
    High,
    /// Nice to have, can be defined later
    Medium,
    /// Optional, can evolve over time
    Low,
}

impl Priority {
    /// All priorities, most urgent first
    pub const ALL: [Priority; 4] = [
        Priority::Critical,
        Priority::High,
        Priority::Medium,
        Priority::Low,
    ];
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// A single discovery question
#[derive(Debug, Clone)]
pub struct Question {
    pub id: String,
    pub category: Category,
    pub priority: Priority,
    pub prompt: String,
    pub help: Option<String>,
    pub examples: Vec<String>,
    pub validation_pattern: Option<String>,
    pub related: Vec<String>,
    validator: Option<ValidatorFn>,
}

impl Question {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        priority: Priority,
        prompt: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            priority,
            prompt: prompt.into(),
            help: None,
            examples: Vec::new(),
            validation_pattern: None,
            related: Vec::new(),
            validator: None,
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn with_examples<I, S>(mut self, examples: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.examples = examples.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.validation_pattern = Some(pattern.into());
        self
    }

    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related = related.into_iter().map(Into::into).collect();
        self
    }

    /// Run the validator registered for this question, if any.
    ///
    /// Questions without a validator produce no findings.
    pub fn validate(&self, answer: &str) -> Vec<Finding> {
        match self.validator {
            Some(validator) => validator(answer),
            None => Vec::new(),
        }
    }

    /// Whether a validator was resolved for this question at catalog load
    pub fn has_validator(&self) -> bool {
        self.validator.is_some()
    }
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("unknown question id: {0}")]
    UnknownQuestion(String),
}

/// Immutable registry of discovery questions.
///
/// Built once at process start and shared by reference. Iteration order is
/// the catalog definition order.
pub struct Catalog {
    questions: Vec<Question>,
    by_id: HashMap<String, usize>,
}

impl Catalog {
    /// Build a catalog from a question list, resolving validators per id.
    ///
    /// Question ids must be unique; a duplicate replaces nothing and keeps
    /// the first definition.
    pub fn new(questions: Vec<Question>) -> Self {
        let mut resolved = Vec::with_capacity(questions.len());
        let mut by_id = HashMap::with_capacity(questions.len());

        for mut question in questions {
            if by_id.contains_key(&question.id) {
                tracing::warn!("Duplicate question id ignored: {}", question.id);
                continue;
            }
            question.validator = validate::validator_for(&question.id);
            by_id.insert(question.id.clone(), resolved.len());
            resolved.push(question);
        }

        Self {
            questions: resolved,
            by_id,
        }
    }

    /// The built-in landing zone discovery framework
    pub fn builtin() -> Self {
        Self::new(builtin_questions())
    }

    pub fn get(&self, id: &str) -> Result<&Question, CatalogError> {
        self.by_id
            .get(id)
            .map(|&idx| &self.questions[idx])
            .ok_or_else(|| CatalogError::UnknownQuestion(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    /// All questions in definition order
    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }

    /// Questions in one category, in definition order
    pub fn by_category(&self, category: Category) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.category == category)
            .collect()
    }

    /// Questions at one priority, in definition order
    pub fn by_priority(&self, priority: Priority) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| q.priority == priority)
            .collect()
    }

    /// All CRITICAL questions
    pub fn critical_questions(&self) -> Vec<&Question> {
        self.by_priority(Priority::Critical)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_is_consistent() {
        let catalog = Catalog::builtin();
        assert!(catalog.len() >= 40);

        // Every category is populated
        for category in Category::ALL {
            assert!(
                !catalog.by_category(category).is_empty(),
                "category {category} has no questions"
            );
        }

        // Related question ids all resolve
        for question in catalog.iter() {
            for related in &question.related {
                assert!(catalog.contains(related), "{related} not in catalog");
            }
        }
    }

    #[test]
    fn test_get_unknown_id_fails() {
        let catalog = Catalog::builtin();
        assert!(catalog.get("net_001").is_ok());
        assert!(matches!(
            catalog.get("nope_999"),
            Err(CatalogError::UnknownQuestion(_))
        ));
    }

    #[test]
    fn test_validators_resolved_at_load() {
        let catalog = Catalog::builtin();
        assert!(catalog.get("net_001").unwrap().has_validator());
        assert!(!catalog.get("biz_001").unwrap().has_validator());

        // Validator actually runs through the question
        let findings = catalog.get("net_001").unwrap().validate("10.0.0.0/16");
        assert!(!findings.is_empty());
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let catalog = Catalog::new(vec![
            Question::new("q1", Category::NetworkDesign, Priority::Critical, "first"),
            Question::new("q1", Category::Governance, Priority::Low, "second"),
        ]);
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.get("q1").unwrap().prompt, "first");
    }

    #[test]
    fn test_priority_filter_preserves_order() {
        let catalog = Catalog::builtin();
        let critical = catalog.critical_questions();
        assert!(!critical.is_empty());

        let ids: Vec<&str> = critical.iter().map(|q| q.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort_by_key(|id| {
            catalog
                .iter()
                .position(|q| q.id == *id)
                .unwrap_or(usize::MAX)
        });
        assert_eq!(ids, sorted);
    }
}
