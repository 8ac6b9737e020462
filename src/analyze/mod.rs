//! Document analysis pass
//!
//! Orchestrates one sweep over the document store: fetch and extract every
//! artifact, build the search index, then gather an answer candidate for
//! each unanswered catalog question and feed the candidates through the
//! resolver. Candidate gathering is fanned out across blocking worker
//! tasks (collaborator calls block on I/O); all session writes happen
//! sequentially afterwards, so an accepted answer is never raced by a
//! later candidate. A failing document or question is logged and skipped,
//! never aborting the batch.

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::catalog::Question;
use crate::collab::{
    AnswerOracle, ContentExtractor, DocumentStore, ExtractedContent, SearchIndex,
};
use crate::session::{Answer, AnswerSource, Resolution, Workshop};

/// Tunables for one analysis pass
#[derive(Debug, Clone)]
pub struct AnalyzeOptions {
    /// Snippets fetched per question when the search index is in use
    pub search_top_k: usize,
    /// Use the search index to narrow context (fall back to direct
    /// document scans when disabled or empty)
    pub use_search_index: bool,
    /// Max characters of each document fed to the oracle in fallback mode
    pub context_chars: usize,
    /// Max documents combined into one fallback context window
    pub max_context_docs: usize,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            search_top_k: 3,
            use_search_index: true,
            context_chars: 2000,
            max_context_docs: 3,
        }
    }
}

/// Outcome tallies for one analysis pass
#[derive(Debug, Clone, Default)]
pub struct AnalysisReport {
    pub documents_processed: usize,
    pub documents_failed: usize,
    pub answers_accepted: usize,
    pub cached_for_review: usize,
    pub questions_errored: usize,
    /// Whether the pass ran against the search index or direct scans
    pub used_search: bool,
}

pub struct DocumentAnalyzer {
    store: Arc<dyn DocumentStore>,
    extractor: Arc<dyn ContentExtractor>,
    index: Arc<dyn SearchIndex>,
    oracle: Arc<dyn AnswerOracle>,
    options: AnalyzeOptions,
}

impl DocumentAnalyzer {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        extractor: Arc<dyn ContentExtractor>,
        index: Arc<dyn SearchIndex>,
        oracle: Arc<dyn AnswerOracle>,
        options: AnalyzeOptions,
    ) -> Self {
        Self {
            store,
            extractor,
            index,
            oracle,
            options,
        }
    }

    /// Run one full analysis pass against the active session.
    pub async fn run(&self, workshop: &Workshop) -> Result<AnalysisReport> {
        let mut report = AnalysisReport::default();

        let documents = self.extract_all(&mut report).await?;
        if documents.is_empty() {
            warn!("No readable documents found; nothing to analyze");
            return Ok(report);
        }

        report.used_search = self.options.use_search_index;
        if report.used_search {
            self.index.index(&documents);
            if self.index.is_empty() {
                warn!("Search index is empty, scanning document text directly");
                report.used_search = false;
            }
        }

        let questions = workshop.missing_questions(None);
        info!(
            "Gathering candidates for {} unanswered questions across {} documents",
            questions.len(),
            documents.len()
        );

        let documents = Arc::new(documents);
        let mut tasks: JoinSet<(String, Result<Option<Answer>>)> = JoinSet::new();
        for question in questions {
            let index = Arc::clone(&self.index);
            let oracle = Arc::clone(&self.oracle);
            let documents = Arc::clone(&documents);
            let options = self.options.clone();
            let use_search = report.used_search;

            tasks.spawn_blocking(move || {
                let id = question.id.clone();
                let outcome =
                    gather_candidate(&question, use_search, &*index, &documents, &*oracle, &options);
                (id, outcome)
            });
        }

        // Apply candidates one at a time; each resolution is atomic and an
        // interrupted batch keeps everything already accepted.
        while let Some(joined) = tasks.join_next().await {
            let (question_id, outcome) = match joined {
                Ok(result) => result,
                Err(e) => {
                    warn!("Candidate task failed: {e}");
                    report.questions_errored += 1;
                    continue;
                }
            };

            match outcome {
                Ok(Some(candidate)) => {
                    let reference = candidate.document_reference.clone();
                    match workshop.record_candidate(candidate) {
                        Ok(Resolution::Accepted) => {
                            report.answers_accepted += 1;
                            if let Some(doc) = reference {
                                workshop.mark_document_analyzed(doc);
                            }
                        }
                        Ok(Resolution::Deferred) => report.cached_for_review += 1,
                        Ok(Resolution::AlreadyAnswered) => {}
                        Err(e) => {
                            warn!("Failed to record candidate for {question_id}: {e:#}");
                            report.questions_errored += 1;
                        }
                    }
                }
                Ok(None) => {}
                Err(e) => {
                    warn!("Extraction failed for {question_id}: {e:#}");
                    report.questions_errored += 1;
                }
            }
        }

        info!(
            "Analysis complete: {} accepted, {} cached for review, {} errors",
            report.answers_accepted, report.cached_for_review, report.questions_errored
        );
        Ok(report)
    }

    /// Fetch and extract every artifact in the store. Per-document
    /// failures are counted and skipped.
    async fn extract_all(&self, report: &mut AnalysisReport) -> Result<Vec<ExtractedContent>> {
        let store = Arc::clone(&self.store);
        let artifacts = tokio::task::spawn_blocking(move || store.list())
            .await
            .context("Document listing task failed")??;

        info!("Found {} documents to analyze", artifacts.len());

        let mut tasks: JoinSet<(String, Result<ExtractedContent>)> = JoinSet::new();
        for artifact in artifacts {
            let store = Arc::clone(&self.store);
            let extractor = Arc::clone(&self.extractor);
            tasks.spawn_blocking(move || {
                let outcome = store
                    .fetch(&artifact.name)
                    .and_then(|raw| extractor.extract(&raw, artifact.doc_type, &artifact.name));
                (artifact.name, outcome)
            });
        }

        let mut documents = Vec::new();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((_, Ok(content))) => {
                    report.documents_processed += 1;
                    documents.push(content);
                }
                Ok((name, Err(e))) => {
                    warn!("Skipping document {name}: {e:#}");
                    report.documents_failed += 1;
                }
                Err(e) => {
                    warn!("Extraction task failed: {e}");
                    report.documents_failed += 1;
                }
            }
        }

        // Stable order keeps fallback context windows deterministic
        documents.sort_by(|a, b| a.artifact.cmp(&b.artifact));
        Ok(documents)
    }
}

/// Build the context window for one question and ask the oracle.
fn gather_candidate(
    question: &Question,
    use_search: bool,
    index: &dyn SearchIndex,
    documents: &[ExtractedContent],
    oracle: &dyn AnswerOracle,
    options: &AnalyzeOptions,
) -> Result<Option<Answer>> {
    let (context, source, default_ref) = if use_search {
        let query = match &question.help {
            Some(help) => format!("{} {help}", question.prompt),
            None => question.prompt.clone(),
        };
        let snippets = index.query(&query, options.search_top_k)?;
        if snippets.is_empty() {
            return Ok(None);
        }
        let context = snippets
            .iter()
            .map(|s| format!("Document: {}\n{}", s.artifact, s.content))
            .collect::<Vec<_>>()
            .join("\n\n");
        let default_ref = snippets.first().map(|s| s.artifact.clone());
        (context, AnswerSource::SearchIndex, default_ref)
    } else {
        let context = documents
            .iter()
            .take(options.max_context_docs)
            .map(|doc| {
                let end = doc
                    .text
                    .char_indices()
                    .nth(options.context_chars)
                    .map(|(i, _)| i)
                    .unwrap_or(doc.text.len());
                format!("Document: {}\n{}", doc.artifact, &doc.text[..end])
            })
            .collect::<Vec<_>>()
            .join("\n\n");
        let default_ref = documents.first().map(|doc| doc.artifact.clone());
        (context, AnswerSource::Document, default_ref)
    };

    let candidate = match oracle.extract_answer(question, &context)? {
        Some(candidate) => candidate,
        None => return Ok(None),
    };

    Ok(Some(Answer::extracted(
        &question.id,
        candidate.answer,
        source,
        candidate.confidence,
        candidate.source_ref.or(default_ref),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category, Priority};
    use crate::collab::{AnswerCandidate, Artifact, DocumentType, KeywordIndex, PlainExtractor};
    use crate::session::WorkshopOptions;
    use std::collections::HashMap;

    struct MemStore {
        files: Vec<(String, Vec<u8>)>,
    }

    impl DocumentStore for MemStore {
        fn list(&self) -> Result<Vec<Artifact>> {
            Ok(self
                .files
                .iter()
                .map(|(name, bytes)| Artifact {
                    name: name.clone(),
                    doc_type: DocumentType::Text,
                    size_bytes: bytes.len() as u64,
                    last_modified: None,
                })
                .collect())
        }

        fn fetch(&self, name: &str) -> Result<Vec<u8>> {
            self.files
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, bytes)| bytes.clone())
                .ok_or_else(|| anyhow::anyhow!("not found: {name}"))
        }
    }

    /// Scripted oracle: per-question confidence, with optional hard
    /// failures for specific ids.
    struct ScriptedOracle {
        confidences: HashMap<String, f64>,
        failing: Vec<String>,
    }

    impl AnswerOracle for ScriptedOracle {
        fn extract_answer(
            &self,
            question: &Question,
            _context: &str,
        ) -> Result<Option<AnswerCandidate>> {
            if self.failing.contains(&question.id) {
                anyhow::bail!("oracle timeout for {}", question.id);
            }
            Ok(self.confidences.get(&question.id).map(|&confidence| {
                AnswerCandidate {
                    answer: format!("extracted for {}", question.id),
                    confidence,
                    source_ref: Some("design.txt".to_string()),
                }
            }))
        }
    }

    fn ten_question_catalog() -> Arc<Catalog> {
        Arc::new(Catalog::new(
            (1..=10)
                .map(|i| {
                    Question::new(
                        format!("q{i}"),
                        Category::NetworkDesign,
                        Priority::High,
                        format!("question {i}"),
                    )
                })
                .collect(),
        ))
    }

    fn analyzer(oracle: ScriptedOracle, use_search: bool) -> DocumentAnalyzer {
        let store = MemStore {
            files: vec![(
                "design.txt".to_string(),
                b"network design document with enough text to analyze".to_vec(),
            )],
        };
        DocumentAnalyzer::new(
            Arc::new(store),
            Arc::new(PlainExtractor::new()),
            Arc::new(KeywordIndex::new()),
            Arc::new(oracle),
            AnalyzeOptions {
                use_search_index: use_search,
                ..Default::default()
            },
        )
    }

    #[tokio::test]
    async fn test_one_failing_question_does_not_sink_the_batch() {
        let workshop = Workshop::new(ten_question_catalog(), WorkshopOptions::default());
        workshop.start(None);

        let confidences: HashMap<String, f64> =
            (1..=10).map(|i| (format!("q{i}"), 0.9)).collect();
        let oracle = ScriptedOracle {
            confidences,
            failing: vec!["q5".to_string()],
        };

        let report = analyzer(oracle, false).run(&workshop).await.unwrap();
        assert_eq!(report.answers_accepted, 9);
        assert_eq!(report.questions_errored, 1);
        assert!(!workshop.session().unwrap().is_answered("q5"));
    }

    #[tokio::test]
    async fn test_low_confidence_candidates_are_cached() {
        let workshop = Workshop::new(ten_question_catalog(), WorkshopOptions::default());
        workshop.start(None);

        let mut confidences = HashMap::new();
        confidences.insert("q1".to_string(), 0.95);
        confidences.insert("q2".to_string(), 0.4);
        let oracle = ScriptedOracle {
            confidences,
            failing: Vec::new(),
        };

        let report = analyzer(oracle, false).run(&workshop).await.unwrap();
        assert_eq!(report.answers_accepted, 1);
        assert_eq!(report.cached_for_review, 1);
        assert_eq!(workshop.pending_review().len(), 1);
    }

    #[tokio::test]
    async fn test_answered_questions_are_skipped() {
        let workshop = Workshop::new(ten_question_catalog(), WorkshopOptions::default());
        workshop.start(None);
        workshop.record_user_answer("q1", "already known").unwrap();

        let confidences: HashMap<String, f64> =
            (1..=10).map(|i| (format!("q{i}"), 0.9)).collect();
        let oracle = ScriptedOracle {
            confidences,
            failing: Vec::new(),
        };

        let report = analyzer(oracle, false).run(&workshop).await.unwrap();
        // q1 was never asked again: only the 9 missing questions resolve
        assert_eq!(report.answers_accepted, 9);
        assert_eq!(
            workshop.session().unwrap().answers["q1"].answer,
            "already known"
        );
    }

    #[tokio::test]
    async fn test_accepted_answers_record_source_documents() {
        let workshop = Workshop::new(ten_question_catalog(), WorkshopOptions::default());
        workshop.start(None);

        let mut confidences = HashMap::new();
        confidences.insert("q1".to_string(), 0.9);
        let oracle = ScriptedOracle {
            confidences,
            failing: Vec::new(),
        };

        analyzer(oracle, false).run(&workshop).await.unwrap();
        let session = workshop.session().unwrap();
        assert!(session.documents_analyzed.contains("design.txt"));
    }

    #[tokio::test]
    async fn test_unreadable_store_fails_the_pass() {
        struct BrokenStore;
        impl DocumentStore for BrokenStore {
            fn list(&self) -> Result<Vec<Artifact>> {
                anyhow::bail!("storage unreachable")
            }
            fn fetch(&self, _name: &str) -> Result<Vec<u8>> {
                anyhow::bail!("storage unreachable")
            }
        }

        let workshop = Workshop::new(ten_question_catalog(), WorkshopOptions::default());
        workshop.start(None);

        let analyzer = DocumentAnalyzer::new(
            Arc::new(BrokenStore),
            Arc::new(PlainExtractor::new()),
            Arc::new(KeywordIndex::new()),
            Arc::new(ScriptedOracle {
                confidences: HashMap::new(),
                failing: Vec::new(),
            }),
            AnalyzeOptions::default(),
        );
        assert!(analyzer.run(&workshop).await.is_err());
    }
}
