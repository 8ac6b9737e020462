//! End-to-end tests for the discovery workshop flow

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use tempfile::tempdir;

use lz_workshop::analyze::{AnalyzeOptions, DocumentAnalyzer};
use lz_workshop::catalog::{Catalog, Category, Priority, Question};
use lz_workshop::collab::{
    AnswerCandidate, AnswerOracle, FsDocumentStore, KeywordIndex, PlainExtractor,
};
use lz_workshop::session::{AnswerSource, Workshop, WorkshopOptions};
use lz_workshop::snapshot::{export_session, import_session, SnapshotStore};

/// Oracle scripted per question id: (answer, confidence)
struct ScriptedOracle {
    replies: HashMap<String, (String, f64)>,
}

impl ScriptedOracle {
    fn new<const N: usize>(replies: [(&str, &str, f64); N]) -> Self {
        Self {
            replies: replies
                .into_iter()
                .map(|(id, answer, confidence)| {
                    (id.to_string(), (answer.to_string(), confidence))
                })
                .collect(),
        }
    }
}

impl AnswerOracle for ScriptedOracle {
    fn extract_answer(
        &self,
        question: &Question,
        _context: &str,
    ) -> Result<Option<AnswerCandidate>> {
        Ok(self.replies.get(&question.id).map(|(answer, confidence)| {
            AnswerCandidate {
                answer: answer.clone(),
                confidence: *confidence,
                source_ref: Some("uploaded/design-brief.md".to_string()),
            }
        }))
    }
}

fn test_catalog() -> Arc<Catalog> {
    Arc::new(Catalog::new(vec![
        Question::new(
            "net_001",
            Category::NetworkDesign,
            Priority::Critical,
            "What IP address ranges are available?",
        )
        .with_help("Must not conflict with on-premises networks"),
        Question::new(
            "gov_005",
            Category::Governance,
            Priority::Critical,
            "Which regions are approved?",
        ),
        Question::new(
            "cost_001",
            Category::CostBudgeting,
            Priority::High,
            "What is the approved budget?",
        ),
    ]))
}

fn write_documents(dir: &std::path::Path) {
    std::fs::create_dir_all(dir.join("uploaded")).unwrap();
    std::fs::write(
        dir.join("uploaded/design-brief.md"),
        "# Network Design\n\nThe hub network uses 10.100.0.0/16. \
         Approved regions are East US and West US.\n",
    )
    .unwrap();
    std::fs::write(
        dir.join("uploaded/budget-note.txt"),
        "Finance approved a first-year budget of $750K with monthly alerts.\n",
    )
    .unwrap();
    // A document the extractor cannot read
    std::fs::write(dir.join("uploaded/diagram.png"), b"\x89PNG\r\n\x1a\n").unwrap();
}

fn analyzer_for(dir: &std::path::Path, oracle: ScriptedOracle) -> DocumentAnalyzer {
    DocumentAnalyzer::new(
        Arc::new(FsDocumentStore::new(dir.join("uploaded"))),
        Arc::new(PlainExtractor::new()),
        Arc::new(KeywordIndex::new()),
        Arc::new(oracle),
        AnalyzeOptions::default(),
    )
}

#[tokio::test]
async fn test_full_discovery_flow() {
    let dir = tempdir().unwrap();
    write_documents(dir.path());

    let workshop = Workshop::new(test_catalog(), WorkshopOptions::default());
    workshop.start(Some("e2e".to_string()));

    // Document analysis: two confident answers, one shaky one
    let oracle = ScriptedOracle::new([
        ("net_001", "10.100.0.0/16", 0.92),
        ("gov_005", "East US, West US", 0.9),
        ("cost_001", "maybe $750K", 0.55),
    ]);
    let report = analyzer_for(dir.path(), oracle)
        .run(&workshop)
        .await
        .unwrap();

    assert_eq!(report.documents_processed, 2);
    assert_eq!(report.documents_failed, 1); // the png
    assert_eq!(report.answers_accepted, 2);
    assert_eq!(report.cached_for_review, 1);

    // Gap analysis reflects the accepted answers only
    assert!(workshop.missing_critical().is_empty());
    let missing: Vec<String> = workshop
        .missing_questions(None)
        .iter()
        .map(|q| q.id.clone())
        .collect();
    assert_eq!(missing, ["cost_001"]);

    // The user overrides the parked budget guess
    let (answer, findings) = workshop
        .record_user_answer("cost_001", "$750K with budget alerts at 80%")
        .unwrap();
    assert_eq!(answer.source, AnswerSource::UserInput);
    // The budget validator likes an amount plus alerting
    assert!(findings
        .iter()
        .all(|f| f.severity == lz_workshop::validate::Severity::Success));
    assert!(workshop.pending_review().is_empty());

    let summary = workshop.summarize().unwrap();
    assert_eq!(summary.answered, 3);
    assert_eq!(summary.completion_percentage, 100.0);
    assert_eq!(summary.answers_by_source["user_input"], 1);
    assert_eq!(summary.answers_by_source["search_index"], 2);

    // Round trip through the snapshot store
    let store = SnapshotStore::with_dir(dir.path().join("sessions"));
    let snapshot = workshop.snapshot().unwrap();
    let path = store.save(&snapshot).unwrap();
    let loaded = store.load(&path).unwrap();

    let reloaded = Workshop::new(test_catalog(), WorkshopOptions::default());
    let dropped = reloaded.import_snapshot(&loaded);
    assert_eq!(dropped, 0);

    let original = workshop.session().unwrap();
    let restored = reloaded.session().unwrap();
    assert_eq!(original.answers.len(), restored.answers.len());
    for (id, answer) in &original.answers {
        let restored_answer = &restored.answers[id];
        assert_eq!(restored_answer.answer, answer.answer);
        assert_eq!(restored_answer.source, answer.source);
        assert_eq!(restored_answer.confidence, answer.confidence);
        assert_eq!(
            restored_answer.document_reference,
            answer.document_reference
        );
    }
}

#[tokio::test]
async fn test_search_fallback_still_extracts() {
    let dir = tempdir().unwrap();
    write_documents(dir.path());

    let workshop = Workshop::new(test_catalog(), WorkshopOptions::default());
    workshop.start(None);

    let oracle = ScriptedOracle::new([("net_001", "10.100.0.0/16", 0.9)]);
    let analyzer = DocumentAnalyzer::new(
        Arc::new(FsDocumentStore::new(dir.path().join("uploaded"))),
        Arc::new(PlainExtractor::new()),
        Arc::new(KeywordIndex::new()),
        Arc::new(oracle),
        AnalyzeOptions {
            use_search_index: false,
            ..Default::default()
        },
    );

    let report = analyzer.run(&workshop).await.unwrap();
    assert!(!report.used_search);
    assert_eq!(report.answers_accepted, 1);

    // Direct scans tag answers with the document source
    let session = workshop.session().unwrap();
    assert_eq!(session.answers["net_001"].source, AnswerSource::Document);
}

#[test]
fn test_resume_after_catalog_gains_a_question() {
    // Snapshot taken against yesterday's two-question catalog
    let old_catalog = Catalog::new(vec![
        Question::new("q1", Category::NetworkDesign, Priority::Critical, "one"),
        Question::new("q2", Category::Governance, Priority::High, "two"),
    ]);
    let mut session = lz_workshop::session::Session::new("aging");
    session.record(
        lz_workshop::session::Answer::from_user("q1", "a1"),
        old_catalog.len(),
    );
    session.record(
        lz_workshop::session::Answer::from_user("q2", "a2"),
        old_catalog.len(),
    );
    let snapshot = export_session(&old_catalog, &session);

    // Today's catalog grew a question
    let new_catalog = Catalog::new(vec![
        Question::new("q1", Category::NetworkDesign, Priority::Critical, "one"),
        Question::new("q2", Category::Governance, Priority::High, "two"),
        Question::new("q4", Category::Operations, Priority::High, "four"),
    ]);

    let (restored, dropped) = import_session(&new_catalog, &snapshot);
    assert_eq!(dropped, 0);
    assert_eq!(restored.answers.len(), 2);
    assert!((restored.completion_percentage - 200.0 / 3.0).abs() < 1e-9);

    let missing: Vec<&str> = lz_workshop::gaps::missing(&new_catalog, &restored, None)
        .iter()
        .map(|q| q.id.as_str())
        .collect();
    assert_eq!(missing, ["q4"]);
}

#[test]
fn test_resume_from_store_picks_latest_session() {
    let dir = tempdir().unwrap();
    let store = SnapshotStore::with_dir(dir.path().to_path_buf());
    let catalog = test_catalog();

    // Persist a session with one answer
    let first = Workshop::new(Arc::clone(&catalog), WorkshopOptions::default());
    first.start(Some("persisted".to_string()));
    first
        .record_user_answer("net_001", "10.100.0.0/16")
        .unwrap();
    store.save(&first.snapshot().unwrap()).unwrap();

    // A new process resumes it
    let second = Workshop::new(catalog, WorkshopOptions::default());
    let session_id = second.resume(&store);
    assert_eq!(session_id, "persisted");
    assert!(second.session().unwrap().is_answered("net_001"));
    assert_eq!(second.missing_questions(None).len(), 2);
}

#[test]
fn test_auto_checkpoints_write_snapshots() {
    let dir = tempdir().unwrap();
    let store_dir = dir.path().to_path_buf();

    let options = WorkshopOptions {
        auto_save_interval: 2,
        ..Default::default()
    };
    let workshop = Workshop::new(test_catalog(), options).with_checkpoint_hook(Box::new(
        move |catalog, session| {
            let snapshot = lz_workshop::snapshot::export_session(catalog, session);
            SnapshotStore::with_dir(store_dir.clone()).save(&snapshot)?;
            Ok(())
        },
    ));
    workshop.start(Some("ckpt".to_string()));

    workshop.record_user_answer("net_001", "10.0.0.0/16").unwrap();
    let store = SnapshotStore::with_dir(dir.path().to_path_buf());
    assert!(store.find_latest().unwrap().is_none());

    workshop.record_user_answer("gov_005", "East US").unwrap();
    let latest = store.find_latest().unwrap().expect("checkpoint written");
    let loaded = store.load(&latest).unwrap();
    assert_eq!(loaded.answers.len(), 2);
}

#[test]
fn test_validators_fire_through_the_builtin_catalog() {
    let workshop = Workshop::new(
        Arc::new(Catalog::builtin()),
        WorkshopOptions::default(),
    );
    workshop.start(None);

    let (_, findings) = workshop
        .record_user_answer("net_001", "8.8.8.0/24")
        .unwrap();
    assert!(findings
        .iter()
        .any(|f| f.severity == lz_workshop::validate::Severity::Error));

    // Advisory only: the answer was recorded despite the error finding
    assert!(workshop.session().unwrap().is_answered("net_001"));
}
