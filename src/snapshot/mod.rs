//! Session snapshots - durable export/import format
//!
//! A snapshot is a single self-describing JSON record: session identity,
//! the full answer list joined with each question's static metadata, and an
//! informational list of still-missing questions. The answers list alone is
//! authoritative on import; everything else is denormalized for downstream
//! reporting tools and may be stale or absent. Snapshot files are written
//! as pretty JSON (human-debuggable) via an atomic temp-file rename.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::Catalog;
use crate::gaps::{self, SessionSummary};
use crate::session::{Answer, AnswerSource, Session};

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

fn default_version() -> u32 {
    SNAPSHOT_VERSION
}

/// Session identity block
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotHeader {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub completion: f64,
}

/// One answer joined with its question's static metadata.
///
/// Category, priority, and question text are denormalized copies taken at
/// export time; only the id/answer core fields are authoritative on import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotAnswer {
    pub question_id: String,
    #[serde(default)]
    pub question: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub priority: String,
    pub answer: String,
    pub source: AnswerSource,
    pub confidence: f64,
    #[serde(default)]
    pub document_reference: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Metadata for a question that still lacks an answer (informational)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MissingQuestion {
    pub question_id: String,
    pub question: String,
    pub category: String,
    pub priority: String,
    #[serde(default)]
    pub help: Option<String>,
    #[serde(default)]
    pub examples: Vec<String>,
}

/// The durable snapshot record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default = "default_version")]
    pub version: u32,
    pub session: SnapshotHeader,
    #[serde(default)]
    pub summary: Option<SessionSummary>,
    #[serde(default)]
    pub answers: Vec<SnapshotAnswer>,
    #[serde(default)]
    pub missing_information: Vec<MissingQuestion>,
}

/// Build a snapshot of the current session.
pub fn export_session(catalog: &Catalog, session: &Session) -> Snapshot {
    let mut answers: Vec<SnapshotAnswer> = session
        .answers
        .values()
        .map(|answer| {
            // Join with catalog metadata; an answer whose question has since
            // left the catalog is still exported with what we have.
            let (question, category, priority) = match catalog.get(&answer.question_id) {
                Ok(q) => (
                    q.prompt.clone(),
                    q.category.to_string(),
                    q.priority.to_string(),
                ),
                Err(_) => (String::new(), String::new(), String::new()),
            };
            SnapshotAnswer {
                question_id: answer.question_id.clone(),
                question,
                category,
                priority,
                answer: answer.answer.clone(),
                source: answer.source,
                confidence: answer.confidence,
                document_reference: answer.document_reference.clone(),
                notes: answer.notes.clone(),
            }
        })
        .collect();
    answers.sort_by(|a, b| a.question_id.cmp(&b.question_id));

    let missing_information = gaps::missing(catalog, session, None)
        .iter()
        .map(|q| MissingQuestion {
            question_id: q.id.clone(),
            question: q.prompt.clone(),
            category: q.category.to_string(),
            priority: q.priority.to_string(),
            help: q.help.clone(),
            examples: q.examples.clone(),
        })
        .collect();

    Snapshot {
        version: SNAPSHOT_VERSION,
        session: SnapshotHeader {
            id: session.session_id.clone(),
            created_at: session.created_at,
            completion: session.completion_percentage,
        },
        summary: Some(gaps::summarize(catalog, session)),
        answers,
        missing_information,
    }
}

/// Rebuild a session from a snapshot's answer list.
///
/// The embedded missing list and summary are ignored. Answers whose
/// question id no longer resolves against the catalog are dropped with a
/// warning; catalogs may evolve between export and reimport. Returns the
/// session and the number of dropped answers.
pub fn import_session(catalog: &Catalog, snapshot: &Snapshot) -> (Session, usize) {
    let mut session = Session::new(&snapshot.session.id);
    session.created_at = snapshot.session.created_at;

    let mut dropped = 0;
    for entry in &snapshot.answers {
        if !catalog.contains(&entry.question_id) {
            warn!(
                "Dropping answer for unknown question id on import: {}",
                entry.question_id
            );
            dropped += 1;
            continue;
        }
        session.answers.insert(
            entry.question_id.clone(),
            Answer {
                question_id: entry.question_id.clone(),
                answer: entry.answer.clone(),
                source: entry.source,
                confidence: entry.confidence,
                document_reference: entry.document_reference.clone(),
                notes: entry.notes.clone(),
            },
        );
    }

    session.recompute_completion(catalog.len());
    (session, dropped)
}

/// Manages snapshot persistence on disk
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    /// Store under the platform data directory
    pub fn new() -> Self {
        let dir = directories::ProjectDirs::from("io", "lz-tools", "lz-workshop")
            .map(|dirs| dirs.data_dir().join("sessions"))
            .unwrap_or_else(|| PathBuf::from(".lz-workshop-sessions"));
        Self { dir }
    }

    /// Store in a custom directory (useful for tests)
    pub fn with_dir(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn snapshot_path(&self, session_id: &str) -> PathBuf {
        self.dir.join(format!("discovery_{session_id}.json"))
    }

    /// Write a snapshot atomically. Returns the file path.
    pub fn save(&self, snapshot: &Snapshot) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create session dir: {}", self.dir.display()))?;

        let path = self.snapshot_path(&snapshot.session.id);
        let data = serde_json::to_string_pretty(snapshot).context("Failed to serialize snapshot")?;

        // Atomic write: temp file, then rename
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, data)
            .with_context(|| format!("Failed to write snapshot: {}", temp_path.display()))?;
        fs::rename(&temp_path, &path)
            .with_context(|| format!("Failed to finalize snapshot: {}", path.display()))?;

        debug!("Saved snapshot: {}", path.display());
        Ok(path)
    }

    /// Load a snapshot from an explicit path.
    pub fn load(&self, path: &Path) -> Result<Snapshot> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot: {}", path.display()))?;
        let snapshot: Snapshot = serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse snapshot: {}", path.display()))?;

        if snapshot.version != SNAPSHOT_VERSION {
            warn!(
                "Snapshot version mismatch: expected {}, found {}",
                SNAPSHOT_VERSION, snapshot.version
            );
        }

        info!(
            "Loaded snapshot {} ({} answers)",
            snapshot.session.id,
            snapshot.answers.len()
        );
        Ok(snapshot)
    }

    /// Most recently modified snapshot file, if any.
    pub fn find_latest(&self) -> Result<Option<PathBuf>> {
        if !self.dir.exists() {
            return Ok(None);
        }

        let mut latest: Option<(std::time::SystemTime, PathBuf)> = None;
        for entry in fs::read_dir(&self.dir)
            .with_context(|| format!("Failed to read session dir: {}", self.dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if path.extension().map(|e| e == "json").unwrap_or(false) {
                let modified = entry.metadata()?.modified()?;
                match &latest {
                    Some((ts, _)) if *ts >= modified => {}
                    _ => latest = Some((modified, path)),
                }
            }
        }

        Ok(latest.map(|(_, path)| path))
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Category, Priority, Question};
    use tempfile::tempdir;

    fn catalog() -> Catalog {
        Catalog::new(vec![
            Question::new("q1", Category::NetworkDesign, Priority::Critical, "one"),
            Question::new("q2", Category::Governance, Priority::High, "two"),
        ])
    }

    fn session_with_answers(catalog: &Catalog) -> Session {
        let mut session = Session::new("test-session");
        session.record(
            Answer::extracted(
                "q1",
                "10.0.0.0/16",
                AnswerSource::Document,
                0.92,
                Some("network-design.pdf".to_string()),
            ),
            catalog.len(),
        );
        session.record(Answer::from_user("q2", "separate subscriptions"), catalog.len());
        session
    }

    #[test]
    fn test_round_trip_preserves_answer_core() {
        let catalog = catalog();
        let session = session_with_answers(&catalog);

        let snapshot = export_session(&catalog, &session);
        let (imported, dropped) = import_session(&catalog, &snapshot);

        assert_eq!(dropped, 0);
        assert_eq!(imported.answers.len(), session.answers.len());
        for (id, original) in &session.answers {
            let restored = &imported.answers[id];
            assert_eq!(restored.answer, original.answer);
            assert_eq!(restored.source, original.source);
            assert_eq!(restored.confidence, original.confidence);
            assert_eq!(restored.document_reference, original.document_reference);
        }
        assert_eq!(imported.completion_percentage, 100.0);
    }

    #[test]
    fn test_import_drops_unknown_question_ids() {
        let catalog = catalog();
        let session = session_with_answers(&catalog);
        let mut snapshot = export_session(&catalog, &session);

        snapshot.answers.push(SnapshotAnswer {
            question_id: "retired_q".to_string(),
            question: "a question removed from the catalog".to_string(),
            category: "Governance".to_string(),
            priority: "low".to_string(),
            answer: "stale".to_string(),
            source: AnswerSource::Document,
            confidence: 0.9,
            document_reference: None,
            notes: None,
        });

        let (imported, dropped) = import_session(&catalog, &snapshot);
        assert_eq!(dropped, 1);
        assert_eq!(imported.answers.len(), 2);
        assert!(!imported.answers.contains_key("retired_q"));
    }

    #[test]
    fn test_import_tolerates_missing_optional_sections() {
        let catalog = catalog();
        let json = r#"{
            "session": {"id": "bare", "created_at": "2024-03-01T12:00:00Z", "completion": 50.0},
            "answers": [
                {"question_id": "q1", "answer": "text", "source": "document", "confidence": 0.9}
            ]
        }"#;
        let snapshot: Snapshot = serde_json::from_str(json).unwrap();
        assert!(snapshot.summary.is_none());
        assert!(snapshot.missing_information.is_empty());

        let (imported, dropped) = import_session(&catalog, &snapshot);
        assert_eq!(dropped, 0);
        assert_eq!(imported.answers["q1"].answer, "text");
        assert_eq!(imported.completion_percentage, 50.0);
    }

    #[test]
    fn test_export_is_self_contained() {
        let catalog = catalog();
        let session = session_with_answers(&catalog);
        let snapshot = export_session(&catalog, &session);

        let q1 = snapshot
            .answers
            .iter()
            .find(|a| a.question_id == "q1")
            .unwrap();
        assert_eq!(q1.question, "one");
        assert_eq!(q1.category, "Network Design");
        assert_eq!(q1.priority, "critical");
        assert!(snapshot.missing_information.is_empty());
        assert!(snapshot.summary.is_some());
    }

    #[test]
    fn test_store_save_load_and_latest() {
        let dir = tempdir().unwrap();
        let store = SnapshotStore::with_dir(dir.path().to_path_buf());
        let catalog = catalog();

        assert!(store.find_latest().unwrap().is_none());

        let session = session_with_answers(&catalog);
        let snapshot = export_session(&catalog, &session);
        let path = store.save(&snapshot).unwrap();

        let latest = store.find_latest().unwrap().unwrap();
        assert_eq!(latest, path);

        let loaded = store.load(&path).unwrap();
        assert_eq!(loaded.session.id, "test-session");
        assert_eq!(loaded.answers.len(), 2);

        // No stray temp files after an atomic write
        let stray: Vec<_> = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().map(|x| x == "tmp").unwrap_or(false))
            .collect();
        assert!(stray.is_empty());
    }
}
