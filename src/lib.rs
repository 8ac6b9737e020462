//! LZ Workshop Library
//!
//! Interactive cloud landing zone discovery: reconciles a fixed question
//! catalog against answers extracted from uploaded documents and typed by
//! the operator, validates them against best practices, and exports a
//! durable session snapshot.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use lz_workshop::catalog::Catalog;
//! use lz_workshop::session::{Workshop, WorkshopOptions};
//!
//! let catalog = Arc::new(Catalog::builtin());
//! let workshop = Workshop::new(catalog, WorkshopOptions::default());
//! workshop.start(Some("kickoff".to_string()));
//!
//! let (answer, findings) = workshop
//!     .record_user_answer("net_001", "10.100.0.0/16")
//!     .unwrap();
//! println!("{} findings for {}", findings.len(), answer.question_id);
//! ```

pub mod analyze;
pub mod catalog;
pub mod cli;
pub mod collab;
pub mod config;
pub mod gaps;
pub mod report;
pub mod session;
pub mod snapshot;
pub mod validate;

// Re-export commonly used types
pub use analyze::{AnalysisReport, AnalyzeOptions, DocumentAnalyzer};
pub use catalog::{Catalog, CatalogError, Category, Priority, Question};
pub use config::Config;
pub use gaps::{CategoryCompletion, PriorityCompletion, SessionSummary};
pub use session::{
    Answer, AnswerSource, PendingReview, Resolution, Resolver, Session, Workshop, WorkshopOptions,
};
pub use snapshot::{Snapshot, SnapshotStore};
pub use validate::{Finding, Severity};
