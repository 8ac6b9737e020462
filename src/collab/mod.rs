//! External collaborator contracts
//!
//! Document storage, content extraction, search, and the answer oracle are
//! thin wrappers over external services. The analysis pass depends only on
//! these traits; every implementation here is local (filesystem, in-memory
//! index) or a plain HTTP client, and every call may fail without taking
//! the batch down with it.

pub mod extractor;
pub mod fs_store;
pub mod oracle;
pub mod search;

use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::catalog::Question;

pub use extractor::PlainExtractor;
pub use fs_store::FsDocumentStore;
pub use oracle::HttpOracle;
pub use search::KeywordIndex;

/// Supported document types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Pdf,
    Markdown,
    Text,
    Image,
    Unknown,
}

impl DocumentType {
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => DocumentType::Pdf,
            "md" | "markdown" => DocumentType::Markdown,
            "txt" | "text" | "csv" | "log" => DocumentType::Text,
            "png" | "jpg" | "jpeg" | "gif" | "bmp" | "tiff" => DocumentType::Image,
            _ => DocumentType::Unknown,
        }
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentType::Pdf => write!(f, "pdf"),
            DocumentType::Markdown => write!(f, "markdown"),
            DocumentType::Text => write!(f, "text"),
            DocumentType::Image => write!(f, "image"),
            DocumentType::Unknown => write!(f, "unknown"),
        }
    }
}

/// A document available in the store
#[derive(Debug, Clone)]
pub struct Artifact {
    /// Store-relative identifier
    pub name: String,
    pub doc_type: DocumentType,
    pub size_bytes: u64,
    pub last_modified: Option<DateTime<Utc>>,
}

/// Normalized content extracted from one artifact
#[derive(Debug, Clone)]
pub struct ExtractedContent {
    pub artifact: String,
    pub doc_type: DocumentType,
    pub text: String,
    pub keywords: Vec<String>,
    /// Extractor's confidence in the fidelity of the text
    pub confidence: f32,
}

/// A scored fragment of document text returned by search
#[derive(Debug, Clone)]
pub struct Snippet {
    pub artifact: String,
    pub content: String,
    pub score: f32,
}

/// A possible answer produced by the oracle
#[derive(Debug, Clone)]
pub struct AnswerCandidate {
    pub answer: String,
    pub confidence: f64,
    pub source_ref: Option<String>,
}

/// Where uploaded documents live
pub trait DocumentStore: Send + Sync {
    fn list(&self) -> Result<Vec<Artifact>>;
    fn fetch(&self, name: &str) -> Result<Vec<u8>>;
}

/// Turns raw bytes into normalized text
pub trait ContentExtractor: Send + Sync {
    fn extract(&self, raw: &[u8], doc_type: DocumentType, name: &str) -> Result<ExtractedContent>;
}

/// Narrows extraction scope per question. Optional: analysis falls back to
/// scanning extracted text directly when no index is available.
pub trait SearchIndex: Send + Sync {
    fn index(&self, documents: &[ExtractedContent]);
    fn query(&self, text: &str, top_n: usize) -> Result<Vec<Snippet>>;
    fn is_empty(&self) -> bool;
}

/// Extracts an answer to one question from a context window. Untrusted:
/// implementations must swallow malformed upstream output and report "no
/// answer" rather than failing the batch.
pub trait AnswerOracle: Send + Sync {
    fn extract_answer(&self, question: &Question, context: &str) -> Result<Option<AnswerCandidate>>;
}
