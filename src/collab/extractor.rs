//! Content extraction - raw document bytes to normalized text
//!
//! Handles plain text, markdown, and PDF. Keyword extraction is a simple
//! frequency count over lowercased tokens; it feeds the search index and
//! the exported document metadata. Extraction failures are per-document
//! and recoverable.

use std::collections::HashMap;

use anyhow::Result;
use tracing::debug;

use super::{ContentExtractor, DocumentType, ExtractedContent};

/// How many top-frequency keywords to keep per document
const MAX_KEYWORDS: usize = 15;

/// Tokens shorter than this never become keywords
const MIN_KEYWORD_LEN: usize = 4;

#[derive(Debug, Default)]
pub struct PlainExtractor;

impl PlainExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl ContentExtractor for PlainExtractor {
    fn extract(&self, raw: &[u8], doc_type: DocumentType, name: &str) -> Result<ExtractedContent> {
        let (text, confidence) = match doc_type {
            DocumentType::Text | DocumentType::Markdown => {
                (String::from_utf8_lossy(raw).into_owned(), 1.0)
            }
            DocumentType::Pdf => {
                let text = pdf_extract::extract_text_from_mem(raw)
                    .map_err(|e| anyhow::anyhow!("Failed to extract PDF text from {name}: {e}"))?;
                // Layout reconstruction from PDFs is lossy
                (text, 0.9)
            }
            DocumentType::Image | DocumentType::Unknown => {
                anyhow::bail!("no text extractor for {doc_type} document: {name}")
            }
        };

        if text.trim().is_empty() {
            anyhow::bail!("document produced no text: {name}");
        }

        let keywords = extract_keywords(&text);
        debug!(
            "Extracted {} chars, {} keywords from {name}",
            text.len(),
            keywords.len()
        );

        Ok(ExtractedContent {
            artifact: name.to_string(),
            doc_type,
            text,
            keywords,
            confidence,
        })
    }
}

/// Top tokens by frequency, ties broken alphabetically for stable output.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut counts: HashMap<String, usize> = HashMap::new();
    for token in tokenize(text) {
        if token.len() >= MIN_KEYWORD_LEN {
            *counts.entry(token).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
        .into_iter()
        .take(MAX_KEYWORDS)
        .map(|(token, _)| token)
        .collect()
}

/// Lowercased alphanumeric tokens
pub fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(|t| t.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_plain_text() {
        let extractor = PlainExtractor::new();
        let content = extractor
            .extract(b"The network uses 10.0.0.0/16 for the hub", DocumentType::Text, "net.txt")
            .unwrap();
        assert_eq!(content.artifact, "net.txt");
        assert!(content.text.contains("10.0.0.0/16"));
        assert_eq!(content.confidence, 1.0);
    }

    #[test]
    fn test_extract_rejects_images() {
        let extractor = PlainExtractor::new();
        assert!(extractor
            .extract(b"\x89PNG", DocumentType::Image, "diagram.png")
            .is_err());
    }

    #[test]
    fn test_extract_rejects_empty_documents() {
        let extractor = PlainExtractor::new();
        assert!(extractor
            .extract(b"   \n  ", DocumentType::Text, "blank.txt")
            .is_err());
    }

    #[test]
    fn test_keywords_ranked_by_frequency() {
        let keywords =
            extract_keywords("network network network subscription subscription budget");
        assert_eq!(keywords[0], "network");
        assert_eq!(keywords[1], "subscription");
        assert!(keywords.contains(&"budget".to_string()));
    }

    #[test]
    fn test_keywords_skip_short_tokens() {
        let keywords = extract_keywords("a an the vpn expressroute expressroute");
        assert!(!keywords.contains(&"a".to_string()));
        assert!(!keywords.contains(&"the".to_string()));
        assert_eq!(keywords[0], "expressroute");
    }
}
