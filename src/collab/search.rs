//! In-memory keyword search over extracted documents
//!
//! An inverted index with TF-IDF scoring, built once per analysis pass.
//! Queries return snippets centered on the first matching term so the
//! oracle sees the relevant slice of each document instead of the whole
//! text. Index writes and reads go through interior locks, so a shared
//! reference can serve concurrent per-question queries.

use std::collections::HashMap;

use anyhow::Result;
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::debug;

use super::extractor::tokenize;
use super::{ExtractedContent, SearchIndex, Snippet};

/// Characters of context returned around a matching term
const SNIPPET_WINDOW: usize = 1200;

#[derive(Default)]
pub struct KeywordIndex {
    documents: RwLock<Vec<ExtractedContent>>,
    /// term -> indices into `documents`
    inverted: RwLock<HashMap<String, Vec<usize>>>,
}

impl KeywordIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.documents.read().len()
    }

    fn snippet_for(doc: &ExtractedContent, terms: &[String]) -> String {
        let lower = doc.text.to_lowercase();
        let hit = terms.iter().find_map(|term| lower.find(term.as_str()));

        match hit {
            Some(pos) => {
                let start = pos.saturating_sub(SNIPPET_WINDOW / 4);
                // Clamp to char boundaries for safe slicing
                let start = floor_char_boundary(&doc.text, start);
                let end = floor_char_boundary(
                    &doc.text,
                    (start + SNIPPET_WINDOW).min(doc.text.len()),
                );
                doc.text[start..end].to_string()
            }
            None => {
                let end = floor_char_boundary(&doc.text, SNIPPET_WINDOW.min(doc.text.len()));
                doc.text[..end].to_string()
            }
        }
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

impl SearchIndex for KeywordIndex {
    fn index(&self, batch: &[ExtractedContent]) {
        let start_idx = {
            let mut documents = self.documents.write();
            let start = documents.len();
            documents.extend(batch.iter().cloned());
            start
        };

        // Tokenize in parallel, then merge under one write lock
        let updates: Vec<(usize, Vec<String>)> = batch
            .par_iter()
            .enumerate()
            .map(|(i, doc)| (start_idx + i, tokenize(&doc.text)))
            .collect();

        let mut inverted = self.inverted.write();
        for (doc_idx, terms) in updates {
            for term in terms {
                let postings = inverted.entry(term).or_default();
                if postings.last() != Some(&doc_idx) {
                    postings.push(doc_idx);
                }
            }
        }

        debug!("Indexed {} documents ({} total)", batch.len(), start_idx + batch.len());
    }

    fn query(&self, text: &str, top_n: usize) -> Result<Vec<Snippet>> {
        let query_terms = tokenize(text);
        let documents = self.documents.read();
        let inverted = self.inverted.read();
        let total_docs = documents.len() as f32;

        if documents.is_empty() || query_terms.is_empty() {
            return Ok(Vec::new());
        }

        let mut scores: HashMap<usize, f32> = HashMap::new();
        for term in &query_terms {
            if let Some(postings) = inverted.get(term) {
                let idf = (total_docs / postings.len() as f32).ln() + 1.0;
                for &doc_idx in postings {
                    *scores.entry(doc_idx).or_insert(0.0) += idf;
                }
            }
        }

        let mut ranked: Vec<(usize, f32)> = scores.into_iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        let snippets = ranked
            .into_iter()
            .take(top_n)
            .map(|(doc_idx, score)| {
                let doc = &documents[doc_idx];
                Snippet {
                    artifact: doc.artifact.clone(),
                    content: Self::snippet_for(doc, &query_terms),
                    score,
                }
            })
            .collect();

        Ok(snippets)
    }

    fn is_empty(&self) -> bool {
        self.documents.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collab::DocumentType;

    fn doc(name: &str, text: &str) -> ExtractedContent {
        ExtractedContent {
            artifact: name.to_string(),
            doc_type: DocumentType::Text,
            text: text.to_string(),
            keywords: Vec::new(),
            confidence: 1.0,
        }
    }

    #[test]
    fn test_query_ranks_relevant_documents_first() {
        let index = KeywordIndex::new();
        index.index(&[
            doc("network.txt", "The VNet address space is 10.0.0.0/16 with hub-spoke topology"),
            doc("budget.txt", "Approved budget is $500K for year one"),
            doc("hr.txt", "Vacation policy and onboarding"),
        ]);

        let results = index
            .query("What IP address ranges are available for virtual networks?", 3)
            .unwrap();
        assert!(!results.is_empty());
        assert_eq!(results[0].artifact, "network.txt");
    }

    #[test]
    fn test_query_respects_top_n() {
        let index = KeywordIndex::new();
        index.index(&[
            doc("a.txt", "network design alpha"),
            doc("b.txt", "network design beta"),
            doc("c.txt", "network design gamma"),
        ]);

        let results = index.query("network design", 2).unwrap();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn test_empty_index_returns_nothing() {
        let index = KeywordIndex::new();
        assert!(index.is_empty());
        assert!(index.query("anything", 3).unwrap().is_empty());
    }

    #[test]
    fn test_snippet_contains_matched_region() {
        let filler = "lorem ipsum ".repeat(300);
        let text = format!("{filler}the ExpressRoute circuit is 1 Gbps{filler}");
        let index = KeywordIndex::new();
        index.index(&[doc("long.txt", &text)]);

        let results = index.query("expressroute bandwidth", 1).unwrap();
        assert!(results[0].content.to_lowercase().contains("expressroute"));
        assert!(results[0].content.len() <= 1300);
    }
}
