//! Filesystem document store
//!
//! Serves a local directory of uploaded documents. Hidden files are
//! skipped; type detection tries the extension first and falls back to
//! magic-byte sniffing for extensionless files.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{debug, info};
use walkdir::WalkDir;

use super::{Artifact, DocumentStore, DocumentType};

pub struct FsDocumentStore {
    root: PathBuf,
}

impl FsDocumentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn detect_type(path: &Path) -> DocumentType {
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            let detected = DocumentType::from_extension(ext);
            if detected != DocumentType::Unknown {
                return detected;
            }
        }
        match infer::get_from_path(path) {
            Ok(Some(kind)) if kind.mime_type() == "application/pdf" => DocumentType::Pdf,
            Ok(Some(kind)) if kind.mime_type().starts_with("image/") => DocumentType::Image,
            _ => DocumentType::Unknown,
        }
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

impl DocumentStore for FsDocumentStore {
    fn list(&self) -> Result<Vec<Artifact>> {
        if !self.root.exists() {
            anyhow::bail!("document directory not found: {}", self.root.display());
        }

        let mut artifacts = Vec::new();
        // The root itself is exempt from the hidden check so dotted
        // directories can still be served
        for entry in WalkDir::new(&self.root)
            .follow_links(false)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {e}");
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let name = path
                .strip_prefix(&self.root)
                .unwrap_or(path)
                .to_string_lossy()
                .to_string();
            let metadata = entry.metadata()?;
            let last_modified = metadata
                .modified()
                .ok()
                .map(DateTime::<Utc>::from);

            artifacts.push(Artifact {
                name,
                doc_type: Self::detect_type(path),
                size_bytes: metadata.len(),
                last_modified,
            });
        }

        artifacts.sort_by(|a, b| a.name.cmp(&b.name));
        info!("Found {} documents in {}", artifacts.len(), self.root.display());
        Ok(artifacts)
    }

    fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        let path = self.root.join(name);
        let content = std::fs::read(&path)
            .with_context(|| format!("Failed to read document: {}", path.display()))?;
        debug!("Fetched document: {name} ({} bytes)", content.len());
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_list_skips_hidden_and_detects_types() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("design.md"), "# Network design").unwrap();
        std::fs::write(dir.path().join("notes.txt"), "some notes").unwrap();
        std::fs::write(dir.path().join(".secret"), "hidden").unwrap();
        std::fs::create_dir(dir.path().join("sub")).unwrap();
        std::fs::write(dir.path().join("sub/more.txt"), "nested").unwrap();

        let store = FsDocumentStore::new(dir.path());
        let artifacts = store.list().unwrap();

        let names: Vec<&str> = artifacts.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, ["design.md", "notes.txt", "sub/more.txt"]);
        assert_eq!(artifacts[0].doc_type, DocumentType::Markdown);
        assert_eq!(artifacts[1].doc_type, DocumentType::Text);
    }

    #[test]
    fn test_fetch_round_trip() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("doc.txt"), "content here").unwrap();

        let store = FsDocumentStore::new(dir.path());
        assert_eq!(store.fetch("doc.txt").unwrap(), b"content here");
        assert!(store.fetch("missing.txt").is_err());
    }

    #[test]
    fn test_missing_root_errors() {
        let store = FsDocumentStore::new("/definitely/not/a/real/path");
        assert!(store.list().is_err());
    }
}
