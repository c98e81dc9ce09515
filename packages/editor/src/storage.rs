//! # Page Storage
//!
//! Boundary to the page-storage service. The editor treats every call as a
//! remote operation that may fail; failures are reported to the caller and
//! never retried or rolled into the document.
//!
//! Two backends ship with the crate:
//! - **Memory**: for tests and throwaway sessions
//! - **File**: one `<slug>.json` file per page in a directory

use crate::document::{Document, PageMeta};
use crate::interchange::{validate_nodes, ImportError};
use chrono::Utc;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Page not found: {0}")]
    NotFound(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid page: {0}")]
    Invalid(#[from] ImportError),

    #[error("Rejected: {0}")]
    Rejected(String),
}

/// Load/save/publish calls against a page store
pub trait PageStorage {
    /// Load a page by id or slug
    fn load(&self, page_id: &str) -> Result<Document, StorageError>;

    /// Create or update the page with the document's slug; returns what was stored
    fn save(&mut self, doc: &Document) -> Result<Document, StorageError>;

    /// Make the page publicly visible; returns the published record
    fn publish(&mut self, doc: &Document) -> Result<Document, StorageError>;

    /// Metadata of every stored page
    fn list(&self) -> Result<Vec<PageMeta>, StorageError>;
}

/// Stamp id and timestamp the way a page service does on save
fn prepare_for_save(doc: &Document) -> Result<Document, StorageError> {
    validate_slug(&doc.meta.slug)?;
    let mut stored = doc.clone();
    if stored.meta.id.is_none() {
        stored.meta.id = Some(Uuid::new_v4().to_string());
    }
    stored.meta.updated_at = Some(Utc::now());
    stored.mark_saved();
    Ok(stored)
}

fn validate_slug(slug: &str) -> Result<(), StorageError> {
    let valid = !slug.is_empty()
        && slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(StorageError::Rejected(format!("invalid page slug {slug:?}")))
    }
}

/// In-memory page store keyed by slug
#[derive(Debug, Default)]
pub struct MemoryStorage {
    pages: BTreeMap<String, Document>,
    published: BTreeMap<String, Document>,
    reject_with: Option<String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store that rejects every write with `reason`
    pub fn rejecting(reason: impl Into<String>) -> Self {
        Self {
            reject_with: Some(reason.into()),
            ..Default::default()
        }
    }

    pub fn published(&self, slug: &str) -> Option<&Document> {
        self.published.get(slug)
    }

    fn check_writable(&self) -> Result<(), StorageError> {
        match &self.reject_with {
            Some(reason) => Err(StorageError::Rejected(reason.clone())),
            None => Ok(()),
        }
    }
}

impl PageStorage for MemoryStorage {
    fn load(&self, page_id: &str) -> Result<Document, StorageError> {
        self.pages
            .get(page_id)
            .or_else(|| {
                self.pages
                    .values()
                    .find(|doc| doc.meta.id.as_deref() == Some(page_id))
            })
            .cloned()
            .ok_or_else(|| StorageError::NotFound(page_id.to_string()))
    }

    fn save(&mut self, doc: &Document) -> Result<Document, StorageError> {
        self.check_writable()?;
        let mut stored = prepare_for_save(doc)?;
        // Create-or-update by slug keeps the id already assigned to the slug
        if let Some(existing) = self.pages.get(&doc.meta.slug) {
            stored.meta.id = existing.meta.id.clone().or(stored.meta.id);
        }
        self.pages.insert(stored.meta.slug.clone(), stored.clone());
        Ok(stored)
    }

    fn publish(&mut self, doc: &Document) -> Result<Document, StorageError> {
        self.check_writable()?;
        let mut stored = self.save(doc)?;
        stored.meta.published = true;
        self.pages.insert(stored.meta.slug.clone(), stored.clone());
        self.published.insert(stored.meta.slug.clone(), stored.clone());
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<PageMeta>, StorageError> {
        Ok(self.pages.values().map(|doc| doc.meta.clone()).collect())
    }
}

const PUBLISHED_SUFFIX: &str = ".published.json";

/// Directory of page files, one `<slug>.json` per page
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn page_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}.json"))
    }

    pub fn published_path(&self, slug: &str) -> PathBuf {
        self.root.join(format!("{slug}{PUBLISHED_SUFFIX}"))
    }

    fn read(path: &Path) -> Result<Document, StorageError> {
        let text = fs::read_to_string(path)?;
        let doc: Document = serde_json::from_str(&text)?;
        validate_nodes(&doc.nodes)?;
        Ok(doc)
    }

    fn write(path: &Path, doc: &Document) -> Result<(), StorageError> {
        let text = serde_json::to_string_pretty(doc)?;
        fs::write(path, text)?;
        Ok(())
    }

    fn page_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        if !self.root.exists() {
            return Ok(Vec::new());
        }
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            let name = path
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default();
            if name.ends_with(".json") && !name.ends_with(PUBLISHED_SUFFIX) {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }
}

impl PageStorage for FileStorage {
    fn load(&self, page_id: &str) -> Result<Document, StorageError> {
        if validate_slug(page_id).is_ok() {
            let path = self.page_path(page_id);
            if path.exists() {
                return Self::read(&path);
            }
        }

        for path in self.page_files()? {
            match Self::read(&path) {
                Ok(doc) if doc.meta.id.as_deref() == Some(page_id) => return Ok(doc),
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(%error, path = %path.display(), "skipping unreadable page file");
                }
            }
        }

        Err(StorageError::NotFound(page_id.to_string()))
    }

    fn save(&mut self, doc: &Document) -> Result<Document, StorageError> {
        let mut stored = prepare_for_save(doc)?;
        let path = self.page_path(&stored.meta.slug);
        if path.exists() {
            let existing = Self::read(&path)?;
            stored.meta.id = existing.meta.id.or(stored.meta.id);
        }

        fs::create_dir_all(&self.root)?;
        Self::write(&path, &stored)?;
        tracing::info!(slug = %stored.meta.slug, path = %path.display(), "page saved");
        Ok(stored)
    }

    fn publish(&mut self, doc: &Document) -> Result<Document, StorageError> {
        let mut stored = self.save(doc)?;
        stored.meta.published = true;
        Self::write(&self.page_path(&stored.meta.slug), &stored)?;
        Self::write(&self.published_path(&stored.meta.slug), &stored)?;
        tracing::info!(slug = %stored.meta.slug, "page published");
        Ok(stored)
    }

    fn list(&self) -> Result<Vec<PageMeta>, StorageError> {
        self.page_files()?
            .iter()
            .map(|path| Self::read(path).map(|doc| doc.meta))
            .collect()
    }
}
