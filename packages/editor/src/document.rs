//! # Page Document
//!
//! A page being edited: the root sequence of nodes plus page metadata.
//!
//! ## Lifecycle
//!
//! ```text
//! Load → Edit → Save → Publish
//!   ↓      ↓      ↓       ↓
//! Store  Mutations Store  Store
//! ```
//!
//! The document is owned by one editing session. Its node list only ever
//! changes by wholesale replacement with a tree produced by the mutation
//! engine or restored from history.

use crate::node::Node;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Page metadata persisted alongside the nodes
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Assigned by the page store on first save
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    pub title: String,

    /// Unique key used by the page store (create-or-update)
    pub slug: String,

    #[serde(default)]
    pub description: String,

    #[serde(default)]
    pub is_homepage: bool,

    #[serde(default)]
    pub published: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PageMeta {
    /// Metadata for a new page; the slug is derived from the title
    pub fn new(title: impl Into<String>) -> Self {
        let title = title.into();
        Self {
            slug: slugify(&title),
            title,
            ..Default::default()
        }
    }
}

/// Editable page document
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub meta: PageMeta,

    /// Root sequence, rendered top to bottom
    #[serde(default)]
    pub nodes: Vec<Node>,

    /// Current version number (increments on each applied change)
    #[serde(default)]
    pub version: u64,

    #[serde(skip)]
    dirty: bool,
}

impl Document {
    pub fn new(meta: PageMeta) -> Self {
        Self {
            meta,
            ..Default::default()
        }
    }

    pub fn with_nodes(meta: PageMeta, nodes: Vec<Node>) -> Self {
        Self {
            meta,
            nodes,
            ..Default::default()
        }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Install a new root sequence
    pub fn replace_nodes(&mut self, nodes: Vec<Node>) {
        self.nodes = nodes;
        self.version += 1;
        self.dirty = true;
    }

    /// Check if document has unsaved changes
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }
}

/// Lowercase, dash-separated slug of `title`
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
