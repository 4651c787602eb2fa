//! Documents and the document registry
//!
//! A document is an addressable, named in-memory text buffer tracked by a
//! stable string identity (typically a URI). The registry owns document
//! metadata; buffers live in [`crate::buffer::BufferStore`] and editors only
//! ever hold identities, never the documents themselves.

use crate::error::EditorError;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Stable string identity of a document (e.g. `inmemory://model/Program.cs`)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DocumentId(pub String);

impl DocumentId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for DocumentId {
    fn from(s: &str) -> Self {
        DocumentId(s.to_string())
    }
}

impl From<String> for DocumentId {
    fn from(s: String) -> Self {
        DocumentId(s)
    }
}

/// Access attribute of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
}

impl Default for AccessMode {
    fn default() -> Self {
        AccessMode::ReadWrite
    }
}

/// Metadata for one tracked document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: DocumentId,
    /// Name shown in tabs and pickers
    pub display_name: String,
    /// Grouping key, e.g. the owning project
    pub project: String,
    #[serde(default)]
    pub access: AccessMode,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Document {
    /// Create a read-write document with no tags
    pub fn new(
        id: impl Into<DocumentId>,
        display_name: impl Into<String>,
        project: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            project: project.into(),
            access: AccessMode::ReadWrite,
            tags: Vec::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.access = AccessMode::ReadOnly;
        self
    }

    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// The set of known documents, keyed by identity
///
/// Pure leaf: no side effects beyond its own map, single-threaded
/// cooperative access only.
#[derive(Debug, Default)]
pub struct DocumentRegistry {
    documents: HashMap<DocumentId, Document>,
}

impl DocumentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document. Fails if the identity is already present.
    pub fn add(&mut self, document: Document) -> Result<(), EditorError> {
        if self.documents.contains_key(&document.id) {
            return Err(EditorError::DuplicateDocument(document.id));
        }
        tracing::debug!("registered document '{}'", document.id);
        self.documents.insert(document.id.clone(), document);
        Ok(())
    }

    /// Remove a document. Returns whether a removal occurred.
    pub fn remove(&mut self, id: &DocumentId) -> bool {
        self.documents.remove(id).is_some()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.documents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// All documents belonging to a project group
    pub fn in_project<'a>(&'a self, project: &'a str) -> impl Iterator<Item = &'a Document> {
        self.documents.values().filter(move |d| d.project == project)
    }
}
