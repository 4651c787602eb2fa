//! In-memory text buffers, versions and the buffer store
//!
//! Every document owns one live [`TextBuffer`] plus an immutable baseline
//! copy taken at creation time; dirty-state queries compare the two. The
//! buffer version is a monotonic counter bumped once per non-empty mutation
//! batch and is used exclusively to detect staleness of in-flight backend
//! round-trips. It is never persisted.

use crate::document::DocumentId;
use crate::protocol::TextChange;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// Monotonic per-document mutation counter
pub type BufferVersion = u64;

/// One live editable text buffer
#[derive(Debug, Clone)]
pub struct TextBuffer {
    text: String,
    version: BufferVersion,
}

impl TextBuffer {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            text: content.into(),
            version: 0,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn version(&self) -> BufferVersion {
        self.version
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Apply an ordered batch of edits. Each edit is relative to the buffer
    /// state before that edit. The version is bumped once per non-empty
    /// batch; an empty batch leaves the buffer and version untouched.
    ///
    /// Returns the version after the batch.
    pub fn apply_batch(&mut self, changes: &[TextChange]) -> BufferVersion {
        if changes.is_empty() {
            return self.version;
        }

        for change in changes {
            let start = line_col_to_offset(
                &self.text,
                change.start_line as usize,
                change.start_column as usize,
            );
            let end = line_col_to_offset(
                &self.text,
                change.end_line as usize,
                change.end_column as usize,
            );
            let (start, end) = if start <= end { (start, end) } else { (end, start) };
            self.text.replace_range(start..end, &change.new_text);
        }

        self.version += 1;
        self.version
    }
}

/// Convert a 0-based line/column position (columns in characters) to a byte
/// offset. Out-of-range positions clamp to the end of the line or buffer.
fn line_col_to_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for _ in 0..line {
        match text[offset..].find('\n') {
            Some(nl) => offset += nl + 1,
            None => return text.len(),
        }
    }

    let line_end = text[offset..]
        .find('\n')
        .map(|nl| offset + nl)
        .unwrap_or(text.len());

    for _ in 0..column {
        match text[offset..line_end].chars().next() {
            Some(c) => offset += c.len_utf8(),
            None => break,
        }
    }
    offset
}

/// Buffers and baselines for all live documents, keyed by identity
#[derive(Debug, Default)]
pub struct BufferStore {
    buffers: HashMap<DocumentId, TextBuffer>,
    baselines: HashMap<DocumentId, String>,
}

impl BufferStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the buffer and its baseline copy. Returns false (and changes
    /// nothing) when the identity already has a buffer.
    pub fn insert(&mut self, id: DocumentId, content: &str) -> bool {
        if self.buffers.contains_key(&id) {
            return false;
        }
        self.baselines.insert(id.clone(), content.to_string());
        self.buffers.insert(id, TextBuffer::new(content));
        true
    }

    /// Destroy the buffer and baseline. Returns whether a removal occurred.
    pub fn remove(&mut self, id: &DocumentId) -> bool {
        self.baselines.remove(id);
        self.buffers.remove(id).is_some()
    }

    pub fn get(&self, id: &DocumentId) -> Option<&TextBuffer> {
        self.buffers.get(id)
    }

    pub fn get_mut(&mut self, id: &DocumentId) -> Option<&mut TextBuffer> {
        self.buffers.get_mut(id)
    }

    pub fn contains(&self, id: &DocumentId) -> bool {
        self.buffers.contains_key(id)
    }

    pub fn version_of(&self, id: &DocumentId) -> Option<BufferVersion> {
        self.buffers.get(id).map(|b| b.version())
    }

    /// O(n) content comparison against the baseline, length first. Not a
    /// flag; callers needing frequent checks should coalesce calls.
    pub fn is_dirty(&self, id: &DocumentId) -> Option<bool> {
        let buffer = self.buffers.get(id)?;
        let baseline = self.baselines.get(id)?;
        Some(buffer.len() != baseline.len() || buffer.text() != baseline)
    }

    pub fn ids(&self) -> impl Iterator<Item = &DocumentId> {
        self.buffers.keys()
    }
}

/// Shared handle to the buffer store. Held by the controller and the change
/// coordinator; borrows are never kept across a suspension point.
pub type SharedBuffers = Rc<RefCell<BufferStore>>;

pub fn shared_buffers() -> SharedBuffers {
    Rc::new(RefCell::new(BufferStore::new()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_col_to_offset() {
        let text = "hello\nworld\ntest";
        assert_eq!(line_col_to_offset(text, 0, 0), 0);
        assert_eq!(line_col_to_offset(text, 0, 5), 5);
        assert_eq!(line_col_to_offset(text, 1, 0), 6);
        assert_eq!(line_col_to_offset(text, 1, 5), 11);
        assert_eq!(line_col_to_offset(text, 2, 0), 12);

        // Out of bounds clamps
        assert_eq!(line_col_to_offset(text, 0, 99), 5);
        assert_eq!(line_col_to_offset(text, 10, 0), text.len());
    }

    #[test]
    fn test_line_col_to_offset_multibyte() {
        let text = "aé\nb";
        // 'é' is 2 bytes but one column
        assert_eq!(line_col_to_offset(text, 0, 2), 3);
        assert_eq!(line_col_to_offset(text, 1, 0), 4);
    }

    #[test]
    fn test_apply_batch_bumps_version_once() {
        let mut buffer = TextBuffer::new("x");
        assert_eq!(buffer.version(), 0);

        let batch = vec![
            TextChange::insert(0, 1, "y"),
            TextChange::insert(0, 2, "z"),
        ];
        let version = buffer.apply_batch(&batch);

        assert_eq!(buffer.text(), "xyz");
        assert_eq!(version, 1);
    }

    #[test]
    fn test_len_counts_bytes() {
        let mut buffer = TextBuffer::new("");
        assert!(buffer.is_empty());

        buffer.apply_batch(&[TextChange::insert(0, 0, "aé")]);
        assert!(!buffer.is_empty());
        assert_eq!(buffer.len(), 3);
    }

    #[test]
    fn test_empty_batch_is_ignored() {
        let mut buffer = TextBuffer::new("x");
        let version = buffer.apply_batch(&[]);
        assert_eq!(version, 0);
        assert_eq!(buffer.text(), "x");
    }

    #[test]
    fn test_apply_replacement_and_deletion() {
        let mut buffer = TextBuffer::new("hello world");
        buffer.apply_batch(&[TextChange {
            start_line: 0,
            start_column: 6,
            end_line: 0,
            end_column: 11,
            new_text: "there".to_string(),
        }]);
        assert_eq!(buffer.text(), "hello there");

        buffer.apply_batch(&[TextChange {
            start_line: 0,
            start_column: 5,
            end_line: 0,
            end_column: 11,
            new_text: String::new(),
        }]);
        assert_eq!(buffer.text(), "hello");
        assert_eq!(buffer.version(), 2);
    }

    #[test]
    fn test_edits_apply_in_order() {
        // The second edit addresses the buffer as left by the first
        let mut buffer = TextBuffer::new("ab");
        buffer.apply_batch(&[
            TextChange::insert(0, 1, "\n"),
            TextChange::insert(1, 1, "!"),
        ]);
        assert_eq!(buffer.text(), "a\nb!");
    }

    #[test]
    fn test_store_dirty_detection() {
        let mut store = BufferStore::new();
        let id = DocumentId::from("inmemory://model/a.cs");
        store.insert(id.clone(), "x");

        // A freshly added document is clean
        assert_eq!(store.is_dirty(&id), Some(false));

        store.get_mut(&id).unwrap().apply_batch(&[TextChange::insert(0, 1, "y")]);
        assert_eq!(store.is_dirty(&id), Some(true));

        // Same length, different bytes
        store.get_mut(&id).unwrap().apply_batch(&[TextChange {
            start_line: 0,
            start_column: 0,
            end_line: 0,
            end_column: 2,
            new_text: "zq".to_string(),
        }]);
        assert_eq!(store.is_dirty(&id), Some(true));

        assert_eq!(store.is_dirty(&DocumentId::from("missing")), None);
    }

    #[test]
    fn test_store_double_insert_is_noop() {
        let mut store = BufferStore::new();
        let id = DocumentId::from("inmemory://model/a.cs");
        assert!(store.insert(id.clone(), "first"));
        assert!(!store.insert(id.clone(), "second"));
        assert_eq!(store.get(&id).unwrap().text(), "first");
    }
}
