//! Wire shapes for the compiler-workspace boundary
//!
//! All positions are 0-based line/column pairs (columns counted in
//! characters). Edits in a change batch are ordered and each is relative to
//! the buffer state *before* that edit is applied. The exact transport is
//! out of scope; these types only fix the payload shape.

use crate::document::DocumentId;
use serde::{Deserialize, Serialize};

/// One text edit: replace the span with `new_text`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextChange {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
    pub new_text: String,
}

impl TextChange {
    /// Pure insertion at a position
    pub fn insert(line: u32, column: u32, text: impl Into<String>) -> Self {
        Self {
            start_line: line,
            start_column: column,
            end_line: line,
            end_column: column,
            new_text: text.into(),
        }
    }

    /// Replacement of a span
    pub fn replace(span: Span, text: impl Into<String>) -> Self {
        Self {
            start_line: span.start_line,
            start_column: span.start_column,
            end_line: span.end_line,
            end_column: span.end_column,
            new_text: text.into(),
        }
    }
}

/// A 0-based line/column span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Span {
    pub start_line: u32,
    pub start_column: u32,
    pub end_line: u32,
    pub end_column: u32,
}

impl Span {
    pub fn new(start_line: u32, start_column: u32, end_line: u32, end_column: u32) -> Self {
        Self {
            start_line,
            start_column,
            end_line,
            end_column,
        }
    }
}

/// Ordered batch of edits for one document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeBufferRequest {
    pub document: DocumentId,
    pub changes: Vec<TextChange>,
    pub apply_changes_together: bool,
}

/// Analysis request: one document, or the whole workspace when `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCheckRequest {
    pub document: Option<DocumentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MarkerSeverity {
    Hint,
    Info,
    Warning,
    Error,
}

/// One diagnostic marker addressed into a live buffer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Marker {
    pub document: DocumentId,
    pub severity: MarkerSeverity,
    pub message: String,
    #[serde(flatten)]
    pub span: Span,
}

/// Diagnostics for one or more documents. A multi-document batch must be
/// partitioned by document before it is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeCheckResponse {
    pub markers: Vec<Marker>,
}

/// Token-classification request, whole document when `range` is `None`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyRequest {
    pub document: DocumentId,
    pub range: Option<Span>,
}

/// One classified token span
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedSpan {
    #[serde(flatten)]
    pub span: Span,
    pub kind: String,
    #[serde(default)]
    pub modifiers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyResponse {
    pub spans: Vec<ClassifiedSpan>,
}
