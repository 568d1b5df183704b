//! Annotation and flagged-line records.

use serde::{Deserialize, Serialize};

/// A PDF annotation (comment, highlight, stamp, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Annotation {
    /// Page the annotation belongs to (1-indexed)
    pub page: u32,

    /// Annotation subtype, e.g. "Text" or "Highlight"
    pub annotation_type: Option<String>,

    /// Annotation contents; empty when the annotation has none
    pub content: String,
}

impl Annotation {
    /// Create an annotation record.
    pub fn new(page: u32, annotation_type: Option<String>, content: impl Into<String>) -> Self {
        Self {
            page,
            annotation_type,
            content: content.into(),
        }
    }
}

/// A text line mentioning a finished floor level or a level marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelLine {
    /// Page the line was found on (1-indexed)
    pub page: u32,

    /// The line, trimmed
    pub line: String,
}
