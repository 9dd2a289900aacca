//! Structural events emitted by the document scanner.

use std::sync::Arc;

/// One structural event observed while scanning a document.
///
/// The scanner owns the document text; a code region stop carries the
/// scanned document's lines behind an `Arc` so events stay cheap to clone.
#[derive(Debug, Clone)]
pub enum ScanEvent {
    /// A code region opened.
    CodeStart {
        doc: String,
        code_type: String,
        code_name: String,
        line: usize,
    },

    /// A code region closed.
    CodeStop {
        doc: String,
        code_type: String,
        line: usize,
        doc_lines: Arc<Vec<String>>,
    },

    /// A build artifact description opened.
    ArtifactStart {
        doc: String,
        name: String,
        artifact_type: String,
    },

    /// A build artifact description closed.
    ArtifactStop { doc: String, line: usize },

    /// A typed requirement for the open artifact.
    Requirement {
        doc: String,
        obj_type: String,
        obj_name: String,
        line: usize,
    },

    /// A typed creation of the open artifact.
    Creation {
        doc: String,
        obj_type: String,
        obj_name: String,
        line: usize,
    },

    /// A leveled section heading.
    Section {
        doc: String,
        level: String,
        ref_id: String,
        short_title: String,
        title: String,
    },

    /// Inclusion of a sub-document.
    FileReference { doc: String, target: String },

    /// A label definition.
    Label { doc: String, ref_id: String },
}
