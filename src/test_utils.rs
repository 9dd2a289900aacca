//! Shared test utilities.

use crate::events::ScanEvent;

/// Builds owned document lines from string literals.
pub fn doc_lines(lines: &[&str]) -> Vec<String> {
    lines.iter().map(|l| l.to_string()).collect()
}

/// Builds a section event with titles derived from the reference ID.
pub fn section_event(doc: &str, level: &str, ref_id: &str) -> ScanEvent {
    ScanEvent::Section {
        doc: doc.to_string(),
        level: level.to_string(),
        ref_id: ref_id.to_string(),
        short_title: format!("{} short", ref_id),
        title: format!("{} title", ref_id),
    }
}
