//! Code chunks and chunk file naming.

use std::collections::HashMap;

/// One contiguous extracted span of code text.
///
/// Produced when a start/stop pair resolves; never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeChunk {
    /// Line of the start marker (1-indexed, exclusive).
    pub start_line: usize,
    /// Line of the stop marker (1-indexed, exclusive).
    pub stop_line: usize,
    /// The extracted lines between the markers.
    pub lines: Vec<String>,
    /// Name of the document that contains the span.
    pub doc_name: String,
}

impl CodeChunk {
    /// Creates a new code chunk.
    pub fn new(
        start_line: usize,
        stop_line: usize,
        lines: Vec<String>,
        doc_name: impl Into<String>,
    ) -> Self {
        Self {
            start_line,
            stop_line,
            lines,
            doc_name: doc_name.into(),
        }
    }
}

/// Formats the on-disk name of one chunk file.
///
/// The shape is fixed: `<codeName>-<docName>-c<counter, 5 digits>.chunk`.
pub fn chunk_file_name(code_name: &str, doc_name: &str, number: usize) -> String {
    format!("{}-{}-c{:05}.chunk", code_name, doc_name, number)
}

/// Generates collision-resistant, deterministic chunk file names.
///
/// Keeps a monotonic counter per `(code_name, doc_name)` pair, starting at 1.
#[derive(Debug, Clone, Default)]
pub struct ChunkNamer {
    counters: HashMap<(String, String), usize>,
}

impl ChunkNamer {
    /// Creates a new chunk namer with all counters at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the next chunk file name for the given code name and document.
    pub fn next(&mut self, code_name: &str, doc_name: &str) -> String {
        let counter = self
            .counters
            .entry((code_name.to_string(), doc_name.to_string()))
            .or_insert(0);
        *counter += 1;
        chunk_file_name(code_name, doc_name, *counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_name_starts_at_one() {
        let mut namer = ChunkNamer::new();
        assert_eq!(namer.next("main.c", "doc"), "main.c-doc-c00001.chunk");
    }

    #[test]
    fn test_counters_increase_per_pair() {
        let mut namer = ChunkNamer::new();
        assert_eq!(namer.next("main.c", "doc"), "main.c-doc-c00001.chunk");
        assert_eq!(namer.next("main.c", "doc"), "main.c-doc-c00002.chunk");
        assert_eq!(namer.next("main.c", "doc"), "main.c-doc-c00003.chunk");
    }

    #[test]
    fn test_counters_independent_across_pairs() {
        let mut namer = ChunkNamer::new();
        namer.next("main.c", "doc");
        namer.next("main.c", "doc");

        // A different document or code name starts its own counter
        assert_eq!(namer.next("main.c", "other"), "main.c-other-c00001.chunk");
        assert_eq!(namer.next("util.c", "doc"), "util.c-doc-c00001.chunk");
        assert_eq!(namer.next("main.c", "doc"), "main.c-doc-c00003.chunk");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(chunk_file_name("a", "b", 12), "a-b-c00012.chunk");
        assert_eq!(chunk_file_name("a", "b", 123456), "a-b-c123456.chunk");
    }
}
