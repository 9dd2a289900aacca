//! Reconstruction of named source files from scattered code regions.

use indexmap::IndexMap;

use crate::config::BuildConfig;
use crate::errors::Result;

use super::chunk::{chunk_file_name, CodeChunk};

/// An open span waiting for its stop marker.
#[derive(Debug, Clone)]
struct PendingSpan {
    code_name: String,
    start_line: usize,
}

/// Code streams for one `(document, code type)` pair.
///
/// Holds at most one pending open span at a time plus the closed chunks
/// keyed by code name, in first-seen order.
#[derive(Debug, Default)]
struct TypedCodeStream {
    pending: Option<PendingSpan>,
    chunks: IndexMap<String, Vec<CodeChunk>>,
}

/// Reconstructs named source files from possibly non-contiguous code
/// regions scattered across one or more documents.
///
/// Code belonging to one logical file can be interleaved with prose and
/// split across multiple start/stop regions; tangling preserves textual
/// order of appearance. Building the same name again appends.
#[derive(Debug, Default)]
pub struct CodeTangler {
    // Keyed by document name first so independent documents never share
    // mutable state.
    streams: IndexMap<String, IndexMap<String, TypedCodeStream>>,
}

impl CodeTangler {
    /// Creates a new empty tangler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn stream_mut(&mut self, doc: &str, code_type: &str) -> &mut TypedCodeStream {
        self.streams
            .entry(doc.to_string())
            .or_default()
            .entry(code_type.to_string())
            .or_default()
    }

    /// Opens a pending span for `(doc, code_type)`.
    ///
    /// A second start before a stop silently overwrites the pending span.
    pub fn start(&mut self, doc: &str, code_type: &str, code_name: &str, line: usize) {
        let stream = self.stream_mut(doc, code_type);
        stream.pending = Some(PendingSpan {
            code_name: code_name.to_string(),
            start_line: line,
        });
    }

    /// Closes the pending span for `(doc, code_type)`.
    ///
    /// `doc_lines` is the full text of the document; the chunk is the slice
    /// strictly between the start and stop marker lines. Stops without a
    /// start, and empty or inverted regions, are warned about and discarded.
    pub fn stop(&mut self, doc: &str, code_type: &str, line: usize, doc_lines: &[String]) {
        let stream = self.stream_mut(doc, code_type);

        let Some(span) = stream.pending.take() else {
            tracing::warn!("no start of {} in {}", code_type, doc);
            tracing::warn!("  ... ignoring the chunk that ends at {}!", line);
            return;
        };

        let stop_line = line;
        if stop_line <= span.start_line {
            tracing::warn!(
                "no {} found between {} and {} in {}",
                code_type,
                span.start_line,
                stop_line,
                doc
            );
            tracing::warn!("  ... ignoring this chunk!");
            return;
        }

        let upper = stop_line.min(doc_lines.len());
        let lower = (span.start_line + 1).min(upper);
        let lines = doc_lines[lower..upper].to_vec();

        stream
            .chunks
            .entry(span.code_name.clone())
            .or_default()
            .push(CodeChunk::new(span.start_line, stop_line, lines, doc));
    }

    /// Returns the closed chunks for `(doc, code_type, code_name)`, if any.
    pub fn chunks(&self, doc: &str, code_type: &str, code_name: &str) -> Option<&[CodeChunk]> {
        self.streams
            .get(doc)?
            .get(code_type)?
            .chunks
            .get(code_name)
            .map(Vec::as_slice)
    }

    /// Writes all chunk files and merged source files.
    ///
    /// For every `(doc, code_type, code_name)` triple in first-seen order,
    /// each chunk is written to its own file under the chunk directory with
    /// a per-name 1-based index, and the newline-joined concatenation of all
    /// chunks lands under the source directory at the code name itself.
    pub async fn finalize(&self, config: &BuildConfig) -> Result<()> {
        tracing::trace!("ENSURING the [{}] directory exists", config.src_dir.display());
        tokio::fs::create_dir_all(&config.src_dir).await?;

        tracing::trace!(
            "ENSURING the [{}] directory exists",
            config.chunk_dir.display()
        );
        tokio::fs::create_dir_all(&config.chunk_dir).await?;

        for (doc_name, typed_streams) in &self.streams {
            for stream in typed_streams.values() {
                for (code_name, chunks) in &stream.chunks {
                    let mut merged: Vec<&str> = Vec::new();

                    for (index, chunk) in chunks.iter().enumerate() {
                        // On-disk enumeration restarts at 1 for every name.
                        let chunk_path = config
                            .chunk_dir
                            .join(chunk_file_name(code_name, doc_name, index + 1));
                        tracing::debug!("WRITING this chunk to [{}]", chunk_path.display());
                        tokio::fs::write(&chunk_path, chunk.lines.join("\n")).await?;

                        merged.extend(chunk.lines.iter().map(String::as_str));
                    }

                    let code_path = config.src_dir.join(code_name);
                    tracing::trace!("WRITING source code to [{}]", code_path.display());
                    tokio::fs::write(&code_path, merged.join("\n")).await?;
                }
            }
        }

        Ok(())
    }
}
