//! Littera - bookkeeping core for a literate programming build tool.
//!
//! An external scanner walks a document tree token by token and emits
//! structured events; this crate aggregates them and produces three derived
//! artifacts once scanning completes:
//!
//! - **Tangled sources**: named source files reconstructed from interleaved
//!   code regions scattered across the documents
//! - **Build graph**: a per-document dependency graph of build artifacts,
//!   serialized as YAML
//! - **Outline**: a hierarchical table of contents of the whole document
//!   tree, including recursive inclusions, serialized as YAML
//!
//! # Example
//!
//! ```no_run
//! use littera::interface::Context;
//! use littera::events::ScanEvent;
//!
//! # async fn run() -> littera::Result<()> {
//! let mut ctx = Context::from_current_dir()?;
//! ctx.apply(ScanEvent::Section {
//!     doc: "main.tex".to_string(),
//!     level: "chapter".to_string(),
//!     ref_id: "ch:intro".to_string(),
//!     short_title: "Intro".to_string(),
//!     title: "Introduction".to_string(),
//! });
//! ctx.finalize().await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod errors;
pub mod events;
pub mod interface;
pub mod model;

#[cfg(test)]
mod test_utils;

// Re-export commonly used types
pub use config::BuildConfig;
pub use errors::{LitteraError, Result};
pub use events::ScanEvent;
pub use interface::Context;
pub use model::{
    BuildGraphBuilder, ChunkNamer, CodeChunk, CodeTangler, OutlineAssembler, OutlineNode,
    SectionLevel,
};
