//! Core data model: chunks, tangling, build graph, outline.

mod build_graph;
mod chunk;
mod outline;
mod tangle;

pub use build_graph::{strip_markup_escapes, BuildArtifact, BuildGraphBuilder, TypedObject};
pub use chunk::{chunk_file_name, ChunkNamer, CodeChunk};
pub use outline::{
    LabelNode, OutlineAssembler, OutlineEvent, OutlineNode, SectionLevel, SectionNode,
};
pub use tangle::CodeTangler;
