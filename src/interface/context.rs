//! Execution context for one build run.

use crate::config::BuildConfig;
use crate::errors::Result;
use crate::events::ScanEvent;
use crate::model::{BuildGraphBuilder, ChunkNamer, CodeTangler, OutlineAssembler};

/// Context for one build run.
///
/// Holds the configuration and the four event aggregators; constructed
/// once per build and driven by the scanner's event stream. The
/// aggregators never communicate with each other except by sharing the
/// same timeline.
#[derive(Debug)]
pub struct Context {
    /// Output configuration.
    pub config: BuildConfig,
    /// Chunk file name generator.
    pub chunk_namer: ChunkNamer,
    /// Source file reconstruction.
    pub tangler: CodeTangler,
    /// Build-dependency graph reconstruction.
    pub build_graph: BuildGraphBuilder,
    /// Document outline reconstruction.
    pub outline: OutlineAssembler,
}

impl Context {
    /// Creates a new context with the given configuration.
    ///
    /// The synthetic artifact that typesets the root document is registered
    /// up front; it stays open until finalization closes it.
    pub fn new(config: BuildConfig) -> Self {
        let mut build_graph = BuildGraphBuilder::new();
        build_graph.register_root_artifact(&config);

        Self {
            config,
            chunk_namer: ChunkNamer::new(),
            tangler: CodeTangler::new(),
            build_graph,
            outline: OutlineAssembler::new(),
        }
    }

    /// Creates a context with default configuration.
    pub fn default_context() -> Self {
        Self::new(BuildConfig::default())
    }

    /// Creates a context from the current directory's configuration file.
    pub fn from_current_dir() -> Result<Self> {
        let base_dir = std::env::current_dir()?;
        let config = crate::config::read_config(&base_dir)?;
        Ok(Self::new(config))
    }

    /// Routes one scan event to its owning aggregator.
    ///
    /// Malformed event ordering never fails; offending events are warned
    /// about and discarded by the aggregators themselves.
    pub fn apply(&mut self, event: ScanEvent) {
        match event {
            ScanEvent::CodeStart {
                doc,
                code_type,
                code_name,
                line,
            } => {
                self.tangler.start(&doc, &code_type, &code_name, line);
            }
            ScanEvent::CodeStop {
                doc,
                code_type,
                line,
                doc_lines,
            } => {
                self.tangler.stop(&doc, &code_type, line, &doc_lines);
            }
            ScanEvent::ArtifactStart {
                doc,
                name,
                artifact_type,
            } => {
                self.build_graph.start_artifact(&doc, &name, &artifact_type);
            }
            ScanEvent::ArtifactStop { doc, line } => {
                self.build_graph.stop_artifact(&doc, line);
            }
            ScanEvent::Requirement {
                doc,
                obj_type,
                obj_name,
                line,
            } => {
                self.build_graph
                    .add_requirement(&doc, &obj_type, &obj_name, line);
            }
            ScanEvent::Creation {
                doc,
                obj_type,
                obj_name,
                line,
            } => {
                self.build_graph
                    .add_creation(&doc, &obj_type, &obj_name, line);
            }
            ScanEvent::Section {
                doc,
                level,
                ref_id,
                short_title,
                title,
            } => {
                self.outline
                    .record_section(&doc, &level, &ref_id, &short_title, &title);
            }
            ScanEvent::FileReference { doc, target } => {
                self.outline.record_file_reference(&doc, &target);
            }
            ScanEvent::Label { doc, ref_id } => {
                self.outline.record_label(&doc, &ref_id);
            }
        }
    }

    /// Serializes the accumulated state of every aggregator.
    ///
    /// Runs strictly after scanning of the entire document tree completes.
    /// I/O failures propagate as fatal; nothing is retried.
    pub async fn finalize(&mut self) -> Result<()> {
        self.tangler.finalize(&self.config).await?;
        self.build_graph.finalize(&self.config).await?;
        self.outline.finalize(&self.config).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{doc_lines, section_event};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn test_config(dir: &std::path::Path) -> BuildConfig {
        BuildConfig {
            src_dir: dir.join("src"),
            chunk_dir: dir.join("latex"),
            project_desc_path: dir.join("projDesc.yaml"),
            outline_path: dir.join("latex/documentStructure.yaml"),
            root_document: "a.tex".to_string(),
            root_task_snippet: "typesetLatex".to_string(),
        }
    }

    #[test]
    fn test_events_route_to_owning_aggregator() {
        let mut ctx = Context::default_context();
        let lines = Arc::new(doc_lines(&["s", "code", "e"]));

        ctx.apply(ScanEvent::CodeStart {
            doc: "a.tex".to_string(),
            code_type: "c".to_string(),
            code_name: "main.c".to_string(),
            line: 0,
        });
        ctx.apply(ScanEvent::CodeStop {
            doc: "a.tex".to_string(),
            code_type: "c".to_string(),
            line: 2,
            doc_lines: Arc::clone(&lines),
        });

        assert!(ctx.tangler.chunks("a.tex", "c", "main.c").is_some());
    }

    #[tokio::test]
    async fn test_end_to_end_scenario() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let mut ctx = Context::new(config);

        let a_lines = Arc::new(doc_lines(&[
            "\\startCode",
            "int main() { return 0; }",
            "\\stopCode",
        ]));

        // Document A: one part section, a code region, a build artifact,
        // then the inclusion of B.
        ctx.apply(section_event("a.tex", "part", "pt:one"));
        ctx.apply(ScanEvent::CodeStart {
            doc: "a.tex".to_string(),
            code_type: "c".to_string(),
            code_name: "main.c".to_string(),
            line: 0,
        });
        ctx.apply(ScanEvent::CodeStop {
            doc: "a.tex".to_string(),
            code_type: "c".to_string(),
            line: 2,
            doc_lines: Arc::clone(&a_lines),
        });
        ctx.apply(ScanEvent::ArtifactStart {
            doc: "a.tex".to_string(),
            name: "main".to_string(),
            artifact_type: "compileC".to_string(),
        });
        ctx.apply(ScanEvent::Requirement {
            doc: "a.tex".to_string(),
            obj_type: "c".to_string(),
            obj_name: r"main\_src.c".to_string(),
            line: 4,
        });
        ctx.apply(ScanEvent::Creation {
            doc: "a.tex".to_string(),
            obj_type: "executable".to_string(),
            obj_name: "main".to_string(),
            line: 5,
        });
        ctx.apply(ScanEvent::ArtifactStop {
            doc: "a.tex".to_string(),
            line: 6,
        });
        ctx.apply(ScanEvent::FileReference {
            doc: "a.tex".to_string(),
            target: "b.tex".to_string(),
        });

        // Document B: one chapter and one label.
        ctx.apply(section_event("b.tex", "chapter", "ch:intro"));
        ctx.apply(ScanEvent::Label {
            doc: "b.tex".to_string(),
            ref_id: "lbl:intro".to_string(),
        });

        ctx.finalize().await.unwrap();

        // Tangled output
        let merged = std::fs::read_to_string(ctx.config.src_dir.join("main.c")).unwrap();
        assert_eq!(merged, "int main() { return 0; }");
        assert!(ctx
            .config
            .chunk_dir
            .join("main.c-a.tex-c00001.chunk")
            .exists());

        // Build graph: the scanned artifact plus the root typesetting one
        let yaml = std::fs::read_to_string(&ctx.config.project_desc_path).unwrap();
        let graph: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(graph["projects"]["main"]["taskSnippet"], "compileC");
        assert_eq!(
            graph["projects"]["main"]["dependencies"]["c"][0],
            "main_src.c"
        );
        assert_eq!(
            graph["projects"]["main"]["creates"]["executable"][0],
            "main"
        );
        assert_eq!(graph["projects"]["a.tex"]["taskSnippet"], "typesetLatex");
        assert_eq!(graph["projects"]["a.tex"]["creates"]["pdf"][0], "a.pdf");

        // Outline: part -> chapter -> label
        let yaml = std::fs::read_to_string(&ctx.config.outline_path).unwrap();
        let outline: serde_yaml::Value = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(outline.as_sequence().map(Vec::len), Some(1));
        assert_eq!(outline[0]["secType"], "part");
        assert_eq!(outline[0]["children"][0]["secType"], "chapter");
        assert_eq!(
            outline[0]["children"][0]["children"][0]["refID"],
            "lbl:intro"
        );
    }

    #[test]
    fn test_chunk_namer_available_alongside_tangler() {
        let mut ctx = Context::default_context();
        assert_eq!(
            ctx.chunk_namer.next("main.c", "a.tex"),
            "main.c-a.tex-c00001.chunk"
        );
        assert_eq!(
            ctx.chunk_namer.next("main.c", "a.tex"),
            "main.c-a.tex-c00002.chunk"
        );
    }
}
