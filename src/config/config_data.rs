//! Configuration data structures.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Output configuration for one build run.
///
/// All paths are taken as-is; resolving templates or project-relative
/// locations is the caller's concern.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildConfig {
    /// Directory for merged tangled source files.
    #[serde(default = "default_src_dir")]
    pub src_dir: PathBuf,

    /// Directory for individual chunk files and the outline.
    #[serde(default = "default_chunk_dir")]
    pub chunk_dir: PathBuf,

    /// Path of the serialized build-dependency graph.
    #[serde(default = "default_project_desc_path")]
    pub project_desc_path: PathBuf,

    /// Path of the serialized document outline.
    #[serde(default = "default_outline_path")]
    pub outline_path: PathBuf,

    /// Name of the document the scan starts from.
    #[serde(default = "default_root_document")]
    pub root_document: String,

    /// Task snippet used for the root typesetting artifact.
    #[serde(default = "default_root_task_snippet")]
    pub root_task_snippet: String,
}

fn default_src_dir() -> PathBuf {
    PathBuf::from("build/src")
}

fn default_chunk_dir() -> PathBuf {
    PathBuf::from("build/latex")
}

fn default_project_desc_path() -> PathBuf {
    PathBuf::from("build/projDesc.yaml")
}

fn default_outline_path() -> PathBuf {
    PathBuf::from("build/latex/documentStructure.yaml")
}

fn default_root_document() -> String {
    "main.tex".to_string()
}

fn default_root_task_snippet() -> String {
    "typesetLatex".to_string()
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            src_dir: default_src_dir(),
            chunk_dir: default_chunk_dir(),
            project_desc_path: default_project_desc_path(),
            outline_path: default_outline_path(),
            root_document: default_root_document(),
            root_task_snippet: default_root_task_snippet(),
        }
    }
}

impl BuildConfig {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the root document with its extension replaced by `.pdf`.
    pub fn root_pdf_name(&self) -> String {
        let root = PathBuf::from(&self.root_document);
        root.with_extension("pdf").to_string_lossy().into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert_eq!(config.src_dir, PathBuf::from("build/src"));
        assert_eq!(config.chunk_dir, PathBuf::from("build/latex"));
        assert_eq!(config.root_document, "main.tex");
        assert_eq!(config.root_task_snippet, "typesetLatex");
    }

    #[test]
    fn test_root_pdf_name() {
        let mut config = BuildConfig::default();
        config.root_document = "thesis.tex".to_string();
        assert_eq!(config.root_pdf_name(), "thesis.pdf");

        config.root_document = "notes".to_string();
        assert_eq!(config.root_pdf_name(), "notes.pdf");
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = BuildConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: BuildConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.src_dir, config.src_dir);
        assert_eq!(parsed.root_document, config.root_document);
    }
}
