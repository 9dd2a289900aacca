//! Build artifact ledgers and dependency graph serialization.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::config::BuildConfig;
use crate::errors::Result;

/// Ledger key for the synthetic root typesetting artifact.
const ROOT_LEDGER: &str = "baseDoc";

/// A leading escape character before any single character collapses to
/// that character. Identifiers may arrive with document-markup escaping
/// intact (e.g. `some\_file.txt`).
static ESCAPE_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\\(.)").unwrap());

/// Strips markup-escape sequences from an identifier.
pub fn strip_markup_escapes(input: &str) -> String {
    ESCAPE_PATTERN.replace_all(input, "$1").into_owned()
}

/// A typed object reference attached to an artifact, either as a
/// requirement or as a creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedObject {
    pub obj_type: String,
    pub obj_name: String,
}

impl TypedObject {
    /// Creates a new typed object reference.
    pub fn new(obj_type: impl Into<String>, obj_name: impl Into<String>) -> Self {
        Self {
            obj_type: obj_type.into(),
            obj_name: obj_name.into(),
        }
    }
}

/// A named build output with its declared requirements and creations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildArtifact {
    pub name: String,
    pub artifact_type: String,
    pub requirements: Vec<TypedObject>,
    pub creations: Vec<TypedObject>,
}

impl BuildArtifact {
    /// Creates a new artifact with empty requirement and creation lists.
    pub fn new(name: impl Into<String>, artifact_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            artifact_type: artifact_type.into(),
            requirements: Vec::new(),
            creations: Vec::new(),
        }
    }

    fn add_requirement(&mut self, obj_type: String, obj_name: String) {
        self.requirements.push(TypedObject { obj_type, obj_name });
    }

    fn add_creation(&mut self, obj_type: String, obj_name: String) {
        self.creations.push(TypedObject { obj_type, obj_name });
    }
}

/// Per-document artifact ledger: the closed artifacts plus the one that is
/// still open, if any.
#[derive(Debug, Default)]
struct DocLedger {
    current: Option<BuildArtifact>,
    artifacts: Vec<BuildArtifact>,
}

impl DocLedger {
    /// Moves the open artifact, if any, to the closed sequence.
    fn flush(&mut self) {
        if let Some(artifact) = self.current.take() {
            self.artifacts.push(artifact);
        }
    }
}

/// Serialized form of one artifact in the build description.
#[derive(Debug, Serialize)]
pub struct ProjectRecord {
    #[serde(rename = "taskSnippet")]
    pub task_snippet: String,
    pub creates: IndexMap<String, Vec<String>>,
    pub dependencies: IndexMap<String, Vec<String>>,
}

/// Top-level shape of the serialized build description.
#[derive(Debug, Serialize)]
struct ProjectDescription {
    projects: IndexMap<String, ProjectRecord>,
}

/// Reconstructs the build-dependency graph from artifact events.
///
/// At most one artifact per document is open at a time; requirements and
/// creations attach to it. Attachment while none is open is a warned no-op.
#[derive(Debug, Default)]
pub struct BuildGraphBuilder {
    // Keyed by document name first so independent documents never share
    // mutable state.
    ledgers: IndexMap<String, DocLedger>,
}

impl BuildGraphBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn ledger_mut(&mut self, doc: &str) -> &mut DocLedger {
        self.ledgers.entry(doc.to_string()).or_default()
    }

    /// Opens a new artifact for `doc`, flushing any previously open one.
    pub fn start_artifact(&mut self, doc: &str, name: &str, artifact_type: &str) {
        let ledger = self.ledger_mut(doc);
        ledger.flush();
        ledger.current = Some(BuildArtifact::new(name, artifact_type));
    }

    /// Closes the open artifact for `doc`.
    pub fn stop_artifact(&mut self, doc: &str, line: usize) {
        let ledger = self.ledger_mut(doc);
        if ledger.current.is_none() {
            tracing::warn!("no start of the current build artifact in {}", doc);
            tracing::warn!("  ... ignoring the artifact which ends at {}!", line);
            return;
        }
        ledger.flush();
    }

    /// Appends a requirement to the open artifact for `doc`.
    ///
    /// Markup escapes are stripped from both the type and the name before
    /// storage.
    pub fn add_requirement(&mut self, doc: &str, obj_type: &str, obj_name: &str, line: usize) {
        let obj_type = strip_markup_escapes(obj_type);
        let obj_name = strip_markup_escapes(obj_name);

        let ledger = self.ledger_mut(doc);
        match ledger.current.as_mut() {
            Some(artifact) => artifact.add_requirement(obj_type, obj_name),
            None => {
                tracing::warn!("no start of the current build artifact in {}", doc);
                tracing::warn!("  ... ignoring the requirement at {}!", line);
            }
        }
    }

    /// Appends a creation to the open artifact for `doc`.
    pub fn add_creation(&mut self, doc: &str, obj_type: &str, obj_name: &str, line: usize) {
        let ledger = self.ledger_mut(doc);
        match ledger.current.as_mut() {
            Some(artifact) => {
                artifact.add_creation(obj_type.to_string(), obj_name.to_string());
            }
            None => {
                tracing::warn!("no start of the current build artifact in {}", doc);
                tracing::warn!("  ... ignoring the creation at {}!", line);
            }
        }
    }

    /// Opens the synthetic artifact that typesets the root document.
    ///
    /// Recorded under its own ledger so document-driven events never attach
    /// to it; it stays open until finalization force-closes it.
    pub fn register_root_artifact(&mut self, config: &BuildConfig) {
        let root = config.root_document.clone();
        let pdf = config.root_pdf_name();
        self.start_artifact(ROOT_LEDGER, &root, &config.root_task_snippet);
        self.add_creation(ROOT_LEDGER, "pdf", &pdf, 0);
        self.add_requirement(ROOT_LEDGER, "latex", &root, 0);
    }

    /// Returns the closed artifacts recorded for `doc`.
    pub fn closed_artifacts(&self, doc: &str) -> &[BuildArtifact] {
        self.ledgers
            .get(doc)
            .map(|ledger| ledger.artifacts.as_slice())
            .unwrap_or(&[])
    }

    /// Groups every closed artifact into output records, keyed by artifact
    /// name.
    ///
    /// Name collisions across documents are last-writer-wins, preserving
    /// the position of the first occurrence.
    fn project_records(&mut self) -> IndexMap<String, ProjectRecord> {
        // Any artifact still open at finalize time is force-closed.
        for ledger in self.ledgers.values_mut() {
            ledger.flush();
        }

        let mut projects = IndexMap::new();
        for ledger in self.ledgers.values() {
            for artifact in &ledger.artifacts {
                let mut dependencies: IndexMap<String, Vec<String>> = IndexMap::new();
                for req in &artifact.requirements {
                    dependencies
                        .entry(req.obj_type.clone())
                        .or_default()
                        .push(req.obj_name.clone());
                }

                let mut creates: IndexMap<String, Vec<String>> = IndexMap::new();
                for creation in &artifact.creations {
                    creates
                        .entry(creation.obj_type.clone())
                        .or_default()
                        .push(creation.obj_name.clone());
                }

                projects.insert(
                    artifact.name.clone(),
                    ProjectRecord {
                        task_snippet: artifact.artifact_type.clone(),
                        creates,
                        dependencies,
                    },
                );
            }
        }

        projects
    }

    /// Serializes the accumulated build description as YAML.
    pub async fn finalize(&mut self, config: &BuildConfig) -> Result<()> {
        let description = ProjectDescription {
            projects: self.project_records(),
        };

        if let Some(parent) = config.project_desc_path.parent() {
            tracing::trace!("ENSURING the [{}] directory exists", parent.display());
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::trace!(
            "WRITING project description to [{}]",
            config.project_desc_path.display()
        );
        let yaml = serde_yaml::to_string(&description)?;
        tokio::fs::write(&config.project_desc_path, yaml).await?;

        Ok(())
    }
}
