//! Outline reconstruction from flat section, inclusion and label events.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

use crate::config::BuildConfig;
use crate::errors::Result;

/// Section granularities in fixed coarse-to-fine order.
///
/// The derived `Ord` follows declaration order, so `Matter` is the
/// coarsest level and `Subparagraph` the finest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionLevel {
    Matter,
    Part,
    Chapter,
    Section,
    Subsection,
    Subsubsection,
    Paragraph,
    Subparagraph,
}

impl SectionLevel {
    /// All levels, coarsest first.
    pub const ALL: [SectionLevel; 8] = [
        SectionLevel::Matter,
        SectionLevel::Part,
        SectionLevel::Chapter,
        SectionLevel::Section,
        SectionLevel::Subsection,
        SectionLevel::Subsubsection,
        SectionLevel::Paragraph,
        SectionLevel::Subparagraph,
    ];

    /// Parses a level string from the markup.
    ///
    /// Matter-like, title-like and appendix-like qualifiers all collapse to
    /// `Matter`. Returns `None` for anything else that is not a known level.
    pub fn parse(input: &str) -> Option<Self> {
        let lowered = input.to_lowercase();
        if lowered.ends_with("matter")
            || lowered.ends_with("title")
            || lowered.ends_with("appendix")
        {
            return Some(SectionLevel::Matter);
        }
        Self::ALL.iter().copied().find(|l| l.as_str() == lowered)
    }

    /// Returns the level name as it appears in the markup and the output.
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionLevel::Matter => "matter",
            SectionLevel::Part => "part",
            SectionLevel::Chapter => "chapter",
            SectionLevel::Section => "section",
            SectionLevel::Subsection => "subsection",
            SectionLevel::Subsubsection => "subsubsection",
            SectionLevel::Paragraph => "paragraph",
            SectionLevel::Subparagraph => "subparagraph",
        }
    }

    /// Returns the next finer level, if any.
    pub fn next_finer(self) -> Option<Self> {
        let index = Self::ALL.iter().position(|l| *l == self)?;
        Self::ALL.get(index + 1).copied()
    }
}

impl fmt::Display for SectionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One recorded structural event in a document's log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutlineEvent {
    /// A leveled section heading.
    Section {
        level: SectionLevel,
        ref_id: String,
        short_title: String,
        title: String,
    },
    /// Inclusion of another document at this point.
    FileRef { target: String },
    /// A label definition.
    Label { ref_id: String },
}

/// A section node of the assembled outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SectionNode {
    #[serde(rename = "secType")]
    pub sec_type: SectionLevel,
    #[serde(rename = "refID")]
    pub ref_id: String,
    #[serde(rename = "shortTitle")]
    pub short_title: String,
    pub title: String,
    pub children: Vec<OutlineNode>,
}

impl SectionNode {
    /// Creates a synthetic node for a level that was skipped in the stream.
    fn placeholder(level: SectionLevel) -> Self {
        Self {
            sec_type: level,
            ref_id: String::new(),
            short_title: String::new(),
            title: String::new(),
            children: Vec::new(),
        }
    }
}

/// A label node of the assembled outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelNode {
    #[serde(rename = "refID")]
    pub ref_id: String,
}

/// One node of the assembled outline tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum OutlineNode {
    Section(SectionNode),
    Label(LabelNode),
}

/// Reconstructs a nested outline tree from the flat per-document event
/// logs, recursing into included documents at assembly time.
#[derive(Debug, Default)]
pub struct OutlineAssembler {
    logs: IndexMap<String, Vec<OutlineEvent>>,
}

impl OutlineAssembler {
    /// Creates a new empty assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn log_mut(&mut self, doc: &str) -> &mut Vec<OutlineEvent> {
        self.logs.entry(doc.to_string()).or_default()
    }

    /// Records a section heading in `doc`'s event log.
    ///
    /// Unknown level strings are warned about and dropped.
    pub fn record_section(
        &mut self,
        doc: &str,
        level: &str,
        ref_id: &str,
        short_title: &str,
        title: &str,
    ) {
        let Some(level) = SectionLevel::parse(level) else {
            tracing::warn!("unknown section level '{}' in {}, ignoring", level, doc);
            return;
        };
        self.log_mut(doc).push(OutlineEvent::Section {
            level,
            ref_id: ref_id.to_string(),
            short_title: short_title.to_string(),
            title: title.to_string(),
        });
    }

    /// Records the inclusion of `target` in `doc`'s event log.
    pub fn record_file_reference(&mut self, doc: &str, target: &str) {
        self.log_mut(doc).push(OutlineEvent::FileRef {
            target: target.to_string(),
        });
    }

    /// Records a label in `doc`'s event log.
    pub fn record_label(&mut self, doc: &str, ref_id: &str) {
        self.log_mut(doc).push(OutlineEvent::Label {
            ref_id: ref_id.to_string(),
        });
    }

    /// Returns the raw event log recorded for `doc`, if any.
    pub fn log(&self, doc: &str) -> Option<&[OutlineEvent]> {
        self.logs.get(doc).map(Vec::as_slice)
    }

    /// Assembles the outline forest for the document tree rooted at
    /// `root_doc`, in reading order.
    pub fn assemble(&self, root_doc: &str) -> Vec<OutlineNode> {
        let mut forest = Vec::new();
        let mut visiting = HashSet::new();
        self.assemble_into(root_doc, &mut forest, &mut visiting);
        forest
    }

    fn assemble_into(
        &self,
        doc: &str,
        forest: &mut Vec<OutlineNode>,
        visiting: &mut HashSet<String>,
    ) {
        let Some(log) = self.logs.get(doc) else {
            tracing::warn!("file {} has not been scanned", doc);
            return;
        };
        if !visiting.insert(doc.to_string()) {
            tracing::warn!("file {} is included again while still open, skipping", doc);
            return;
        }

        for event in log {
            match event {
                OutlineEvent::FileRef { target } => {
                    // Splice the included document's nodes at the current
                    // position, as if its content were inlined here.
                    self.assemble_into(target, forest, visiting);
                }
                OutlineEvent::Section {
                    level,
                    ref_id,
                    short_title,
                    title,
                } => {
                    let node = SectionNode {
                        sec_type: *level,
                        ref_id: ref_id.clone(),
                        short_title: short_title.clone(),
                        title: title.clone(),
                        children: Vec::new(),
                    };
                    insert_section(forest, None, node);
                }
                OutlineEvent::Label { ref_id } => {
                    insert_label(
                        forest,
                        LabelNode {
                            ref_id: ref_id.clone(),
                        },
                    );
                }
            }
        }

        visiting.remove(doc);
    }

    /// Assembles from the configured root document and serializes the
    /// forest as YAML.
    pub async fn finalize(&self, config: &BuildConfig) -> Result<()> {
        let forest = self.assemble(&config.root_document);

        if let Some(parent) = config.outline_path.parent() {
            tracing::trace!("ENSURING the [{}] directory exists", parent.display());
            tokio::fs::create_dir_all(parent).await?;
        }

        tracing::debug!(
            "WRITING document outline for [{}] to [{}]",
            config.root_document,
            config.outline_path.display()
        );
        let yaml = serde_yaml::to_string(&forest)?;
        tokio::fs::write(&config.outline_path, yaml).await?;

        Ok(())
    }
}

/// Inserts `node` at the deepest open position of `children`.
///
/// Descends the chain of last-child section nodes while they are coarser
/// than `node`; any levels skipped between the enclosing node and `node`
/// are filled with empty placeholder sections. Root-level children may sit
/// at any level.
fn insert_section(
    children: &mut Vec<OutlineNode>,
    enclosing: Option<SectionLevel>,
    node: SectionNode,
) {
    if let Some(OutlineNode::Section(last)) = children.last_mut() {
        if last.sec_type < node.sec_type {
            let level = last.sec_type;
            insert_section(&mut last.children, Some(level), node);
            return;
        }
    }

    // The insertion point is this list; synthesize any skipped levels
    // between the enclosing node and the new one.
    if let Some(next) = enclosing.and_then(SectionLevel::next_finer) {
        if next < node.sec_type {
            children.push(OutlineNode::Section(SectionNode::placeholder(next)));
            if let Some(OutlineNode::Section(placeholder)) = children.last_mut() {
                insert_section(&mut placeholder.children, Some(next), node);
            }
            return;
        }
    }

    children.push(OutlineNode::Section(node));
}

/// Appends `label` to the deepest currently-open section node.
///
/// Follows the same last-child descent used for sections, without creating
/// any new nodes.
fn insert_label(children: &mut Vec<OutlineNode>, label: LabelNode) {
    if let Some(OutlineNode::Section(last)) = children.last_mut() {
        insert_label(&mut last.children, label);
    } else {
        children.push(OutlineNode::Label(label));
    }
}
