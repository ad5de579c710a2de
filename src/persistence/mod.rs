//! Persistence boundary
//!
//! Reads and writes the stored document shape: a JSON array of
//! `{type, children: [{text, bold?, italic?, underline?}], align?}` nodes.
//!
//! Loading is lenient per block. A block with a missing or unknown type, or
//! without a usable `children` list, is recovered as an `action` block and
//! recorded as an `Anomaly`; the rest of the document still loads. Only a top
//! level that is not a JSON array fails the whole load.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::path::Path;

use crate::error::{Result, ScreenplayError};
use crate::models::{Alignment, Block, BlockType, Document, TextRun};

/// File extension used for saved screenplays
pub const FILE_EXTENSION: &str = "screenplay";

/// Title given to projects that have none
pub const DEFAULT_PROJECT_TITLE: &str = "Untitled Screenplay";

/// What was wrong with a stored block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnomalyKind {
    /// The entry is not a JSON object
    NotAnObject,
    /// The `type` field is absent or not a string
    MissingType,
    /// The `type` names no known block type
    UnknownType { name: String },
    /// The `children` field is absent or not an array
    MissingChildren,
    /// A child has no string `text`
    MalformedRun { run: usize },
    /// The `align` value is not left, right or center
    UnknownAlignment { value: String },
}

/// A recovered defect in one stored block
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Anomaly {
    pub block_index: usize,
    #[serde(flatten)]
    pub kind: AnomalyKind,
}

impl fmt::Display for Anomaly {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let i = self.block_index;
        match &self.kind {
            AnomalyKind::NotAnObject => write!(f, "block {}: not an object", i),
            AnomalyKind::MissingType => write!(f, "block {}: missing type, read as action", i),
            AnomalyKind::UnknownType { name } => {
                write!(f, "block {}: unknown type '{}', read as action", i, name)
            }
            AnomalyKind::MissingChildren => write!(f, "block {}: missing text, read as empty", i),
            AnomalyKind::MalformedRun { run } => {
                write!(f, "block {}: text run {} has no text", i, run)
            }
            AnomalyKind::UnknownAlignment { value } => {
                write!(f, "block {}: unknown alignment '{}' ignored", i, value)
            }
        }
    }
}

/// Result of loading a stored document
#[derive(Clone, Debug, PartialEq)]
pub struct LoadReport {
    pub document: Document,
    pub anomalies: Vec<Anomaly>,
}

impl LoadReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn notice(&self) -> Option<String> {
        anomaly_notice(&self.anomalies)
    }
}

/// Non-fatal, document-level notice for a set of anomalies
pub fn anomaly_notice(anomalies: &[Anomaly]) -> Option<String> {
    if anomalies.is_empty() {
        return None;
    }
    let mut blocks: Vec<usize> = anomalies.iter().map(|a| a.block_index).collect();
    blocks.dedup();
    let (noun, verb) = if blocks.len() == 1 {
        ("block", "was")
    } else {
        ("blocks", "were")
    };
    Some(format!(
        "{} {} could not be read exactly and {} recovered",
        blocks.len(),
        noun,
        verb
    ))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn flag(map: &Map<String, Value>, key: &str) -> bool {
    map.get(key).and_then(Value::as_bool).unwrap_or(false)
}

fn run_from_value(
    block_index: usize,
    run_index: usize,
    value: &Value,
    anomalies: &mut Vec<Anomaly>,
) -> TextRun {
    let Some(map) = value.as_object() else {
        anomalies.push(Anomaly {
            block_index,
            kind: AnomalyKind::MalformedRun { run: run_index },
        });
        return TextRun::default();
    };

    let text = match map.get("text").and_then(Value::as_str) {
        Some(text) => text.to_string(),
        None => {
            anomalies.push(Anomaly {
                block_index,
                kind: AnomalyKind::MalformedRun { run: run_index },
            });
            String::new()
        }
    };

    TextRun {
        text,
        bold: flag(map, "bold"),
        italic: flag(map, "italic"),
        underline: flag(map, "underline"),
    }
}

/// Read one stored block, recording anomalies instead of failing
pub fn block_from_value(index: usize, value: &Value, anomalies: &mut Vec<Anomaly>) -> Block {
    let Some(map) = value.as_object() else {
        anomalies.push(Anomaly {
            block_index: index,
            kind: AnomalyKind::NotAnObject,
        });
        return Block::new(BlockType::Action, Vec::new());
    };

    let block_type = match map.get("type").and_then(Value::as_str) {
        Some(name) => BlockType::from_name(name).unwrap_or_else(|| {
            anomalies.push(Anomaly {
                block_index: index,
                kind: AnomalyKind::UnknownType {
                    name: name.to_string(),
                },
            });
            BlockType::Action
        }),
        None => {
            anomalies.push(Anomaly {
                block_index: index,
                kind: AnomalyKind::MissingType,
            });
            BlockType::Action
        }
    };

    let runs = match map.get("children").and_then(Value::as_array) {
        Some(children) => children
            .iter()
            .enumerate()
            .map(|(run_index, child)| run_from_value(index, run_index, child, anomalies))
            .collect(),
        None => {
            anomalies.push(Anomaly {
                block_index: index,
                kind: AnomalyKind::MissingChildren,
            });
            Vec::new()
        }
    };

    let align = match map.get("align") {
        None | Some(Value::Null) => None,
        Some(value) => {
            let parsed = value.as_str().and_then(Alignment::from_name);
            if parsed.is_none() {
                anomalies.push(Anomaly {
                    block_index: index,
                    kind: AnomalyKind::UnknownAlignment {
                        value: value.to_string(),
                    },
                });
            }
            parsed
        }
    };

    Block {
        block_type,
        runs,
        align,
    }
}

/// Load a document from an already parsed JSON value
pub fn load_document_value(value: &Value) -> Result<LoadReport> {
    let entries = value
        .as_array()
        .ok_or(ScreenplayError::NotAnArray(json_kind(value)))?;

    let mut anomalies = Vec::new();
    let blocks = entries
        .iter()
        .enumerate()
        .map(|(index, entry)| block_from_value(index, entry, &mut anomalies))
        .collect();

    for anomaly in &anomalies {
        log::warn!("document load: {}", anomaly);
    }

    Ok(LoadReport {
        document: Document::from_blocks(blocks),
        anomalies,
    })
}

/// Load a document from its stored JSON text
pub fn load_document(json: &str) -> Result<LoadReport> {
    let value: Value = serde_json::from_str(json)?;
    load_document_value(&value)
}

pub fn document_to_value(document: &Document) -> Result<Value> {
    Ok(serde_json::to_value(document)?)
}

/// Serialize a document to its stored JSON text
pub fn document_to_json(document: &Document) -> Result<String> {
    Ok(serde_json::to_string(document)?)
}

pub fn document_to_json_pretty(document: &Document) -> Result<String> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write a document to a `.screenplay` file
pub fn save_to_path(document: &Document, path: impl AsRef<Path>) -> Result<()> {
    let json = document_to_json_pretty(document)?;
    std::fs::write(path.as_ref(), json)?;
    log::info!("saved {} blocks to {}", document.len(), path.as_ref().display());
    Ok(())
}

/// Read a document from a `.screenplay` file
pub fn load_from_path(path: impl AsRef<Path>) -> Result<LoadReport> {
    let json = std::fs::read_to_string(path.as_ref())?;
    load_document(&json)
}

/// A stored project: a titled document as kept by the project store
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ProjectRecord {
    #[serde(default)]
    pub title: Option<String>,

    #[serde(default)]
    pub content: Value,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl ProjectRecord {
    /// Create a record for a new project holding the default document
    pub fn new_project() -> Result<Self> {
        Self::from_document(DEFAULT_PROJECT_TITLE, &Document::new())
    }

    pub fn from_document(title: impl Into<String>, document: &Document) -> Result<Self> {
        Ok(Self {
            title: Some(title.into()),
            content: document_to_value(document)?,
            updated_at: Some(chrono::Utc::now().to_rfc3339()),
        })
    }

    /// Title to show, falling back to the default project title
    pub fn display_title(&self) -> &str {
        match self.title.as_deref() {
            Some(title) if !title.is_empty() => title,
            _ => DEFAULT_PROJECT_TITLE,
        }
    }

    /// Load the record's document. Missing, non-array or empty content opens
    /// the default new document instead.
    pub fn document(&self) -> LoadReport {
        match self.content.as_array() {
            Some(entries) if !entries.is_empty() => {
                if let Ok(report) = load_document_value(&self.content) {
                    return report;
                }
            }
            _ => log::debug!("project '{}' has no content", self.display_title()),
        }
        LoadReport {
            document: Document::new(),
            anomalies: Vec::new(),
        }
    }

    /// Store a new version of the document and stamp the update time
    pub fn update_content(&mut self, document: &Document) -> Result<()> {
        self.content = document_to_value(document)?;
        self.updated_at = Some(chrono::Utc::now().to_rfc3339());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bogus_type_becomes_action() {
        let report = load_document(r#"[{"type":"bogus","children":[{"text":"x"}]}]"#).unwrap();
        assert_eq!(report.document.blocks[0].block_type, BlockType::Action);
        assert_eq!(report.document.blocks[0].text(), "x");
        assert_eq!(
            report.anomalies,
            vec![Anomaly {
                block_index: 0,
                kind: AnomalyKind::UnknownType {
                    name: "bogus".to_string()
                },
            }]
        );
    }

    #[test]
    fn test_missing_fields_recover_locally() {
        let json = r#"[
            {"children":[{"text":"no type"}]},
            {"type":"dialogue"},
            {"type":"character","children":[{"text":"JOE"}]}
        ]"#;
        let report = load_document(json).unwrap();
        let blocks = &report.document.blocks;

        assert_eq!(blocks.len(), 3);
        assert_eq!(blocks[0].block_type, BlockType::Action);
        assert_eq!(blocks[1].block_type, BlockType::Dialogue);
        assert!(blocks[1].runs.is_empty());
        assert_eq!(blocks[2].text(), "JOE");
        assert_eq!(report.anomalies.len(), 2);
        assert_eq!(
            report.notice().as_deref(),
            Some("2 blocks could not be read exactly and were recovered")
        );
    }

    #[test]
    fn test_single_recovered_block_notice() {
        let report = load_document(r#"[{"type":"bogus"}]"#).unwrap();
        assert_eq!(report.anomalies.len(), 2);
        assert_eq!(
            report.notice().as_deref(),
            Some("1 block could not be read exactly and was recovered")
        );
    }

    #[test]
    fn test_non_object_entry_and_bad_run() {
        let report = load_document(r#"[42, {"type":"action","children":[{"bold":true}]}]"#).unwrap();
        assert_eq!(report.document.blocks[0], Block::new(BlockType::Action, Vec::new()));
        assert!(report.document.blocks[1].runs[0].bold);
        assert_eq!(report.document.blocks[1].runs[0].text, "");
        assert_eq!(report.anomalies[0].kind, AnomalyKind::NotAnObject);
        assert_eq!(report.anomalies[1].kind, AnomalyKind::MalformedRun { run: 0 });
    }

    #[test]
    fn test_top_level_must_be_array() {
        assert!(matches!(
            load_document(r#"{"type":"action"}"#),
            Err(ScreenplayError::NotAnArray("an object"))
        ));
        assert!(matches!(load_document("not json"), Err(ScreenplayError::Json(_))));
    }

    #[test]
    fn test_saved_shape_omits_unset_fields() {
        let doc = Document::from_blocks(vec![Block::new(
            BlockType::SceneHeading,
            vec![TextRun::new("INT. HOUSE").bold()],
        )]);
        assert_eq!(
            document_to_json(&doc).unwrap(),
            r#"[{"type":"scene-heading","children":[{"text":"INT. HOUSE","bold":true}]}]"#
        );
    }

    #[test]
    fn test_unknown_alignment_dropped() {
        let report = load_document(r#"[{"type":"action","children":[],"align":"justify"}]"#).unwrap();
        assert_eq!(report.document.blocks[0].align, None);
        assert_eq!(report.anomalies.len(), 1);
    }

    #[test]
    fn test_project_with_empty_content_opens_default() {
        let record: ProjectRecord = serde_json::from_str(r#"{"title":"","content":[]}"#).unwrap();
        assert_eq!(record.display_title(), "Untitled Screenplay");
        assert_eq!(record.document().document, Document::new());
    }

    #[test]
    fn test_new_project_holds_placeholder_heading() {
        let record = ProjectRecord::new_project().unwrap();
        assert_eq!(record.display_title(), "Untitled Screenplay");
        assert_eq!(record.document().document, Document::new());
        assert!(record.updated_at.is_some());
    }
}
