//! Project snapshots: everything a run needs, in one JSON document.
//!
//! Declarations are listed inline, loaded from a JSONL file named by
//! `declarationsJsonl` (resolved against the snapshot's directory), or both.

use crate::error::DocError;
use crate::order::DocSection;
use blueprint_kernel::{Declaration, KernelError, NodeSpec, read_declarations_from_path};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectSnapshot {
    pub declarations: Vec<Declaration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declarations_jsonl: Option<PathBuf>,
    /// Units in registration order.
    pub units: Vec<UnitSnapshot>,
    pub collections: Vec<CollectionSnapshot>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UnitSnapshot {
    pub name: String,
    /// Declarations tagged as nodes in this unit, with their overrides.
    pub nodes: Vec<NodeSpec>,
    pub docs: Vec<DocSection>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CollectionSnapshot {
    pub name: String,
    pub units: Vec<String>,
}

impl ProjectSnapshot {
    pub fn from_json_str(text: &str, origin: &str) -> Result<Self, DocError> {
        serde_json::from_str(text).map_err(|source| DocError::ParseJson {
            path: origin.to_string(),
            source,
        })
    }

    /// Read a snapshot and pull in its JSONL declarations, if any.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| DocError::ReadFile {
            path: path.display().to_string(),
            source,
        })?;
        let mut snapshot = Self::from_json_str(&text, &path.display().to_string())?;

        if let Some(jsonl) = snapshot.declarations_jsonl.take() {
            let jsonl = match path.parent() {
                Some(dir) if jsonl.is_relative() => dir.join(jsonl),
                _ => jsonl,
            };
            let loaded = read_declarations_from_path(&jsonl).map_err(KernelError::from)?;
            snapshot.declarations.extend(loaded);
        }
        Ok(snapshot)
    }
}
