//! Nodes: documented, dependency-tracked claims and definitions.

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

pub const STATEMENT_ENV_THEOREM: &str = "theorem";
pub const STATEMENT_ENV_DEFINITION: &str = "definition";
pub const PROOF_ENV: &str = "proof";

/// One half of a node: its statement or its proof.
///
/// `uses` holds resolved identifiers, `uses_raw` holds labels with no
/// matching declaration. Both are sets kept in insertion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodePart {
    pub complete: bool,
    pub text: String,
    pub uses: IndexSet<String>,
    pub uses_raw: IndexSet<String>,
    pub env: String,
}

impl NodePart {
    /// Resolved identifiers followed by raw labels.
    pub fn all_uses(&self) -> impl Iterator<Item = &str> {
        self.uses
            .iter()
            .chain(self.uses_raw.iter())
            .map(String::as_str)
    }
}

/// A registered node. Created once per identifier and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub name: String,
    pub statement: NodePart,
    pub proof: Option<NodePart>,
    pub not_ready: bool,
    pub discussion: Option<u64>,
    pub title: Option<String>,
}

impl Node {
    /// Identifiers referenced by the statement and the proof.
    pub fn uses(&self) -> IndexSet<&str> {
        let mut uses: IndexSet<&str> = self.statement.uses.iter().map(String::as_str).collect();
        if let Some(proof) = &self.proof {
            uses.extend(proof.uses.iter().map(String::as_str));
        }
        uses
    }

    /// A node is complete when both of its parts are.
    pub fn is_complete(&self) -> bool {
        self.statement.complete && self.proof.as_ref().is_none_or(|proof| proof.complete)
    }
}

/// An explicit dependency override.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "name", rename_all = "camelCase")]
pub enum UseRef {
    /// An identifier expected to exist in the symbol store.
    Decl(String),
    /// A string label for a target outside the declaration database.
    Raw(String),
}

/// The tagging request for one declaration: explicit overrides on top of
/// what the collector infers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NodeSpec {
    pub name: String,
    pub has_proof: Option<bool>,
    pub statement: Option<String>,
    pub proof: Option<String>,
    pub uses: Vec<UseRef>,
    pub proof_uses: Vec<UseRef>,
    pub not_ready: bool,
    pub discussion: Option<u64>,
    pub title: Option<String>,
    pub env: Option<String>,
}

impl NodeSpec {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn uses(mut self, name: impl Into<String>) -> Self {
        self.uses.push(UseRef::Decl(name.into()));
        self
    }

    pub fn uses_raw(mut self, label: impl Into<String>) -> Self {
        self.uses.push(UseRef::Raw(label.into()));
        self
    }

    pub fn proof_uses(mut self, name: impl Into<String>) -> Self {
        self.proof_uses.push(UseRef::Decl(name.into()));
        self
    }

    pub fn has_proof(mut self, has_proof: bool) -> Self {
        self.has_proof = Some(has_proof);
        self
    }
}
