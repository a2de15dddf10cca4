//! Declarations: the read-only items of the symbol store.
//!
//! A declaration is any named item of the underlying verified library. Its
//! kind is a closed variant; the reference sets it carries are what the
//! dependency collector walks.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// The kind of a declaration, together with the kind-specific references.
///
/// Axioms, quotient primitives, constructors, and recursors only reference
/// other declarations through their type, so they carry no value set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case", rename_all_fields = "camelCase")]
pub enum DeclKind {
    Axiom,
    Definition {
        #[serde(default)]
        value_refs: BTreeSet<String>,
    },
    Theorem {
        #[serde(default)]
        value_refs: BTreeSet<String>,
    },
    Opaque {
        #[serde(default)]
        value_refs: BTreeSet<String>,
    },
    Quotient,
    Constructor,
    Recursor,
    Inductive {
        #[serde(default)]
        constructors: Vec<String>,
    },
}

impl DeclKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclKind::Axiom => "axiom",
            DeclKind::Definition { .. } => "definition",
            DeclKind::Theorem { .. } => "theorem",
            DeclKind::Opaque { .. } => "opaque",
            DeclKind::Quotient => "quotient",
            DeclKind::Constructor => "constructor",
            DeclKind::Recursor => "recursor",
            DeclKind::Inductive { .. } => "inductive",
        }
    }

    /// References used by the value, if the kind has a value.
    pub fn value_refs(&self) -> Option<&BTreeSet<String>> {
        match self {
            DeclKind::Definition { value_refs }
            | DeclKind::Theorem { value_refs }
            | DeclKind::Opaque { value_refs } => Some(value_refs),
            DeclKind::Axiom
            | DeclKind::Quotient
            | DeclKind::Constructor
            | DeclKind::Recursor
            | DeclKind::Inductive { .. } => None,
        }
    }

    pub fn is_theorem(&self) -> bool {
        matches!(self, DeclKind::Theorem { .. })
    }
}

/// A named, immutable item of the symbol store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Declaration {
    pub name: String,
    #[serde(flatten)]
    pub kind: DeclKind,
    #[serde(default)]
    pub type_refs: BTreeSet<String>,
    /// The declaration's own documentation, the default statement text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
    /// Documentation attached to proof steps, the default proof text.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub proof_docs: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<DeclarationLocation>,
    /// Source file of the declaration, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Declaration {
    pub fn new(name: impl Into<String>, kind: DeclKind) -> Self {
        Self {
            name: name.into(),
            kind,
            type_refs: BTreeSet::new(),
            doc: None,
            proof_docs: Vec::new(),
            location: None,
            file: None,
        }
    }

    pub fn with_type_refs<I, S>(mut self, refs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.type_refs = refs.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    pub fn with_location(mut self, location: DeclarationLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Default proof text: proof-step docs joined by blank lines.
    pub fn proof_text(&self) -> String {
        self.proof_docs
            .iter()
            .map(|doc| doc.trim())
            .filter(|doc| !doc.is_empty())
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

/// A line/column position (1-based lines, 0-based columns).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationRange {
    pub pos: Position,
    pub end_pos: Position,
}

/// Where a declaration is actually declared: compilation unit plus range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeclarationLocation {
    pub unit: String,
    pub range: DeclarationRange,
}

impl DeclarationLocation {
    pub fn new(unit: impl Into<String>, pos: Position, end_pos: Position) -> Self {
        Self {
            unit: unit.into(),
            range: DeclarationRange { pos, end_pos },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declaration_parses_kind_tag() {
        let raw = r#"{
            "name":"Nat.add_comm",
            "kind":"theorem",
            "typeRefs":["Nat","Eq"],
            "valueRefs":["Nat.rec"]
        }"#;

        let decl: Declaration = serde_json::from_str(raw).expect("must parse declaration");
        assert!(decl.kind.is_theorem());
        assert_eq!(decl.type_refs.len(), 2);
        assert!(
            decl.kind
                .value_refs()
                .expect("theorem has a value")
                .contains("Nat.rec")
        );
    }

    #[test]
    fn inductive_lists_constructors() {
        let raw = r#"{"name":"Nat","kind":"inductive","constructors":["Nat.zero","Nat.succ"]}"#;

        let decl: Declaration = serde_json::from_str(raw).expect("must parse inductive");
        assert_eq!(
            decl.kind,
            DeclKind::Inductive {
                constructors: vec!["Nat.zero".to_string(), "Nat.succ".to_string()]
            }
        );
        assert!(decl.kind.value_refs().is_none());
    }

    #[test]
    fn proof_text_skips_blank_steps() {
        let mut decl = Declaration::new(
            "t",
            DeclKind::Theorem {
                value_refs: BTreeSet::new(),
            },
        );
        decl.proof_docs = vec!["First.".into(), "  ".into(), "Then.".into()];
        assert_eq!(decl.proof_text(), "First.\n\nThen.");
    }
}
