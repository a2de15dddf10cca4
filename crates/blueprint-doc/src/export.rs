//! Structured node export: a registered node plus where it is declared.

use blueprint_kernel::{DeclarationLocation, Node, PositionResolver, SymbolStore};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeExport {
    #[serde(flatten)]
    pub node: Node,
    /// Whether the declaration site is known.
    pub has_source: bool,
    pub file: Option<String>,
    pub location: Option<DeclarationLocation>,
}

impl NodeExport {
    pub fn new<S>(node: &Node, store: &S) -> Self
    where
        S: SymbolStore + PositionResolver + ?Sized,
    {
        let location = store.location(&node.name);
        let file = store.lookup(&node.name).and_then(|decl| decl.file.clone());
        Self {
            node: node.clone(),
            has_source: location.is_some(),
            file,
            location,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_kernel::{
        BuildOptions, DeclKind, Declaration, MemorySymbolStore, NodeRegistry, NodeSpec, Position,
    };
    use serde_json::json;

    #[test]
    fn export_carries_location_schema() {
        let mut decl = Declaration::new("zero_le", DeclKind::Axiom).with_location(
            DeclarationLocation::new("Nat.Basic", Position::new(3, 0), Position::new(4, 12)),
        );
        decl.file = Some("Nat/Basic.lean".into());
        let store = MemorySymbolStore::from_declarations([decl]);
        let mut registry = NodeRegistry::new();
        let node = registry
            .register_spec(&store, &NodeSpec::new("zero_le"), &BuildOptions::default())
            .expect("axiom node should register");

        let value = serde_json::to_value(NodeExport::new(node, &store)).expect("export serializes");
        assert_eq!(
            value,
            json!({
                "name": "zero_le",
                "statement": {
                    "complete": true,
                    "text": "",
                    "uses": [],
                    "usesRaw": [],
                    "env": "definition"
                },
                "proof": null,
                "notReady": false,
                "discussion": null,
                "title": null,
                "hasSource": true,
                "file": "Nat/Basic.lean",
                "location": {
                    "unit": "Nat.Basic",
                    "range": {
                        "pos": {"line": 3, "column": 0},
                        "endPos": {"line": 4, "column": 12}
                    }
                }
            })
        );
    }

    #[test]
    fn missing_source_is_reported() {
        let store = MemorySymbolStore::from_declarations([Declaration::new(
            "c",
            DeclKind::Definition {
                value_refs: Default::default(),
            },
        )]);
        let mut registry = NodeRegistry::new();
        let node = registry
            .register_spec(&store, &NodeSpec::new("c"), &BuildOptions::default())
            .expect("definition node should register");
        let export = NodeExport::new(node, &store);
        assert!(!export.has_source);
        assert_eq!(export.file, None);
        assert_eq!(export.location, None);
    }
}
