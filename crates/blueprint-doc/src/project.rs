//! Project state for one run: the symbol store, the node registry, and what
//! each unit and collection contains.
//!
//! Units are registered one at a time. A node that fails to register is
//! reported and skipped; the registry, other nodes of the unit, and other
//! units are unaffected.

use crate::config::BlueprintConfig;
use crate::error::DocError;
use crate::export::NodeExport;
use crate::order::{ContentEntry, DocSection, Positioned, order_content};
use crate::snapshot::ProjectSnapshot;
use blueprint_kernel::{
    KernelError, MemorySymbolStore, Node, NodeRegistry, NodeSpec, PositionResolver, SymbolStore,
};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use tracing::{debug, warn};

#[derive(Debug, Clone, Default)]
struct UnitContent {
    /// Successfully registered nodes, in tagging order.
    nodes: Vec<String>,
    docs: Vec<DocSection>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationFailure {
    pub name: String,
    #[serde(serialize_with = "serialize_display")]
    pub error: KernelError,
}

fn serialize_display<S: Serializer>(error: &KernelError, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(error)
}

/// Outcome of registering one unit's nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitReport {
    pub unit: String,
    pub registered: Vec<String>,
    pub failures: Vec<RegistrationFailure>,
}

impl UnitReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

#[derive(Debug)]
pub struct Project<S> {
    store: S,
    registry: NodeRegistry,
    units: IndexMap<String, UnitContent>,
    collections: IndexMap<String, Vec<String>>,
    config: BlueprintConfig,
}

impl<S> Project<S>
where
    S: SymbolStore + PositionResolver,
{
    pub fn new(store: S, config: BlueprintConfig) -> Self {
        Self {
            store,
            registry: NodeRegistry::new(),
            units: IndexMap::new(),
            collections: IndexMap::new(),
            config,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn registry(&self) -> &NodeRegistry {
        &self.registry
    }

    pub fn config(&self) -> &BlueprintConfig {
        &self.config
    }

    /// Unit names in registration order.
    pub fn units(&self) -> impl Iterator<Item = &str> {
        self.units.keys().map(String::as_str)
    }

    pub fn has_unit(&self, unit: &str) -> bool {
        self.units.contains_key(unit)
    }

    /// Register the nodes tagged in `unit`, in order.
    pub fn register_unit(&mut self, unit: &str, specs: &[NodeSpec]) -> UnitReport {
        let mut report = UnitReport {
            unit: unit.to_string(),
            registered: Vec::new(),
            failures: Vec::new(),
        };
        for spec in specs {
            match self
                .registry
                .register_spec(&self.store, spec, &self.config.nodes)
            {
                Ok(node) => report.registered.push(node.name.clone()),
                Err(error) => {
                    warn!(unit, node = %spec.name, %error, "node registration failed");
                    report.failures.push(RegistrationFailure {
                        name: spec.name.clone(),
                        error,
                    });
                }
            }
        }
        debug!(
            unit,
            registered = report.registered.len(),
            failed = report.failures.len(),
            "registered unit"
        );
        self.units
            .entry(unit.to_string())
            .or_default()
            .nodes
            .extend(report.registered.iter().cloned());
        report
    }

    pub fn add_doc_section(&mut self, unit: &str, section: DocSection) {
        self.units
            .entry(unit.to_string())
            .or_default()
            .docs
            .push(section);
    }

    /// Declare a collection; its units are rendered in exactly this order.
    pub fn add_collection(&mut self, name: impl Into<String>, units: Vec<String>) {
        self.collections.insert(name.into(), units);
    }

    pub fn collection_units(&self, collection: &str) -> Result<&[String], DocError> {
        self.collections
            .get(collection)
            .map(Vec::as_slice)
            .ok_or_else(|| DocError::UnknownCollection(collection.to_string()))
    }

    pub fn collections(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Nodes registered from `unit`, in tagging order.
    pub fn unit_nodes(&self, unit: &str) -> Result<Vec<&Node>, DocError> {
        let content = self
            .units
            .get(unit)
            .ok_or_else(|| DocError::UnknownUnit(unit.to_string()))?;
        Ok(content
            .nodes
            .iter()
            .filter_map(|name| self.registry.get(name))
            .collect())
    }

    /// The unit's nodes and documentation sections in source order.
    ///
    /// A node is positioned at its actual declaration site, which need not
    /// be where it was tagged.
    pub fn content(&self, unit: &str) -> Result<Vec<ContentEntry<'_>>, DocError> {
        let content = self
            .units
            .get(unit)
            .ok_or_else(|| DocError::UnknownUnit(unit.to_string()))?;

        let nodes = self.unit_nodes(unit)?.into_iter().map(|node| {
            let position = self
                .store
                .location(&node.name)
                .map(|location| location.range.pos);
            Positioned::new(position, ContentEntry::Node(node))
        });
        let docs = content
            .docs
            .iter()
            .map(|doc| Positioned::new(doc.range.map(|r| r.pos), ContentEntry::Doc(doc)));

        Ok(order_content(nodes.chain(docs).collect())
            .into_iter()
            .map(|entry| entry.item)
            .collect())
    }

    /// The `\label` for a node identifier.
    pub fn label(&self, name: &str) -> String {
        format!("{}{}", self.config.render.label_prefix, name)
    }

    /// Resolve a name to its label when it is a registered node.
    pub fn resolve_label(&self, name: &str) -> Option<String> {
        self.registry.is_node(name).then(|| self.label(name))
    }

    pub fn export_node(&self, name: &str) -> Option<NodeExport> {
        self.registry
            .get(name)
            .map(|node| NodeExport::new(node, &self.store))
    }

    /// Every registered node, dependencies first.
    pub fn export_nodes(&self) -> Vec<NodeExport> {
        self.registry
            .topological_order()
            .into_iter()
            .map(|node| NodeExport::new(node, &self.store))
            .collect()
    }
}

impl Project<MemorySymbolStore> {
    /// Build a project from a snapshot, registering units in snapshot order.
    pub fn from_snapshot(
        snapshot: ProjectSnapshot,
        config: BlueprintConfig,
    ) -> (Self, Vec<UnitReport>) {
        let store = MemorySymbolStore::from_declarations(snapshot.declarations);
        let mut project = Self::new(store, config);
        let mut reports = Vec::with_capacity(snapshot.units.len());
        for unit in snapshot.units {
            reports.push(project.register_unit(&unit.name, &unit.nodes));
            for doc in unit.docs {
                project.add_doc_section(&unit.name, doc);
            }
        }
        for collection in snapshot.collections {
            project.add_collection(collection.name, collection.units);
        }
        (project, reports)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blueprint_kernel::{DeclKind, Declaration, DeclarationLocation, Position};

    fn theorem(name: &str, refs: &[&str]) -> Declaration {
        Declaration::new(
            name,
            DeclKind::Theorem {
                value_refs: refs.iter().map(|s| s.to_string()).collect(),
            },
        )
    }

    fn located(decl: Declaration, unit: &str, line: u32) -> Declaration {
        decl.with_location(DeclarationLocation::new(
            unit,
            Position::new(line, 0),
            Position::new(line + 1, 0),
        ))
    }

    fn project(decls: Vec<Declaration>) -> Project<MemorySymbolStore> {
        Project::new(
            MemorySymbolStore::from_declarations(decls),
            BlueprintConfig::default(),
        )
    }

    #[test]
    fn failing_node_does_not_block_the_rest_of_its_unit() {
        let mut project = project(vec![theorem("a", &[]), theorem("b", &["a"])]);
        let report = project.register_unit(
            "M",
            &[
                NodeSpec::new("a"),
                NodeSpec::new("ghost"),
                NodeSpec::new("b").uses("nowhere"),
                NodeSpec::new("b"),
            ],
        );
        assert_eq!(report.registered, vec!["a", "b"]);
        assert_eq!(report.failures.len(), 2);
        assert_eq!(
            report.failures[0].error,
            KernelError::UnknownDeclaration("ghost".into())
        );
        assert!(matches!(
            report.failures[1].error,
            KernelError::UnresolvedIdentifier { .. }
        ));
        assert!(!report.is_clean());
        assert_eq!(project.unit_nodes("M").expect("unit exists").len(), 2);
    }

    #[test]
    fn failures_serialize_as_messages() {
        let mut project = project(vec![]);
        let report = project.register_unit("M", &[NodeSpec::new("ghost")]);
        let value = serde_json::to_value(&report).expect("report serializes");
        assert_eq!(
            value["failures"][0]["error"],
            serde_json::json!("unknown declaration: ghost")
        );
    }

    #[test]
    fn content_follows_declaration_sites() {
        let mut project = project(vec![
            located(theorem("late", &[]), "M", 20),
            located(theorem("early", &[]), "Other", 2),
            theorem("floating", &[]),
        ]);
        project.register_unit(
            "M",
            &[
                NodeSpec::new("late"),
                NodeSpec::new("early"),
                NodeSpec::new("floating"),
            ],
        );
        project.add_doc_section(
            "M",
            DocSection::new("middle").at(Position::new(10, 0), Position::new(10, 6)),
        );

        let order: Vec<String> = project
            .content("M")
            .expect("unit exists")
            .into_iter()
            .map(|entry| match entry {
                ContentEntry::Node(node) => node.name.clone(),
                ContentEntry::Doc(doc) => doc.text.clone(),
            })
            .collect();
        assert_eq!(order, vec!["floating", "early", "middle", "late"]);
    }

    #[test]
    fn unknown_units_and_collections_are_errors() {
        let project = project(vec![]);
        assert!(matches!(
            project.content("nope"),
            Err(DocError::UnknownUnit(_))
        ));
        assert!(matches!(
            project.collection_units("nope"),
            Err(DocError::UnknownCollection(_))
        ));
    }

    #[test]
    fn labels_use_the_configured_prefix() {
        let mut config = BlueprintConfig::default();
        config.render.label_prefix = "lean:".into();
        let mut project = Project::new(
            MemorySymbolStore::from_declarations([theorem("a", &[])]),
            config,
        );
        project.register_unit("M", &[NodeSpec::new("a")]);
        assert_eq!(project.resolve_label("a").as_deref(), Some("lean:a"));
        assert_eq!(project.resolve_label("b"), None);
    }
}
