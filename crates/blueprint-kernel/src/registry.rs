//! Node registry: the append-only map from identifier to node.
//!
//! One run owns one registry and is its only writer. A node is built,
//! cycle-checked, and only then inserted; once inserted it is frozen.

use crate::builder::{BuildOptions, build_node};
use crate::cycle::check_acyclic;
use crate::error::KernelError;
use crate::node::{Node, NodeSpec};
use crate::store::SymbolStore;
use indexmap::IndexMap;
use std::collections::HashSet;
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct NodeRegistry {
    nodes: IndexMap<String, Node>,
}

impl NodeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_node(&self, name: &str) -> bool {
        self.nodes.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.nodes.get(name)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate nodes in registration order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Insert an already-built node after validating it.
    ///
    /// Re-registering an identifier is rejected. On any error the registry
    /// is unchanged.
    pub fn register(&mut self, node: Node, strict_labels: bool) -> Result<&Node, KernelError> {
        if self.is_node(&node.name) {
            return Err(KernelError::DuplicateNode(node.name));
        }
        check_acyclic(&node, |name| self.nodes.get(name), strict_labels)?;

        debug!(
            name = %node.name,
            uses = node.uses().len(),
            complete = node.is_complete(),
            "registered node"
        );
        let entry = self.nodes.entry(node.name.clone()).or_insert(node);
        Ok(entry)
    }

    /// Build the node described by `spec` and register it.
    pub fn register_spec<S>(
        &mut self,
        store: &S,
        spec: &NodeSpec,
        options: &BuildOptions,
    ) -> Result<&Node, KernelError>
    where
        S: SymbolStore + ?Sized,
    {
        if self.is_node(&spec.name) {
            return Err(KernelError::DuplicateNode(spec.name.clone()));
        }
        let node = build_node(store, |name| self.is_node(name), spec, options)?;
        self.register(node, options.strict_labels)
    }

    /// Nodes ordered dependencies-first; ties keep registration order.
    pub fn topological_order(&self) -> Vec<&Node> {
        fn visit<'a>(
            registry: &'a NodeRegistry,
            node: &'a Node,
            seen: &mut HashSet<&'a str>,
            out: &mut Vec<&'a Node>,
        ) {
            if !seen.insert(node.name.as_str()) {
                return;
            }
            for used in node.uses() {
                if let Some(dep) = registry.get(used) {
                    visit(registry, dep, seen, out);
                }
            }
            out.push(node);
        }

        let mut seen = HashSet::new();
        let mut out = Vec::with_capacity(self.nodes.len());
        for node in self.nodes.values() {
            visit(self, node, &mut seen, &mut out);
        }
        out
    }
}
