//! Dependency collector: which registered nodes a declaration depends on.
//!
//! The traversal walks the symbol store from a declaration and stops at
//! registered nodes (a node's own dependencies are never expanded on behalf
//! of another item). Each call owns its memo; nothing is shared across calls.

use crate::declaration::{DeclKind, Declaration};
use crate::error::KernelError;
use crate::store::SymbolStore;
use indexmap::IndexSet;
use std::collections::HashSet;
use tracing::debug;

/// Result of one collector run.
///
/// `type_used` holds what the statement (the type) reaches. `value_used`
/// holds what only the derivation reaches, except that the incompleteness
/// marker stays in `value_used` whenever the full traversal reached it, so
/// both halves report incompleteness independently.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectedUses {
    pub type_used: IndexSet<String>,
    pub value_used: IndexSet<String>,
}

impl CollectedUses {
    /// Everything reached, statement first.
    pub fn all(&self) -> IndexSet<String> {
        self.type_used
            .iter()
            .chain(self.value_used.iter())
            .cloned()
            .collect()
    }
}

/// Collect the registered nodes and axioms reachable from `name`.
///
/// `is_node` decides closure opacity. Axioms are recorded as used leaves
/// (the incompleteness marker is one of them); quotient primitives and
/// unknown identifiers are ignored.
pub fn collect_used<S, F>(
    store: &S,
    is_node: F,
    name: &str,
    marker: &str,
) -> Result<CollectedUses, KernelError>
where
    S: SymbolStore + ?Sized,
    F: Fn(&str) -> bool,
{
    let decl = store
        .lookup(name)
        .ok_or_else(|| KernelError::UnknownDeclaration(name.to_string()))?;

    let mut walk = Walk {
        store,
        is_node: &is_node,
        visited: HashSet::new(),
        used: IndexSet::new(),
        stack: Vec::new(),
    };

    walk.stack
        .extend(decl.type_refs.iter().rev().map(String::as_str));
    walk.drain();
    let type_used = walk.used.clone();

    // Continue the same memo, seeded from the declaration itself.
    walk.visited.insert(decl.name.as_str());
    walk.push_children(decl);
    walk.drain();

    let mut value_used: IndexSet<String> = walk
        .used
        .iter()
        .filter(|used| !type_used.contains(*used))
        .cloned()
        .collect();
    if walk.used.contains(marker) {
        value_used.insert(marker.to_string());
    }

    debug!(
        name,
        visited = walk.visited.len(),
        type_used = type_used.len(),
        value_used = value_used.len(),
        "collected dependencies"
    );

    Ok(CollectedUses {
        type_used,
        value_used,
    })
}

struct Walk<'a, S: ?Sized, F> {
    store: &'a S,
    is_node: &'a F,
    visited: HashSet<&'a str>,
    used: IndexSet<String>,
    stack: Vec<&'a str>,
}

impl<'a, S, F> Walk<'a, S, F>
where
    S: SymbolStore + ?Sized,
    F: Fn(&str) -> bool,
{
    fn drain(&mut self) {
        while let Some(current) = self.stack.pop() {
            if !self.visited.insert(current) {
                continue;
            }
            if (self.is_node)(current) {
                self.used.insert(current.to_string());
                continue;
            }
            let Some(decl) = self.store.lookup(current) else {
                continue;
            };
            if matches!(decl.kind, DeclKind::Axiom) {
                self.used.insert(decl.name.clone());
                continue;
            }
            self.push_children(decl);
        }
    }

    /// Push the references a declaration of this kind is expanded into.
    fn push_children(&mut self, decl: &'a Declaration) {
        let start = self.stack.len();
        match &decl.kind {
            DeclKind::Axiom | DeclKind::Quotient => {}
            DeclKind::Definition { value_refs }
            | DeclKind::Theorem { value_refs }
            | DeclKind::Opaque { value_refs } => {
                self.stack.extend(decl.type_refs.iter().map(String::as_str));
                self.stack.extend(value_refs.iter().map(String::as_str));
            }
            DeclKind::Constructor | DeclKind::Recursor => {
                self.stack.extend(decl.type_refs.iter().map(String::as_str));
            }
            DeclKind::Inductive { constructors } => {
                self.stack.extend(decl.type_refs.iter().map(String::as_str));
                self.stack.extend(constructors.iter().map(String::as_str));
            }
        }
        // Visit in declaration order.
        self.stack[start..].reverse();
    }
}
