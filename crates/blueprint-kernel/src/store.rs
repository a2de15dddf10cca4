//! Symbol store: read-only lookup of declarations.
//!
//! The kernel only ever reads declarations. Loading them from a compiled
//! library is the caller's concern; `MemorySymbolStore` is the canonical
//! in-memory implementation used by snapshots and tests.

use crate::declaration::{Declaration, DeclarationLocation};
use crate::error::KernelError;
use crate::jsonl::read_declarations_from_path;
use std::collections::BTreeMap;
use std::path::Path;

/// Read-only lookup of declarations by identifier.
pub trait SymbolStore {
    fn lookup(&self, name: &str) -> Option<&Declaration>;

    fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }
}

/// Resolves an identifier to its actual declaration site.
pub trait PositionResolver {
    fn location(&self, name: &str) -> Option<DeclarationLocation>;
}

/// Deterministic in-memory symbol store keyed by identifier.
#[derive(Debug, Clone, Default)]
pub struct MemorySymbolStore {
    declarations: BTreeMap<String, Declaration>,
}

impl MemorySymbolStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from declarations; duplicate names keep the last one.
    pub fn from_declarations(declarations: impl IntoIterator<Item = Declaration>) -> Self {
        let mut store = Self::new();
        for decl in declarations {
            store.insert(decl);
        }
        store
    }

    /// Load a store from a JSONL declaration snapshot.
    pub fn load_jsonl(path: impl AsRef<Path>) -> Result<Self, KernelError> {
        let declarations = read_declarations_from_path(path)?;
        Ok(Self::from_declarations(declarations))
    }

    /// Insert or replace a declaration. Returns the previous value.
    pub fn insert(&mut self, decl: Declaration) -> Option<Declaration> {
        self.declarations.insert(decl.name.clone(), decl)
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    /// Iterate declarations in identifier order.
    pub fn declarations(&self) -> impl Iterator<Item = &Declaration> {
        self.declarations.values()
    }
}

impl SymbolStore for MemorySymbolStore {
    fn lookup(&self, name: &str) -> Option<&Declaration> {
        self.declarations.get(name)
    }
}

impl PositionResolver for MemorySymbolStore {
    fn location(&self, name: &str) -> Option<DeclarationLocation> {
        self.declarations
            .get(name)
            .and_then(|decl| decl.location.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::declaration::{DeclKind, Position};

    #[test]
    fn later_declaration_replaces_earlier() {
        let store = MemorySymbolStore::from_declarations(vec![
            Declaration::new("a", DeclKind::Axiom),
            Declaration::new("a", DeclKind::Quotient),
        ]);
        assert_eq!(store.len(), 1);
        assert_eq!(
            store.lookup("a").expect("a must exist").kind,
            DeclKind::Quotient
        );
    }

    #[test]
    fn location_comes_from_declaration_site() {
        let store = MemorySymbolStore::from_declarations(vec![
            Declaration::new("a", DeclKind::Axiom).with_location(DeclarationLocation::new(
                "Foo.Bar",
                Position::new(3, 0),
                Position::new(4, 10),
            )),
        ]);
        let loc = store.location("a").expect("location must resolve");
        assert_eq!(loc.unit, "Foo.Bar");
        assert_eq!(loc.range.pos, Position::new(3, 0));
        assert!(store.location("missing").is_none());
    }
}
