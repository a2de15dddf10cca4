//! Content ordering: one unit's nodes and documentation sections, merged by
//! source position.

use blueprint_kernel::{DeclarationRange, Node, Position};
use serde::{Deserialize, Serialize};

/// A free-standing piece of unit documentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocSection {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<DeclarationRange>,
}

impl DocSection {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            range: None,
        }
    }

    pub fn at(mut self, pos: Position, end_pos: Position) -> Self {
        self.range = Some(DeclarationRange { pos, end_pos });
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentEntry<'a> {
    Node(&'a Node),
    Doc(&'a DocSection),
}

/// An item with an optional source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Positioned<T> {
    pub position: Option<Position>,
    pub item: T,
}

impl<T> Positioned<T> {
    pub fn new(position: Option<Position>, item: T) -> Self {
        Self { position, item }
    }
}

/// Order entries by position ascending. Entries without a position come
/// first; ties keep discovery order.
pub fn order_content<T>(mut entries: Vec<Positioned<T>>) -> Vec<Positioned<T>> {
    // `None < Some(_)` and `sort_by_key` is stable.
    entries.sort_by_key(|entry| entry.position);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpositioned_entries_come_first() {
        let entries = vec![
            Positioned::new(Some(Position::new(2, 5)), "late"),
            Positioned::new(None, "floating"),
            Positioned::new(Some(Position::new(1, 1)), "early"),
        ];
        let ordered: Vec<_> = order_content(entries).into_iter().map(|e| e.item).collect();
        assert_eq!(ordered, vec!["floating", "early", "late"]);
    }

    #[test]
    fn ties_keep_discovery_order() {
        let at = Some(Position::new(3, 0));
        let entries = vec![
            Positioned::new(at, "a"),
            Positioned::new(None, "b"),
            Positioned::new(at, "c"),
            Positioned::new(None, "d"),
        ];
        let ordered: Vec<_> = order_content(entries).into_iter().map(|e| e.item).collect();
        assert_eq!(ordered, vec!["b", "d", "a", "c"]);
    }

    #[test]
    fn columns_break_line_ties() {
        let entries = vec![
            Positioned::new(Some(Position::new(4, 9)), "right"),
            Positioned::new(Some(Position::new(4, 2)), "left"),
        ];
        let ordered: Vec<_> = order_content(entries).into_iter().map(|e| e.item).collect();
        assert_eq!(ordered, vec!["left", "right"]);
    }
}
