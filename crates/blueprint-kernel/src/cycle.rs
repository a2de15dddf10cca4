//! Cycle validation for node registration.
//!
//! The registered node graph is acyclic, so a new cycle has to pass through
//! the candidate. The search starts from the candidate's references and
//! reports a cycle only on a back-edge into the active path; meeting an
//! already-finished node again (a diamond) is legal.

use crate::error::KernelError;
use crate::node::Node;
use std::collections::HashSet;
use tracing::warn;

/// Check that adding `candidate` keeps the node graph acyclic.
///
/// `lookup` resolves registered nodes. References that resolve to no node
/// are skipped, or rejected with `DanglingReference` when `strict_labels`
/// is set.
pub fn check_acyclic<'a, L>(
    candidate: &'a Node,
    lookup: L,
    strict_labels: bool,
) -> Result<(), KernelError>
where
    L: Fn(&str) -> Option<&'a Node>,
{
    let root = candidate.name.as_str();
    let mut visited: HashSet<&str> = HashSet::from([root]);
    let mut on_path: HashSet<&str> = HashSet::from([root]);
    let mut path: Vec<&str> = vec![root];
    let mut frames: Vec<(Vec<&str>, usize)> = vec![(candidate.uses().into_iter().collect(), 0)];

    while let Some((edges, next_idx)) = frames.last_mut() {
        if *next_idx >= edges.len() {
            frames.pop();
            if let Some(done) = path.pop() {
                on_path.remove(done);
            }
            continue;
        }
        let next = edges[*next_idx];
        *next_idx += 1;

        if on_path.contains(next) {
            let start = path.iter().position(|name| *name == next).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..].iter().map(|name| name.to_string()).collect();
            cycle.push(next.to_string());
            return Err(KernelError::CyclicDependency { path: cycle });
        }
        if !visited.insert(next) {
            continue;
        }

        let Some(node) = lookup(next) else {
            let from = path.last().copied().unwrap_or(root);
            if strict_labels {
                return Err(KernelError::DanglingReference {
                    node: from.to_string(),
                    reference: next.to_string(),
                });
            }
            warn!(node = from, reference = next, "skipping reference to unregistered node");
            continue;
        };

        path.push(next);
        on_path.insert(next);
        frames.push((node.uses().into_iter().collect(), 0));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodePart, STATEMENT_ENV_DEFINITION};
    use std::collections::BTreeMap;

    fn node(name: &str, uses: &[&str]) -> Node {
        Node {
            name: name.to_string(),
            statement: NodePart {
                complete: true,
                text: String::new(),
                uses: uses.iter().map(|s| s.to_string()).collect(),
                uses_raw: Default::default(),
                env: STATEMENT_ENV_DEFINITION.to_string(),
            },
            proof: None,
            not_ready: false,
            discussion: None,
            title: None,
        }
    }

    fn graph(nodes: Vec<Node>) -> BTreeMap<String, Node> {
        nodes.into_iter().map(|n| (n.name.clone(), n)).collect()
    }

    #[test]
    fn diamond_is_not_a_cycle() {
        let registered = graph(vec![
            node("B", &["D"]),
            node("C", &["D"]),
            node("D", &[]),
        ]);
        let candidate = node("A", &["B", "C"]);
        check_acyclic(&candidate, |n| registered.get(n), false).expect("diamond is legal");
    }

    #[test]
    fn back_edge_reports_full_path() {
        let registered = graph(vec![node("B", &["C"]), node("C", &["A"])]);
        let candidate = node("A", &["B"]);
        let err = check_acyclic(&candidate, |n| registered.get(n), false)
            .expect_err("cycle must be reported");
        assert_eq!(
            err,
            KernelError::CyclicDependency {
                path: vec!["A".into(), "B".into(), "C".into(), "A".into()]
            }
        );
    }

    #[test]
    fn self_loop_is_rejected() {
        let registered: BTreeMap<String, Node> = BTreeMap::new();
        let candidate = node("A", &["A"]);
        let err = check_acyclic(&candidate, |n| registered.get(n), false)
            .expect_err("self loop must be rejected");
        assert_eq!(
            err,
            KernelError::CyclicDependency {
                path: vec!["A".into(), "A".into()]
            }
        );
    }

    #[test]
    fn dangling_reference_is_skipped_unless_strict() {
        let registered: BTreeMap<String, Node> = BTreeMap::new();
        let candidate = node("A", &["Elsewhere"]);
        check_acyclic(&candidate, |n| registered.get(n), false).expect("lenient mode skips");

        let err = check_acyclic(&candidate, |n| registered.get(n), true)
            .expect_err("strict mode rejects");
        assert!(matches!(err, KernelError::DanglingReference { reference, .. } if reference == "Elsewhere"));
    }
}
