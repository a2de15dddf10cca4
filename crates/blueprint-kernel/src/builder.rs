//! Node builder: combine a declaration, explicit overrides, and the
//! collector's output into a `Node`.

use crate::collect::{CollectedUses, collect_used};
use crate::error::KernelError;
use crate::node::{
    Node, NodePart, NodeSpec, PROOF_ENV, STATEMENT_ENV_DEFINITION, STATEMENT_ENV_THEOREM, UseRef,
};
use crate::store::SymbolStore;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Identifier of the axiom that marks unproven placeholders.
pub const DEFAULT_INCOMPLETENESS_MARKER: &str = "sorryAx";

/// Options governing how overrides and references are treated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Drop overrides that name unknown declarations instead of failing the node.
    pub ignore_unresolved: bool,
    /// Fail registration when a node references something that is neither
    /// a registered node nor a raw label.
    pub strict_labels: bool,
    pub incompleteness_marker: String,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            ignore_unresolved: false,
            strict_labels: false,
            incompleteness_marker: DEFAULT_INCOMPLETENESS_MARKER.to_string(),
        }
    }
}

/// Build the node for `spec.name`.
///
/// The proof half exists when `spec.has_proof` says so, or by default when
/// the declaration is a theorem. Collected references are narrowed to
/// registered nodes; explicit overrides are kept verbatim.
pub fn build_node<S, F>(
    store: &S,
    is_node: F,
    spec: &NodeSpec,
    options: &BuildOptions,
) -> Result<Node, KernelError>
where
    S: SymbolStore + ?Sized,
    F: Fn(&str) -> bool,
{
    let decl = store
        .lookup(&spec.name)
        .ok_or_else(|| KernelError::UnknownDeclaration(spec.name.clone()))?;
    let marker = options.incompleteness_marker.as_str();
    let has_proof = spec.has_proof.unwrap_or_else(|| decl.kind.is_theorem());

    let CollectedUses {
        type_used,
        value_used,
    } = collect_used(store, &is_node, &spec.name, marker)?;

    let statement_text = spec
        .statement
        .clone()
        .or_else(|| decl.doc.clone())
        .unwrap_or_default();

    if has_proof {
        let statement_env = spec
            .env
            .clone()
            .unwrap_or_else(|| STATEMENT_ENV_THEOREM.to_string());
        let statement = build_part(
            store,
            &is_node,
            &spec.name,
            type_used,
            &spec.uses,
            statement_text,
            statement_env,
            options,
        )?;
        let proof_text = spec.proof.clone().unwrap_or_else(|| decl.proof_text());
        let proof = build_part(
            store,
            &is_node,
            &spec.name,
            value_used,
            &spec.proof_uses,
            proof_text,
            PROOF_ENV.to_string(),
            options,
        )?;
        Ok(Node {
            name: spec.name.clone(),
            statement,
            proof: Some(proof),
            not_ready: spec.not_ready,
            discussion: spec.discussion,
            title: spec.title.clone(),
        })
    } else {
        let mut used = type_used;
        used.extend(value_used);
        let overrides: Vec<UseRef> = spec
            .uses
            .iter()
            .chain(spec.proof_uses.iter())
            .cloned()
            .collect();
        let statement_env = spec
            .env
            .clone()
            .unwrap_or_else(|| STATEMENT_ENV_DEFINITION.to_string());
        let statement = build_part(
            store,
            &is_node,
            &spec.name,
            used,
            &overrides,
            statement_text,
            statement_env,
            options,
        )?;
        Ok(Node {
            name: spec.name.clone(),
            statement,
            proof: None,
            not_ready: spec.not_ready,
            discussion: spec.discussion,
            title: spec.title.clone(),
        })
    }
}

#[allow(clippy::too_many_arguments)]
fn build_part<S, F>(
    store: &S,
    is_node: &F,
    owner: &str,
    collected: IndexSet<String>,
    overrides: &[UseRef],
    text: String,
    env: String,
    options: &BuildOptions,
) -> Result<NodePart, KernelError>
where
    S: SymbolStore + ?Sized,
    F: Fn(&str) -> bool,
{
    let complete = !collected.contains(options.incompleteness_marker.as_str());

    let mut uses: IndexSet<String> = collected
        .into_iter()
        .filter(|name| is_node(name.as_str()))
        .collect();
    let mut uses_raw = IndexSet::new();

    for reference in overrides {
        match reference {
            UseRef::Decl(name) if store.contains(name) || is_node(name.as_str()) => {
                uses.insert(name.clone());
            }
            UseRef::Decl(name) if options.ignore_unresolved => {
                warn!(node = owner, reference = %name, "ignoring unresolved override");
            }
            UseRef::Decl(name) => {
                return Err(KernelError::UnresolvedIdentifier {
                    name: name.clone(),
                    referenced_by: owner.to_string(),
                });
            }
            UseRef::Raw(label) => {
                uses_raw.insert(label.clone());
            }
        }
    }

    Ok(NodePart {
        complete,
        text,
        uses,
        uses_raw,
        env,
    })
}
