//! Error types for kernel operations.

/// Errors raised while building, validating, or registering nodes.
///
/// Every variant aborts only the single declaration being processed; the
/// registry is left exactly as it was before the failed registration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum KernelError {
    /// An explicit `uses`/`proofUses` override names no known declaration.
    #[error("unresolved identifier `{name}` referenced by `{referenced_by}`")]
    UnresolvedIdentifier { name: String, referenced_by: String },

    /// Registering the node would close a cycle in the node graph.
    #[error("cyclic dependency: {}", path.join(" -> "))]
    CyclicDependency { path: Vec<String> },

    /// The identifier is already registered; the registry is append-only.
    #[error("node already registered: {0}")]
    DuplicateNode(String),

    /// The declaration being tagged is absent from the symbol store.
    #[error("unknown declaration: {0}")]
    UnknownDeclaration(String),

    /// A node references something that is neither a registered node nor a
    /// raw label (only raised when strict label checking is enabled).
    #[error("dangling reference `{reference}` from `{node}`")]
    DanglingReference { node: String, reference: String },

    /// Declaration snapshot could not be read.
    #[error(transparent)]
    Jsonl(#[from] JsonlError),
}

/// Errors from reading declaration snapshots.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JsonlError {
    #[error("I/O error at line {0}: {1}")]
    Io(usize, String),

    #[error("parse error at line {0}: {1}")]
    Parse(usize, String),

    #[error("serialize error: {0}")]
    Serialize(String),
}
