//! # Blueprint Kernel
//!
//! Turns declarations of a verified library into dependency-tracked nodes.
//!
//! ## Architecture
//!
//! ```text
//! SymbolStore           ← read-only declarations (external)
//!     │
//! collect_used          ← memoized closure, opaque at registered nodes
//!     │
//! build_node            ← declaration + overrides + closure → Node
//!     │
//! check_acyclic         ← gate: the node graph stays a DAG
//!     │
//! NodeRegistry          ← append-only, one writer per run
//! ```

pub mod builder;
pub mod collect;
pub mod cycle;
pub mod declaration;
pub mod error;
pub mod jsonl;
pub mod node;
pub mod registry;
pub mod store;

pub use builder::{BuildOptions, DEFAULT_INCOMPLETENESS_MARKER, build_node};
pub use collect::{CollectedUses, collect_used};
pub use cycle::check_acyclic;
pub use declaration::{DeclKind, Declaration, DeclarationLocation, DeclarationRange, Position};
pub use error::{JsonlError, KernelError};
pub use jsonl::{read_declarations, read_declarations_from_path, write_declarations};
pub use node::{
    Node, NodePart, NodeSpec, PROOF_ENV, STATEMENT_ENV_DEFINITION, STATEMENT_ENV_THEOREM, UseRef,
};
pub use registry::NodeRegistry;
pub use store::{MemorySymbolStore, PositionResolver, SymbolStore};
