//! # Blueprint Documents
//!
//! Project state and document assembly on top of the kernel and the
//! markdown renderer.
//!
//! ```text
//! ProjectSnapshot ──▶ Project (store + registry + units + collections)
//!                        │  register_unit → UnitReport
//!                        ▼
//!                     content(unit)        ← Content Orderer
//!                        │
//!                     render_unit / render_collection_index
//!                        │
//!                     OutputLayout::write_all
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod export;
pub mod layout;
pub mod order;
pub mod project;
pub mod snapshot;

pub use assemble::{Document, DocumentTarget, Format};
pub use config::{BlueprintConfig, DEFAULT_OUTPUT_ROOT, OutputConfig, RenderConfig};
pub use error::DocError;
pub use export::NodeExport;
pub use layout::{COLLECTION_DIR, OutputLayout, UNIT_DIR};
pub use order::{ContentEntry, DocSection, Positioned, order_content};
pub use project::{Project, RegistrationFailure, UnitReport};
pub use snapshot::{CollectionSnapshot, ProjectSnapshot, UnitSnapshot};
