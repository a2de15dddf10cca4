//! Markdown prose to LaTeX.
//!
//! ```text
//! text ──parse──▶ blocks/inlines ──render──▶ RenderedText ──bind──▶ LaTeX
//!                                  (postprocess text spans)   (resolve refs)
//! ```
//!
//! Rendering is total. Malformed or overly nested markup comes back as
//! escaped verbatim text, and tables become a placeholder.

pub mod ast;
pub mod error;
pub mod parser;
pub mod postprocess;
pub mod render;

pub use ast::{Block, Inline};
pub use error::MarkdownError;
pub use parser::{MAX_NESTING, parse, parse_inlines};
pub use postprocess::{TextContext, cite_brackets, escape_text, postprocess};
pub use render::{
    DeferredRef, RefResolver, RefStyle, RenderOptions, RenderedText, code_escape, render_markdown,
};
