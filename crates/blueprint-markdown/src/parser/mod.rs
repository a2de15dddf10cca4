//! Markdown parser.
//!
//! Dialect: GitHub-flavored extensions (tables, strikethrough, autolinks,
//! wiki-links), dollar-delimited inline and display math, no raw markup
//! passthrough, no indented code blocks. Parsing is total: anything that
//! does not form a construct stays literal text. The only failure is
//! nesting beyond `MAX_NESTING`.

mod block;
mod inline;

use crate::ast::Block;
use crate::error::MarkdownError;

pub use inline::parse_inlines;

/// Deepest nesting of blocks or spans accepted by the parser.
pub const MAX_NESTING: usize = 32;

/// Parse prose into blocks.
pub fn parse(input: &str) -> Result<Vec<Block>, MarkdownError> {
    let normalized = input.replace("\r\n", "\n").replace('\r', "\n");
    let lines: Vec<&str> = normalized.lines().collect();
    block::parse_blocks(&lines, 0)
}

fn nesting_guard(depth: usize) -> Result<(), MarkdownError> {
    if depth > MAX_NESTING {
        return Err(MarkdownError::NestingTooDeep { limit: MAX_NESTING });
    }
    Ok(())
}
