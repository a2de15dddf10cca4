//! Markdown errors. None of these reach callers of the renderer: a failed
//! parse degrades to verbatim text.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkdownError {
    /// Blocks or spans nest deeper than the parser allows.
    #[error("markup nested deeper than {limit} levels")]
    NestingTooDeep { limit: usize },
}
