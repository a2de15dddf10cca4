//! Abstract block/inline tree produced by the parser.

use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum Block {
    Paragraph(Vec<Inline>),
    BulletList(Vec<Vec<Block>>),
    OrderedList(Vec<Vec<Block>>),
    Rule,
    Heading { level: u8, content: Vec<Inline> },
    Code { info: String, text: String },
    /// Raw markup. Passthrough is off, so this renders as literal text.
    Raw(String),
    Quote(Vec<Block>),
    /// Tables are recognized but not rendered.
    Table(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "content", rename_all = "camelCase")]
pub enum Inline {
    Text(String),
    LineBreak,
    Emphasis(Vec<Inline>),
    Strong(Vec<Inline>),
    Underline(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Link { href: String, content: Vec<Inline> },
    Image { src: String, alt: String },
    Code(String),
    Math(String),
    DisplayMath(String),
    WikiLink { target: String, label: Option<String> },
    /// An entity reference as written, e.g. `&amp;`.
    Entity(String),
}

impl Inline {
    /// Plain text content, with markup dropped.
    pub fn plain_text(inlines: &[Inline]) -> String {
        let mut out = String::new();
        for inline in inlines {
            match inline {
                Inline::Text(text) | Inline::Code(text) | Inline::Math(text) => {
                    out.push_str(text)
                }
                Inline::DisplayMath(text) => out.push_str(text),
                Inline::LineBreak => out.push('\n'),
                Inline::Emphasis(inner)
                | Inline::Strong(inner)
                | Inline::Underline(inner)
                | Inline::Strikethrough(inner)
                | Inline::Link { content: inner, .. } => out.push_str(&Self::plain_text(inner)),
                Inline::Image { alt, .. } => out.push_str(alt),
                Inline::WikiLink { target, label } => {
                    out.push_str(label.as_deref().unwrap_or(target))
                }
                Inline::Entity(entity) => out.push_str(entity),
            }
        }
        out
    }
}
