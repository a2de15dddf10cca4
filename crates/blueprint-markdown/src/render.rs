//! LaTeX rendering with deferred cross-references.
//!
//! Rendering happens in two phases. [`render_markdown`] turns prose into a
//! [`RenderedText`]: finished LaTeX with a numbered placeholder wherever an
//! inline-code span or wiki-link might name a node. [`RenderedText::bind`]
//! later substitutes each placeholder with a cross-reference when the name
//! resolves, or literal monospace when it does not. Binding is deferred until
//! every unit is registered so that forward references across units work.

use crate::ast::{Block, Inline};
use crate::parser;
use crate::postprocess::{TextContext, escape_text, postprocess};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use tracing::warn;

const PLACEHOLDER_OPEN: char = '\u{E000}';
const PLACEHOLDER_CLOSE: char = '\u{E001}';

/// Sectioning commands by heading level; deeper headings reuse the last one.
const SECTIONING: [&str; 5] = [
    "section",
    "subsection",
    "subsubsection",
    "paragraph",
    "subparagraph",
];

/// Environments that already open display math.
const DISPLAY_MATH_ENVS: [&str; 7] = [
    "equation",
    "align",
    "gather",
    "multline",
    "flalign",
    "alignat",
    "eqnarray",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Rewrite bare `[key]` groups in prose to `\cite{key}`.
    pub cite_brackets: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            cite_brackets: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RefStyle {
    /// Inline code: rendered monospace either way.
    Code,
    /// `[[target|label]]`: rendered with its label when one is given.
    Wiki,
}

/// A reference whose rendering waits for the full node table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeferredRef {
    pub target: String,
    pub label: Option<String>,
    pub style: RefStyle,
}

/// Maps a node name to its LaTeX label, if the name is a known node.
pub trait RefResolver {
    fn resolve(&self, name: &str) -> Option<String>;
}

impl<F> RefResolver for F
where
    F: Fn(&str) -> Option<String>,
{
    fn resolve(&self, name: &str) -> Option<String> {
        self(name)
    }
}

/// Rendered prose with unresolved reference placeholders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedText {
    template: String,
    refs: Vec<DeferredRef>,
}

impl RenderedText {
    pub fn template(&self) -> &str {
        &self.template
    }

    pub fn refs(&self) -> &[DeferredRef] {
        &self.refs
    }

    pub fn is_empty(&self) -> bool {
        self.template.is_empty()
    }

    /// Substitute every placeholder, consulting `resolver` for each target.
    pub fn bind<R: RefResolver + ?Sized>(&self, resolver: &R) -> String {
        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template.as_str();
        while let Some(open) = rest.find(PLACEHOLDER_OPEN) {
            out.push_str(&rest[..open]);
            let after = &rest[open + PLACEHOLDER_OPEN.len_utf8()..];
            let Some(close) = after.find(PLACEHOLDER_CLOSE) else {
                rest = after;
                continue;
            };
            let deferred = after[..close]
                .parse::<usize>()
                .ok()
                .and_then(|idx| self.refs.get(idx));
            if let Some(deferred) = deferred {
                out.push_str(&bind_ref(deferred, resolver.resolve(&deferred.target)));
            }
            rest = &after[close + PLACEHOLDER_CLOSE.len_utf8()..];
        }
        out.push_str(rest);
        out
    }

    /// Bind with nothing resolving: every reference falls back to literal text.
    pub fn unbound(&self) -> String {
        self.bind(&|_: &str| None::<String>)
    }
}

fn bind_ref(deferred: &DeferredRef, label: Option<String>) -> String {
    let monospace = format!("\\texttt{{{}}}", code_escape(&deferred.target));
    let display = match (deferred.style, &deferred.label) {
        (RefStyle::Wiki, Some(text)) => escape_text(text, TextContext::Prose),
        _ => monospace,
    };
    match label {
        Some(label) => format!("\\hyperref[{label}]{{{display}}}"),
        None => display,
    }
}

/// Escape text for a `\texttt{}` argument.
pub fn code_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' => out.push_str("\\textbackslash{}"),
            '{' => out.push_str("\\{"),
            '}' => out.push_str("\\}"),
            '$' | '&' | '#' | '_' | '%' => {
                out.push('\\');
                out.push(c);
            }
            '^' => out.push_str("\\textasciicircum{}"),
            '~' => out.push_str("\\textasciitilde{}"),
            _ => out.push(c),
        }
    }
    out
}

/// Render markdown prose to LaTeX.
///
/// Never fails: text the parser rejects comes back escaped but otherwise
/// verbatim.
pub fn render_markdown(text: &str, options: &RenderOptions) -> RenderedText {
    let clean: String = text
        .chars()
        .filter(|c| *c != PLACEHOLDER_OPEN && *c != PLACEHOLDER_CLOSE)
        .collect();
    match parser::parse(&clean) {
        Ok(blocks) => {
            let mut renderer = Renderer {
                out: String::new(),
                refs: Vec::new(),
                options,
            };
            renderer.blocks(&blocks);
            RenderedText {
                template: renderer.out.trim().to_string(),
                refs: renderer.refs,
            }
        }
        Err(error) => {
            warn!(%error, "markdown rejected, rendering verbatim");
            RenderedText {
                template: escape_text(clean.trim(), TextContext::Prose),
                refs: Vec::new(),
            }
        }
    }
}

struct Renderer<'a> {
    out: String,
    refs: Vec<DeferredRef>,
    options: &'a RenderOptions,
}

impl Renderer<'_> {
    fn blocks(&mut self, blocks: &[Block]) {
        for (idx, block) in blocks.iter().enumerate() {
            if idx > 0 {
                self.out.push_str("\n\n");
            }
            self.block(block);
        }
    }

    fn block(&mut self, block: &Block) {
        match block {
            Block::Paragraph(inlines) => self.inlines(inlines),
            Block::BulletList(items) => self.list("itemize", items),
            Block::OrderedList(items) => self.list("enumerate", items),
            Block::Rule => self
                .out
                .push_str("\\par\\noindent\\rule{\\linewidth}{0.4pt}\\par"),
            Block::Heading { level, content } => {
                let idx = usize::from(*level).clamp(1, SECTIONING.len()) - 1;
                let _ = write!(self.out, "\\{}{{", SECTIONING[idx]);
                self.inlines(content);
                self.out.push('}');
            }
            Block::Code { text, .. } => {
                self.out.push_str("\\par\\noindent");
                let lines: Vec<String> = text
                    .lines()
                    .map(|line| format!("\\texttt{{{}}}", code_escape(line).replace(' ', "~")))
                    .collect();
                if !lines.is_empty() {
                    self.out.push(' ');
                    self.out.push_str(&lines.join("\\\\\n"));
                }
                self.out.push_str("\\par");
            }
            Block::Raw(raw) => self.out.push_str(&escape_text(raw, TextContext::Prose)),
            Block::Quote(inner) => {
                self.out.push_str("\\begin{quote}\n");
                self.blocks(inner);
                self.out.push_str("\n\\end{quote}");
            }
            Block::Table(_) => self
                .out
                .push_str("\\par\\noindent\\emph{[table omitted]}\\par"),
        }
    }

    fn list(&mut self, env: &str, items: &[Vec<Block>]) {
        let _ = writeln!(self.out, "\\begin{{{env}}}");
        for item in items {
            self.out.push_str("\\item ");
            self.blocks(item);
            self.out.push('\n');
        }
        let _ = write!(self.out, "\\end{{{env}}}");
    }

    fn inlines(&mut self, inlines: &[Inline]) {
        for inline in inlines {
            self.inline(inline);
        }
    }

    fn wrapped(&mut self, command: &str, inner: &[Inline]) {
        let _ = write!(self.out, "\\{command}{{");
        self.inlines(inner);
        self.out.push('}');
    }

    fn inline(&mut self, inline: &Inline) {
        match inline {
            Inline::Text(text) => self.out.push_str(&postprocess(
                text,
                TextContext::Prose,
                self.options.cite_brackets,
            )),
            Inline::LineBreak => self.out.push_str("\\\\\n"),
            Inline::Emphasis(inner) => self.wrapped("emph", inner),
            Inline::Strong(inner) => self.wrapped("textbf", inner),
            Inline::Underline(inner) => self.wrapped("underline", inner),
            Inline::Strikethrough(inner) => self.wrapped("sout", inner),
            Inline::Link { href, content } => {
                let _ = write!(self.out, "\\href{{{}}}{{", escape_text(href, TextContext::Url));
                self.inlines(content);
                self.out.push('}');
            }
            Inline::Image { src, .. } => {
                let _ = write!(
                    self.out,
                    "\\includegraphics[width=\\linewidth]{{{}}}",
                    escape_text(src, TextContext::Url)
                );
            }
            Inline::Code(code) => self.defer(code.clone(), None, RefStyle::Code),
            Inline::Math(math) => {
                let _ = write!(self.out, "${math}$");
            }
            Inline::DisplayMath(math) => self.out.push_str(&display_math(math)),
            Inline::WikiLink { target, label } => {
                self.defer(target.clone(), label.clone(), RefStyle::Wiki)
            }
            Inline::Entity(entity) => self.out.push_str(&decode_entity(entity)),
        }
    }

    fn defer(&mut self, target: String, label: Option<String>, style: RefStyle) {
        let idx = self.refs.len();
        self.refs.push(DeferredRef {
            target,
            label,
            style,
        });
        let _ = write!(self.out, "{PLACEHOLDER_OPEN}{idx}{PLACEHOLDER_CLOSE}");
    }
}

fn opens_display_env(math: &str) -> bool {
    let Some(rest) = math.trim_start().strip_prefix("\\begin{") else {
        return false;
    };
    let Some(close) = rest.find('}') else {
        return false;
    };
    let name = &rest[..close];
    let base = name.strip_suffix('*').unwrap_or(name);
    DISPLAY_MATH_ENVS.contains(&base)
}

fn display_math(math: &str) -> String {
    if opens_display_env(math) {
        math.trim().to_string()
    } else {
        format!("\\[{}\\]", math.trim())
    }
}

fn decode_entity(entity: &str) -> String {
    let body = entity.trim_start_matches('&').trim_end_matches(';');
    let decoded = match body {
        "amp" => return "\\&".to_string(),
        "nbsp" => return "~".to_string(),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "ndash" => return "--".to_string(),
        "mdash" => return "---".to_string(),
        "hellip" => return "\\ldots{}".to_string(),
        "copy" => Some('\u{00A9}'),
        _ => body
            .strip_prefix('#')
            .and_then(|num| match num.strip_prefix(['x', 'X']) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => num.parse::<u32>().ok(),
            })
            .and_then(char::from_u32),
    };
    match decoded {
        Some('&') => "\\&".to_string(),
        Some(c) => escape_text(&c.to_string(), TextContext::Prose),
        None => format!("\\&{}", escape_text(&entity[1..], TextContext::Prose)),
    }
}
