//! Output assembly: per-unit documents and per-collection indexes.
//!
//! A LaTeX unit document defines one macro per node holding its rendered
//! statement and proof, then one macro for the whole unit that transcludes
//! nodes and documentation sections in content order. Cross-references are
//! bound here, against the full registry, so every unit sees every node.

use crate::error::DocError;
use crate::export::NodeExport;
use crate::order::ContentEntry;
use crate::project::Project;
use blueprint_kernel::{Node, NodePart, PositionResolver, SymbolStore};
use blueprint_markdown::{RenderOptions, TextContext, escape_text, render_markdown};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Write as _};
use std::str::FromStr;
use tracing::debug;

const NODE_MACROS: &str = "\\providecommand{\\inputleannode}[1]{\\csname blueprint@node@#1\\endcsname}\n";
const UNIT_MACROS: &str = "\\providecommand{\\inputleanmodule}[1]{\\csname blueprint@unit@#1\\endcsname}\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Tex,
    Json,
}

impl Format {
    pub fn extension(self) -> &'static str {
        match self {
            Format::Tex => "tex",
            Format::Json => "json",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tex" | "latex" => Ok(Format::Tex),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format: {other} (expected tex or json)")),
        }
    }
}

/// What a document is the output of.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "camelCase")]
pub enum DocumentTarget {
    Unit(String),
    Collection(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub target: DocumentTarget,
    pub format: Format,
    pub content: String,
}

impl Document {
    /// Hex SHA-256 of the content.
    pub fn digest(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.content.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct UnitJson<'a> {
    unit: &'a str,
    nodes: Vec<NodeJson>,
    content: Vec<EntryJson<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct NodeJson {
    #[serde(flatten)]
    export: NodeExport,
    label: String,
    rendered_statement: String,
    rendered_proof: Option<String>,
}

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
enum EntryJson<'a> {
    Node { name: &'a str },
    Doc { text: String },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionJson<'a> {
    collection: &'a str,
    units: Vec<CollectionUnitJson<'a>>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectionUnitJson<'a> {
    unit: &'a str,
    path: String,
}

impl<S> Project<S>
where
    S: SymbolStore + PositionResolver,
{
    fn markdown_options(&self) -> RenderOptions {
        self.config().render.markdown_options()
    }

    /// Render prose and bind its references against every registered node.
    fn render_prose(&self, text: &str) -> String {
        render_markdown(text, &self.markdown_options()).bind(&|name: &str| self.resolve_label(name))
    }

    /// Render one unit's document.
    pub fn render_unit(&self, unit: &str, format: Format) -> Result<Document, DocError> {
        let content = self.content(unit)?;
        let rendered = match format {
            Format::Tex => self.unit_tex(unit, &content)?,
            Format::Json => self.unit_json(unit, &content)?,
        };
        debug!(unit, %format, entries = content.len(), "rendered unit");
        Ok(Document {
            target: DocumentTarget::Unit(unit.to_string()),
            format,
            content: rendered,
        })
    }

    /// Render an index transcluding `units` in the given order.
    pub fn render_collection_index(
        &self,
        collection: &str,
        units: &[String],
        format: Format,
    ) -> Result<Document, DocError> {
        if let Some(missing) = units.iter().find(|unit| !self.has_unit(unit)) {
            return Err(DocError::UnknownUnit(missing.clone()));
        }
        let rendered = match format {
            Format::Tex => {
                let mut out = format!("% Collection {collection}\n");
                out.push_str(UNIT_MACROS);
                for unit in units {
                    let _ = writeln!(out, "\\input{{module/{unit}.tex}}");
                    let _ = writeln!(out, "\\inputleanmodule{{{unit}}}");
                }
                out
            }
            Format::Json => {
                let index = CollectionJson {
                    collection,
                    units: units
                        .iter()
                        .map(|unit| CollectionUnitJson {
                            unit,
                            path: format!("module/{unit}.json"),
                        })
                        .collect(),
                };
                to_json(&index, collection)?
            }
        };
        Ok(Document {
            target: DocumentTarget::Collection(collection.to_string()),
            format,
            content: rendered,
        })
    }

    /// Render a declared collection in its declared unit order.
    pub fn render_collection(&self, collection: &str, format: Format) -> Result<Document, DocError> {
        let units = self.collection_units(collection)?;
        self.render_collection_index(collection, units, format)
    }

    fn unit_tex(&self, unit: &str, content: &[ContentEntry<'_>]) -> Result<String, DocError> {
        let mut out = format!("% Unit {unit}\n");
        out.push_str(NODE_MACROS);
        out.push_str(UNIT_MACROS);

        for node in self.unit_nodes(unit)? {
            out.push('\n');
            self.node_definition(&mut out, node);
        }

        let body: Vec<String> = content
            .iter()
            .map(|entry| match entry {
                ContentEntry::Node(node) => format!("\\inputleannode{{{}}}", node.name),
                ContentEntry::Doc(doc) => self.render_prose(&doc.text),
            })
            .filter(|text| !text.is_empty())
            .collect();
        let _ = write!(
            out,
            "\n\\expandafter\\def\\csname blueprint@unit@{unit}\\endcsname{{%\n"
        );
        if !body.is_empty() {
            out.push_str(&body.join("\n\n"));
            out.push('\n');
        }
        out.push_str("}\n");
        Ok(out)
    }

    fn node_definition(&self, out: &mut String, node: &Node) {
        let _ = writeln!(
            out,
            "\\expandafter\\def\\csname blueprint@node@{}\\endcsname{{%",
            node.name
        );

        let statement = &node.statement;
        match &node.title {
            Some(title) => {
                let _ = writeln!(
                    out,
                    "\\begin{{{}}}[{}]",
                    statement.env,
                    escape_text(title, TextContext::Prose)
                );
            }
            None => {
                let _ = writeln!(out, "\\begin{{{}}}", statement.env);
            }
        }
        let _ = writeln!(out, "\\label{{{}}}", self.label(&node.name));
        let _ = writeln!(out, "\\lean{{{}}}", node.name);
        if node.not_ready {
            out.push_str("\\notready\n");
        }
        if let Some(discussion) = node.discussion {
            let _ = writeln!(out, "\\discussion{{{discussion}}}");
        }
        self.part_body(out, statement);
        let _ = writeln!(out, "\\end{{{}}}", statement.env);

        if let Some(proof) = &node.proof {
            let _ = writeln!(out, "\\begin{{{}}}", proof.env);
            self.part_body(out, proof);
            let _ = writeln!(out, "\\end{{{}}}", proof.env);
        }
        out.push_str("}\n");
    }

    fn part_body(&self, out: &mut String, part: &NodePart) {
        if part.complete {
            out.push_str("\\leanok\n");
        }
        let uses: Vec<String> = part
            .uses
            .iter()
            .map(|name| self.label(name))
            .chain(part.uses_raw.iter().cloned())
            .collect();
        if !uses.is_empty() {
            let _ = writeln!(out, "\\uses{{{}}}", uses.join(", "));
        }
        let text = self.render_prose(&part.text);
        if !text.is_empty() {
            out.push_str(&text);
            out.push('\n');
        }
    }

    fn unit_json(&self, unit: &str, content: &[ContentEntry<'_>]) -> Result<String, DocError> {
        let nodes = self
            .unit_nodes(unit)?
            .into_iter()
            .map(|node| NodeJson {
                export: NodeExport::new(node, self.store()),
                label: self.label(&node.name),
                rendered_statement: self.render_prose(&node.statement.text),
                rendered_proof: node.proof.as_ref().map(|proof| self.render_prose(&proof.text)),
            })
            .collect();
        let content = content
            .iter()
            .map(|entry| match entry {
                ContentEntry::Node(node) => EntryJson::Node { name: &node.name },
                ContentEntry::Doc(doc) => EntryJson::Doc {
                    text: self.render_prose(&doc.text),
                },
            })
            .collect();
        to_json(
            &UnitJson {
                unit,
                nodes,
                content,
            },
            unit,
        )
    }
}

fn to_json<T: Serialize>(value: &T, what: &str) -> Result<String, DocError> {
    serde_json::to_string_pretty(value)
        .map(|mut json| {
            json.push('\n');
            json
        })
        .map_err(|source| DocError::Serialize {
            what: what.to_string(),
            source,
        })
}
