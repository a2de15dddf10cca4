//! Integration tests: load the fixture project, register its units, and
//! render unit documents and collection indexes.
//!
//! fixtures/algebra/ has:
//! - project.json: units, collections, and a few inline declarations
//! - declarations.jsonl: the rest of the declarations, one per line

use blueprint_doc::{
    BlueprintConfig, DocError, Format, OutputLayout, Project, ProjectSnapshot, UnitReport,
};
use blueprint_kernel::{KernelError, MemorySymbolStore};
use serde_json::Value;
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
        .join("project.json")
}

fn load(name: &str) -> (Project<MemorySymbolStore>, Vec<UnitReport>) {
    let path = fixture_path(name);
    let snapshot = ProjectSnapshot::load(&path)
        .unwrap_or_else(|e| panic!("failed to load {}: {e}", path.display()));
    Project::from_snapshot(snapshot, BlueprintConfig::default())
}

#[test]
fn units_register_in_isolation() {
    let (project, reports) = load("algebra");

    let summary: Vec<(&str, usize, usize)> = reports
        .iter()
        .map(|r| (r.unit.as_str(), r.registered.len(), r.failures.len()))
        .collect();
    assert_eq!(summary, vec![("Alg", 3, 0), ("Geo", 1, 0), ("Loop", 1, 1)]);

    let failure = &reports[2].failures[0];
    assert_eq!(failure.name, "q");
    assert_eq!(
        failure.error,
        KernelError::CyclicDependency {
            path: vec!["q".into(), "p".into(), "q".into()]
        }
    );
    assert_eq!(project.registry().len(), 5);
    assert!(!project.registry().is_node("q"));
}

#[test]
fn closure_and_completeness_follow_the_library() {
    let (project, _) = load("algebra");
    let node = project
        .registry()
        .get("double_even")
        .expect("double_even is registered");

    assert_eq!(node.statement.uses.iter().collect::<Vec<_>>(), vec!["double"]);
    assert!(node.statement.complete);
    let proof = node.proof.as_ref().expect("theorem has a proof");
    assert_eq!(proof.uses.iter().collect::<Vec<_>>(), vec!["add_zero"]);
    assert!(!proof.complete);
}

#[test]
fn unit_document_binds_references_across_units() {
    let (project, _) = load("algebra");
    let doc = project
        .render_unit("Alg", Format::Tex)
        .expect("Alg renders");

    insta::assert_snapshot!(doc.content.trim_end(), @r"
    % Unit Alg
    \providecommand{\inputleannode}[1]{\csname blueprint@node@#1\endcsname}
    \providecommand{\inputleanmodule}[1]{\csname blueprint@unit@#1\endcsname}

    \expandafter\def\csname blueprint@node@double\endcsname{%
    \begin{definition}
    \label{double}
    \lean{double}
    \leanok
    Twice $n$.
    \end{definition}
    }

    \expandafter\def\csname blueprint@node@add_zero\endcsname{%
    \begin{theorem}
    \label{add_zero}
    \lean{add_zero}
    \leanok
    Adding \texttt{0} changes nothing.
    \end{theorem}
    \begin{proof}
    \leanok
    By \texttt{rfl}.
    \end{proof}
    }

    \expandafter\def\csname blueprint@node@double_even\endcsname{%
    \begin{theorem}[Evenness]
    \label{double_even}
    \lean{double_even}
    \discussion{7}
    \leanok
    \uses{double}
    \texttt{double n} is even, see \hyperref[add_zero]{\texttt{add\_zero}}.
    \end{theorem}
    \begin{proof}
    \uses{add_zero}
    \end{proof}
    }

    \expandafter\def\csname blueprint@unit@Alg\endcsname{%
    \section{Algebra}

    See \hyperref[later_use]{\texttt{later\_use}} \cite{knuth}.

    \inputleannode{double}

    \inputleannode{add_zero}

    \inputleannode{double_even}
    }
    ");
}

#[test]
fn not_ready_nodes_and_raw_labels_render() {
    let (project, _) = load("algebra");
    let doc = project
        .render_unit("Geo", Format::Tex)
        .expect("Geo renders");

    assert!(doc.content.contains(
        "\\lean{later_use}\n\\notready\n\\leanok\n\\uses{ext:fig}\n\
         Uses \\hyperref[double_even]{\\texttt{double\\_even}}.\n\\end{theorem}"
    ));
    assert!(doc.content.ends_with(
        "\\csname blueprint@unit@Geo\\endcsname{%\n\\inputleannode{later_use}\n}\n"
    ));
}

#[test]
fn rendering_twice_is_identical() {
    let (project, _) = load("algebra");
    let first = project.render_unit("Alg", Format::Tex).expect("Alg renders");
    let second = project.render_unit("Alg", Format::Tex).expect("Alg renders");
    assert_eq!(first, second);
    assert_eq!(first.digest(), second.digest());
}

#[test]
fn collection_index_uses_declared_unit_order() {
    let (project, _) = load("algebra");
    let index = project
        .render_collection("All", Format::Tex)
        .expect("All renders");
    assert_eq!(
        index.content,
        "% Collection All\n\
         \\providecommand{\\inputleanmodule}[1]{\\csname blueprint@unit@#1\\endcsname}\n\
         \\input{module/Geo.tex}\n\\inputleanmodule{Geo}\n\
         \\input{module/Alg.tex}\n\\inputleanmodule{Alg}\n"
    );

    let err = project
        .render_collection_index("Adhoc", &["Alg".to_string(), "Nowhere".to_string()], Format::Tex)
        .expect_err("unknown units are rejected");
    assert!(matches!(err, DocError::UnknownUnit(unit) if unit == "Nowhere"));
}

#[test]
fn json_unit_document_carries_exports_and_content() {
    let (project, _) = load("algebra");
    let doc = project
        .render_unit("Alg", Format::Json)
        .expect("Alg renders as json");
    let value: Value = serde_json::from_str(&doc.content).expect("document is valid json");

    assert_eq!(value["unit"], "Alg");
    let names: Vec<&str> = value["nodes"]
        .as_array()
        .expect("nodes is a list")
        .iter()
        .map(|n| n["name"].as_str().expect("node has a name"))
        .collect();
    assert_eq!(names, vec!["double", "add_zero", "double_even"]);
    assert_eq!(value["nodes"][0]["hasSource"], true);
    assert_eq!(value["nodes"][0]["file"], "Alg.lean");
    assert_eq!(value["nodes"][0]["renderedStatement"], "Twice $n$.");
    assert_eq!(value["nodes"][2]["proof"]["complete"], false);

    let kinds: Vec<&str> = value["content"]
        .as_array()
        .expect("content is a list")
        .iter()
        .map(|e| e["type"].as_str().expect("entry has a type"))
        .collect();
    assert_eq!(kinds, vec!["doc", "node", "node", "node"]);
}

#[test]
fn node_export_is_dependency_first() {
    let (project, _) = load("algebra");
    let names: Vec<String> = project
        .export_nodes()
        .into_iter()
        .map(|export| export.node.name)
        .collect();
    assert_eq!(names, vec!["double", "add_zero", "double_even", "later_use", "p"]);
}

#[test]
fn documents_flush_to_the_layout() {
    let (project, _) = load("algebra");
    let root = std::env::temp_dir().join(format!("blueprint-render-vectors-{}", std::process::id()));
    let layout = OutputLayout::new(&root);
    let documents = vec![
        project.render_unit("Alg", Format::Tex).expect("Alg renders"),
        project.render_collection("All", Format::Json).expect("All renders"),
    ];

    let written = layout.write_all(&documents).expect("documents are written");
    assert_eq!(
        written,
        vec![root.join("module/Alg.tex"), root.join("library/All.json")]
    );
    let index: Value = serde_json::from_str(
        &std::fs::read_to_string(&written[1]).expect("index is readable"),
    )
    .expect("index is valid json");
    assert_eq!(index["units"][0]["path"], "module/Geo.json");
    let _ = std::fs::remove_dir_all(&root);
}
