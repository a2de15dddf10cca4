//! Integration tests: dependency closure and registration over a small
//! library shaped like a real one (definitions, lemmas, an inductive type,
//! and an unfinished proof).

use blueprint_kernel::{
    BuildOptions, DEFAULT_INCOMPLETENESS_MARKER, DeclKind, Declaration, KernelError,
    MemorySymbolStore, NodeRegistry, NodeSpec, read_declarations,
};

const LIBRARY: &str = r#"
# tiny library
{"name":"sorryAx","kind":"axiom"}
{"name":"propext","kind":"axiom"}
{"name":"Nat","kind":"inductive","constructors":["Nat.zero","Nat.succ"]}
{"name":"Nat.zero","kind":"constructor","typeRefs":["Nat"]}
{"name":"Nat.succ","kind":"constructor","typeRefs":["Nat"]}
{"name":"Even","kind":"definition","typeRefs":["Nat"],"valueRefs":["Nat.succ"],"doc":"A number is even when it is twice another."}
{"name":"helper","kind":"theorem","typeRefs":["Even"],"valueRefs":["propext"]}
{"name":"even_add","kind":"theorem","typeRefs":["Even"],"valueRefs":["helper"],"doc":"Sum of evens is even.","proofDocs":["Induct on the first summand."]}
{"name":"even_mul","kind":"theorem","typeRefs":["Even"],"valueRefs":["even_add","sorryAx"]}
"#;

fn library() -> MemorySymbolStore {
    let decls = read_declarations(LIBRARY.as_bytes()).expect("library must parse");
    MemorySymbolStore::from_declarations(decls)
}

#[test]
fn nodes_see_each_other_but_not_through_each_other() {
    let store = library();
    let options = BuildOptions::default();
    let mut registry = NodeRegistry::new();

    registry
        .register_spec(&store, &NodeSpec::new("Even"), &options)
        .expect("Even registers");
    let even_add = registry
        .register_spec(&store, &NodeSpec::new("even_add"), &options)
        .expect("even_add registers")
        .clone();

    assert_eq!(even_add.statement.uses.iter().collect::<Vec<_>>(), vec!["Even"]);
    assert_eq!(even_add.statement.text, "Sum of evens is even.");
    let proof = even_add.proof.expect("theorem has a proof");
    // helper is not a node, so the closure runs through it and finds only an axiom.
    assert!(proof.uses.is_empty());
    assert!(proof.complete);
    assert_eq!(proof.text, "Induct on the first summand.");

    let even_mul = registry
        .register_spec(&store, &NodeSpec::new("even_mul"), &options)
        .expect("even_mul registers")
        .clone();
    let proof = even_mul.proof.expect("theorem has a proof");
    assert_eq!(proof.uses.iter().collect::<Vec<_>>(), vec!["even_add"]);
    assert!(!proof.complete);
    assert!(even_mul.statement.complete);
}

#[test]
fn failure_of_one_node_leaves_registry_usable() {
    let store = library();
    let options = BuildOptions::default();
    let mut registry = NodeRegistry::new();

    let err = registry
        .register_spec(&store, &NodeSpec::new("Even").uses("NoSuchThing"), &options)
        .expect_err("unknown override fails the node");
    assert!(matches!(err, KernelError::UnresolvedIdentifier { .. }));
    assert!(registry.is_empty());

    registry
        .register_spec(&store, &NodeSpec::new("even_add"), &options)
        .expect("other nodes still register");
    assert_eq!(registry.len(), 1);
}

#[test]
fn custom_marker_is_honoured() {
    let mut store = library();
    store.insert(Declaration::new("admitAx", DeclKind::Axiom));
    store.insert(
        Declaration::new(
            "pending",
            DeclKind::Theorem {
                value_refs: ["admitAx".to_string()].into_iter().collect(),
            },
        )
        .with_type_refs(["Nat"]),
    );
    let options = BuildOptions {
        incompleteness_marker: "admitAx".into(),
        ..BuildOptions::default()
    };
    let mut registry = NodeRegistry::new();
    let node = registry
        .register_spec(&store, &NodeSpec::new("pending"), &options)
        .expect("pending registers");
    assert!(node.statement.complete);
    assert!(!node.proof.as_ref().expect("proof").complete);
    assert_ne!(options.incompleteness_marker, DEFAULT_INCOMPLETENESS_MARKER);
}
