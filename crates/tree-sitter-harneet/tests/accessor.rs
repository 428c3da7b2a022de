use std::collections::HashSet;
use std::thread;

#[test]
fn accessor_returns_the_same_descriptor_on_every_call() {
    let first = tree_sitter_harneet::raw_language();
    let second = tree_sitter_harneet::raw_language();
    assert_eq!(first, second);
}

#[test]
fn accessor_never_returns_null() {
    assert!(!tree_sitter_harneet::raw_language().is_null());
}

#[test]
fn concurrent_callers_observe_one_descriptor() {
    let handles: Vec<_> = (0..8)
        .map(|_| {
            thread::spawn(|| {
                (0..100)
                    .map(|_| tree_sitter_harneet::raw_language() as usize)
                    .collect::<HashSet<_>>()
            })
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        seen.extend(handle.join().expect("accessor thread panicked"));
    }
    assert_eq!(seen.len(), 1);
    assert!(seen.contains(&(tree_sitter_harneet::raw_language() as usize)));
}

#[test]
fn calling_the_accessor_does_not_disturb_parsing() {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_harneet::LANGUAGE.into())
        .expect("load harneet language");

    let source = "var x = 1 + 2";
    let before = parser.parse(source, None).expect("parse").root_node().to_sexp();
    for _ in 0..32 {
        tree_sitter_harneet::raw_language();
    }
    let after = parser.parse(source, None).expect("parse").root_node().to_sexp();
    assert_eq!(before, after);
}

#[test]
fn host_runtime_accepts_the_descriptor() {
    let language: tree_sitter::Language = tree_sitter_harneet::LANGUAGE.into();
    let version = language.abi_version();
    assert!(version >= tree_sitter::MIN_COMPATIBLE_LANGUAGE_VERSION);
    assert!(version <= tree_sitter::LANGUAGE_VERSION);

    assert_ne!(language.id_for_node_kind("source_file", true), 0);
    assert_ne!(language.id_for_node_kind("function_declaration", true), 0);
    assert!(language.field_id_for_name("condition").is_some());

    let mut parser = tree_sitter::Parser::new();
    parser.set_language(&language).expect("load harneet language");
    let again: tree_sitter::Language = tree_sitter_harneet::LANGUAGE.into();
    parser.set_language(&again).expect("reload harneet language");
}
