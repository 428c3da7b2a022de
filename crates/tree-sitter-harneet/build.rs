use std::env;
use std::fs;
use std::path::{Path, PathBuf};

fn main() {
    println!("cargo:rerun-if-changed=grammar.js");
    println!("cargo:rerun-if-changed=src/grammar.json");
    println!("cargo:rerun-if-changed=src/parser.c");
    println!("cargo:rerun-if-changed=build.rs");

    let src_dir: PathBuf = ["src"].iter().collect();

    // A parser.c produced by `tree-sitter generate` takes priority. Without one,
    // the tables are generated from grammar.json so that no Node.js or
    // tree-sitter CLI is needed at build time.
    let committed = src_dir.join("parser.c");
    let (include_dir, parser_c) = if committed.exists() {
        (src_dir.clone(), committed)
    } else {
        let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
        generate_parser(&src_dir.join("grammar.json"), &out_dir)
    };

    let mut build = cc::Build::new();
    build.include(&include_dir);
    build.file(&parser_c);
    build.flag_if_supported("-std=c11");
    build.flag_if_supported("-Wno-unused-parameter");
    build.warnings(false);

    let scanner_path = src_dir.join("scanner.c");
    if scanner_path.exists() {
        println!("cargo:rerun-if-changed={}", scanner_path.display());
        build.include(&src_dir);
        build.file(&scanner_path);
    }

    build.compile("tree-sitter-harneet");
}

fn generate_parser(grammar_path: &Path, out_dir: &Path) -> (PathBuf, PathBuf) {
    let grammar_json = fs::read_to_string(grammar_path)
        .unwrap_or_else(|e| panic!("failed to read {}: {e}", grammar_path.display()));

    // ABI 15 parsers embed the grammar's semantic version; use the crate's.
    let semantic_version = (
        env!("CARGO_PKG_VERSION_MAJOR").parse().unwrap(),
        env!("CARGO_PKG_VERSION_MINOR").parse().unwrap(),
        env!("CARGO_PKG_VERSION_PATCH").parse().unwrap(),
    );
    let (name, c_code) =
        tree_sitter_generate::generate_parser_for_grammar(&grammar_json, Some(semantic_version))
        .unwrap_or_else(|e| panic!("failed to generate parser from grammar.json: {e}"));
    assert_eq!(name, "harneet", "grammar.json declares an unexpected grammar name");

    let header_dir = out_dir.join("tree_sitter");
    fs::create_dir_all(&header_dir).expect("failed to create tree_sitter header directory");
    fs::write(header_dir.join("parser.h"), tree_sitter::PARSER_HEADER)
        .expect("failed to write tree_sitter/parser.h");

    let parser_c = out_dir.join("parser.c");
    fs::write(&parser_c, c_code).expect("failed to write generated parser.c");

    (out_dir.to_path_buf(), parser_c)
}
