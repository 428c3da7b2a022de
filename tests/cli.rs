use std::fs;
use std::process::Command;

fn harneet() -> Command {
    Command::new(env!("CARGO_BIN_EXE_harneet"))
}

#[test]
fn parse_prints_tree_and_succeeds() {
    let output = harneet()
        .args(["parse", "lang-examples/hello.ha"])
        .output()
        .expect("run harneet");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("(source_file (package_declaration"));
}

#[test]
fn parse_fails_on_syntax_errors() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("bad.ha");
    fs::write(&file, "package main\n) ) )\n").unwrap();

    let output = harneet()
        .args(["parse", "--quiet"])
        .arg(&file)
        .output()
        .expect("run harneet");

    assert!(!output.status.success());
    assert!(output.stdout.is_empty());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unexpected"));
}

#[test]
fn parse_reports_missing_brace_at_end_of_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("unclosed.ha");
    fs::write(&file, "function f() {").unwrap();

    let output = harneet()
        .args(["parse", "--quiet"])
        .arg(&file)
        .output()
        .expect("run harneet");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing `}`"), "{stderr}");
    assert!(stderr.contains("unclosed.ha:1:14"), "{stderr}");
}

#[test]
fn check_walks_example_directory() {
    let output = harneet()
        .args(["check", "lang-examples"])
        .output()
        .expect("run harneet");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(
        String::from_utf8_lossy(&output.stdout).trim(),
        "Checked 3 file(s), 0 with errors"
    );
}

#[test]
fn highlight_prints_captures() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.ha");
    fs::write(&file, "function main() {}\n").unwrap();

    let output = harneet()
        .arg("highlight")
        .arg(&file)
        .output()
        .expect("run harneet");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("1:1-1:9 keyword.function \"function\""), "{stdout}");
    assert!(stdout.contains("1:10-1:14 function \"main\""), "{stdout}");
}

#[test]
fn deploy_without_helix_path_fails() {
    let grammar = tempfile::tempdir().unwrap();
    fs::write(grammar.path().join("grammar.js"), "").unwrap();

    let output = harneet()
        .args(["deploy", "--skip-build", "--grammar-dir"])
        .arg(grammar.path())
        .env_remove("HARNEET_GRAMMAR_DIR")
        .output()
        .expect("run harneet");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Resolving the Helix path failed"));
}
