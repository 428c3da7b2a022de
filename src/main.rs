//! Harneet grammar toolkit entry point.

mod cli;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Command};
use harneet::check::{check_file, collect_sources};
use harneet::deploy::{DeployConfig, deploy};
use harneet::diagnostics::{collect_syntax_errors, print_syntax_error};
use harneet::highlight::Highlighter;
use harneet::{HarneetResult, SourceDocument};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("HARNEET_LOG")
                .unwrap_or_else(|_| EnvFilter::new(&cli.log_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Command::Parse { file, quiet } => parse_file(&file, quiet),
        Command::Check {
            paths,
            ext,
            max_error_ratio,
        } => check_paths(&paths, &ext, max_error_ratio),
        Command::Highlight { file } => highlight_file(&file),
        Command::Deploy {
            helix_path,
            grammar_dir,
            skip_build,
        } => deploy_grammar(DeployConfig {
            grammar_dir,
            helix_path,
            skip_build,
        }),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns `Ok(false)` when the file has syntax errors.
fn parse_file(path: &Path, quiet: bool) -> HarneetResult<bool> {
    let doc = SourceDocument::from_path(path)?;
    let source = doc.text().to_string();
    let root = doc.tree().root_node();

    if !quiet {
        println!("{}", root.to_sexp());
    }

    let errors = collect_syntax_errors(doc.tree(), &source);
    let file_name = path.display().to_string();
    for error in &errors {
        print_syntax_error(error, &source, &file_name);
    }
    Ok(errors.is_empty())
}

fn check_paths(paths: &[PathBuf], ext: &str, max_error_ratio: f64) -> HarneetResult<bool> {
    let files = collect_sources(paths, ext)?;
    let mut failed = 0usize;

    for file in &files {
        let report = check_file(file)?;
        if report.passes(max_error_ratio) {
            tracing::info!(path = %file.display(), "ok");
            continue;
        }

        failed += 1;
        let file_name = file.display().to_string();
        for error in &report.errors {
            print_syntax_error(error, &report.source, &file_name);
        }
        eprintln!(
            "{}: {} syntax error(s), error ratio {:.4}",
            file_name,
            report.errors.len(),
            report.error_ratio
        );
    }

    println!("Checked {} file(s), {} with errors", files.len(), failed);
    Ok(failed == 0)
}

fn highlight_file(path: &Path) -> HarneetResult<bool> {
    let doc = SourceDocument::from_path(path)?;
    let source = doc.text().to_string();
    let highlighter = Highlighter::new()?;

    for span in highlighter.highlight(doc.tree(), &source) {
        println!(
            "{}:{}-{}:{} {} {:?}",
            span.start.row + 1,
            span.start.column + 1,
            span.end.row + 1,
            span.end.column + 1,
            span.capture,
            &source[span.range.clone()],
        );
    }
    Ok(true)
}

fn deploy_grammar(config: DeployConfig) -> HarneetResult<bool> {
    let report = deploy(&config)?;

    println!("Deployed to {}", report.helix_path.display());
    println!("  grammar: {}", report.grammar_library.display());
    for query in &report.queries {
        println!("  query:   {}", query.display());
    }
    if !report.language_configured {
        println!("Harneet is not configured in languages.toml; add a [[language]] entry for it.");
    }
    println!("Restart Helix to apply the changes.");
    Ok(true)
}
