//! Deployment of the grammar library and queries into a Helix checkout.
//!
//! Helix loads grammars from `runtime/grammars/<name>.so` and queries from
//! `runtime/queries/<name>/*.scm`. The checkout path is remembered in a
//! `.helix_path` file next to the grammar so later runs can omit it.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tree_sitter_harneet::GRAMMAR_NAME;

use crate::error::{DeployStep, HarneetError, HarneetResult};

const HELIX_PATH_FILE: &str = ".helix_path";
const LIBRARY_EXTENSIONS: [&str; 2] = ["so", "dylib"];

#[derive(Clone, Debug)]
pub struct DeployConfig {
    /// Directory containing `grammar.js`, `src/` and `queries/`.
    pub grammar_dir: PathBuf,
    /// Helix checkout; falls back to the saved path when `None`.
    pub helix_path: Option<PathBuf>,
    /// Skip `tree-sitter generate` / `tree-sitter build` and deploy the
    /// library that is already present.
    pub skip_build: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeployReport {
    pub helix_path: PathBuf,
    pub grammar_library: PathBuf,
    pub queries: Vec<PathBuf>,
    /// Whether `languages.toml` mentions the language.
    pub language_configured: bool,
}

pub fn deploy(config: &DeployConfig) -> HarneetResult<DeployReport> {
    let grammar_dir = &config.grammar_dir;
    if !grammar_dir.join("grammar.js").exists() {
        return Err(HarneetError::deploy(
            DeployStep::ResolvePath,
            format!("grammar.js not found in {}", grammar_dir.display()),
        ));
    }

    let helix_path = resolve_helix_path(grammar_dir, config.helix_path.as_deref())?;
    tracing::info!(helix = %helix_path.display(), "Deploying to Helix");

    if config.skip_build {
        tracing::info!("Skipping parser generation and build");
    } else {
        clean_build_artifacts(grammar_dir)?;
        run_tree_sitter(grammar_dir, "generate", DeployStep::Generate)?;
        run_tree_sitter(grammar_dir, "build", DeployStep::Build)?;
    }

    let grammar_library = copy_grammar(grammar_dir, &helix_path)?;
    let queries = copy_queries(grammar_dir, &helix_path)?;
    let language_configured = check_languages_config(&helix_path);

    Ok(DeployReport {
        helix_path,
        grammar_library,
        queries,
        language_configured,
    })
}

/// Pick the Helix checkout: an explicit path wins and is saved; otherwise the
/// previously saved path is used.
pub fn resolve_helix_path(grammar_dir: &Path, explicit: Option<&Path>) -> HarneetResult<PathBuf> {
    if let Some(path) = explicit {
        let path = absolute(path)?;
        validate_helix_path(&path)?;
        save_helix_path(grammar_dir, &path)?;
        return Ok(path);
    }

    match load_saved_helix_path(grammar_dir)? {
        Some(path) => {
            tracing::info!(path = %path.display(), "Using saved Helix path");
            validate_helix_path(&path)?;
            Ok(path)
        }
        None => Err(HarneetError::deploy(
            DeployStep::ResolvePath,
            format!(
                "no Helix path given and none saved in {}",
                grammar_dir.join(HELIX_PATH_FILE).display()
            ),
        )),
    }
}

pub fn validate_helix_path(path: &Path) -> HarneetResult<()> {
    let fail = |msg: String| Err(HarneetError::deploy(DeployStep::Validate, msg));
    if !path.exists() {
        return fail(format!("path does not exist: {}", path.display()));
    }
    if !path.join("runtime").is_dir() {
        return fail(format!(
            "not a Helix checkout, missing 'runtime' directory: {}",
            path.display()
        ));
    }
    if !path.join("languages.toml").is_file() {
        return fail(format!(
            "not a Helix checkout, missing 'languages.toml': {}",
            path.display()
        ));
    }
    tracing::debug!(path = %path.display(), "Valid Helix checkout");
    Ok(())
}

pub fn load_saved_helix_path(grammar_dir: &Path) -> HarneetResult<Option<PathBuf>> {
    let file = grammar_dir.join(HELIX_PATH_FILE);
    match fs::read_to_string(&file) {
        Ok(contents) => {
            let trimmed = contents.trim();
            if trimmed.is_empty() {
                return Ok(None);
            }
            absolute(Path::new(trimmed)).map(Some)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(HarneetError::io(file, e)),
    }
}

pub fn save_helix_path(grammar_dir: &Path, helix_path: &Path) -> HarneetResult<()> {
    let file = grammar_dir.join(HELIX_PATH_FILE);
    fs::write(&file, helix_path.to_string_lossy().as_bytes())
        .map_err(|e| HarneetError::io(&file, e))?;
    tracing::info!(file = %file.display(), "Saved Helix path");
    Ok(())
}

/// Expand a leading `~` and make `path` absolute against the working
/// directory.
fn absolute(path: &Path) -> HarneetResult<PathBuf> {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    let expanded = expand_home(path, home.as_deref());
    std::path::absolute(&expanded).map_err(|e| HarneetError::io(path, e))
}

fn expand_home(path: &Path, home: Option<&Path>) -> PathBuf {
    let (Some(home), Ok(rest)) = (home, path.strip_prefix("~")) else {
        return path.to_path_buf();
    };
    home.join(rest)
}

/// Remove outputs of a previous build so the next one starts fresh.
pub fn clean_build_artifacts(grammar_dir: &Path) -> HarneetResult<Vec<PathBuf>> {
    let mut artifacts: Vec<PathBuf> = LIBRARY_EXTENSIONS
        .iter()
        .map(|ext| grammar_dir.join(format!("{GRAMMAR_NAME}.{ext}")))
        .collect();
    // grammar.json stays: it is rewritten by `tree-sitter generate` and the
    // crate build falls back to it when parser.c is absent.
    artifacts.push(grammar_dir.join("src").join("parser.c"));

    let mut removed = Vec::new();
    for artifact in artifacts {
        match fs::remove_file(&artifact) {
            Ok(()) => {
                tracing::debug!(path = %artifact.display(), "Removed build artifact");
                removed.push(artifact);
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(HarneetError::deploy(
                    DeployStep::Clean,
                    format!("{}: {e}", artifact.display()),
                ));
            }
        }
    }
    Ok(removed)
}

fn run_tree_sitter(grammar_dir: &Path, subcommand: &str, step: DeployStep) -> HarneetResult<()> {
    tracing::info!(subcommand, "Running tree-sitter");
    let output = Command::new("tree-sitter")
        .arg(subcommand)
        .current_dir(grammar_dir)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| {
            HarneetError::deploy(
                step,
                format!(
                    "could not run `tree-sitter {subcommand}`: {e} \
                     (install it with `npm install -g tree-sitter-cli`)"
                ),
            )
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(HarneetError::deploy(
            step,
            format!("`tree-sitter {subcommand}` exited with {}: {}", output.status, stderr.trim()),
        ));
    }
    Ok(())
}

/// Locate the built shared library, preferring `.so`.
pub fn find_grammar_library(grammar_dir: &Path) -> Option<PathBuf> {
    LIBRARY_EXTENSIONS
        .iter()
        .map(|ext| grammar_dir.join(format!("{GRAMMAR_NAME}.{ext}")))
        .find(|path| path.is_file())
}

/// Copy the grammar library into `runtime/grammars`. Helix always expects a
/// `.so` name, whatever the platform produced.
pub fn copy_grammar(grammar_dir: &Path, helix_path: &Path) -> HarneetResult<PathBuf> {
    let library = find_grammar_library(grammar_dir).ok_or_else(|| {
        HarneetError::deploy(
            DeployStep::CopyGrammar,
            format!(
                "no {GRAMMAR_NAME}.so or {GRAMMAR_NAME}.dylib in {}",
                grammar_dir.display()
            ),
        )
    })?;

    let dest_dir = helix_path.join("runtime").join("grammars");
    let dest = dest_dir.join(format!("{GRAMMAR_NAME}.so"));
    fs::create_dir_all(&dest_dir)
        .and_then(|()| fs::copy(&library, &dest))
        .map_err(|e| {
            HarneetError::deploy(DeployStep::CopyGrammar, format!("{}: {e}", dest.display()))
        })?;

    tracing::info!(from = %library.display(), to = %dest.display(), "Copied grammar library");
    Ok(dest)
}

/// Copy every `queries/*.scm` into `runtime/queries/<name>/`.
pub fn copy_queries(grammar_dir: &Path, helix_path: &Path) -> HarneetResult<Vec<PathBuf>> {
    let step_err = |msg: String| HarneetError::deploy(DeployStep::CopyQueries, msg);

    let queries_src = grammar_dir.join("queries");
    if !queries_src.is_dir() {
        return Err(step_err(format!(
            "queries directory not found: {}",
            queries_src.display()
        )));
    }

    let mut query_files = Vec::new();
    let entries =
        fs::read_dir(&queries_src).map_err(|e| step_err(format!("{}: {e}", queries_src.display())))?;
    for entry in entries {
        let path = entry
            .map_err(|e| step_err(format!("{}: {e}", queries_src.display())))?
            .path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "scm") {
            query_files.push(path);
        }
    }
    query_files.sort();

    if query_files.is_empty() {
        tracing::warn!(dir = %queries_src.display(), "No .scm query files found");
        return Ok(Vec::new());
    }

    let dest_dir = helix_path.join("runtime").join("queries").join(GRAMMAR_NAME);
    fs::create_dir_all(&dest_dir).map_err(|e| step_err(format!("{}: {e}", dest_dir.display())))?;

    let mut copied = Vec::with_capacity(query_files.len());
    for file in query_files {
        let Some(name) = file.file_name() else {
            continue;
        };
        let dest = dest_dir.join(name);
        fs::copy(&file, &dest).map_err(|e| step_err(format!("{}: {e}", dest.display())))?;
        tracing::debug!(query = %dest.display(), "Copied query");
        copied.push(dest);
    }
    tracing::info!(count = copied.len(), "Copied query files");
    Ok(copied)
}

/// Whether Helix's `languages.toml` declares the language. A missing entry is
/// not an error; the user may configure it by hand.
pub fn check_languages_config(helix_path: &Path) -> bool {
    let languages_toml = helix_path.join("languages.toml");
    match fs::read_to_string(&languages_toml) {
        Ok(content) => {
            let configured = content.contains(&format!("name = \"{GRAMMAR_NAME}\""));
            if configured {
                tracing::info!("Harneet is configured in languages.toml");
            } else {
                tracing::warn!(
                    "Harneet not found in languages.toml; see https://docs.helix-editor.com/languages.html"
                );
            }
            configured
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not read languages.toml");
            false
        }
    }
}
