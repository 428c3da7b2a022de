//! Command-line interface for the Harneet grammar toolkit.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use harneet::check::DEFAULT_EXTENSION;

#[derive(Parser)]
#[command(name = "harneet")]
#[command(about = "Parse, check and deploy the Harneet tree-sitter grammar", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log filter used when HARNEET_LOG is not set (e.g. `info`, `harneet=debug`)
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Parse a file and print its syntax tree
    Parse {
        file: PathBuf,
        /// Only report syntax errors
        #[arg(short, long)]
        quiet: bool,
    },
    /// Check files or directories for syntax errors
    Check {
        #[arg(required = true)]
        paths: Vec<PathBuf>,
        /// Extension of source files searched in directories
        #[arg(long, default_value = DEFAULT_EXTENSION)]
        ext: String,
        /// Accept files whose share of ERROR nodes is at most this value
        #[arg(long, default_value_t = 0.0)]
        max_error_ratio: f64,
    },
    /// Print the highlight captures of a file
    Highlight { file: PathBuf },
    /// Install the grammar library and queries into a Helix checkout
    Deploy {
        /// Helix checkout; defaults to the path saved by a previous run
        helix_path: Option<PathBuf>,
        /// Directory of the tree-sitter-harneet grammar
        #[arg(long, env = "HARNEET_GRAMMAR_DIR", default_value = "crates/tree-sitter-harneet")]
        grammar_dir: PathBuf,
        /// Deploy the existing library without regenerating or rebuilding it
        #[arg(long)]
        skip_build: bool,
    },
}
