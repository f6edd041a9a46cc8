//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Stampost -- log event header enrichment toolkit.
///
/// Use `stampost <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "stampost", version, about, long_about = None)]
pub struct Cli {
    /// Path to the stampost.toml configuration file.
    #[arg(short, long, default_value = "stampost.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage configuration.
    Config(ConfigArgs),

    /// Generate per-host agent configs from an inventory file.
    Generate(GenerateArgs),
}

// ---- config ----

/// Manage stampost configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, generator, stages).
        #[arg(long)]
        section: Option<String>,
    },
}

// ---- generate ----

/// Batch-generate agent configs from a host/path inventory.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Inventory file with `[module] [host] logfile` lines.
    pub inventory: PathBuf,

    /// Template directory (overrides `generator.template_dir` from config).
    #[arg(long)]
    pub template_dir: Option<PathBuf>,

    /// Write the generated config to this file instead of stdout.
    #[arg(short, long)]
    pub output_file: Option<PathBuf>,
}
