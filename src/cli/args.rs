//! CLI argument definitions using clap derive

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    calc::CalcArgs, cert::CertCommands, completions::CompletionsArgs, init::InitArgs,
    list::ListCommands, range::RangeCommands,
};

#[derive(Parser)]
#[command(name = "cala")]
#[command(author, version, about = "Calibration uncertainty assistant")]
#[command(long_about = "Computes combined measurement uncertainty for calibration targets from certificate datasheets and CMC range tables.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    /// Project root (default: auto-detect by finding .cala/)
    #[arg(long, global = true)]
    pub project: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new calibration assistant project
    Init(InitArgs),

    /// Certificate details and listings
    #[command(subcommand)]
    Cert(CertCommands),

    /// List models, datasheet groups and nominals
    #[command(subcommand)]
    List(ListCommands),

    /// Inspect CMC range tables
    #[command(subcommand)]
    Range(RangeCommands),

    /// Calculate the combined uncertainty of a target
    Calc(CalcArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Automatically detect based on context (human text for show, tsv for list)
    #[default]
    Auto,
    /// JSON format (for programming)
    Json,
    /// YAML format
    Yaml,
    /// Tab-separated values (for piping)
    Tsv,
    /// CSV format (for spreadsheets)
    Csv,
    /// Markdown tables
    Md,
}

impl OutputFormat {
    /// Parse a format name from configuration; unknown names are ignored
    pub fn from_config(name: &str) -> Option<Self> {
        <Self as ValueEnum>::from_str(name.trim(), true).ok()
    }
}
