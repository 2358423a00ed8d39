//! Command definitions and argument parsing.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

/// Track job applications found in your mailbox in a spreadsheet.
#[derive(Debug, Parser)]
#[command(name = "jobtrack")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (JSON or YAML)
    #[arg(short, long, global = true, env = "JOBTRACK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log as JSON lines instead of compact text
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search mail and write the application table
    Run(RunArgs),

    /// Print the rows of an existing table
    Show(ShowArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// First day to search (YYYY-MM-DD)
    #[arg(long)]
    pub since: NaiveDate,

    /// Day after the last day to search (YYYY-MM-DD); defaults to tomorrow
    #[arg(long)]
    pub until: Option<NaiveDate>,

    /// Output file; overrides output.path
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Merge into the existing table instead of replacing it
    #[arg(long)]
    pub append: bool,

    /// Replace the existing table; overrides output.mode: append
    #[arg(long, conflicts_with = "append")]
    pub overwrite: bool,

    /// Read .eml files from this directory instead of IMAP
    #[arg(long)]
    pub eml_dir: Option<PathBuf>,

    /// Use template summaries only
    #[arg(long)]
    pub no_summary: bool,

    /// Print the run report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Table to read
    pub file: PathBuf,

    /// Sheet name; defaults to output.sheet_name
    #[arg(long)]
    pub sheet: Option<String>,

    /// Print rows as JSON
    #[arg(long)]
    pub json: bool,
}
