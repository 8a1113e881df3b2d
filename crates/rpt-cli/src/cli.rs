//! CLI argument definitions for the report runner.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "rpt",
    version,
    about = "Monthly report automation - build spreadsheet reports and mail them",
    long_about = "Build the month's management reports from exported spreadsheets.\n\n\
                  Reads the transactional and customer exports, applies the report\n\
                  definitions (joins, aggregations, projections, sorting) and mails\n\
                  the resulting workbooks."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate the month's reports and mail them.
    Run(RunArgs),

    /// List the configured report definitions.
    Definitions(DefinitionsArgs),

    /// Write synthetic input spreadsheets for a month.
    Sample(SampleArgs),
}

/// Reference month flags; both or neither.
#[derive(Args, Clone, Copy)]
pub struct PeriodArgs {
    /// Year of the reference month.
    #[arg(long, requires = "month")]
    pub year: Option<i32>,

    /// Month number (1-12).
    #[arg(long, requires = "year", value_parser = clap::value_parser!(u32).range(1..=12))]
    pub month: Option<u32>,
}

#[derive(Parser)]
pub struct RunArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Configuration file (default: reports.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Generate reports without sending any mail.
    #[arg(long = "no-email")]
    pub no_email: bool,

    /// Report definitions file (overrides the configuration).
    #[arg(long, value_name = "PATH")]
    pub definitions: Option<PathBuf>,

    /// Directory holding the month's input spreadsheets.
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,

    /// Directory receiving the generated reports.
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,
}

#[derive(Parser)]
pub struct DefinitionsArgs {
    /// Configuration file (default: reports.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report definitions file (overrides the configuration).
    #[arg(long, value_name = "PATH")]
    pub definitions: Option<PathBuf>,
}

#[derive(Parser)]
pub struct SampleArgs {
    #[command(flatten)]
    pub period: PeriodArgs,

    /// Number of transactions to generate.
    #[arg(long, default_value_t = 100)]
    pub transactions: usize,

    /// Number of customers to generate.
    #[arg(long, default_value_t = 10)]
    pub customers: usize,

    /// Seed for reproducible data.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Configuration file (default: reports.toml when present).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Directory to write the spreadsheets to (overrides the configuration).
    #[arg(long = "input-dir", value_name = "DIR")]
    pub input_dir: Option<PathBuf>,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
