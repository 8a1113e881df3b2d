//! Monthly report automation CLI.

use clap::{ColorChoice, Parser};
use rpt_cli::error::{EXIT_FAILURE, EXIT_SUCCESS};
use rpt_cli::logging::{LogConfig, LogFormat, init_logging};
use std::io::{self, IsTerminal};
use tracing::level_filters::LevelFilter;

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command, LogFormatArg, LogLevelArg};
use crate::commands::{run_definitions, run_reports, run_sample};
use crate::summary::{print_catalog, print_summary};

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let log_config = log_config_from_cli(&cli);
    if let Err(error) = init_logging(&log_config) {
        eprintln!("error: failed to initialize logging: {error}");
        std::process::exit(EXIT_FAILURE);
    }
    let exit_code = match cli.command {
        Command::Run(args) => match run_reports(&args) {
            Ok(summary) => {
                print_summary(&summary);
                EXIT_SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error}");
                error.exit_code()
            }
        },
        Command::Definitions(args) => match run_definitions(&args) {
            Ok(catalog) => {
                print_catalog(&catalog);
                EXIT_SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error}");
                error.exit_code()
            }
        },
        Command::Sample(args) => match run_sample(&args) {
            Ok(paths) => {
                for path in paths {
                    println!("{}", path.display());
                }
                EXIT_SUCCESS
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                EXIT_FAILURE
            }
        },
    };
    std::process::exit(exit_code);
}

/// Build logging configuration from CLI flags with consistent precedence.
fn log_config_from_cli(cli: &Cli) -> LogConfig {
    let mut config = LogConfig {
        level_filter: cli.verbosity.tracing_level_filter(),
        ..LogConfig::default()
    };
    config.use_env_filter = !(cli.verbosity.is_present() || cli.log_level.is_some());
    if let Some(level) = cli.log_level {
        config.level_filter = match level {
            LogLevelArg::Error => LevelFilter::ERROR,
            LogLevelArg::Warn => LevelFilter::WARN,
            LogLevelArg::Info => LevelFilter::INFO,
            LogLevelArg::Debug => LevelFilter::DEBUG,
            LogLevelArg::Trace => LevelFilter::TRACE,
        };
    }
    config.format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Compact => LogFormat::Compact,
        LogFormatArg::Json => LogFormat::Json,
    };
    config.log_file = cli.log_file.clone();
    config.with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => cli.log_file.is_none() && io::stderr().is_terminal(),
    };
    config
}
