use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::Context;
use rpt_cli::config::AppConfig;
use rpt_cli::error::{Result, RunError};
use rpt_cli::period::resolve_period;
use rpt_cli::pipeline::run_monthly;
use rpt_cli::sample::{SampleOptions, generate_sample, write_sample};
use rpt_cli::types::RunSummary;
use rpt_ingest::load_definitions;
use rpt_model::ReportCatalog;
use rpt_notify::{Notifier, SmtpRelay};
use tracing::debug;

use crate::cli::{DefinitionsArgs, PeriodArgs, RunArgs, SampleArgs};

fn load_config(path: Option<&PathBuf>) -> Result<AppConfig> {
    let mut config = AppConfig::load(path.map(PathBuf::as_path))?;
    config.apply_env()?;
    Ok(config)
}

fn period_from(args: PeriodArgs) -> Result<rpt_model::ReferencePeriod> {
    let interactive = io::stdin().is_terminal();
    resolve_period(args.year, args.month, interactive).map_err(RunError::Prompt)
}

pub fn run_reports(args: &RunArgs) -> Result<RunSummary> {
    let mut config = load_config(args.config.as_ref())?;
    if let Some(path) = &args.definitions {
        config.paths.definitions = path.clone();
    }
    if let Some(dir) = &args.input_dir {
        config.paths.input_dir = dir.clone();
    }
    if let Some(dir) = &args.output_dir {
        config.paths.output_dir = dir.clone();
    }

    let period = period_from(args.period)?;

    let notifier = if args.no_email {
        None
    } else {
        let relay = SmtpRelay::new(
            &config.mail.smtp_host,
            config.mail.smtp_port,
            &config.mail.sender,
            &config.mail.password,
        )?;
        debug!(
            host = %config.mail.smtp_host,
            port = config.mail.smtp_port,
            "smtp relay configured"
        );
        Some(Notifier::new(config.mail_settings(), Box::new(relay)))
    };

    run_monthly(&config, period, notifier.as_ref())
}

pub fn run_definitions(args: &DefinitionsArgs) -> Result<ReportCatalog> {
    let config = load_config(args.config.as_ref())?;
    let path = args
        .definitions
        .clone()
        .unwrap_or_else(|| config.paths.definitions.clone());
    Ok(load_definitions(&path)?)
}

pub fn run_sample(args: &SampleArgs) -> anyhow::Result<Vec<PathBuf>> {
    let config = load_config(args.config.as_ref()).context("load configuration")?;
    let period = period_from(args.period).context("choose period")?;
    let dir = args
        .input_dir
        .clone()
        .unwrap_or_else(|| config.paths.input_dir.clone());

    let data = generate_sample(&SampleOptions {
        period,
        transactions: args.transactions,
        customers: args.customers,
        seed: args.seed,
    })
    .context("generate sample data")?;
    write_sample(&data, &dir, period, &config.files.input_extension).context("write sample data")
}
