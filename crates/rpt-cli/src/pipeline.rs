//! The monthly run: load, generate every report, mail the results.

use std::fs;
use std::path::Path;

use rpt_ingest::{TableSet, load_definitions, load_tables};
use rpt_model::{ReferencePeriod, ReportCatalog, normalize_report_name};
use rpt_notify::{Notifier, NotifyError, SendOutcome, SendRequest};
use rpt_report::{GeneratedReport, ReportOutcome, generate_report};
use tracing::{error, info, info_span, warn};

use crate::config::{AppConfig, MailConfig};
use crate::error::{Result, RunError};
use crate::types::{
    DispatchResult, IndividualSend, MailStatus, RunSummary, SkipReason, SkippedReport,
};

/// `<normalized name>_<YYYY>_<MM>.<extension>`.
pub fn report_file_name(name: &str, period: ReferencePeriod, extension: &str) -> String {
    period.file_name(&normalize_report_name(name), extension)
}

/// Generates every report of the catalog in order.
///
/// A report that fails is logged and recorded; the next one still runs.
pub fn dispatch_reports(
    tables: &TableSet,
    catalog: &ReportCatalog,
    period: ReferencePeriod,
    output_dir: &Path,
    extension: &str,
) -> DispatchResult {
    let mut result = DispatchResult::default();

    for (name, definition) in catalog.iter() {
        let span = info_span!("report", report = name);
        let _guard = span.enter();

        let path = output_dir.join(report_file_name(name, period, extension));
        match generate_report(tables, name, definition, &path) {
            Ok(ReportOutcome::Written(report)) => result.produced.push(report),
            Ok(ReportOutcome::Empty) => {
                warn!("report skipped, no data");
                result.skipped.push(SkippedReport {
                    name: name.to_string(),
                    reason: SkipReason::Empty,
                });
            }
            Err(err) => {
                error!(error = %err, "report failed");
                result.skipped.push(SkippedReport {
                    name: name.to_string(),
                    reason: SkipReason::Failed(err.to_string()),
                });
            }
        }
    }

    info!(
        produced = result.produced.len(),
        skipped = result.skipped.len(),
        "reports dispatched"
    );
    result
}

/// Mails each report whose definition asks for it, alone.
///
/// Failures are logged and returned; they never stop the batch.
pub fn send_individual_reports(
    notifier: &Notifier,
    catalog: &ReportCatalog,
    produced: &[GeneratedReport],
    mail: &MailConfig,
    period: ReferencePeriod,
) -> Vec<IndividualSend> {
    let mut sends = Vec::new();
    for report in produced {
        let Some(overrides) = catalog
            .get(&report.name)
            .filter(|definition| definition.sends_individually())
            .and_then(|definition| definition.email.as_ref())
        else {
            continue;
        };

        // An empty override list falls back to the global recipients.
        let request = SendRequest {
            recipients: overrides
                .recipients
                .clone()
                .filter(|recipients| !recipients.is_empty())
                .unwrap_or_else(|| mail.recipients.clone()),
            subject: overrides
                .subject
                .clone()
                .unwrap_or_else(|| mail.subject.clone()),
            body: overrides.body.clone().unwrap_or_else(|| mail.body.clone()),
            attachments: vec![report.path.clone()],
            period,
        };
        let result = notifier.send(&request).map_err(|err| {
            error!(report = %report.name, error = %err, "individual mail failed");
            err.to_string()
        });
        sends.push(IndividualSend {
            report: report.name.clone(),
            result,
        });
    }
    sends
}

/// Mails every produced report in one message to the global recipients.
pub fn send_consolidated(
    notifier: &Notifier,
    produced: &[GeneratedReport],
    mail: &MailConfig,
    period: ReferencePeriod,
) -> std::result::Result<SendOutcome, NotifyError> {
    notifier.send(&SendRequest {
        recipients: mail.recipients.clone(),
        subject: mail.subject.clone(),
        body: mail.body.clone(),
        attachments: produced.iter().map(|r| r.path.clone()).collect(),
        period,
    })
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| RunError::CreateDir {
        path: path.to_path_buf(),
        source,
    })
}

/// Runs one month end to end. Without a notifier nothing is mailed.
pub fn run_monthly(
    config: &AppConfig,
    period: ReferencePeriod,
    notifier: Option<&Notifier>,
) -> Result<RunSummary> {
    let span = info_span!("run", period = %period);
    let _guard = span.enter();

    // =========================================================================
    // Stage 0: Directories
    // =========================================================================
    create_dir(&config.paths.input_dir)?;
    create_dir(&config.paths.output_dir)?;

    // =========================================================================
    // Stage 1: Definitions and input tables
    // =========================================================================
    let catalog = load_definitions(&config.paths.definitions)?;
    if catalog.is_empty() {
        warn!(path = %config.paths.definitions.display(), "no report definitions");
    }
    let sources = config.source_files(period);
    let tables = load_tables(&sources, &config.files.primary_source)?;

    // =========================================================================
    // Stage 2: Reports
    // =========================================================================
    let reports = dispatch_reports(
        &tables,
        &catalog,
        period,
        &config.paths.output_dir,
        &config.files.output_extension,
    );

    // =========================================================================
    // Stage 3: Mail
    // =========================================================================
    let (individual, mail) = match notifier {
        Some(notifier) => {
            let individual = send_individual_reports(
                notifier,
                &catalog,
                &reports.produced,
                &config.mail,
                period,
            );
            let outcome = send_consolidated(notifier, &reports.produced, &config.mail, period)?;
            (individual, MailStatus::Finished(outcome))
        }
        None => {
            info!("mail disabled");
            (Vec::new(), MailStatus::Disabled)
        }
    };

    Ok(RunSummary {
        period,
        reports,
        individual,
        mail,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_file_name() {
        let period = ReferencePeriod::new(2025, 6).unwrap();
        assert_eq!(
            report_file_name("Sales By Segment", period, "xlsx"),
            "sales_by_segment_2025_06.xlsx"
        );
        assert_eq!(
            report_file_name("daily_detail", period, ".csv"),
            "daily_detail_2025_06.csv"
        );
    }
}
