use rpt_model::ReferencePeriod;
use rpt_notify::SendOutcome;
use rpt_report::GeneratedReport;

/// Why a report produced no file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The primary table had no rows.
    Empty,
    /// The report failed; the message says why.
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct SkippedReport {
    pub name: String,
    pub reason: SkipReason,
}

/// Reports of one run, in catalog order.
#[derive(Debug, Default)]
pub struct DispatchResult {
    pub produced: Vec<GeneratedReport>,
    pub skipped: Vec<SkippedReport>,
}

impl DispatchResult {
    pub fn failed(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s.reason, SkipReason::Failed(_)))
            .count()
    }
}

/// A report mailed on its own.
#[derive(Debug)]
pub struct IndividualSend {
    pub report: String,
    pub result: Result<SendOutcome, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MailStatus {
    /// Mail was switched off for this run.
    Disabled,
    Finished(SendOutcome),
}

#[derive(Debug)]
pub struct RunSummary {
    pub period: ReferencePeriod,
    pub reports: DispatchResult,
    pub individual: Vec<IndividualSend>,
    pub mail: MailStatus,
}
