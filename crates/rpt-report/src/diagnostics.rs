//! Per-report record of skipped steps.

use tracing::{debug, warn};

/// Collects the warnings of one report while logging them.
#[derive(Debug)]
pub(crate) struct Diagnostics {
    report: String,
    warnings: Vec<String>,
}

impl Diagnostics {
    pub(crate) fn new(report: &str) -> Self {
        Self {
            report: report.to_string(),
            warnings: Vec::new(),
        }
    }

    pub(crate) fn warn(&mut self, message: String) {
        warn!(report = %self.report, "{message}");
        self.warnings.push(message);
    }

    pub(crate) fn debug(&self, message: &str) {
        debug!(report = %self.report, "{message}");
    }

    #[cfg(test)]
    pub(crate) fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub(crate) fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}
