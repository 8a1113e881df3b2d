//! Library side of the `rpt` binary: configuration, logging and the monthly
//! run.

pub mod config;
pub mod error;
pub mod logging;
pub mod period;
pub mod pipeline;
pub mod sample;
pub mod types;

pub use config::AppConfig;
pub use error::{Result, RunError};
pub use pipeline::{dispatch_reports, report_file_name, run_monthly};
pub use types::{DispatchResult, MailStatus, RunSummary, SkipReason, SkippedReport};
