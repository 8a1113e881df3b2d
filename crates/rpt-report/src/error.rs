//! Error types for report generation.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a single report.
///
/// Join, aggregation and sort problems never surface here; those steps are
/// skipped with a warning instead.
#[derive(Debug, Error)]
pub enum ReportError {
    // === Definition Errors ===
    /// The definition names no primary source, or one that was not loaded.
    #[error(
        "report '{report}': primary source {} is not available",
        describe_table(.table.as_deref())
    )]
    MissingPrimarySource {
        report: String,
        table: Option<String>,
    },

    /// None of the requested output columns exist.
    #[error("report '{report}': none of the output columns exist ({})", .requested.join(", "))]
    EmptyProjection {
        report: String,
        requested: Vec<String>,
    },

    // === Output Errors ===
    /// Output extension has no writer.
    #[error("unsupported output format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// Failed to create the output directory or file.
    #[error("failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to build or save a workbook.
    #[error("failed to write workbook {path}: {message}")]
    Xlsx { path: PathBuf, message: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

fn describe_table(table: Option<&str>) -> String {
    table.map_or_else(|| "(none declared)".to_string(), |t| format!("'{t}'"))
}

impl ReportError {
    /// True for errors caused by the definition rather than by output.
    pub fn is_definition_error(&self) -> bool {
        matches!(
            self,
            Self::MissingPrimarySource { .. } | Self::EmptyProjection { .. }
        )
    }
}

impl From<polars::prelude::PolarsError> for ReportError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, ReportError>;
