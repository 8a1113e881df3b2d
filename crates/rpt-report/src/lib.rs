//! Report generation from declarative definitions.
//!
//! [`generate_report`] turns one [`rpt_model::ReportDefinition`] and the
//! loaded tables into a spreadsheet file. [`write_table`] is also used on its
//! own to write sample input data.

mod aggregate;
mod diagnostics;
pub mod error;
pub mod generator;
mod join;
pub mod writer;

pub use error::{ReportError, Result};
pub use generator::{GeneratedReport, ReportOutcome, generate_report};
pub use writer::{OUTPUT_EXTENSIONS, ensure_parent_dir, write_table};
