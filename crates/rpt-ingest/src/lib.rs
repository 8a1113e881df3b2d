//! Input loading for the monthly report run.
//!
//! - [`load_tables`] reads the month's spreadsheets and standardizes their
//!   columns with [`standardize_columns`].
//! - [`load_definitions`] parses the report catalog.

pub mod definitions;
pub mod error;
pub mod loader;
pub mod reader;
pub mod standardize;

pub use definitions::{load_definitions, parse_definitions};
pub use error::{IngestError, Result};
pub use loader::{SourceFile, TableSet, load_tables};
pub use reader::read_table;
pub use standardize::{AMOUNT_FIELD, DATE_FIELD, standardize_columns};
