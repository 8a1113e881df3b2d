//! Shared utilities for the report automation crates.
//!
//! This crate provides the polars value conversions and date handling used
//! by ingestion, report generation and output.

pub mod dates;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use crate::dates::{date_to_epoch_days, epoch_days_to_date, format_date, parse_date};
pub use crate::polars::{
    any_to_epoch_days, any_to_f64, any_to_string, column_values, format_numeric, parse_f64,
};
