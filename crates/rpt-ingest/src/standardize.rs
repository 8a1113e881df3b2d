//! Column standardization.
//!
//! Renames vendor headers to canonical field names using an [`AliasTable`],
//! then types the two canonical fields the reports compute on: `amount`
//! becomes Float64 and `date` becomes a polars Date. Rows whose value cannot
//! be typed are dropped.

use polars::prelude::*;
use rpt_common::{any_to_epoch_days, any_to_f64, column_values};
use rpt_model::AliasTable;
use tracing::{debug, warn};

use crate::error::{IngestError, Result};

/// Canonical field coerced to Float64.
pub const AMOUNT_FIELD: &str = "amount";
/// Canonical field coerced to Date.
pub const DATE_FIELD: &str = "date";

fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Finds the column matching the first alias that is present.
fn resolve_alias(df: &DataFrame, aliases: &[String]) -> Option<String> {
    let columns: Vec<(String, String)> = df
        .get_column_names()
        .iter()
        .map(|name| (normalize_header(name), name.to_string()))
        .collect();
    aliases.iter().find_map(|alias| {
        let wanted = normalize_header(alias);
        columns
            .iter()
            .find(|(normalized, _)| *normalized == wanted)
            .map(|(_, original)| original.clone())
    })
}

/// Renames alias columns to canonical names and types `amount` and `date`.
///
/// Fails with [`IngestError::MissingColumn`] when a canonical field has no
/// matching column, and with [`IngestError::ConflictingColumn`] when the
/// matched alias would collide with a column already named after the field.
/// Columns outside the alias table are kept as they are.
pub fn standardize_columns(
    mut df: DataFrame,
    aliases: &AliasTable,
    table_label: &str,
) -> Result<DataFrame> {
    for (canonical, candidates) in aliases.iter() {
        let Some(found) = resolve_alias(&df, candidates) else {
            return Err(IngestError::MissingColumn {
                table: table_label.to_string(),
                field: canonical.to_string(),
                aliases: candidates.to_vec(),
            });
        };
        if found != canonical {
            if df.get_column_index(canonical).is_some() {
                return Err(IngestError::ConflictingColumn {
                    table: table_label.to_string(),
                    field: canonical.to_string(),
                    column: found,
                });
            }
            df.rename(&found, canonical.into())?;
        }
        debug!(
            table = table_label,
            field = canonical,
            column = %found,
            "mapped column"
        );
    }

    if aliases.contains(AMOUNT_FIELD) {
        df = coerce_amount(df, table_label)?;
    }
    if aliases.contains(DATE_FIELD) {
        df = coerce_date(df, table_label)?;
    }
    Ok(df)
}

fn coerce_amount(mut df: DataFrame, table_label: &str) -> Result<DataFrame> {
    let values = column_values(df.column(AMOUNT_FIELD)?, any_to_f64)?;
    let keep: Vec<bool> = values.iter().map(Option::is_some).collect();
    df.with_column(Series::new(AMOUNT_FIELD.into(), values))?;
    drop_failed_rows(df, &keep, table_label, AMOUNT_FIELD)
}

fn coerce_date(mut df: DataFrame, table_label: &str) -> Result<DataFrame> {
    let values = column_values(df.column(DATE_FIELD)?, any_to_epoch_days)?;
    let keep: Vec<bool> = values.iter().map(Option::is_some).collect();
    let dates = Series::new(DATE_FIELD.into(), values).cast(&DataType::Date)?;
    df.with_column(dates)?;
    drop_failed_rows(df, &keep, table_label, DATE_FIELD)
}

fn drop_failed_rows(
    df: DataFrame,
    keep: &[bool],
    table_label: &str,
    field: &str,
) -> Result<DataFrame> {
    let dropped = keep.iter().filter(|k| !**k).count();
    if dropped == 0 {
        debug!(table = table_label, field, "typed column");
        return Ok(df);
    }
    warn!(
        table = table_label,
        field,
        dropped,
        "dropped rows whose value could not be converted"
    );
    let mask = BooleanChunked::from_slice("keep".into(), keep);
    Ok(df.filter(&mask)?)
}
