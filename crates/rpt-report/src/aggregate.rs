//! Group/aggregate step.

use polars::prelude::*;
use rpt_model::{AggFunction, AggregationSpec};

use crate::diagnostics::Diagnostics;
use crate::join::has_column;

fn aggregate_expr(source: &str, function: AggFunction, output: &str) -> Expr {
    let source = col(source);
    let expr = match function {
        AggFunction::Sum => source.sum(),
        AggFunction::Mean => source.mean(),
        AggFunction::Median => source.median(),
        AggFunction::Count => source.count(),
        AggFunction::NUnique => source.n_unique(),
        AggFunction::Min => source.min(),
        AggFunction::Max => source.max(),
        AggFunction::First => source.first(),
        AggFunction::Last => source.last(),
    };
    expr.alias(output)
}

/// Builds the expressions of every valid aggregation entry, recording the
/// invalid ones.
fn valid_aggregations(
    df: &DataFrame,
    aggregation: &AggregationSpec,
    diagnostics: &mut Diagnostics,
) -> Vec<Expr> {
    let mut exprs = Vec::with_capacity(aggregation.aggregations.len());
    for (output, entry) in aggregation.aggregations.iter() {
        let source = entry
            .source_field
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());
        let Some(source) = source else {
            diagnostics.warn(format!("aggregation '{output}' dropped: no source_field"));
            continue;
        };
        let Some(function) = entry.function_kind() else {
            diagnostics.warn(format!(
                "aggregation '{output}' dropped: unknown function '{}'",
                entry.function.as_deref().unwrap_or_default()
            ));
            continue;
        };
        if !has_column(df, source) {
            diagnostics.warn(format!(
                "aggregation '{output}' dropped: column '{source}' not found"
            ));
            continue;
        }
        exprs.push(aggregate_expr(source, function, output));
    }
    exprs
}

/// Applies the aggregation. Skipped steps leave `df` unchanged.
///
/// With no usable group column the whole table collapses to one row.
/// Grouped output is ordered by the group keys.
pub(crate) fn apply_aggregation(
    df: DataFrame,
    aggregation: &AggregationSpec,
    diagnostics: &mut Diagnostics,
) -> DataFrame {
    if aggregation.aggregations.is_empty() {
        if !aggregation.group_by.is_empty() {
            diagnostics
                .warn("aggregation skipped: group_by given without aggregations".to_string());
        }
        return df;
    }
    if aggregation.group_by.is_empty() {
        diagnostics.warn("aggregation skipped: aggregations given without group_by".to_string());
        return df;
    }

    let exprs = valid_aggregations(&df, aggregation, diagnostics);
    if exprs.is_empty() {
        diagnostics.warn("aggregation skipped: no valid aggregation entries".to_string());
        return df;
    }

    let mut keys: Vec<Expr> = Vec::with_capacity(aggregation.group_by.len());
    for name in &aggregation.group_by {
        if has_column(&df, name) {
            keys.push(col(name.as_str()));
        } else {
            diagnostics.warn(format!("group column '{name}' not found"));
        }
    }

    let result = if keys.is_empty() {
        diagnostics.warn("no group column left, aggregating the whole table".to_string());
        df.clone().lazy().select(exprs).collect()
    } else {
        df.clone()
            .lazy()
            .group_by(keys.clone())
            .agg(exprs)
            .sort_by_exprs(keys, SortMultipleOptions::default())
            .collect()
    };

    match result {
        Ok(aggregated) => {
            diagnostics.debug(&format!("aggregated to {} rows", aggregated.height()));
            aggregated
        }
        Err(err) => {
            diagnostics.warn(format!("aggregation failed: {err}"));
            df
        }
    }
}
