//! Join step.

use polars::prelude::*;
use rpt_ingest::TableSet;
use rpt_model::{JoinKind, JoinSpec};

use crate::diagnostics::Diagnostics;

pub(crate) fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

fn join_type(kind: JoinKind) -> JoinType {
    match kind {
        JoinKind::Left => JoinType::Left,
        JoinKind::Inner => JoinType::Inner,
        JoinKind::Right => JoinType::Right,
        JoinKind::Outer => JoinType::Full,
    }
}

/// Columns taken from the right table: the key, then every requested output
/// column the right table has.
pub(crate) fn right_projection(
    right: &DataFrame,
    key: &str,
    output_columns: &[String],
) -> Vec<String> {
    let mut columns = vec![key.to_string()];
    for name in output_columns {
        if has_column(right, name) && !columns.contains(name) {
            columns.push(name.clone());
        }
    }
    columns
}

/// Applies one join. Any problem leaves `left` unchanged and is recorded.
pub(crate) fn apply_join(
    left: DataFrame,
    join: &JoinSpec,
    tables: &TableSet,
    output_columns: &[String],
    diagnostics: &mut Diagnostics,
) -> DataFrame {
    let right_name = join.right_table.as_str();
    let Some(right) = tables.get(right_name) else {
        diagnostics.warn(format!("join skipped: table '{right_name}' is not loaded"));
        return left;
    };
    let Some(kind) = join.kind() else {
        diagnostics.warn(format!(
            "join with '{right_name}' skipped: unknown join type '{}'",
            join.join_type.as_deref().unwrap_or_default()
        ));
        return left;
    };
    let key = join.join_key.as_str();
    if !has_column(right, key) {
        diagnostics.warn(format!(
            "join with '{right_name}' skipped: key '{key}' missing from '{right_name}'"
        ));
        return left;
    }
    if !has_column(&left, key) {
        diagnostics.warn(format!(
            "join with '{right_name}' skipped: key '{key}' missing from the current table"
        ));
        return left;
    }

    let columns = right_projection(right, key, output_columns);
    let joined = right.select(columns).and_then(|right| {
        left.clone()
            .lazy()
            .join(
                right.lazy(),
                [col(key)],
                [col(key)],
                JoinArgs::new(join_type(kind)).with_coalesce(JoinCoalesce::CoalesceColumns),
            )
            .collect()
    });

    match joined {
        Ok(df) => {
            diagnostics.debug(&format!(
                "joined '{right_name}' on '{key}' ({kind}), {} rows",
                df.height()
            ));
            df
        }
        Err(err) => {
            diagnostics.warn(format!("join with '{right_name}' failed: {err}"));
            left
        }
    }
}
