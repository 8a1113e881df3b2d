//! Loading a run's input tables.

use std::collections::BTreeMap;
use std::path::PathBuf;

use polars::prelude::DataFrame;
use rpt_model::AliasTable;
use tracing::{info, info_span, warn};

use crate::error::{IngestError, Result};
use crate::reader::read_table;
use crate::standardize::standardize_columns;

/// Loaded tables keyed by source name.
pub type TableSet = BTreeMap<String, DataFrame>;

/// One input file of a run.
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Table name referenced by report definitions.
    pub name: String,
    pub path: PathBuf,
    /// Column aliases to standardize with. `None` keeps the table as read.
    pub aliases: Option<AliasTable>,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            aliases: None,
        }
    }

    pub fn with_aliases(mut self, aliases: AliasTable) -> Self {
        self.aliases = Some(aliases);
        self
    }
}

/// Reads and standardizes every source, then checks the primary table.
///
/// Any read or schema failure aborts the load. A table without records keeps
/// its headers, standardized when its aliases resolve, and the load fails
/// when the primary table ends up empty.
pub fn load_tables(sources: &[SourceFile], primary: &str) -> Result<TableSet> {
    let span = info_span!("load", sources = sources.len(), primary);
    let _guard = span.enter();

    let mut tables = TableSet::new();
    for source in sources {
        info!(table = %source.name, path = %source.path.display(), "loading table");
        let df = read_table(&source.path)?;

        if df.height() == 0 {
            warn!(table = %source.name, columns = df.width(), "table has no records");
            tables.insert(source.name.clone(), standardize_empty(df, source));
            continue;
        }

        let df = match &source.aliases {
            Some(aliases) => standardize_columns(df, aliases, &source.name)?,
            None => {
                warn!(
                    table = %source.name,
                    "no column aliases configured, keeping headers as read"
                );
                df
            }
        };
        info!(
            table = %source.name,
            rows = df.height(),
            columns = df.width(),
            "table loaded"
        );
        tables.insert(source.name.clone(), df);
    }

    let primary_rows = tables.get(primary).map_or(0, DataFrame::height);
    if primary_rows == 0 {
        return Err(IngestError::EmptyPrimaryTable {
            table: primary.to_string(),
        });
    }
    Ok(tables)
}

/// Standardizes a table without records, keeping it as read when it cannot be.
fn standardize_empty(df: DataFrame, source: &SourceFile) -> DataFrame {
    let Some(aliases) = &source.aliases else {
        return df;
    };
    match standardize_columns(df.clone(), aliases, &source.name) {
        Ok(standardized) => standardized,
        Err(error) => {
            warn!(table = %source.name, %error, "empty table kept with headers as read");
            df
        }
    }
}
