//! Report definition documents.
//!
//! A definition is the declarative recipe for one output table: which loaded
//! table to start from, which tables to join onto it, how to group and
//! aggregate, which columns to keep and how to sort. The structs here only
//! check shape. Whether a referenced column or table exists is decided when
//! the report is generated.

use serde::{Deserialize, Serialize};

use crate::enums::{AggFunction, JoinKind};
use crate::ordered::OrderedMap;

/// All definitions of a run, keyed by report name, in document order.
pub type ReportCatalog = OrderedMap<ReportDefinition>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportDefinition {
    #[serde(default)]
    pub description: Option<String>,
    /// The first entry is the primary source.
    #[serde(default)]
    pub data_sources: Vec<DataSource>,
    #[serde(default)]
    pub joins: Vec<JoinSpec>,
    #[serde(default)]
    pub aggregation: Option<AggregationSpec>,
    #[serde(default)]
    pub output_columns: Vec<String>,
    #[serde(default)]
    pub sort: Option<SortSpec>,
    #[serde(default)]
    pub email: Option<EmailOverride>,
}

impl ReportDefinition {
    /// Name of the table the report starts from.
    pub fn primary_source(&self) -> Option<&str> {
        self.data_sources
            .first()
            .map(|source| source.name.trim())
            .filter(|name| !name.is_empty())
    }

    /// Description for log messages, falling back to the report name.
    pub fn label<'a>(&'a self, name: &'a str) -> &'a str {
        self.description
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .unwrap_or(name)
    }

    pub fn sends_individually(&self) -> bool {
        self.email.as_ref().is_some_and(|e| e.send_individually)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DataSource {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinSpec {
    pub right_table: String,
    pub join_key: String,
    /// Free text, interpreted with [`JoinSpec::kind`]. Absent means `left`.
    #[serde(default)]
    pub join_type: Option<String>,
}

impl JoinSpec {
    /// Resolves the declared join type. `None` when the text is not a known
    /// join type.
    pub fn kind(&self) -> Option<JoinKind> {
        match self.join_type.as_deref() {
            None => Some(JoinKind::Left),
            Some(raw) => raw.parse().ok(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregationSpec {
    #[serde(default)]
    pub group_by: Vec<String>,
    /// Output column name to aggregate, in declared order.
    #[serde(default)]
    pub aggregations: OrderedMap<AggregateSpec>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AggregateSpec {
    #[serde(default)]
    pub source_field: Option<String>,
    #[serde(default)]
    pub function: Option<String>,
}

impl AggregateSpec {
    pub fn function_kind(&self) -> Option<AggFunction> {
        self.function.as_deref().and_then(|f| f.parse().ok())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SortSpec {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default = "default_ascending")]
    pub ascending: bool,
}

fn default_ascending() -> bool {
    true
}

/// Per-report mail settings. Unset fields fall back to the global mail
/// configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EmailOverride {
    #[serde(default)]
    pub recipients: Option<Vec<String>>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub send_individually: bool,
}
