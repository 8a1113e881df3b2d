pub mod aliases;
pub mod definition;
pub mod enums;
pub mod error;
pub mod ordered;
pub mod period;

pub use aliases::{AliasTable, default_customer_aliases, default_transaction_aliases};
pub use definition::{
    AggregateSpec, AggregationSpec, DataSource, EmailOverride, JoinSpec, ReportCatalog,
    ReportDefinition, SortSpec,
};
pub use enums::{AggFunction, JoinKind};
pub use error::{ModelError, Result};
pub use ordered::OrderedMap;
pub use period::{ReferencePeriod, normalize_report_name};
