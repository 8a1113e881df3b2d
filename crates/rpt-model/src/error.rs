use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("year {0} is out of range")]
    InvalidYear(i32),
    #[error("unknown join type: {0}")]
    UnknownJoinType(String),
    #[error("unknown aggregation function: {0}")]
    UnknownAggregation(String),
}

pub type Result<T> = std::result::Result<T, ModelError>;
