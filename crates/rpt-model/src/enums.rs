//! Join types and aggregation functions named in report definitions.
//!
//! Definitions carry these as free text so that a misspelling degrades one
//! step instead of rejecting the whole document. Parsing is case-insensitive.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JoinKind {
    Left,
    Inner,
    Right,
    /// Full outer join. Accepted as `outer` or `full`.
    Outer,
}

impl JoinKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            JoinKind::Left => "left",
            JoinKind::Inner => "inner",
            JoinKind::Right => "right",
            JoinKind::Outer => "outer",
        }
    }
}

impl fmt::Display for JoinKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JoinKind {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "left" => Ok(JoinKind::Left),
            "inner" => Ok(JoinKind::Inner),
            "right" => Ok(JoinKind::Right),
            "outer" | "full" => Ok(JoinKind::Outer),
            _ => Err(ModelError::UnknownJoinType(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggFunction {
    Sum,
    Mean,
    Median,
    /// Number of non-null values.
    Count,
    /// Number of distinct values.
    NUnique,
    Min,
    Max,
    First,
    Last,
}

impl AggFunction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AggFunction::Sum => "sum",
            AggFunction::Mean => "mean",
            AggFunction::Median => "median",
            AggFunction::Count => "count",
            AggFunction::NUnique => "nunique",
            AggFunction::Min => "min",
            AggFunction::Max => "max",
            AggFunction::First => "first",
            AggFunction::Last => "last",
        }
    }
}

impl fmt::Display for AggFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AggFunction {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sum" => Ok(AggFunction::Sum),
            "mean" | "avg" | "average" => Ok(AggFunction::Mean),
            "median" => Ok(AggFunction::Median),
            "count" => Ok(AggFunction::Count),
            "nunique" => Ok(AggFunction::NUnique),
            "min" => Ok(AggFunction::Min),
            "max" => Ok(AggFunction::Max),
            "first" => Ok(AggFunction::First),
            "last" => Ok(AggFunction::Last),
            _ => Err(ModelError::UnknownAggregation(s.to_string())),
        }
    }
}
