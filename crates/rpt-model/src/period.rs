//! The month a run reports on.

use std::fmt;

use chrono::{Datelike, Local, NaiveDate};

use crate::error::{ModelError, Result};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReferencePeriod {
    year: i32,
    month: u32,
}

impl ReferencePeriod {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(ModelError::InvalidMonth(month));
        }
        if NaiveDate::from_ymd_opt(year, month, 1).is_none() {
            return Err(ModelError::InvalidYear(year));
        }
        Ok(Self { year, month })
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        let today = Local::now().date_naive();
        Self {
            year: today.year(),
            month: today.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// First day of the month; the date placeholders are rendered from it.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    /// `YYYY_MM`, the suffix shared by input and output file names.
    pub fn suffix(&self) -> String {
        format!("{:04}_{:02}", self.year, self.month)
    }

    pub fn month_name(&self) -> &'static str {
        MONTH_NAMES[(self.month - 1) as usize]
    }

    /// `<stem>_<YYYY>_<MM>.<extension>`.
    pub fn file_name(&self, stem: &str, extension: &str) -> String {
        format!(
            "{stem}_{}.{}",
            self.suffix(),
            extension.trim_start_matches('.')
        )
    }
}

impl fmt::Display for ReferencePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// Lowercases a report name and replaces spaces with underscores.
pub fn normalize_report_name(name: &str) -> String {
    name.trim().to_lowercase().replace(' ', "_")
}
