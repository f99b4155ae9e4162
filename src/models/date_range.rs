//! Date range selection
//!
//! A [`DateRange`] is what the user picks (today, this month, a custom pair).
//! A [`DateInterval`] is the concrete inclusive `[start, end]` it resolves to.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{ExpenseError, ExpenseResult};

/// Symbolic range selector without any payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateRangeType {
    Today,
    ThisWeek,
    ThisMonth,
    ThisYear,
    All,
    Custom,
}

impl DateRangeType {
    pub fn all() -> &'static [Self] {
        &[
            Self::Today,
            Self::ThisWeek,
            Self::ThisMonth,
            Self::ThisYear,
            Self::All,
            Self::Custom,
        ]
    }

    pub fn parse(s: &str) -> Option<Self> {
        let normalized = s.trim().to_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "today" | "day" => Some(Self::Today),
            "this_week" | "week" => Some(Self::ThisWeek),
            "this_month" | "month" => Some(Self::ThisMonth),
            "this_year" | "year" => Some(Self::ThisYear),
            "all" | "all_time" => Some(Self::All),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for DateRangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Today => write!(f, "Today"),
            Self::ThisWeek => write!(f, "This Week"),
            Self::ThisMonth => write!(f, "This Month"),
            Self::ThisYear => write!(f, "This Year"),
            Self::All => write!(f, "All"),
            Self::Custom => write!(f, "Custom"),
        }
    }
}

/// A range selection, with its explicit bounds when custom
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DateRange {
    Today,
    ThisWeek,
    #[default]
    ThisMonth,
    ThisYear,
    All,
    Custom {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

impl DateRange {
    /// Build a range from its type and, for custom, the explicit pair
    pub fn from_type(
        range_type: DateRangeType,
        custom: Option<(NaiveDateTime, NaiveDateTime)>,
    ) -> ExpenseResult<Self> {
        Ok(match range_type {
            DateRangeType::Today => Self::Today,
            DateRangeType::ThisWeek => Self::ThisWeek,
            DateRangeType::ThisMonth => Self::ThisMonth,
            DateRangeType::ThisYear => Self::ThisYear,
            DateRangeType::All => Self::All,
            DateRangeType::Custom => {
                let (start, end) = custom.ok_or_else(|| {
                    ExpenseError::InvalidRange("custom range needs a start and an end".into())
                })?;
                Self::custom(start, end)?
            }
        })
    }

    /// Create a custom range, rejecting a start after the end
    pub fn custom(start: NaiveDateTime, end: NaiveDateTime) -> ExpenseResult<Self> {
        if start > end {
            return Err(ExpenseError::InvalidRange(format!(
                "start {} is after end {}",
                start, end
            )));
        }
        Ok(Self::Custom { start, end })
    }

    pub fn range_type(&self) -> DateRangeType {
        match self {
            Self::Today => DateRangeType::Today,
            Self::ThisWeek => DateRangeType::ThisWeek,
            Self::ThisMonth => DateRangeType::ThisMonth,
            Self::ThisYear => DateRangeType::ThisYear,
            Self::All => DateRangeType::All,
            Self::Custom { .. } => DateRangeType::Custom,
        }
    }

    /// Parse a symbolic name ("month", "this-week", "all") or a custom
    /// "YYYY-MM-DD..YYYY-MM-DD" pair
    pub fn parse(s: &str) -> ExpenseResult<Self> {
        let s = s.trim();
        if let Some((start, end)) = s.split_once("..") {
            return Self::custom(parse_start(start)?, parse_end(end)?);
        }
        match DateRangeType::parse(s) {
            Some(DateRangeType::Custom) => Err(ExpenseError::InvalidRange(
                "custom range needs explicit dates (YYYY-MM-DD..YYYY-MM-DD)".into(),
            )),
            Some(range_type) => Self::from_type(range_type, None),
            None => Err(ExpenseError::Validation(format!(
                "Unknown date range '{}'. Use today, week, month, year, all or YYYY-MM-DD..YYYY-MM-DD",
                s
            ))),
        }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Custom { start, end } => write!(
                f,
                "{}..{}",
                start.format("%Y-%m-%d %H:%M:%S"),
                end.format("%Y-%m-%d %H:%M:%S")
            ),
            other => write!(f, "{}", other.range_type()),
        }
    }
}

/// Concrete inclusive interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DateInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// The unbounded interval used for "all time"
    pub fn unbounded() -> Self {
        Self {
            start: NaiveDateTime::MIN,
            end: NaiveDateTime::MAX,
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.start == NaiveDateTime::MIN && self.end == NaiveDateTime::MAX
    }

    /// Inclusive on both ends
    pub fn contains(&self, when: NaiveDateTime) -> bool {
        when >= self.start && when <= self.end
    }

    /// Human-readable description using a strftime date format
    pub fn describe(&self, date_format: &str) -> String {
        if self.is_unbounded() {
            return "All time".to_string();
        }
        let start = self.start.date().format(date_format).to_string();
        if self.start.date() == self.end.date() {
            return start;
        }
        format!("{} - {}", start, self.end.date().format(date_format))
    }
}

/// Parse a range start: a bare date means midnight
pub fn parse_start(s: &str) -> ExpenseResult<NaiveDateTime> {
    parse_bound(s, NaiveTime::MIN)
}

/// Parse a range end: a bare date covers the whole day
pub fn parse_end(s: &str) -> ExpenseResult<NaiveDateTime> {
    let end_of_day = NaiveTime::from_hms_opt(23, 59, 59).unwrap_or(NaiveTime::MIN);
    parse_bound(s, end_of_day)
}

fn parse_bound(s: &str, default_time: NaiveTime) -> ExpenseResult<NaiveDateTime> {
    let s = s.trim();
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| d.and_time(default_time))
        .map_err(|_| {
            ExpenseError::Validation(format!(
                "Invalid date '{}'. Use YYYY-MM-DD or YYYY-MM-DD HH:MM",
                s
            ))
        })
}
