//! Date range resolution
//!
//! Turns a symbolic [`DateRange`] into a concrete inclusive interval,
//! anchored at an explicit resolution instant so results are reproducible.

use chrono::{Datelike, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::config::settings::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{DateInterval, DateRange};

/// Resolves date ranges against a configured week start
#[derive(Debug, Clone, Copy)]
pub struct DateRangeResolver {
    week_start: Weekday,
}

impl Default for DateRangeResolver {
    fn default() -> Self {
        Self::new(Weekday::Sun)
    }
}

impl DateRangeResolver {
    pub fn new(week_start: Weekday) -> Self {
        Self { week_start }
    }

    /// Resolver honouring the user's first day of week
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.week_start())
    }

    pub fn week_start(&self) -> Weekday {
        self.week_start
    }

    /// Resolve against the local clock
    pub fn resolve_now(&self, range: &DateRange) -> ExpenseResult<DateInterval> {
        self.resolve(range, Local::now().naive_local())
    }

    /// Resolve a range as of `now`
    ///
    /// Current-period ranges start at midnight of the period's first day and
    /// end at `now`. `All` is unbounded. `Custom` is returned as given.
    ///
    /// # Errors
    ///
    /// `InvalidRange` if a custom start is after its end.
    pub fn resolve(&self, range: &DateRange, now: NaiveDateTime) -> ExpenseResult<DateInterval> {
        let today = now.date();
        let start_date = match range {
            DateRange::Today => today,
            DateRange::ThisWeek => self.start_of_week(today),
            DateRange::ThisMonth => first_of_month(today)?,
            DateRange::ThisYear => first_of_year(today)?,
            DateRange::All => return Ok(DateInterval::unbounded()),
            DateRange::Custom { start, end } => {
                if start > end {
                    return Err(ExpenseError::InvalidRange(format!(
                        "start {} is after end {}",
                        start, end
                    )));
                }
                return Ok(DateInterval::new(*start, *end));
            }
        };

        Ok(DateInterval::new(start_date.and_time(NaiveTime::MIN), now))
    }

    /// Most recent configured week start on or before `date`
    fn start_of_week(&self, date: NaiveDate) -> NaiveDate {
        let offset = (date.weekday().num_days_from_monday() + 7
            - self.week_start.num_days_from_monday())
            % 7;
        date - Duration::days(i64::from(offset))
    }
}

fn first_of_month(date: NaiveDate) -> ExpenseResult<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1)
        .ok_or_else(|| ExpenseError::InvalidRange(format!("no month start for {}", date)))
}

fn first_of_year(date: NaiveDate) -> ExpenseResult<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), 1, 1)
        .ok_or_else(|| ExpenseError::InvalidRange(format!("no year start for {}", date)))
}
