//! CLI command handlers
//!
//! Bridges clap argument parsing with the service layer.

pub mod account;
pub mod category;
pub mod history;
pub mod settings;
pub mod summary;
pub mod transaction;

pub use account::{handle_account_command, AccountCommands};
pub use category::{handle_category_command, CategoryCommands};
pub use history::{handle_history_command, HistoryArgs};
pub use settings::{handle_settings_command, SettingsCommands};
pub use summary::{handle_dashboard_command, handle_summary_command, SummaryArgs};
pub use transaction::{handle_transaction_command, TransactionCommands};

use chrono::{Local, NaiveDateTime};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{date_range, DateRange, Money, StoredIcon};

/// Parse a user-entered amount
pub(crate) fn parse_money(input: &str, what: &str) -> ExpenseResult<Money> {
    Money::parse(input).map_err(|e| {
        ExpenseError::Validation(format!(
            "Invalid {} '{}': {}. Use a format like '12.50' or '1,000'",
            what, input, e
        ))
    })
}

/// Parse a transaction date; a bare date keeps the current time of day
pub(crate) fn parse_when(input: Option<&str>) -> ExpenseResult<NaiveDateTime> {
    let now = Local::now().naive_local();
    let Some(input) = input else {
        return Ok(now);
    };

    if let Ok(date) = chrono::NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d") {
        return Ok(date.and_time(now.time()));
    }
    date_range::parse_start(input)
}

/// Pick a range from `--range` or `--from/--to`, else the configured default
pub(crate) fn range_from_args(
    range: Option<&str>,
    from: Option<&str>,
    to: Option<&str>,
    default: DateRange,
) -> ExpenseResult<DateRange> {
    match (range, from, to) {
        (Some(_), Some(_), _) | (Some(_), _, Some(_)) => Err(ExpenseError::Validation(
            "Use either --range or --from/--to, not both".into(),
        )),
        (Some(range), None, None) => DateRange::parse(range),
        (None, Some(from), Some(to)) => {
            DateRange::custom(date_range::parse_start(from)?, date_range::parse_end(to)?)
        }
        (None, Some(_), None) | (None, None, Some(_)) => Err(ExpenseError::InvalidRange(
            "--from and --to must be given together".into(),
        )),
        (None, None, None) => Ok(default),
    }
}

/// Build an icon from optional `--icon` and `--color` flags
pub(crate) fn icon_from_args(
    name: Option<String>,
    color: Option<String>,
    current: Option<&StoredIcon>,
) -> Option<StoredIcon> {
    if name.is_none() && color.is_none() {
        return None;
    }
    let base = current.cloned().unwrap_or_default();
    Some(StoredIcon::new(
        name.unwrap_or(base.name),
        color.unwrap_or(base.background_color),
    ))
}
