//! Summary and dashboard CLI commands

use chrono::Local;
use clap::{Args, ValueEnum};

use crate::config::settings::Settings;
use crate::display::summary::{format_dashboard, format_summary, Breakdown};
use crate::error::ExpenseResult;
use crate::services::{AccountService, AggregateFilter, CategoryService, SummaryService};
use crate::storage::Storage;

use super::range_from_args;

/// Breakdown selector for `summary --by`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum GroupBy {
    Category,
    Account,
}

impl From<GroupBy> for Breakdown {
    fn from(value: GroupBy) -> Self {
        match value {
            GroupBy::Category => Breakdown::Category,
            GroupBy::Account => Breakdown::Account,
        }
    }
}

/// Arguments for `summary`
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// today, week, month, year, all or YYYY-MM-DD..YYYY-MM-DD
    #[arg(short, long)]
    pub range: Option<String>,
    /// Custom range start (YYYY-MM-DD)
    #[arg(long)]
    pub from: Option<String>,
    /// Custom range end (YYYY-MM-DD, inclusive)
    #[arg(long)]
    pub to: Option<String>,
    /// Limit to these accounts (repeatable)
    #[arg(short, long)]
    pub account: Vec<String>,
    /// Limit to these categories (repeatable)
    #[arg(short, long)]
    pub category: Vec<String>,
    /// Breakdown to show
    #[arg(long, value_enum, default_value_t = GroupBy::Category)]
    pub by: GroupBy,
}

/// Handle `summary`
pub fn handle_summary_command(
    storage: &Storage,
    settings: &Settings,
    args: SummaryArgs,
) -> ExpenseResult<()> {
    let range = range_from_args(
        args.range.as_deref(),
        args.from.as_deref(),
        args.to.as_deref(),
        settings.date_range,
    )?;

    let mut filter = AggregateFilter::all();
    if !args.account.is_empty() {
        let service = AccountService::new(storage);
        let ids = args
            .account
            .iter()
            .map(|a| service.resolve(a).map(|account| account.id))
            .collect::<ExpenseResult<Vec<_>>>()?;
        filter = filter.with_accounts(ids);
    }
    if !args.category.is_empty() {
        let service = CategoryService::new(storage);
        let ids = args
            .category
            .iter()
            .map(|c| service.resolve(c).map(|category| category.id))
            .collect::<ExpenseResult<Vec<_>>>()?;
        filter = filter.with_categories(ids);
    }

    let summary = SummaryService::new(storage, settings).summarize(
        &range,
        &filter,
        Local::now().naive_local(),
    )?;
    print!(
        "{}",
        format_summary(&summary, args.by.into(), &settings.currency)
    );

    Ok(())
}

/// Handle `dashboard`
pub fn handle_dashboard_command(storage: &Storage, settings: &Settings) -> ExpenseResult<()> {
    let dashboard =
        SummaryService::new(storage, settings).dashboard(Local::now().naive_local())?;
    print!("{}", format_dashboard(&dashboard, &settings.currency));
    Ok(())
}
