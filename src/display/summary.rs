//! Summary and dashboard formatting

use tabled::Tabled;

use crate::models::Currency;
use crate::services::{BreakdownEntry, Dashboard, Summary};

use super::format::{format_bar, format_percentage, render_table, separator};

/// Which breakdown a summary report shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Breakdown {
    Category,
    Account,
}

#[derive(Tabled)]
struct BreakdownRow {
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Count")]
    count: usize,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expense")]
    expense: String,
    #[tabled(rename = "Net")]
    net: String,
    #[tabled(rename = "Share")]
    share: String,
    #[tabled(rename = "")]
    bar: String,
}

fn totals_block(summary: &Summary, currency: &Currency) -> String {
    let result = &summary.result;
    let title = format!(
        "Summary: {} ({})",
        summary.description,
        summary.range.range_type()
    );
    let mut output = format!("{}\n{}\n", title, separator(title.chars().count()));
    output.push_str(&format!(
        "  Income:   {:>14}\n",
        currency.format(result.total_income)
    ));
    output.push_str(&format!(
        "  Expense:  {:>14}\n",
        currency.format(result.total_expense)
    ));
    output.push_str(&format!("  Net:      {:>14}\n", currency.format(result.net)));
    output.push_str(&format!("  Transactions: {}\n", result.transaction_count));
    output
}

fn breakdown_table(entries: &[BreakdownEntry], summary: &Summary, currency: &Currency) -> String {
    let total_expense = summary.result.total_expense;
    let max_expense = entries
        .iter()
        .map(|e| e.expense.cents())
        .max()
        .unwrap_or(0) as f64;

    let rows = entries
        .iter()
        .map(|e| BreakdownRow {
            name: e.label.clone(),
            count: e.count,
            income: currency.format(e.income),
            expense: currency.format(e.expense),
            net: currency.format(e.net),
            share: format_percentage(e.expense_share(total_expense)),
            bar: format_bar(e.expense.cents() as f64, max_expense, 12),
        })
        .collect();

    render_table(rows, 1)
}

/// Format a summary with one breakdown table
pub fn format_summary(summary: &Summary, breakdown: Breakdown, currency: &Currency) -> String {
    let mut output = totals_block(summary, currency);

    if summary.result.is_empty() {
        output.push_str("\nNo transactions in this period.\n");
    } else {
        let (title, entries) = match breakdown {
            Breakdown::Category => ("By category", &summary.result.by_category),
            Breakdown::Account => ("By account", &summary.result.by_account),
        };
        output.push_str(&format!("\n{}\n", title));
        output.push_str(&breakdown_table(entries, summary, currency));
        output.push('\n');
    }

    for missing in &summary.result.missing {
        output.push_str(&format!("warning: {}\n", missing.to_error()));
    }

    output
}

/// Format the overview: account balances then the period summary
pub fn format_dashboard(dashboard: &Dashboard, currency: &Currency) -> String {
    let mut output = String::from("Accounts\n");
    output.push_str(&separator(8));
    output.push('\n');

    if dashboard.balances.is_empty() {
        output.push_str("  No accounts.\n");
    }
    for balance in &dashboard.balances {
        let credit = balance
            .available_credit
            .map(|c| format!("  (available {})", currency.format(c)))
            .unwrap_or_default();
        output.push_str(&format!(
            "  {:<24} {:>14}{}\n",
            balance.name,
            currency.format(balance.amount),
            credit
        ));
    }
    output.push_str(&format!(
        "  {:<24} {:>14}\n\n",
        "Total",
        currency.format(dashboard.total_balance)
    ));

    output.push_str(&format_summary(
        &dashboard.summary,
        Breakdown::Category,
        currency,
    ));
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Account, AccountType, Category, CategoryType, DateInterval, DateRange, Money, Transaction,
    };
    use crate::services::{AggregateFilter, AggregationEngine};
    use chrono::NaiveDate;

    fn sample_summary() -> Summary {
        let wallet = Account::new("Wallet", AccountType::Cash);
        let food = Category::new("Food", CategoryType::Expense);
        let date = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        let transactions = vec![
            Transaction::income(wallet.id, None, Money::from_units(100), date),
            Transaction::expense(wallet.id, Some(food.id), Money::from_units(40), date),
        ];
        let accounts = vec![wallet];
        let categories = vec![food];
        let interval = DateInterval::unbounded();
        let result = AggregationEngine::new(&accounts, &categories).aggregate(
            &transactions,
            interval,
            &AggregateFilter::all(),
        );
        Summary {
            range: DateRange::All,
            interval,
            description: interval.describe("%d/%m/%Y"),
            result,
        }
    }

    #[test]
    fn test_format_summary_by_category() {
        let output = format_summary(&sample_summary(), Breakdown::Category, &Currency::default());
        assert!(output.contains("All time"));
        assert!(output.contains("$100.00"));
        assert!(output.contains("$60.00"));
        assert!(output.contains("Food"));
        assert!(output.contains("100%"));
    }

    #[test]
    fn test_format_summary_by_account() {
        let output = format_summary(&sample_summary(), Breakdown::Account, &Currency::default());
        assert!(output.contains("By account"));
        assert!(output.contains("Wallet"));
    }

    #[test]
    fn test_format_empty_summary() {
        let mut summary = sample_summary();
        let accounts: Vec<Account> = Vec::new();
        summary.result = AggregationEngine::new(&accounts, &[]).aggregate(
            &[],
            summary.interval,
            &AggregateFilter::all(),
        );
        let output = format_summary(&summary, Breakdown::Category, &Currency::default());
        assert!(output.contains("No transactions in this period."));
    }
}
