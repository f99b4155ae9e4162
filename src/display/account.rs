//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use tabled::Tabled;

use crate::models::{Account, Currency, Money};
use crate::services::BalancePoint;

use super::format::{render_table, separator};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    account_type: String,
    #[tabled(rename = "Balance")]
    balance: String,
    #[tabled(rename = "Available")]
    available: String,
}

/// Format accounts as a table with a total line
pub fn format_account_list(accounts: &[Account], currency: &Currency) -> String {
    if accounts.is_empty() {
        return "No accounts found.".to_string();
    }

    let rows = accounts
        .iter()
        .map(|a| AccountRow {
            id: a.id.to_string(),
            name: a.name.clone(),
            account_type: a.account_type.to_string(),
            balance: currency.format(a.amount),
            available: a
                .available_credit()
                .map(|c| currency.format(c))
                .unwrap_or_default(),
        })
        .collect();

    let total: Money = accounts.iter().map(|a| a.amount).sum();
    format!(
        "{}\nTotal balance: {}",
        render_table(rows, 3),
        currency.format(total)
    )
}

/// Format a single account's details
pub fn format_account_details(
    account: &Account,
    transaction_count: usize,
    currency: &Currency,
) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:             {}\n", account.id));
    output.push_str(&format!("  Type:           {}\n", account.account_type));
    output.push_str(&format!(
        "  Balance:        {}\n",
        currency.format(account.amount)
    ));
    if let Some(available) = account.available_credit() {
        output.push_str(&format!(
            "  Credit limit:   {}\n",
            currency.format(account.credit_limit)
        ));
        output.push_str(&format!("  Available:      {}\n", currency.format(available)));
    }
    output.push_str(&format!(
        "  Icon:           {} ({})\n",
        account.icon.name, account.icon.background_color
    ));
    output.push_str(&format!("  Transactions:   {}\n", transaction_count));
    output.push_str(&format!(
        "  Created:        {}\n",
        account.created_at.format("%Y-%m-%d %H:%M")
    ));

    output
}

#[derive(Tabled)]
struct BalanceRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Transaction")]
    transaction: String,
    #[tabled(rename = "Change")]
    delta: String,
    #[tabled(rename = "Balance")]
    balance: String,
}

/// Format an account's running balance, oldest first
pub fn format_running_balance(
    account: &Account,
    points: &[BalancePoint],
    currency: &Currency,
    date_format: &str,
) -> String {
    let title = format!("Balance history: {}", account.name);
    let mut output = format!("{}\n{}\n", title, separator(title.chars().count()));

    if points.is_empty() {
        output.push_str("No transactions.\n");
        return output;
    }

    let rows = points
        .iter()
        .map(|p| BalanceRow {
            date: p.date.format(date_format).to_string(),
            transaction: p.transaction_id.to_string(),
            delta: currency.format(p.delta),
            balance: currency.format(p.balance),
        })
        .collect();

    output.push_str(&render_table(rows, 2));
    output.push('\n');
    output
}
