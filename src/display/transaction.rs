//! Transaction display formatting
//!
//! Register view with account and category names resolved from snapshots.

use std::collections::HashMap;

use tabled::Tabled;

use crate::models::{
    Account, AccountId, Category, CategoryId, Currency, Transaction, TransactionType,
};
use crate::services::UNCATEGORIZED;

use super::format::{render_table, truncate};

#[derive(Tabled)]
struct RegisterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Notes")]
    notes: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

/// Name lookups for a register
pub struct RegisterContext<'a> {
    accounts: HashMap<AccountId, &'a str>,
    categories: HashMap<CategoryId, &'a str>,
    currency: &'a Currency,
    date_format: &'a str,
}

impl<'a> RegisterContext<'a> {
    pub fn new(
        accounts: &'a [Account],
        categories: &'a [Category],
        currency: &'a Currency,
        date_format: &'a str,
    ) -> Self {
        Self {
            accounts: accounts.iter().map(|a| (a.id, a.name.as_str())).collect(),
            categories: categories.iter().map(|c| (c.id, c.name.as_str())).collect(),
            currency,
            date_format,
        }
    }

    fn account_name(&self, id: AccountId) -> String {
        self.accounts
            .get(&id)
            .map(|name| name.to_string())
            .unwrap_or_else(|| format!("? {}", id))
    }

    fn account_label(&self, txn: &Transaction) -> String {
        match txn.to_account_id {
            Some(to) => format!(
                "{} → {}",
                self.account_name(txn.account_id),
                self.account_name(to)
            ),
            None => self.account_name(txn.account_id),
        }
    }

    fn category_label(&self, txn: &Transaction) -> String {
        if txn.is_transfer() {
            return String::new();
        }
        txn.category_id
            .and_then(|id| self.categories.get(&id))
            .map(|name| name.to_string())
            .unwrap_or_else(|| UNCATEGORIZED.to_string())
    }

    /// Signed display amount: expenses negative, transfers unsigned
    fn amount_label(&self, txn: &Transaction) -> String {
        match txn.transaction_type {
            TransactionType::Expense => self.currency.format(-txn.amount),
            _ => self.currency.format(txn.amount),
        }
    }
}

/// Format a list of transactions as a register
pub fn format_transaction_register(
    transactions: &[Transaction],
    context: &RegisterContext<'_>,
) -> String {
    if transactions.is_empty() {
        return "No transactions found.".to_string();
    }

    let rows = transactions
        .iter()
        .map(|txn| RegisterRow {
            id: txn.id.to_string(),
            date: txn.date.format(context.date_format).to_string(),
            kind: txn.transaction_type.to_string(),
            account: context.account_label(txn),
            category: context.category_label(txn),
            notes: truncate(&txn.notes, 30),
            amount: context.amount_label(txn),
        })
        .collect();

    render_table(rows, 6)
}

/// One-line confirmation after recording a transaction
pub fn format_transaction_line(txn: &Transaction, context: &RegisterContext<'_>) -> String {
    format!(
        "{} {} {} {} ({})",
        txn.id,
        txn.date.format(context.date_format),
        txn.transaction_type,
        context.amount_label(txn),
        context.account_label(txn)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountType, CategoryType, Money};
    use chrono::NaiveDate;

    #[test]
    fn test_register_resolves_names() {
        let wallet = Account::new("Wallet", AccountType::Cash);
        let bank = Account::new("Bank", AccountType::Bank);
        let food = Category::new("Food", CategoryType::Expense);
        let date = NaiveDate::from_ymd_opt(2024, 1, 5)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let mut lunch = Transaction::expense(wallet.id, Some(food.id), Money::from_units(12), date);
        lunch.notes = "Lunch".into();
        let transfer = Transaction::transfer(wallet.id, bank.id, Money::from_units(100), date);
        let orphan = Transaction::income(AccountId::new(), None, Money::from_units(1), date);

        let accounts = vec![wallet, bank];
        let categories = vec![food];
        let currency = Currency::default();
        let context = RegisterContext::new(&accounts, &categories, &currency, "%Y-%m-%d");

        let output = format_transaction_register(&[lunch, transfer, orphan], &context);
        assert!(output.contains("Food"));
        assert!(output.contains("-$12.00"));
        assert!(output.contains("Wallet → Bank"));
        assert!(output.contains("? acc-"));
        assert!(output.contains(UNCATEGORIZED));
        assert!(output.contains("2024-01-05"));
    }

    #[test]
    fn test_empty_register() {
        let currency = Currency::default();
        let context = RegisterContext::new(&[], &[], &currency, "%Y-%m-%d");
        assert_eq!(
            format_transaction_register(&[], &context),
            "No transactions found."
        );
    }
}
