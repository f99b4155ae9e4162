//! Transaction CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::transaction::{
    format_transaction_line, format_transaction_register, RegisterContext,
};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::TransactionType;
use crate::services::{
    AccountService, CategoryService, CreateTransactionInput, DateRangeResolver,
    TransactionFilter, TransactionService, UpdateTransactionInput,
};
use crate::storage::Storage;

use super::{parse_money, parse_when, range_from_args};

/// Transaction subcommands
#[derive(Subcommand)]
pub enum TransactionCommands {
    /// Record a transaction
    Add {
        /// income, expense or transfer
        kind: String,
        /// Account name or ID (source account for transfers)
        account: String,
        /// Positive amount (e.g., "12.50")
        amount: String,
        /// Destination account for transfers
        #[arg(long)]
        to: Option<String>,
        /// Category name or ID
        #[arg(short, long)]
        category: Option<String>,
        /// Date (YYYY-MM-DD or "YYYY-MM-DD HH:MM"); defaults to now
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// List transactions, newest first
    List {
        /// Only transactions from or to this account
        #[arg(short, long)]
        account: Option<String>,
        /// Only transactions in this category
        #[arg(short, long)]
        category: Option<String>,
        /// today, week, month, year, all or YYYY-MM-DD..YYYY-MM-DD
        #[arg(short, long)]
        range: Option<String>,
        /// Number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },
    /// Edit a transaction
    Edit {
        /// Transaction ID
        id: String,
        #[arg(short = 'm', long)]
        amount: Option<String>,
        #[arg(short, long)]
        date: Option<String>,
        /// Move to another account
        #[arg(short, long)]
        account: Option<String>,
        /// Change a transfer's destination
        #[arg(long)]
        to: Option<String>,
        /// Category name or ID; "none" clears it
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        notes: Option<String>,
    },
    /// Delete a transaction
    Delete {
        /// Transaction ID
        id: String,
    },
}

/// Handle a transaction command
pub fn handle_transaction_command(
    storage: &Storage,
    settings: &Settings,
    cmd: TransactionCommands,
) -> ExpenseResult<()> {
    let service = TransactionService::new(storage);
    let accounts = AccountService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        TransactionCommands::Add {
            kind,
            account,
            amount,
            to,
            category,
            date,
            notes,
        } => {
            let transaction_type = TransactionType::parse(&kind).ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Invalid transaction type: '{}'. Use income, expense or transfer",
                    kind
                ))
            })?;

            let input = CreateTransactionInput {
                transaction_type,
                account_id: accounts.resolve(&account)?.id,
                to_account_id: to
                    .as_deref()
                    .map(|t| accounts.resolve(t))
                    .transpose()?
                    .map(|a| a.id),
                amount: parse_money(&amount, "amount")?,
                category_id: category
                    .as_deref()
                    .map(|c| categories.resolve(c))
                    .transpose()?
                    .map(|c| c.id),
                date: parse_when(date.as_deref())?,
                notes,
            };

            let txn = service.create(input)?;
            let account_list = accounts.list()?;
            let category_list = categories.list()?;
            let context = RegisterContext::new(
                &account_list,
                &category_list,
                &settings.currency,
                &settings.date_format,
            );
            println!("Recorded {}", format_transaction_line(&txn, &context));
        }

        TransactionCommands::List {
            account,
            category,
            range,
            limit,
        } => {
            let mut filter = TransactionFilter::new().limit(limit);
            if let Some(account) = account {
                filter = filter.account(accounts.resolve(&account)?.id);
            }
            if let Some(category) = category {
                filter = filter.category(categories.resolve(&category)?.id);
            }
            if let Some(range) = range {
                let range = range_from_args(Some(&range), None, None, settings.date_range)?;
                let interval = DateRangeResolver::from_settings(settings).resolve_now(&range)?;
                filter = filter.interval(interval);
            }

            let transactions = service.list(filter)?;
            let account_list = accounts.list()?;
            let category_list = categories.list()?;
            let context = RegisterContext::new(
                &account_list,
                &category_list,
                &settings.currency,
                &settings.date_format,
            );
            println!("{}", format_transaction_register(&transactions, &context));
        }

        TransactionCommands::Edit {
            id,
            amount,
            date,
            account,
            to,
            category,
            notes,
        } => {
            let txn = service.resolve(&id)?;

            let category_id = match category.as_deref() {
                None => None,
                Some(c) if c.eq_ignore_ascii_case("none") => Some(None),
                Some(c) => Some(Some(categories.resolve(c)?.id)),
            };

            let input = UpdateTransactionInput {
                amount: amount
                    .as_deref()
                    .map(|a| parse_money(a, "amount"))
                    .transpose()?,
                date: date.as_deref().map(|d| parse_when(Some(d))).transpose()?,
                account_id: account
                    .as_deref()
                    .map(|a| accounts.resolve(a))
                    .transpose()?
                    .map(|a| a.id),
                to_account_id: to
                    .as_deref()
                    .map(|t| accounts.resolve(t))
                    .transpose()?
                    .map(|a| a.id),
                category_id,
                notes,
            };

            let updated = service.update(txn.id, input)?;
            println!("Updated transaction {}", updated.id);
        }

        TransactionCommands::Delete { id } => {
            let txn = service.resolve(&id)?;
            let deleted = service.delete(txn.id)?;
            println!(
                "Deleted transaction {} ({} {})",
                deleted.id,
                deleted.transaction_type,
                settings.currency.format(deleted.amount)
            );
        }
    }

    Ok(())
}
