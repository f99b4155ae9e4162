//! Account CLI commands

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::account::{
    format_account_details, format_account_list, format_running_balance,
};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::AccountType;
use crate::services::{
    AccountService, AggregationEngine, CreateAccountInput, UpdateAccountInput,
};
use crate::storage::Storage;

use super::{icon_from_args, parse_money};

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account
    Create {
        /// Account name
        name: String,
        /// Account type (regular, bank, cash, credit)
        #[arg(short = 't', long = "type", default_value = "regular")]
        account_type: String,
        /// Opening balance (e.g., "1000.00" or "-250")
        #[arg(short, long, default_value = "0", allow_hyphen_values = true)]
        amount: String,
        /// Credit limit for credit accounts
        #[arg(long)]
        credit_limit: Option<String>,
        /// Icon name
        #[arg(long)]
        icon: Option<String>,
        /// Icon background colour (#rrggbb)
        #[arg(long)]
        color: Option<String>,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Edit an account
    Edit {
        /// Account name or ID
        account: String,
        /// New name
        #[arg(short, long)]
        name: Option<String>,
        /// New account type
        #[arg(short = 't', long = "type")]
        account_type: Option<String>,
        /// Correct the current balance
        #[arg(short, long, allow_hyphen_values = true)]
        amount: Option<String>,
        #[arg(long)]
        credit_limit: Option<String>,
        /// Position in display order
        #[arg(long)]
        sequence: Option<i32>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete an account without transactions
    Delete {
        /// Account name or ID
        account: String,
    },
    /// Show balances, or one account's balance history
    Balance {
        /// Account name or ID
        account: Option<String>,
    },
}

fn parse_account_type(input: &str) -> ExpenseResult<AccountType> {
    AccountType::parse(input).ok_or_else(|| {
        ExpenseError::Validation(format!(
            "Invalid account type: '{}'. Valid types: regular, bank, cash, credit",
            input
        ))
    })
}

/// Handle an account command
pub fn handle_account_command(
    storage: &Storage,
    settings: &Settings,
    cmd: AccountCommands,
) -> ExpenseResult<()> {
    let service = AccountService::new(storage);
    let currency = &settings.currency;

    match cmd {
        AccountCommands::Create {
            name,
            account_type,
            amount,
            credit_limit,
            icon,
            color,
        } => {
            let mut input = CreateAccountInput::new(name, parse_account_type(&account_type)?);
            input.amount = parse_money(&amount, "amount")?;
            if let Some(limit) = credit_limit {
                input.credit_limit = parse_money(&limit, "credit limit")?;
            }
            input.icon = icon_from_args(icon, color, None);

            let account = service.create(input)?;

            println!("Created account: {}", account.name);
            println!("  Type:    {}", account.account_type);
            println!("  Balance: {}", currency.format(account.amount));
            println!("  ID:      {}", account.id);
        }

        AccountCommands::List => {
            println!("{}", format_account_list(&service.list()?, currency));
        }

        AccountCommands::Show { account } => {
            let found = service.resolve(&account)?;
            let count = service.transaction_count(found.id)?;
            print!("{}", format_account_details(&found, count, currency));
        }

        AccountCommands::Edit {
            account,
            name,
            account_type,
            amount,
            credit_limit,
            sequence,
            icon,
            color,
        } => {
            let found = service.resolve(&account)?;

            let input = UpdateAccountInput {
                name,
                account_type: account_type
                    .as_deref()
                    .map(parse_account_type)
                    .transpose()?,
                amount: amount
                    .as_deref()
                    .map(|a| parse_money(a, "amount"))
                    .transpose()?,
                credit_limit: credit_limit
                    .as_deref()
                    .map(|c| parse_money(c, "credit limit"))
                    .transpose()?,
                sequence,
                icon: icon_from_args(icon, color, Some(&found.icon)),
            };

            let updated = service.update(found.id, input)?;
            println!("Updated account: {}", updated.name);
        }

        AccountCommands::Delete { account } => {
            let found = service.resolve(&account)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted account: {}", deleted.name);
        }

        AccountCommands::Balance { account: None } => {
            let accounts = service.list()?;
            let engine = AggregationEngine::new(&accounts, &[]);
            for balance in engine.account_balances() {
                match balance.available_credit {
                    Some(available) => println!(
                        "{:<24} {:>14}  (available {})",
                        balance.name,
                        currency.format(balance.amount),
                        currency.format(available)
                    ),
                    None => println!(
                        "{:<24} {:>14}",
                        balance.name,
                        currency.format(balance.amount)
                    ),
                }
            }
            println!("{:<24} {:>14}", "Total", currency.format(engine.total_balance()));
        }

        AccountCommands::Balance {
            account: Some(account),
        } => {
            let found = service.resolve(&account)?;
            let accounts = service.list()?;
            let transactions = storage.transactions.get_by_account(found.id)?;
            let points =
                AggregationEngine::new(&accounts, &[]).running_balance(found.id, &transactions)?;
            print!(
                "{}",
                format_running_balance(&found, &points, currency, &settings.date_format)
            );
        }
    }

    Ok(())
}
