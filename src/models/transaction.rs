//! Transaction model
//!
//! Amounts are stored as positive magnitudes; the transaction type decides
//! whether money enters an account, leaves it, or moves between two accounts.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::category::CategoryType;
use super::ids::{AccountId, CategoryId, TransactionId};
use super::money::Money;

/// Kind of transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
    Transfer,
}

impl TransactionType {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "income" | "in" => Some(Self::Income),
            "expense" | "out" => Some(Self::Expense),
            "transfer" => Some(Self::Transfer),
            _ => None,
        }
    }

    /// The category type an income/expense transaction must use
    pub fn category_type(&self) -> Option<CategoryType> {
        match self {
            Self::Income => Some(CategoryType::Income),
            Self::Expense => Some(CategoryType::Expense),
            Self::Transfer => None,
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Income => write!(f, "Income"),
            Self::Expense => write!(f, "Expense"),
            Self::Transfer => write!(f, "Transfer"),
        }
    }
}

/// A single ledger entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: TransactionId,

    /// Positive magnitude
    pub amount: Money,

    #[serde(rename = "type")]
    pub transaction_type: TransactionType,

    /// Account the money enters (income), leaves (expense) or is moved from (transfer)
    pub account_id: AccountId,

    /// Destination of a transfer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to_account_id: Option<AccountId>,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    /// Local wall-clock time of the transaction
    pub date: NaiveDateTime,

    #[serde(default)]
    pub notes: String,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    /// Create a new transaction without a category
    pub fn new(
        transaction_type: TransactionType,
        account_id: AccountId,
        amount: Money,
        date: NaiveDateTime,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: TransactionId::new(),
            amount,
            transaction_type,
            account_id,
            to_account_id: None,
            category_id: None,
            date,
            notes: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn income(
        account_id: AccountId,
        category_id: Option<CategoryId>,
        amount: Money,
        date: NaiveDateTime,
    ) -> Self {
        let mut txn = Self::new(TransactionType::Income, account_id, amount, date);
        txn.category_id = category_id;
        txn
    }

    pub fn expense(
        account_id: AccountId,
        category_id: Option<CategoryId>,
        amount: Money,
        date: NaiveDateTime,
    ) -> Self {
        let mut txn = Self::new(TransactionType::Expense, account_id, amount, date);
        txn.category_id = category_id;
        txn
    }

    pub fn transfer(
        from: AccountId,
        to: AccountId,
        amount: Money,
        date: NaiveDateTime,
    ) -> Self {
        let mut txn = Self::new(TransactionType::Transfer, from, amount, date);
        txn.to_account_id = Some(to);
        txn
    }

    pub fn is_transfer(&self) -> bool {
        self.transaction_type == TransactionType::Transfer
    }

    /// Signed effect of this transaction on `account`
    pub fn delta_for(&self, account: AccountId) -> Money {
        let mut delta = Money::zero();
        match self.transaction_type {
            TransactionType::Income if self.account_id == account => delta += self.amount,
            TransactionType::Expense if self.account_id == account => delta -= self.amount,
            TransactionType::Transfer => {
                if self.account_id == account {
                    delta -= self.amount;
                }
                if self.to_account_id == Some(account) {
                    delta += self.amount;
                }
            }
            _ => {}
        }
        delta
    }

    /// Whether this transaction touches `account`
    pub fn involves(&self, account: AccountId) -> bool {
        self.account_id == account || self.to_account_id == Some(account)
    }

    /// Validate the transaction on its own
    pub fn validate(&self) -> Result<(), TransactionValidationError> {
        if !self.amount.is_positive() {
            return Err(TransactionValidationError::NonPositiveAmount(self.amount));
        }

        if self.amount > Money::MAX {
            return Err(TransactionValidationError::AmountTooLarge(self.amount));
        }

        match (self.transaction_type, self.to_account_id) {
            (TransactionType::Transfer, None) => {
                return Err(TransactionValidationError::MissingDestination)
            }
            (TransactionType::Transfer, Some(to)) if to == self.account_id => {
                return Err(TransactionValidationError::SameAccountTransfer)
            }
            (TransactionType::Transfer, Some(_)) if self.category_id.is_some() => {
                return Err(TransactionValidationError::TransferWithCategory)
            }
            (TransactionType::Income | TransactionType::Expense, Some(_)) => {
                return Err(TransactionValidationError::UnexpectedDestination)
            }
            _ => {}
        }

        Ok(())
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {}",
            self.date.format("%Y-%m-%d %H:%M"),
            self.transaction_type,
            self.amount
        )
    }
}

/// Validation errors for transactions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionValidationError {
    NonPositiveAmount(Money),
    AmountTooLarge(Money),
    MissingDestination,
    SameAccountTransfer,
    TransferWithCategory,
    UnexpectedDestination,
}

impl fmt::Display for TransactionValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NonPositiveAmount(amount) => {
                write!(f, "Transaction amount must be positive (got {})", amount)
            }
            Self::AmountTooLarge(amount) => {
                write!(f, "Transaction amount {} exceeds {}", amount, Money::MAX)
            }
            Self::MissingDestination => write!(f, "Transfer needs a destination account"),
            Self::SameAccountTransfer => {
                write!(f, "Transfer source and destination must differ")
            }
            Self::TransferWithCategory => {
                write!(f, "Transfer transactions should not have a category")
            }
            Self::UnexpectedDestination => {
                write!(f, "Only transfers can have a destination account")
            }
        }
    }
}

impl std::error::Error for TransactionValidationError {}
