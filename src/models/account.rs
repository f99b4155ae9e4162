//! Account model
//!
//! Represents the places money lives: bank accounts, cash, credit cards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::icon::{IconValidationError, StoredIcon};
use super::ids::AccountId;
use super::money::Money;

/// Type of account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// General purpose account
    #[default]
    Regular,
    /// Bank account
    Bank,
    /// Cash/wallet
    Cash,
    /// Credit card with a credit limit
    Credit,
}

impl AccountType {
    /// Credit accounts carry a limit and usually a negative amount
    pub fn is_credit(&self) -> bool {
        matches!(self, Self::Credit)
    }

    /// Parse account type from string
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "regular" => Some(Self::Regular),
            "bank" => Some(Self::Bank),
            "cash" | "wallet" => Some(Self::Cash),
            "credit" | "credit_card" | "creditcard" | "card" => Some(Self::Credit),
            _ => None,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Regular => write!(f, "Regular"),
            Self::Bank => write!(f, "Bank"),
            Self::Cash => write!(f, "Cash"),
            Self::Credit => write!(f, "Credit Card"),
        }
    }
}

/// An account holding money
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Account name (e.g., "Savings")
    pub name: String,

    /// Type of account
    #[serde(rename = "type")]
    pub account_type: AccountType,

    /// Current balance, kept in step with the account's transactions
    pub amount: Money,

    /// Credit limit; zero for non-credit accounts
    #[serde(default)]
    pub credit_limit: Money,

    /// Position in display order
    #[serde(default)]
    pub sequence: i32,

    #[serde(default)]
    pub icon: StoredIcon,

    /// When the account was created
    pub created_at: DateTime<Utc>,

    /// When the account was last modified
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        let now = Utc::now();
        Self {
            id: AccountId::new(),
            name: name.into(),
            account_type,
            amount: Money::zero(),
            credit_limit: Money::zero(),
            sequence: 0,
            icon: StoredIcon::default(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Create a new account with an opening amount
    pub fn with_amount(
        name: impl Into<String>,
        account_type: AccountType,
        amount: Money,
    ) -> Self {
        let mut account = Self::new(name, account_type);
        account.amount = amount;
        account
    }

    /// Credit still available on a credit account
    pub fn available_credit(&self) -> Option<Money> {
        if self.account_type.is_credit() {
            Some(self.credit_limit + self.amount)
        } else {
            None
        }
    }

    /// Apply a signed change to the stored amount
    pub fn apply(&mut self, delta: Money) {
        self.amount += delta;
        self.updated_at = Utc::now();
    }

    /// Validate the account
    pub fn validate(&self) -> Result<(), AccountValidationError> {
        if self.name.trim().is_empty() {
            return Err(AccountValidationError::EmptyName);
        }

        if self.name.len() > 100 {
            return Err(AccountValidationError::NameTooLong(self.name.len()));
        }

        if self.credit_limit.is_negative() {
            return Err(AccountValidationError::NegativeCreditLimit);
        }

        self.icon.validate().map_err(AccountValidationError::Icon)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.account_type)
    }
}

/// Validation errors for accounts
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccountValidationError {
    EmptyName,
    NameTooLong(usize),
    NegativeCreditLimit,
    Icon(IconValidationError),
}

impl fmt::Display for AccountValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Account name cannot be empty"),
            Self::NameTooLong(len) => {
                write!(f, "Account name too long ({} chars, max 100)", len)
            }
            Self::NegativeCreditLimit => write!(f, "Credit limit cannot be negative"),
            Self::Icon(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for AccountValidationError {}
