//! Core data models for the expense ledger
//!
//! Accounts, categories, transactions, money and the date-range selection
//! that every summary is computed over.

pub mod account;
pub mod category;
pub mod currency;
pub mod date_range;
pub mod icon;
pub mod ids;
pub mod money;
pub mod transaction;

pub use account::{Account, AccountType};
pub use category::{Category, CategoryType};
pub use currency::{Currency, SymbolPosition};
pub use date_range::{DateInterval, DateRange, DateRangeType};
pub use icon::StoredIcon;
pub use ids::{AccountId, CategoryId, TransactionId};
pub use money::Money;
pub use transaction::{Transaction, TransactionType};
