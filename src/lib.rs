//! Expense Ledger - personal expense tracking from the terminal
//!
//! This library provides the core of the `expense` command: accounts,
//! income/expense categories and transactions stored as JSON, plus the
//! date-range aggregation behind the summary and dashboard views.
//!
//! # Architecture
//!
//! The crate is organized into the following modules:
//!
//! - `config`: Configuration and path management
//! - `error`: Custom error types
//! - `models`: Core data models (accounts, categories, transactions, date ranges)
//! - `storage`: JSON file storage layer with change notifications
//! - `services`: Business logic layer, including the aggregation engine
//! - `audit`: Audit logging system
//! - `display`: Terminal formatting
//! - `cli`: Command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_ledger::config::{paths::LedgerPaths, settings::Settings};
//! use expense_ledger::services::{AggregateFilter, SummaryService};
//! use expense_ledger::storage::Storage;
//!
//! let paths = LedgerPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let summary = SummaryService::new(&storage, &settings).summarize_default(&AggregateFilter::all())?;
//! ```

pub mod audit;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod models;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
