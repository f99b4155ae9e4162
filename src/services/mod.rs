//! Service layer for the expense ledger
//!
//! Business logic on top of the storage layer: validation, keeping account
//! amounts in step with transactions, and the pure summary computations.

pub mod account;
pub mod aggregate;
pub mod category;
pub mod date_range;
pub mod summary;
pub mod transaction;

pub use account::{AccountService, CreateAccountInput, UpdateAccountInput};
pub use aggregate::{
    AccountBalance, AggregateFilter, AggregateResult, AggregationEngine, BalancePoint,
    BreakdownEntry, BreakdownKey, MissingReference, UNCATEGORIZED,
};
pub use category::CategoryService;
pub use date_range::DateRangeResolver;
pub use summary::{Dashboard, LiveSummary, Summary, SummaryService};
pub use transaction::{
    CreateTransactionInput, TransactionFilter, TransactionService, UpdateTransactionInput,
};
