//! Display formatting for terminal output
//!
//! Tables for lists, aligned detail views, and the summary report.

pub mod account;
pub mod category;
pub mod format;
pub mod summary;
pub mod transaction;

pub use account::{format_account_details, format_account_list, format_running_balance};
pub use category::{format_category_details, format_category_list};
pub use summary::{format_dashboard, format_summary, Breakdown};
pub use transaction::{format_transaction_line, format_transaction_register, RegisterContext};
