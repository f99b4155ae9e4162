//! Audit history command

use clap::Args;

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::storage::Storage;

/// Arguments for `history`
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Number of entries to show
    #[arg(short, long, default_value = "20")]
    pub limit: usize,
    /// Only changes to accounts, categories, transactions or settings
    #[arg(short, long)]
    pub entity: Option<String>,
}

/// Print the most recent audit entries, oldest first
pub fn handle_history_command(storage: &Storage, args: HistoryArgs) -> ExpenseResult<()> {
    let logger = storage.audit_logger();
    let entries = match args.entity.as_deref() {
        Some(kind) => {
            let entity_type = EntityType::parse(kind).ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Unknown entity '{}'. Use account, category, transaction or settings",
                    kind
                ))
            })?;
            logger.read_recent_for(entity_type, args.limit)?
        }
        None => logger.read_recent(args.limit)?,
    };

    if entries.is_empty() {
        println!("No history recorded yet.");
        return Ok(());
    }

    for entry in &entries {
        println!("{}", entry.format_human_readable());
    }

    Ok(())
}
