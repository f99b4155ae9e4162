//! Storage layer for the expense ledger
//!
//! JSON file repositories with atomic writes, an audit trail of every
//! mutation, and change notifications for observers that keep derived
//! views current.

pub mod accounts;
pub mod categories;
pub mod events;
pub mod file_io;
pub mod init;
pub mod transactions;

pub use accounts::AccountRepository;
pub use categories::CategoryRepository;
pub use events::{ChangeNotifier, StoreChange};
pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use transactions::TransactionRepository;

use std::sync::mpsc::Receiver;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use serde::Serialize;

use crate::audit::{AuditEntry, AuditLogger, EntityType};
use crate::config::paths::LedgerPaths;
use crate::error::ExpenseError;
use crate::models::{Account, Category, DateInterval, Transaction};

pub(crate) fn read_lock<T>(lock: &RwLock<T>) -> Result<RwLockReadGuard<'_, T>, ExpenseError> {
    lock.read()
        .map_err(|e| ExpenseError::Storage(format!("Failed to acquire read lock: {}", e)))
}

pub(crate) fn write_lock<T>(lock: &RwLock<T>) -> Result<RwLockWriteGuard<'_, T>, ExpenseError> {
    lock.write()
        .map_err(|e| ExpenseError::Storage(format!("Failed to acquire write lock: {}", e)))
}

/// Immutable copy of everything aggregation needs
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub accounts: Vec<Account>,
    pub categories: Vec<Category>,
    pub transactions: Vec<Transaction>,
}

/// Main storage coordinator that provides access to all repositories
pub struct Storage {
    paths: LedgerPaths,
    pub accounts: AccountRepository,
    pub categories: CategoryRepository,
    pub transactions: TransactionRepository,
    audit: AuditLogger,
    notifier: ChangeNotifier,
}

impl Storage {
    /// Create a new Storage instance; nothing is read until `load_all`
    pub fn new(paths: LedgerPaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            accounts: AccountRepository::new(paths.accounts_file()),
            categories: CategoryRepository::new(paths.categories_file()),
            transactions: TransactionRepository::new(paths.transactions_file()),
            audit: AuditLogger::new(paths.audit_log()),
            notifier: ChangeNotifier::new(),
            paths,
        })
    }

    pub fn paths(&self) -> &LedgerPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&self) -> Result<(), ExpenseError> {
        self.accounts.load()?;
        self.categories.load()?;
        self.transactions.load()?;
        tracing::debug!(
            accounts = self.accounts.count()?,
            categories = self.categories.count()?,
            transactions = self.transactions.count()?,
            "loaded ledger"
        );
        Ok(())
    }

    /// Save all data to disk
    pub fn save_all(&self) -> Result<(), ExpenseError> {
        self.accounts.save()?;
        self.categories.save()?;
        self.transactions.save()?;
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Append an entry to the audit log
    pub fn audit(&self, entry: &AuditEntry) -> Result<(), ExpenseError> {
        self.audit.log(entry)
    }

    pub fn log_create<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), ExpenseError> {
        self.audit(&AuditEntry::create(entity_type, entity_id, entity_name, entity))
    }

    pub fn log_update<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        before: &T,
        after: &T,
    ) -> Result<(), ExpenseError> {
        self.audit(&AuditEntry::update(
            entity_type,
            entity_id,
            entity_name,
            before,
            after,
        ))
    }

    pub fn log_delete<T: Serialize>(
        &self,
        entity_type: EntityType,
        entity_id: String,
        entity_name: Option<String>,
        entity: &T,
    ) -> Result<(), ExpenseError> {
        self.audit(&AuditEntry::delete(entity_type, entity_id, entity_name, entity))
    }

    pub fn audit_logger(&self) -> &AuditLogger {
        &self.audit
    }

    /// Receive a [`StoreChange`] after every committed mutation
    pub fn subscribe(&self) -> Result<Receiver<StoreChange>, ExpenseError> {
        self.notifier.subscribe()
    }

    pub fn notify(&self, change: StoreChange) {
        self.notifier.notify(change);
    }

    /// Accounts in display order
    pub fn accounts(&self) -> Result<Vec<Account>, ExpenseError> {
        self.accounts.get_all()
    }

    /// Categories sorted by name
    pub fn categories(&self) -> Result<Vec<Category>, ExpenseError> {
        self.categories.get_all()
    }

    /// Transactions, optionally limited to an inclusive interval
    pub fn transactions(
        &self,
        interval: Option<&DateInterval>,
    ) -> Result<Vec<Transaction>, ExpenseError> {
        match interval {
            Some(interval) => self.transactions.get_in_interval(interval),
            None => self.transactions.get_all(),
        }
    }

    /// Copy the current state for a pure computation
    pub fn snapshot(&self) -> Result<LedgerSnapshot, ExpenseError> {
        Ok(LedgerSnapshot {
            accounts: self.accounts()?,
            categories: self.categories()?,
            transactions: self.transactions(None)?,
        })
    }
}
