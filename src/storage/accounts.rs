//! Account repository for JSON storage
//!
//! Manages loading and saving accounts to accounts.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::{Account, AccountId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct AccountData {
    pub(crate) accounts: Vec<Account>,
}

/// Repository for account persistence
pub struct AccountRepository {
    path: PathBuf,
    data: RwLock<HashMap<AccountId, Account>>,
}

impl AccountRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load accounts from disk, replacing what is in memory
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: AccountData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        data.clear();
        for account in file_data.accounts {
            data.insert(account.id, account);
        }

        Ok(())
    }

    /// Save accounts to disk in display order
    pub fn save(&self) -> Result<(), ExpenseError> {
        let file_data = AccountData {
            accounts: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: AccountId) -> Result<Option<Account>, ExpenseError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All accounts ordered by sequence, ties broken by id
    pub fn get_all(&self) -> Result<Vec<Account>, ExpenseError> {
        let data = read_lock(&self.data)?;
        let mut accounts: Vec<_> = data.values().cloned().collect();
        accounts.sort_by(|a, b| a.sequence.cmp(&b.sequence).then(a.id.cmp(&b.id)));
        Ok(accounts)
    }

    /// Get an account by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Account>, ExpenseError> {
        let name_lower = name.trim().to_lowercase();
        Ok(read_lock(&self.data)?
            .values()
            .find(|a| a.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, account: Account) -> Result<(), ExpenseError> {
        write_lock(&self.data)?.insert(account.id, account);
        Ok(())
    }

    pub fn delete(&self, id: AccountId) -> Result<bool, ExpenseError> {
        Ok(write_lock(&self.data)?.remove(&id).is_some())
    }

    /// Check if an account name is already taken
    pub fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<AccountId>,
    ) -> Result<bool, ExpenseError> {
        let name_lower = name.trim().to_lowercase();
        Ok(read_lock(&self.data)?
            .values()
            .any(|a| a.name.to_lowercase() == name_lower && Some(a.id) != exclude_id))
    }

    /// Sequence number that places a new account last
    pub fn next_sequence(&self) -> Result<i32, ExpenseError> {
        Ok(read_lock(&self.data)?
            .values()
            .map(|a| a.sequence)
            .max()
            .map_or(0, |max| max + 1))
    }

    pub fn count(&self) -> Result<usize, ExpenseError> {
        Ok(read_lock(&self.data)?.len())
    }
}
