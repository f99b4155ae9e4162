//! Transaction repository for JSON storage
//!
//! Manages loading and saving transactions to transactions.json, with an
//! index from account to the transactions touching it.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::{AccountId, CategoryId, DateInterval, Transaction, TransactionId};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct TransactionData {
    transactions: Vec<Transaction>,
}

/// Repository for transaction persistence with an account index
pub struct TransactionRepository {
    path: PathBuf,
    data: RwLock<HashMap<TransactionId, Transaction>>,
    /// Index: account_id -> ids of transactions from or to that account
    by_account: RwLock<HashMap<AccountId, Vec<TransactionId>>>,
}

fn index_accounts(txn: &Transaction) -> impl Iterator<Item = AccountId> {
    std::iter::once(txn.account_id).chain(txn.to_account_id)
}

/// Newest first, ties by creation time then id
fn newest_first(a: &Transaction, b: &Transaction) -> std::cmp::Ordering {
    b.date
        .cmp(&a.date)
        .then(b.created_at.cmp(&a.created_at))
        .then(b.id.cmp(&a.id))
}

impl TransactionRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
            by_account: RwLock::new(HashMap::new()),
        }
    }

    /// Load transactions from disk and rebuild the index
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: TransactionData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        let mut by_account = write_lock(&self.by_account)?;
        data.clear();
        by_account.clear();

        for txn in file_data.transactions {
            for account_id in index_accounts(&txn) {
                by_account.entry(account_id).or_default().push(txn.id);
            }
            data.insert(txn.id, txn);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), ExpenseError> {
        let file_data = TransactionData {
            transactions: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: TransactionId) -> Result<Option<Transaction>, ExpenseError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All transactions, newest first
    pub fn get_all(&self) -> Result<Vec<Transaction>, ExpenseError> {
        let data = read_lock(&self.data)?;
        let mut transactions: Vec<_> = data.values().cloned().collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    /// Transactions from or to an account, newest first
    pub fn get_by_account(&self, account_id: AccountId) -> Result<Vec<Transaction>, ExpenseError> {
        let data = read_lock(&self.data)?;
        let by_account = read_lock(&self.by_account)?;

        let ids = by_account.get(&account_id).map(|v| v.as_slice()).unwrap_or(&[]);
        let mut transactions: Vec<_> = ids.iter().filter_map(|id| data.get(id).cloned()).collect();
        transactions.sort_by(newest_first);
        Ok(transactions)
    }

    pub fn get_by_category(&self, category_id: CategoryId) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| t.category_id == Some(category_id))
            .collect())
    }

    /// Transactions dated inside an inclusive interval, newest first
    pub fn get_in_interval(&self, interval: &DateInterval) -> Result<Vec<Transaction>, ExpenseError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|t| interval.contains(t.date))
            .collect())
    }

    /// Insert or update a transaction, keeping the account index current
    pub fn upsert(&self, txn: Transaction) -> Result<(), ExpenseError> {
        let mut data = write_lock(&self.data)?;
        let mut by_account = write_lock(&self.by_account)?;

        if let Some(old) = data.get(&txn.id) {
            for account_id in index_accounts(old) {
                if let Some(ids) = by_account.get_mut(&account_id) {
                    ids.retain(|&id| id != txn.id);
                }
            }
        }

        for account_id in index_accounts(&txn) {
            by_account.entry(account_id).or_default().push(txn.id);
        }

        data.insert(txn.id, txn);
        Ok(())
    }

    pub fn delete(&self, id: TransactionId) -> Result<bool, ExpenseError> {
        let mut data = write_lock(&self.data)?;
        let mut by_account = write_lock(&self.by_account)?;

        let Some(txn) = data.remove(&id) else {
            return Ok(false);
        };
        for account_id in index_accounts(&txn) {
            if let Some(ids) = by_account.get_mut(&account_id) {
                ids.retain(|&tid| tid != id);
            }
        }
        Ok(true)
    }

    pub fn count(&self) -> Result<usize, ExpenseError> {
        Ok(read_lock(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use chrono::{NaiveDate, NaiveDateTime};
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, TransactionRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn test_get_by_account_includes_transfer_destination() {
        let (_temp_dir, repo) = create_test_repo();
        let wallet = AccountId::new();
        let bank = AccountId::new();

        repo.upsert(Transaction::expense(wallet, None, Money::from_units(5), day(1)))
            .unwrap();
        repo.upsert(Transaction::transfer(wallet, bank, Money::from_units(10), day(2)))
            .unwrap();

        assert_eq!(repo.get_by_account(wallet).unwrap().len(), 2);
        assert_eq!(repo.get_by_account(bank).unwrap().len(), 1);
    }

    #[test]
    fn test_upsert_moves_index_entries() {
        let (_temp_dir, repo) = create_test_repo();
        let wallet = AccountId::new();
        let bank = AccountId::new();

        let mut txn = Transaction::expense(wallet, None, Money::from_units(5), day(1));
        repo.upsert(txn.clone()).unwrap();

        txn.account_id = bank;
        repo.upsert(txn).unwrap();

        assert!(repo.get_by_account(wallet).unwrap().is_empty());
        assert_eq!(repo.get_by_account(bank).unwrap().len(), 1);
        assert_eq!(repo.count().unwrap(), 1);
    }

    #[test]
    fn test_interval_query_is_inclusive() {
        let (_temp_dir, repo) = create_test_repo();
        let wallet = AccountId::new();
        for d in [10, 15, 20] {
            repo.upsert(Transaction::expense(wallet, None, Money::from_units(1), day(d)))
                .unwrap();
        }

        let interval = DateInterval::new(day(10), day(15));
        let found = repo.get_in_interval(&interval).unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].date, day(15));
    }

    #[test]
    fn test_save_reload_and_delete() {
        let (temp_dir, repo) = create_test_repo();
        let wallet = AccountId::new();
        let txn = Transaction::income(wallet, None, Money::from_units(100), day(3));
        let id = txn.id;
        repo.upsert(txn).unwrap();
        repo.save().unwrap();

        let repo2 = TransactionRepository::new(temp_dir.path().join("transactions.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get_by_account(wallet).unwrap().len(), 1);

        assert!(repo2.delete(id).unwrap());
        assert!(repo2.get_by_account(wallet).unwrap().is_empty());
        assert!(!repo2.delete(id).unwrap());
    }
}
