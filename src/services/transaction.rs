//! Transaction service
//!
//! Recording, editing and deleting transactions. Every change keeps the
//! stored amount of each affected account in step: income credits, expense
//! debits, a transfer debits its source and credits its destination.

use chrono::{NaiveDateTime, Utc};

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{
    AccountId, CategoryId, DateInterval, Money, Transaction, TransactionId, TransactionType,
};
use crate::storage::{StoreChange, Storage};

/// Service for transaction management
pub struct TransactionService<'a> {
    storage: &'a Storage,
}

/// Options for filtering transactions
#[derive(Debug, Clone, Default)]
pub struct TransactionFilter {
    /// Transactions from or to this account
    pub account_id: Option<AccountId>,
    pub category_id: Option<CategoryId>,
    pub interval: Option<DateInterval>,
    pub transaction_type: Option<TransactionType>,
    /// Maximum number of transactions to return
    pub limit: Option<usize>,
}

impl TransactionFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn account(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    pub fn category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn interval(mut self, interval: DateInterval) -> Self {
        self.interval = Some(interval);
        self
    }

    pub fn transaction_type(mut self, transaction_type: TransactionType) -> Self {
        self.transaction_type = Some(transaction_type);
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    fn matches(&self, txn: &Transaction) -> bool {
        self.account_id.map_or(true, |id| txn.involves(id))
            && self.category_id.map_or(true, |id| txn.category_id == Some(id))
            && self.interval.map_or(true, |i| i.contains(txn.date))
            && self
                .transaction_type
                .map_or(true, |t| txn.transaction_type == t)
    }
}

/// Input for recording a new transaction
#[derive(Debug, Clone)]
pub struct CreateTransactionInput {
    pub transaction_type: TransactionType,
    pub account_id: AccountId,
    /// Destination, for transfers only
    pub to_account_id: Option<AccountId>,
    /// Positive magnitude
    pub amount: Money,
    pub category_id: Option<CategoryId>,
    pub date: NaiveDateTime,
    pub notes: Option<String>,
}

/// Fields to change on a transaction; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateTransactionInput {
    pub amount: Option<Money>,
    pub date: Option<NaiveDateTime>,
    pub account_id: Option<AccountId>,
    pub to_account_id: Option<AccountId>,
    /// `Some(None)` clears the category
    pub category_id: Option<Option<CategoryId>>,
    pub notes: Option<String>,
}

impl<'a> TransactionService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Record a new transaction and apply it to its accounts
    pub fn create(&self, input: CreateTransactionInput) -> ExpenseResult<Transaction> {
        let mut txn = Transaction::new(
            input.transaction_type,
            input.account_id,
            input.amount,
            input.date,
        );
        txn.to_account_id = input.to_account_id;
        txn.category_id = input.category_id;
        if let Some(notes) = input.notes {
            txn.notes = notes.trim().to_string();
        }

        self.check(&txn)?;

        self.apply_effect(&txn, false)?;
        self.storage.transactions.upsert(txn.clone())?;
        self.commit()?;

        self.storage.log_create(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(describe(&txn)),
            &txn,
        )?;
        self.notify();

        tracing::info!(transaction = %txn.id, kind = %txn.transaction_type, amount = %txn.amount, "recorded transaction");
        Ok(txn)
    }

    pub fn get(&self, id: TransactionId) -> ExpenseResult<Option<Transaction>> {
        self.storage.transactions.get(id)
    }

    /// Find a transaction by its short display id or full uuid
    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Transaction>> {
        Ok(self
            .storage
            .transactions
            .get_all()?
            .into_iter()
            .find(|t| t.id.matches(identifier)))
    }

    pub fn resolve(&self, identifier: &str) -> ExpenseResult<Transaction> {
        self.find(identifier)?
            .ok_or_else(|| ExpenseError::transaction_not_found(identifier))
    }

    /// Transactions matching a filter, newest first
    pub fn list(&self, filter: TransactionFilter) -> ExpenseResult<Vec<Transaction>> {
        let source = match filter.account_id {
            Some(account_id) => self.storage.transactions.get_by_account(account_id)?,
            None => self.storage.transactions.get_all()?,
        };

        let matching = source.into_iter().filter(|t| filter.matches(t));
        Ok(match filter.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        })
    }

    pub fn count(&self) -> ExpenseResult<usize> {
        self.storage.transactions.count()
    }

    /// Change a transaction, moving its effect between accounts as needed
    pub fn update(
        &self,
        id: TransactionId,
        input: UpdateTransactionInput,
    ) -> ExpenseResult<Transaction> {
        let before = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| ExpenseError::transaction_not_found(id.to_string()))?;

        let mut txn = before.clone();
        if let Some(amount) = input.amount {
            txn.amount = amount;
        }
        if let Some(date) = input.date {
            txn.date = date;
        }
        if let Some(account_id) = input.account_id {
            txn.account_id = account_id;
        }
        if let Some(to_account_id) = input.to_account_id {
            txn.to_account_id = Some(to_account_id);
        }
        if let Some(category_id) = input.category_id {
            txn.category_id = category_id;
        }
        if let Some(notes) = input.notes {
            txn.notes = notes.trim().to_string();
        }
        txn.updated_at = Utc::now();

        self.check(&txn)?;

        self.apply_effect(&before, true)?;
        self.apply_effect(&txn, false)?;
        self.storage.transactions.upsert(txn.clone())?;
        self.commit()?;

        self.storage.log_update(
            EntityType::Transaction,
            txn.id.to_string(),
            Some(describe(&txn)),
            &before,
            &txn,
        )?;
        self.notify();

        Ok(txn)
    }

    /// Delete a transaction and reverse its effect on its accounts
    pub fn delete(&self, id: TransactionId) -> ExpenseResult<Transaction> {
        let txn = self
            .storage
            .transactions
            .get(id)?
            .ok_or_else(|| ExpenseError::transaction_not_found(id.to_string()))?;

        self.apply_effect(&txn, true)?;
        self.storage.transactions.delete(id)?;
        self.commit()?;

        self.storage.log_delete(
            EntityType::Transaction,
            id.to_string(),
            Some(describe(&txn)),
            &txn,
        )?;
        self.notify();

        Ok(txn)
    }

    /// Validate a transaction against the model rules and current storage
    fn check(&self, txn: &Transaction) -> ExpenseResult<()> {
        txn.validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        for account_id in std::iter::once(txn.account_id).chain(txn.to_account_id) {
            if self.storage.accounts.get(account_id)?.is_none() {
                return Err(ExpenseError::account_not_found(account_id.to_string()));
            }
        }

        if let Some(category_id) = txn.category_id {
            let category = self
                .storage
                .categories
                .get(category_id)?
                .ok_or_else(|| ExpenseError::category_not_found(category_id.to_string()))?;

            if txn.transaction_type.category_type() != Some(category.category_type) {
                return Err(ExpenseError::Validation(format!(
                    "Category '{}' is a {} category and cannot be used for {}",
                    category.name,
                    category.category_type,
                    txn.transaction_type.to_string().to_lowercase()
                )));
            }
        }

        Ok(())
    }

    /// Add (or with `reverse`, take back) a transaction's effect on each
    /// account it touches
    fn apply_effect(&self, txn: &Transaction, reverse: bool) -> ExpenseResult<()> {
        for account_id in std::iter::once(txn.account_id).chain(txn.to_account_id) {
            let Some(mut account) = self.storage.accounts.get(account_id)? else {
                // Only reachable when reversing a transaction whose account is gone
                tracing::warn!(
                    transaction = %txn.id,
                    account = %account_id,
                    "account missing while reversing transaction"
                );
                continue;
            };

            let delta = txn.delta_for(account_id);
            account.apply(if reverse { -delta } else { delta });
            self.storage.accounts.upsert(account)?;
        }
        Ok(())
    }

    fn commit(&self) -> ExpenseResult<()> {
        self.storage.transactions.save()?;
        self.storage.accounts.save()
    }

    fn notify(&self) {
        self.storage.notify(StoreChange::Transactions);
        self.storage.notify(StoreChange::Accounts);
    }
}

fn describe(txn: &Transaction) -> String {
    format!("{} {} {}", txn.date.format("%Y-%m-%d"), txn.transaction_type, txn.amount)
}
