//! Account service
//!
//! Account management: creation, edits, deletion guarded by existing
//! transactions, and lookups by name or id.

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Account, AccountId, AccountType, Money, StoredIcon};
use crate::storage::{StoreChange, Storage};

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new account
#[derive(Debug, Clone)]
pub struct CreateAccountInput {
    pub name: String,
    pub account_type: AccountType,
    /// Opening balance
    pub amount: Money,
    pub credit_limit: Money,
    pub icon: Option<StoredIcon>,
}

impl CreateAccountInput {
    pub fn new(name: impl Into<String>, account_type: AccountType) -> Self {
        Self {
            name: name.into(),
            account_type,
            amount: Money::zero(),
            credit_limit: Money::zero(),
            icon: None,
        }
    }
}

/// Fields to change on an existing account; `None` leaves a field alone
#[derive(Debug, Clone, Default)]
pub struct UpdateAccountInput {
    pub name: Option<String>,
    pub account_type: Option<AccountType>,
    /// Balance correction; replaces the stored amount
    pub amount: Option<Money>,
    pub credit_limit: Option<Money>,
    pub sequence: Option<i32>,
    pub icon: Option<StoredIcon>,
}

impl<'a> AccountService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account, placed last in display order
    pub fn create(&self, input: CreateAccountInput) -> ExpenseResult<Account> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(ExpenseError::Validation(
                "Account name cannot be empty".into(),
            ));
        }

        if self.storage.accounts.name_exists(name, None)? {
            return Err(ExpenseError::Duplicate {
                entity_type: "Account",
                identifier: name.to_string(),
            });
        }

        let mut account = Account::with_amount(name, input.account_type, input.amount);
        account.credit_limit = input.credit_limit;
        account.sequence = self.storage.accounts.next_sequence()?;
        if let Some(icon) = input.icon {
            account.icon = icon;
        }

        account
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_create(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;
        self.storage.notify(StoreChange::Accounts);

        tracing::info!(account = %account.id, name = %account.name, "created account");
        Ok(account)
    }

    pub fn get(&self, id: AccountId) -> ExpenseResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Find an account by name or id (short display form or full uuid)
    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Account>> {
        if let Some(account) = self.storage.accounts.get_by_name(identifier)? {
            return Ok(Some(account));
        }

        Ok(self
            .storage
            .accounts
            .get_all()?
            .into_iter()
            .find(|a| a.id.matches(identifier)))
    }

    /// Like [`find`](Self::find) but missing accounts are an error
    pub fn resolve(&self, identifier: &str) -> ExpenseResult<Account> {
        self.find(identifier)?
            .ok_or_else(|| ExpenseError::account_not_found(identifier))
    }

    /// All accounts in display order
    pub fn list(&self) -> ExpenseResult<Vec<Account>> {
        self.storage.accounts.get_all()
    }

    /// Sum of every account's amount
    pub fn total_balance(&self) -> ExpenseResult<Money> {
        Ok(self.list()?.iter().map(|a| a.amount).sum())
    }

    /// Number of transactions from or to an account
    pub fn transaction_count(&self, id: AccountId) -> ExpenseResult<usize> {
        Ok(self.storage.transactions.get_by_account(id)?.len())
    }

    /// Update an account
    pub fn update(&self, id: AccountId, input: UpdateAccountInput) -> ExpenseResult<Account> {
        let mut account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| ExpenseError::account_not_found(id.to_string()))?;

        let before = account.clone();

        if let Some(new_name) = input.name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(ExpenseError::Validation(
                    "Account name cannot be empty".into(),
                ));
            }

            if self.storage.accounts.name_exists(new_name, Some(id))? {
                return Err(ExpenseError::Duplicate {
                    entity_type: "Account",
                    identifier: new_name.to_string(),
                });
            }

            account.name = new_name.to_string();
        }

        if let Some(account_type) = input.account_type {
            account.account_type = account_type;
        }
        if let Some(amount) = input.amount {
            account.amount = amount;
        }
        if let Some(credit_limit) = input.credit_limit {
            account.credit_limit = credit_limit;
        }
        if let Some(sequence) = input.sequence {
            account.sequence = sequence;
        }
        if let Some(icon) = input.icon {
            account.icon = icon;
        }

        account.updated_at = Utc::now();

        account
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.accounts.upsert(account.clone())?;
        self.storage.accounts.save()?;

        self.storage.log_update(
            EntityType::Account,
            account.id.to_string(),
            Some(account.name.clone()),
            &before,
            &account,
        )?;
        self.storage.notify(StoreChange::Accounts);

        Ok(account)
    }

    /// Delete an account that no transaction references
    pub fn delete(&self, id: AccountId) -> ExpenseResult<Account> {
        let account = self
            .storage
            .accounts
            .get(id)?
            .ok_or_else(|| ExpenseError::account_not_found(id.to_string()))?;

        let count = self.transaction_count(id)?;
        if count > 0 {
            return Err(ExpenseError::InUse {
                entity_type: "Account",
                name: account.name,
                count,
            });
        }

        self.storage.accounts.delete(id)?;
        self.storage.accounts.save()?;

        self.storage.log_delete(
            EntityType::Account,
            id.to_string(),
            Some(account.name.clone()),
            &account,
        )?;
        self.storage.notify(StoreChange::Accounts);

        Ok(account)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::Transaction;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        let storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_create_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        let mut input = CreateAccountInput::new("Checking", AccountType::Bank);
        input.amount = Money::from_units(1000);
        let account = service.create(input).unwrap();

        assert_eq!(account.name, "Checking");
        assert_eq!(account.amount, Money::from_units(1000));
        assert_eq!(account.sequence, 0);

        let second = service
            .create(CreateAccountInput::new("Wallet", AccountType::Cash))
            .unwrap();
        assert_eq!(second.sequence, 1);
    }

    #[test]
    fn test_create_duplicate_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);

        service
            .create(CreateAccountInput::new("Checking", AccountType::Bank))
            .unwrap();
        let result = service.create(CreateAccountInput::new("checking", AccountType::Bank));
        assert!(matches!(result, Err(ExpenseError::Duplicate { .. })));
    }

    #[test]
    fn test_create_empty_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let result = service.create(CreateAccountInput::new("   ", AccountType::Cash));
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_find_by_name_or_id() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create(CreateAccountInput::new("Savings", AccountType::Bank))
            .unwrap();

        assert_eq!(service.find("savings").unwrap().unwrap().id, account.id);
        assert_eq!(
            service.find(&account.id.to_string()).unwrap().unwrap().id,
            account.id
        );
        assert!(service.find("nothing").unwrap().is_none());
        assert!(service.resolve("nothing").unwrap_err().is_not_found());
    }

    #[test]
    fn test_update_account() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create(CreateAccountInput::new("Card", AccountType::Credit))
            .unwrap();

        let updated = service
            .update(
                account.id,
                UpdateAccountInput {
                    name: Some("Visa".into()),
                    credit_limit: Some(Money::from_units(500)),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.name, "Visa");
        assert_eq!(updated.available_credit(), Some(Money::from_units(500)));

        let entries = storage.audit_logger().read_all().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[1].changes.as_deref().unwrap_or("").contains("name"));
    }

    #[test]
    fn test_delete_refused_while_in_use() {
        let (_temp_dir, storage) = create_test_storage();
        let service = AccountService::new(&storage);
        let account = service
            .create(CreateAccountInput::new("Wallet", AccountType::Cash))
            .unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let txn = Transaction::expense(account.id, None, Money::from_units(5), date);
        let txn_id = txn.id;
        storage.transactions.upsert(txn).unwrap();

        let result = service.delete(account.id);
        assert!(matches!(result, Err(ExpenseError::InUse { count: 1, .. })));

        storage.transactions.delete(txn_id).unwrap();
        service.delete(account.id).unwrap();
        assert!(service.get(account.id).unwrap().is_none());
    }

    #[test]
    fn test_mutations_notify_subscribers() {
        let (_temp_dir, storage) = create_test_storage();
        let rx = storage.subscribe().unwrap();
        let service = AccountService::new(&storage);
        service
            .create(CreateAccountInput::new("Wallet", AccountType::Cash))
            .unwrap();
        assert_eq!(rx.try_recv().unwrap(), StoreChange::Accounts);
    }
}
