//! Aggregation engine
//!
//! Pure computation over immutable snapshots: totals and per-account and
//! per-category breakdowns for an interval, running balances, and current
//! account balances. Nothing here touches storage.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{
    Account, AccountId, AccountType, Category, CategoryId, DateInterval, Money, Transaction,
    TransactionId, TransactionType,
};

/// Label used for transactions without a (known) category
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Account and category selection; `None` selects everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateFilter {
    pub accounts: Option<HashSet<AccountId>>,
    pub categories: Option<HashSet<CategoryId>>,
}

impl AggregateFilter {
    /// Select every account and category
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_accounts(mut self, accounts: impl IntoIterator<Item = AccountId>) -> Self {
        self.accounts = Some(accounts.into_iter().collect());
        self
    }

    pub fn with_categories(mut self, categories: impl IntoIterator<Item = CategoryId>) -> Self {
        self.categories = Some(categories.into_iter().collect());
        self
    }

    fn matches_account(&self, account_id: AccountId) -> bool {
        self.accounts
            .as_ref()
            .map_or(true, |set| set.contains(&account_id))
    }

    /// A category filter never matches an uncategorized transaction
    fn matches_category(&self, category_id: Option<CategoryId>) -> bool {
        match (&self.categories, category_id) {
            (None, _) => true,
            (Some(set), Some(id)) => set.contains(&id),
            (Some(_), None) => false,
        }
    }
}

/// What a breakdown row groups by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BreakdownKey {
    Account(AccountId),
    Category(CategoryId),
    Uncategorized,
}

/// One row of a breakdown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakdownEntry {
    pub key: BreakdownKey,
    pub label: String,
    pub income: Money,
    /// Positive magnitude
    pub expense: Money,
    pub net: Money,
    pub count: usize,
}

impl BreakdownEntry {
    fn new(key: BreakdownKey, label: impl Into<String>) -> Self {
        Self {
            key,
            label: label.into(),
            income: Money::zero(),
            expense: Money::zero(),
            net: Money::zero(),
            count: 0,
        }
    }

    fn record(&mut self, txn: &Transaction) {
        match txn.transaction_type {
            TransactionType::Income => {
                self.income += txn.amount;
                self.net += txn.amount;
            }
            TransactionType::Expense => {
                self.expense += txn.amount;
                self.net -= txn.amount;
            }
            TransactionType::Transfer => return,
        }
        self.count += 1;
    }

    /// This row's expense as a percentage of `total`
    pub fn expense_share(&self, total: Money) -> f64 {
        if total.is_zero() {
            0.0
        } else {
            self.expense.cents() as f64 / total.cents() as f64 * 100.0
        }
    }
}

/// A transaction left out because its account is unknown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingReference {
    pub transaction_id: TransactionId,
    pub account_id: AccountId,
}

impl MissingReference {
    pub fn to_error(&self) -> ExpenseError {
        ExpenseError::MissingReference {
            transaction: self.transaction_id.to_string(),
            entity_type: "Account",
            identifier: self.account_id.to_string(),
        }
    }
}

/// Totals and breakdowns for one interval and filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateResult {
    pub interval: DateInterval,
    pub total_income: Money,
    /// Positive magnitude
    pub total_expense: Money,
    pub net: Money,
    /// Income and expense transactions counted
    pub transaction_count: usize,
    /// Ordered by account sequence, ties by id
    pub by_account: Vec<BreakdownEntry>,
    /// Ordered by category name, ties by id, uncategorized last
    pub by_category: Vec<BreakdownEntry>,
    pub missing: Vec<MissingReference>,
}

impl AggregateResult {
    fn empty(interval: DateInterval) -> Self {
        Self {
            interval,
            total_income: Money::zero(),
            total_expense: Money::zero(),
            net: Money::zero(),
            transaction_count: 0,
            by_account: Vec::new(),
            by_category: Vec::new(),
            missing: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_count == 0
    }
}

/// One step of an account's running balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalancePoint {
    pub transaction_id: TransactionId,
    pub date: NaiveDateTime,
    pub delta: Money,
    pub balance: Money,
}

/// Current standing of one account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountBalance {
    pub account_id: AccountId,
    pub name: String,
    pub account_type: AccountType,
    pub amount: Money,
    /// Only for credit accounts
    pub available_credit: Option<Money>,
}

/// Computes summaries over explicit account and category snapshots
pub struct AggregationEngine<'a> {
    accounts: HashMap<AccountId, &'a Account>,
    categories: HashMap<CategoryId, &'a Category>,
}

impl<'a> AggregationEngine<'a> {
    pub fn new(accounts: &'a [Account], categories: &'a [Category]) -> Self {
        Self {
            accounts: accounts.iter().map(|a| (a.id, a)).collect(),
            categories: categories.iter().map(|c| (c.id, c)).collect(),
        }
    }

    /// Summarize the transactions dated inside `interval` that pass `filter`
    ///
    /// Transfers count toward neither totals nor breakdowns. Transactions
    /// whose account is not in the snapshot are excluded and reported in
    /// [`AggregateResult::missing`].
    pub fn aggregate(
        &self,
        transactions: &[Transaction],
        interval: DateInterval,
        filter: &AggregateFilter,
    ) -> AggregateResult {
        let mut result = AggregateResult::empty(interval);
        let mut by_account: HashMap<AccountId, BreakdownEntry> = HashMap::new();
        let mut by_category: HashMap<BreakdownKey, BreakdownEntry> = HashMap::new();

        for txn in transactions.iter().filter(|t| interval.contains(t.date)) {
            if let Some(missing) = self.missing_account(txn) {
                tracing::warn!(
                    transaction = %txn.id,
                    account = %missing,
                    "excluding transaction that references a missing account"
                );
                result.missing.push(MissingReference {
                    transaction_id: txn.id,
                    account_id: missing,
                });
                continue;
            }

            if txn.is_transfer()
                || !filter.matches_account(txn.account_id)
                || !filter.matches_category(self.known_category(txn.category_id))
            {
                continue;
            }

            match txn.transaction_type {
                TransactionType::Income => result.total_income += txn.amount,
                TransactionType::Expense => result.total_expense += txn.amount,
                TransactionType::Transfer => continue,
            }
            result.transaction_count += 1;

            by_account
                .entry(txn.account_id)
                .or_insert_with(|| {
                    let label = self
                        .accounts
                        .get(&txn.account_id)
                        .map(|a| a.name.clone())
                        .unwrap_or_default();
                    BreakdownEntry::new(BreakdownKey::Account(txn.account_id), label)
                })
                .record(txn);

            let (key, label) = self.category_bucket(txn.category_id);
            by_category
                .entry(key)
                .or_insert_with(|| BreakdownEntry::new(key, label))
                .record(txn);
        }

        result.net = result.total_income - result.total_expense;
        result.by_account = self.order_accounts(by_account);
        result.by_category = self.order_categories(by_category);
        result
    }

    /// Chronological balance history of one account
    ///
    /// The stored amount is the closing balance; the opening balance is
    /// backed out of it so the last point always matches the account.
    pub fn running_balance(
        &self,
        account_id: AccountId,
        transactions: &[Transaction],
    ) -> ExpenseResult<Vec<BalancePoint>> {
        let account = self
            .accounts
            .get(&account_id)
            .ok_or_else(|| ExpenseError::account_not_found(account_id.to_string()))?;

        let mut relevant: Vec<&Transaction> =
            transactions.iter().filter(|t| t.involves(account_id)).collect();
        relevant.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then(a.created_at.cmp(&b.created_at))
                .then(a.id.cmp(&b.id))
        });

        let total: Money = relevant.iter().map(|t| t.delta_for(account_id)).sum();
        let mut balance = account.amount - total;

        Ok(relevant
            .into_iter()
            .map(|txn| {
                let delta = txn.delta_for(account_id);
                balance += delta;
                BalancePoint {
                    transaction_id: txn.id,
                    date: txn.date,
                    delta,
                    balance,
                }
            })
            .collect())
    }

    /// Every account with its amount, in display order
    pub fn account_balances(&self) -> Vec<AccountBalance> {
        let mut accounts: Vec<&Account> = self.accounts.values().copied().collect();
        accounts.sort_by(|a, b| a.sequence.cmp(&b.sequence).then(a.id.cmp(&b.id)));
        accounts
            .into_iter()
            .map(|a| AccountBalance {
                account_id: a.id,
                name: a.name.clone(),
                account_type: a.account_type,
                amount: a.amount,
                available_credit: a.available_credit(),
            })
            .collect()
    }

    /// Sum of every account amount
    pub fn total_balance(&self) -> Money {
        self.accounts.values().map(|a| a.amount).sum()
    }

    fn missing_account(&self, txn: &Transaction) -> Option<AccountId> {
        std::iter::once(txn.account_id)
            .chain(txn.to_account_id)
            .find(|id| !self.accounts.contains_key(id))
    }

    fn category_bucket(&self, category_id: Option<CategoryId>) -> (BreakdownKey, String) {
        match category_id.and_then(|id| self.categories.get(&id)) {
            Some(category) => (BreakdownKey::Category(category.id), category.name.clone()),
            None => (BreakdownKey::Uncategorized, UNCATEGORIZED.to_string()),
        }
    }

    /// The category id if it names a known category; unknown ids count as uncategorized
    fn known_category(&self, category_id: Option<CategoryId>) -> Option<CategoryId> {
        category_id.filter(|id| self.categories.contains_key(id))
    }

    fn order_accounts(&self, entries: HashMap<AccountId, BreakdownEntry>) -> Vec<BreakdownEntry> {
        let mut entries: Vec<(AccountId, BreakdownEntry)> = entries.into_iter().collect();
        entries.sort_by(|(a, _), (b, _)| {
            let seq_a = self.accounts.get(a).map_or(i32::MAX, |acc| acc.sequence);
            let seq_b = self.accounts.get(b).map_or(i32::MAX, |acc| acc.sequence);
            seq_a.cmp(&seq_b).then(a.cmp(b))
        });
        entries.into_iter().map(|(_, entry)| entry).collect()
    }

    fn order_categories(
        &self,
        entries: HashMap<BreakdownKey, BreakdownEntry>,
    ) -> Vec<BreakdownEntry> {
        let mut entries: Vec<BreakdownEntry> = entries.into_values().collect();
        entries.sort_by(|a, b| match (a.key, b.key) {
            (BreakdownKey::Uncategorized, BreakdownKey::Uncategorized) => {
                std::cmp::Ordering::Equal
            }
            (BreakdownKey::Uncategorized, _) => std::cmp::Ordering::Greater,
            (_, BreakdownKey::Uncategorized) => std::cmp::Ordering::Less,
            (BreakdownKey::Category(id_a), BreakdownKey::Category(id_b)) => {
                a.label.cmp(&b.label).then(id_a.cmp(&id_b))
            }
            _ => a.label.cmp(&b.label),
        });
        entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryType, DateRange};
    use crate::services::DateRangeResolver;
    use chrono::NaiveDate;

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    struct Fixture {
        accounts: Vec<Account>,
        categories: Vec<Category>,
    }

    impl Fixture {
        fn new() -> Self {
            let mut wallet = Account::new("Wallet", AccountType::Cash);
            wallet.sequence = 0;
            let mut bank = Account::new("Bank", AccountType::Bank);
            bank.sequence = 1;
            Self {
                accounts: vec![wallet, bank],
                categories: vec![
                    Category::new("Salary", CategoryType::Income),
                    Category::new("Food", CategoryType::Expense),
                    Category::new("Bills", CategoryType::Expense),
                ],
            }
        }

        fn wallet(&self) -> AccountId {
            self.accounts[0].id
        }

        fn bank(&self) -> AccountId {
            self.accounts[1].id
        }

        fn category(&self, name: &str) -> CategoryId {
            self.categories.iter().find(|c| c.name == name).unwrap().id
        }

        fn engine(&self) -> AggregationEngine<'_> {
            AggregationEngine::new(&self.accounts, &self.categories)
        }

        fn sample(&self) -> Vec<Transaction> {
            vec![
                Transaction::income(
                    self.wallet(),
                    Some(self.category("Salary")),
                    Money::from_units(1000),
                    at(2024, 1, 2, 9),
                ),
                Transaction::expense(
                    self.wallet(),
                    Some(self.category("Food")),
                    Money::from_cents(2550),
                    at(2024, 1, 3, 12),
                ),
                Transaction::expense(
                    self.bank(),
                    Some(self.category("Bills")),
                    Money::from_units(120),
                    at(2024, 1, 10, 8),
                ),
                Transaction::expense(self.bank(), None, Money::from_units(15), at(2024, 2, 1, 8)),
                Transaction::transfer(
                    self.wallet(),
                    self.bank(),
                    Money::from_units(200),
                    at(2024, 1, 15, 10),
                ),
            ]
        }
    }

    fn net_sum(entries: &[BreakdownEntry]) -> Money {
        entries.iter().map(|e| e.net).sum()
    }

    #[test]
    fn test_month_scenario() {
        let fx = Fixture::new();
        let transactions = vec![
            Transaction::income(fx.wallet(), None, Money::from_units(100), at(2024, 1, 5, 10)),
            Transaction::expense(fx.wallet(), None, Money::from_units(40), at(2024, 1, 6, 10)),
        ];
        let interval = DateRangeResolver::default()
            .resolve(&DateRange::ThisMonth, at(2024, 1, 31, 12))
            .unwrap();

        let result = fx
            .engine()
            .aggregate(&transactions, interval, &AggregateFilter::all());
        assert_eq!(result.total_income, Money::from_units(100));
        assert_eq!(result.total_expense, Money::from_units(40));
        assert_eq!(result.net, Money::from_units(60));
    }

    #[test]
    fn test_empty_input() {
        let fx = Fixture::new();
        let result = fx
            .engine()
            .aggregate(&[], DateInterval::unbounded(), &AggregateFilter::all());
        assert!(result.is_empty());
        assert!(result.total_income.is_zero());
        assert!(result.total_expense.is_zero());
        assert!(result.net.is_zero());
        assert!(result.by_account.is_empty());
        assert!(result.by_category.is_empty());
    }

    #[test]
    fn test_net_is_income_minus_expense() {
        let fx = Fixture::new();
        let result = fx.engine().aggregate(
            &fx.sample(),
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );
        assert_eq!(result.net, result.total_income - result.total_expense);
        assert_eq!(result.total_income, Money::from_units(1000));
        assert_eq!(result.total_expense, Money::from_cents(16050));
        for entry in result.by_account.iter().chain(&result.by_category) {
            assert_eq!(entry.net, entry.income - entry.expense);
        }
    }

    #[test]
    fn test_breakdowns_agree_over_all_time() {
        let fx = Fixture::new();
        let result = fx.engine().aggregate(
            &fx.sample(),
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );
        assert_eq!(net_sum(&result.by_account), net_sum(&result.by_category));
        assert_eq!(net_sum(&result.by_account), result.net);
        let counted: usize = result.by_category.iter().map(|e| e.count).sum();
        assert_eq!(counted, result.transaction_count);
    }

    #[test]
    fn test_aggregate_is_idempotent() {
        let fx = Fixture::new();
        let transactions = fx.sample();
        let engine = fx.engine();
        let interval = DateInterval::new(at(2024, 1, 1, 0), at(2024, 1, 31, 23));
        let first = engine.aggregate(&transactions, interval, &AggregateFilter::all());
        let second = engine.aggregate(&transactions, interval, &AggregateFilter::all());
        assert_eq!(first, second);
    }

    #[test]
    fn test_boundaries_are_inclusive() {
        let fx = Fixture::new();
        let transactions = vec![
            Transaction::expense(fx.wallet(), None, Money::from_units(1), at(2024, 1, 1, 0)),
            Transaction::expense(fx.wallet(), None, Money::from_units(2), at(2024, 1, 31, 23)),
            Transaction::expense(fx.wallet(), None, Money::from_units(4), at(2024, 2, 1, 0)),
        ];
        let interval = DateInterval::new(at(2024, 1, 1, 0), at(2024, 1, 31, 23));
        let result = fx
            .engine()
            .aggregate(&transactions, interval, &AggregateFilter::all());
        assert_eq!(result.total_expense, Money::from_units(3));
        assert_eq!(result.transaction_count, 2);
    }

    #[test]
    fn test_transfers_excluded_from_totals() {
        let fx = Fixture::new();
        let transactions = vec![Transaction::transfer(
            fx.wallet(),
            fx.bank(),
            Money::from_units(50),
            at(2024, 1, 5, 10),
        )];
        let result = fx.engine().aggregate(
            &transactions,
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );
        assert!(result.is_empty());
        assert!(result.by_account.is_empty());
    }

    #[test]
    fn test_breakdown_ordering() {
        let fx = Fixture::new();
        let result = fx.engine().aggregate(
            &fx.sample(),
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );

        let accounts: Vec<_> = result.by_account.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(accounts, vec!["Wallet", "Bank"]);

        let categories: Vec<_> = result.by_category.iter().map(|e| e.label.as_str()).collect();
        assert_eq!(categories, vec!["Bills", "Food", "Salary", UNCATEGORIZED]);
        assert_eq!(
            result.by_category.last().unwrap().key,
            BreakdownKey::Uncategorized
        );
    }

    #[test]
    fn test_account_filter() {
        let fx = Fixture::new();
        let filter = AggregateFilter::all().with_accounts([fx.bank()]);
        let result = fx
            .engine()
            .aggregate(&fx.sample(), DateInterval::unbounded(), &filter);
        assert!(result.total_income.is_zero());
        assert_eq!(result.total_expense, Money::from_units(135));
        assert_eq!(result.by_account.len(), 1);
    }

    #[test]
    fn test_explicit_all_accounts_equals_no_filter() {
        let fx = Fixture::new();
        let engine = fx.engine();
        let transactions = fx.sample();
        let everything = engine.aggregate(
            &transactions,
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );
        let explicit = engine.aggregate(
            &transactions,
            DateInterval::unbounded(),
            &AggregateFilter::all().with_accounts([fx.wallet(), fx.bank()]),
        );
        assert_eq!(everything, explicit);
    }

    #[test]
    fn test_category_filter_skips_uncategorized() {
        let fx = Fixture::new();
        let filter = AggregateFilter::all().with_categories([fx.category("Food")]);
        let result = fx
            .engine()
            .aggregate(&fx.sample(), DateInterval::unbounded(), &filter);
        assert_eq!(result.transaction_count, 1);
        assert_eq!(result.total_expense, Money::from_cents(2550));
        assert!(result
            .by_category
            .iter()
            .all(|e| e.key != BreakdownKey::Uncategorized));
    }

    #[test]
    fn test_category_filter_skips_unknown_category_id() {
        let fx = Fixture::new();
        let dangling = CategoryId::new();
        let transactions = vec![Transaction::expense(
            fx.wallet(),
            Some(dangling),
            Money::from_units(7),
            at(2024, 1, 5, 10),
        )];
        let result = fx.engine().aggregate(
            &transactions,
            DateInterval::unbounded(),
            &AggregateFilter::all().with_categories([dangling]),
        );
        assert_eq!(result.transaction_count, 0);
        assert!(result.by_category.is_empty());
        assert!(result.is_empty());
    }

    #[test]
    fn test_huge_amounts_do_not_overflow() {
        let fx = Fixture::new();
        let huge = Money::from_cents(i64::MAX);
        let transactions = vec![
            Transaction::income(fx.wallet(), None, huge, at(2024, 1, 5, 10)),
            Transaction::income(fx.wallet(), None, huge, at(2024, 1, 6, 10)),
        ];
        let result = fx.engine().aggregate(
            &transactions,
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );
        assert_eq!(result.transaction_count, 2);
        assert_eq!(result.total_income, huge);
        assert_eq!(result.net, huge);
    }

    #[test]
    fn test_unknown_category_is_uncategorized() {
        let fx = Fixture::new();
        let transactions = vec![Transaction::expense(
            fx.wallet(),
            Some(CategoryId::new()),
            Money::from_units(7),
            at(2024, 1, 5, 10),
        )];
        let result = fx.engine().aggregate(
            &transactions,
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );
        assert_eq!(result.by_category.len(), 1);
        assert_eq!(result.by_category[0].label, UNCATEGORIZED);
    }

    #[test]
    fn test_missing_account_is_reported_and_excluded() {
        let fx = Fixture::new();
        let ghost = AccountId::new();
        let orphan = Transaction::expense(ghost, None, Money::from_units(99), at(2024, 1, 5, 10));
        let orphan_id = orphan.id;
        let mut transactions = fx.sample();
        transactions.push(orphan);

        let result = fx.engine().aggregate(
            &transactions,
            DateInterval::unbounded(),
            &AggregateFilter::all(),
        );
        assert_eq!(result.total_expense, Money::from_cents(16050));
        assert_eq!(
            result.missing,
            vec![MissingReference {
                transaction_id: orphan_id,
                account_id: ghost,
            }]
        );
        assert!(matches!(
            result.missing[0].to_error(),
            ExpenseError::MissingReference { .. }
        ));
    }

    #[test]
    fn test_running_balance_ends_at_stored_amount() {
        let mut fx = Fixture::new();
        // Opening 50 + 1000 - 25.50 - 200 transfer out
        fx.accounts[0].amount = Money::from_cents(82450);
        let wallet = fx.wallet();
        let points = fx.engine().running_balance(wallet, &fx.sample()).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].balance, Money::from_units(1050));
        assert_eq!(points[1].delta, Money::from_cents(-2550));
        assert_eq!(points[2].delta, Money::from_units(-200));
        assert_eq!(points.last().unwrap().balance, fx.accounts[0].amount);
    }

    #[test]
    fn test_running_balance_unknown_account() {
        let fx = Fixture::new();
        let err = fx
            .engine()
            .running_balance(AccountId::new(), &fx.sample())
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_account_balances() {
        let mut fx = Fixture::new();
        let mut card = Account::with_amount("Visa", AccountType::Credit, Money::from_units(-300));
        card.credit_limit = Money::from_units(1000);
        card.sequence = 2;
        fx.accounts.push(card);
        fx.accounts[0].amount = Money::from_units(20);

        let engine = fx.engine();
        let balances = engine.account_balances();
        let names: Vec<_> = balances.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Wallet", "Bank", "Visa"]);
        assert_eq!(balances[2].available_credit, Some(Money::from_units(700)));
        assert!(balances[0].available_credit.is_none());
        assert_eq!(engine.total_balance(), Money::from_units(-280));
    }
}
