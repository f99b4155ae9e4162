//! Storage initialization
//!
//! Handles first-run setup: default categories and a starter account

use crate::config::paths::LedgerPaths;
use crate::error::ExpenseError;
use crate::models::{Account, AccountType, Category, CategoryType, StoredIcon};

use super::accounts::AccountData;
use super::categories::CategoryData;
use super::file_io::write_json_atomic;

const DEFAULT_INCOME: &[(&str, &str, &str)] = &[
    ("Salary", "briefcase", "#2e7d32"),
    ("Business", "store", "#00838f"),
    ("Gifts", "gift", "#ad1457"),
];

const DEFAULT_EXPENSE: &[(&str, &str, &str)] = &[
    ("Food", "restaurant", "#ef6c00"),
    ("Shopping", "shopping_bag", "#6a1b9a"),
    ("Transport", "car", "#1565c0"),
    ("Bills", "receipt", "#c62828"),
    ("Health", "heart", "#d81b60"),
    ("Entertainment", "movie", "#f9a825"),
];

/// Initialize storage for a fresh installation
///
/// Existing files are left untouched.
pub fn initialize_storage(paths: &LedgerPaths) -> Result<(), ExpenseError> {
    paths.ensure_directories()?;

    if !paths.categories_file().exists() {
        create_default_categories(paths)?;
    }

    if !paths.accounts_file().exists() {
        create_default_account(paths)?;
    }

    Ok(())
}

fn create_default_categories(paths: &LedgerPaths) -> Result<(), ExpenseError> {
    let seed = |defaults: &[(&str, &str, &str)], category_type: CategoryType| {
        defaults
            .iter()
            .map(move |(name, icon, color)| {
                Category::with_icon(*name, category_type, StoredIcon::new(*icon, *color))
            })
            .collect::<Vec<_>>()
    };

    let mut categories = seed(DEFAULT_INCOME, CategoryType::Income);
    categories.extend(seed(DEFAULT_EXPENSE, CategoryType::Expense));
    categories.sort_by(|a, b| a.name.cmp(&b.name));

    write_json_atomic(paths.categories_file(), &CategoryData { categories })
}

fn create_default_account(paths: &LedgerPaths) -> Result<(), ExpenseError> {
    let cash = Account::new("Cash", AccountType::Cash);
    write_json_atomic(
        paths.accounts_file(),
        &AccountData {
            accounts: vec![cash],
        },
    )
}

/// Check if storage needs initialization
pub fn needs_initialization(paths: &LedgerPaths) -> bool {
    !paths.categories_file().exists() || !paths.accounts_file().exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read_categories(paths: &LedgerPaths) -> CategoryData {
        let content = std::fs::read_to_string(paths.categories_file()).unwrap();
        serde_json::from_str(&content).unwrap()
    }

    #[test]
    fn test_initialize_storage() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert!(needs_initialization(&paths));
        initialize_storage(&paths).unwrap();
        assert!(!needs_initialization(&paths));
        assert!(paths.data_dir().exists());
    }

    #[test]
    fn test_default_data_created() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let data = read_categories(&paths);
        assert_eq!(data.categories.len(), 9);
        let income: Vec<_> = data
            .categories
            .iter()
            .filter(|c| c.category_type == CategoryType::Income)
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(income, vec!["Business", "Gifts", "Salary"]);

        let content = std::fs::read_to_string(paths.accounts_file()).unwrap();
        let accounts: AccountData = serde_json::from_str(&content).unwrap();
        assert_eq!(accounts.accounts.len(), 1);
        assert_eq!(accounts.accounts[0].name, "Cash");
    }

    #[test]
    fn test_doesnt_overwrite_existing() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        initialize_storage(&paths).unwrap();

        let custom = CategoryData {
            categories: vec![Category::new("Custom", CategoryType::Expense)],
        };
        write_json_atomic(paths.categories_file(), &custom).unwrap();

        initialize_storage(&paths).unwrap();

        let data = read_categories(&paths);
        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.categories[0].name, "Custom");
    }
}
