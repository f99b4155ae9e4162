//! Category service
//!
//! Income and expense category management.

use chrono::Utc;

use crate::audit::EntityType;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Category, CategoryId, CategoryType, StoredIcon};
use crate::storage::{StoreChange, Storage};

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category
    pub fn create(
        &self,
        name: &str,
        category_type: CategoryType,
        icon: Option<StoredIcon>,
    ) -> ExpenseResult<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ExpenseError::Validation(
                "Category name cannot be empty".into(),
            ));
        }

        if self.storage.categories.name_exists(name, None)? {
            return Err(ExpenseError::Duplicate {
                entity_type: "Category",
                identifier: name.to_string(),
            });
        }

        let category = match icon {
            Some(icon) => Category::with_icon(name, category_type, icon),
            None => Category::new(name, category_type),
        };

        category
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_create(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        self.storage.notify(StoreChange::Categories);

        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> ExpenseResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    /// Find a category by name or id
    pub fn find(&self, identifier: &str) -> ExpenseResult<Option<Category>> {
        if let Some(category) = self.storage.categories.get_by_name(identifier)? {
            return Ok(Some(category));
        }

        Ok(self
            .storage
            .categories
            .get_all()?
            .into_iter()
            .find(|c| c.id.matches(identifier)))
    }

    pub fn resolve(&self, identifier: &str) -> ExpenseResult<Category> {
        self.find(identifier)?
            .ok_or_else(|| ExpenseError::category_not_found(identifier))
    }

    /// All categories sorted by name
    pub fn list(&self) -> ExpenseResult<Vec<Category>> {
        self.storage.categories.get_all()
    }

    pub fn list_by_type(&self, category_type: CategoryType) -> ExpenseResult<Vec<Category>> {
        self.storage.categories.get_by_type(category_type)
    }

    /// Update a category's name, type or icon
    pub fn update(
        &self,
        id: CategoryId,
        name: Option<&str>,
        category_type: Option<CategoryType>,
        icon: Option<StoredIcon>,
    ) -> ExpenseResult<Category> {
        let mut category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| ExpenseError::category_not_found(id.to_string()))?;

        let before = category.clone();

        if let Some(new_name) = name {
            let new_name = new_name.trim();
            if new_name.is_empty() {
                return Err(ExpenseError::Validation(
                    "Category name cannot be empty".into(),
                ));
            }

            if self.storage.categories.name_exists(new_name, Some(id))? {
                return Err(ExpenseError::Duplicate {
                    entity_type: "Category",
                    identifier: new_name.to_string(),
                });
            }

            category.name = new_name.to_string();
        }

        if let Some(category_type) = category_type {
            if category_type != category.category_type {
                let count = self.storage.transactions.get_by_category(id)?.len();
                if count > 0 {
                    return Err(ExpenseError::InUse {
                        entity_type: "Category",
                        name: category.name,
                        count,
                    });
                }
            }
            category.category_type = category_type;
        }

        if let Some(icon) = icon {
            category.icon = icon;
        }

        category.updated_at = Utc::now();

        category
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.categories.upsert(category.clone())?;
        self.storage.categories.save()?;

        self.storage.log_update(
            EntityType::Category,
            category.id.to_string(),
            Some(category.name.clone()),
            &before,
            &category,
        )?;
        self.storage.notify(StoreChange::Categories);

        Ok(category)
    }

    /// Delete a category that no transaction references
    pub fn delete(&self, id: CategoryId) -> ExpenseResult<Category> {
        let category = self
            .storage
            .categories
            .get(id)?
            .ok_or_else(|| ExpenseError::category_not_found(id.to_string()))?;

        let count = self.storage.transactions.get_by_category(id)?.len();
        if count > 0 {
            return Err(ExpenseError::InUse {
                entity_type: "Category",
                name: category.name,
                count,
            });
        }

        self.storage.categories.delete(id)?;
        self.storage.categories.save()?;

        self.storage.log_delete(
            EntityType::Category,
            id.to_string(),
            Some(category.name.clone()),
            &category,
        )?;
        self.storage.notify(StoreChange::Categories);

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::LedgerPaths;
    use crate::models::{AccountId, Money, Transaction};
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
    fn test_create_and_list() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);

        service.create("Salary", CategoryType::Income, None).unwrap();
        service.create("Food", CategoryType::Expense, None).unwrap();

        let names: Vec<_> = service.list().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Food", "Salary"]);
        assert_eq!(service.list_by_type(CategoryType::Income).unwrap().len(), 1);
    }

    #[test]
    fn test_duplicate_name() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        service.create("Food", CategoryType::Expense, None).unwrap();
        let result = service.create("FOOD", CategoryType::Expense, None);
        assert!(matches!(result, Err(ExpenseError::Duplicate { .. })));
    }

    #[test]
    fn test_invalid_icon_rejected() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let result = service.create(
            "Food",
            CategoryType::Expense,
            Some(StoredIcon::new("restaurant", "orange")),
        );
        assert!(result.unwrap_err().is_validation());
    }

    #[test]
    fn test_update_and_find() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Food", CategoryType::Expense, None).unwrap();

        service
            .update(category.id, Some("Groceries"), None, None)
            .unwrap();
        assert!(service.find("food").unwrap().is_none());
        assert_eq!(
            service.find("groceries").unwrap().unwrap().id,
            category.id
        );
        assert_eq!(
            service.find(&category.id.to_string()).unwrap().unwrap().name,
            "Groceries"
        );
    }

    #[test]
    fn test_delete_refused_while_in_use() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Food", CategoryType::Expense, None).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let txn = Transaction::expense(
            AccountId::new(),
            Some(category.id),
            Money::from_units(3),
            date,
        );
        storage.transactions.upsert(txn).unwrap();

        let result = service.delete(category.id);
        assert!(matches!(result, Err(ExpenseError::InUse { count: 1, .. })));

        let result = service.update(category.id, None, Some(CategoryType::Income), None);
        assert!(matches!(result, Err(ExpenseError::InUse { .. })));
    }

    #[test]
    fn test_delete_unused() {
        let (_temp_dir, storage) = create_test_storage();
        let service = CategoryService::new(&storage);
        let category = service.create("Gifts", CategoryType::Income, None).unwrap();
        service.delete(category.id).unwrap();
        assert!(service.get(category.id).unwrap().is_none());
    }
}
