//! Category repository for JSON storage
//!
//! Manages loading and saving categories to categories.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::{Category, CategoryId, CategoryType};

use super::file_io::{read_json, write_json_atomic};
use super::{read_lock, write_lock};

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub(crate) struct CategoryData {
    pub(crate) categories: Vec<Category>,
}

/// Repository for category persistence
pub struct CategoryRepository {
    path: PathBuf,
    data: RwLock<HashMap<CategoryId, Category>>,
}

impl CategoryRepository {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: CategoryData = read_json(&self.path)?;

        let mut data = write_lock(&self.data)?;
        data.clear();
        for category in file_data.categories {
            data.insert(category.id, category);
        }

        Ok(())
    }

    pub fn save(&self) -> Result<(), ExpenseError> {
        let file_data = CategoryData {
            categories: self.get_all()?,
        };
        write_json_atomic(&self.path, &file_data)
    }

    pub fn get(&self, id: CategoryId) -> Result<Option<Category>, ExpenseError> {
        Ok(read_lock(&self.data)?.get(&id).cloned())
    }

    /// All categories sorted by name, ties broken by id
    pub fn get_all(&self) -> Result<Vec<Category>, ExpenseError> {
        let data = read_lock(&self.data)?;
        let mut categories: Vec<_> = data.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(categories)
    }

    pub fn get_by_type(&self, category_type: CategoryType) -> Result<Vec<Category>, ExpenseError> {
        Ok(self
            .get_all()?
            .into_iter()
            .filter(|c| c.category_type == category_type)
            .collect())
    }

    /// Get a category by name (case-insensitive)
    pub fn get_by_name(&self, name: &str) -> Result<Option<Category>, ExpenseError> {
        let name_lower = name.trim().to_lowercase();
        Ok(read_lock(&self.data)?
            .values()
            .find(|c| c.name.to_lowercase() == name_lower)
            .cloned())
    }

    pub fn upsert(&self, category: Category) -> Result<(), ExpenseError> {
        write_lock(&self.data)?.insert(category.id, category);
        Ok(())
    }

    pub fn delete(&self, id: CategoryId) -> Result<bool, ExpenseError> {
        Ok(write_lock(&self.data)?.remove(&id).is_some())
    }

    /// Check if a category name is already taken
    pub fn name_exists(
        &self,
        name: &str,
        exclude_id: Option<CategoryId>,
    ) -> Result<bool, ExpenseError> {
        let name_lower = name.trim().to_lowercase();
        Ok(read_lock(&self.data)?
            .values()
            .any(|c| c.name.to_lowercase() == name_lower && Some(c.id) != exclude_id))
    }

    pub fn count(&self) -> Result<usize, ExpenseError> {
        Ok(read_lock(&self.data)?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_repo() -> (TempDir, CategoryRepository) {
        let temp_dir = TempDir::new().unwrap();
        let repo = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo.load().unwrap();
        (temp_dir, repo)
    }

    #[test]
    fn test_get_all_sorted_by_name() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Category::new("Transport", CategoryType::Expense)).unwrap();
        repo.upsert(Category::new("Bills", CategoryType::Expense)).unwrap();
        repo.upsert(Category::new("Salary", CategoryType::Income)).unwrap();

        let names: Vec<_> = repo.get_all().unwrap().into_iter().map(|c| c.name).collect();
        assert_eq!(names, vec!["Bills", "Salary", "Transport"]);
    }

    #[test]
    fn test_get_by_type() {
        let (_temp_dir, repo) = create_test_repo();
        repo.upsert(Category::new("Food", CategoryType::Expense)).unwrap();
        repo.upsert(Category::new("Salary", CategoryType::Income)).unwrap();

        let income = repo.get_by_type(CategoryType::Income).unwrap();
        assert_eq!(income.len(), 1);
        assert_eq!(income[0].name, "Salary");
    }

    #[test]
    fn test_save_and_reload() {
        let (temp_dir, repo) = create_test_repo();
        let category = Category::new("Health", CategoryType::Expense);
        let id = category.id;
        repo.upsert(category).unwrap();
        repo.save().unwrap();

        let repo2 = CategoryRepository::new(temp_dir.path().join("categories.json"));
        repo2.load().unwrap();
        assert_eq!(repo2.get(id).unwrap().unwrap().name, "Health");
        assert!(repo2.name_exists("health", None).unwrap());
    }
}
