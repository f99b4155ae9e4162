//! Category display formatting

use tabled::Tabled;

use crate::models::{Category, CategoryType};

use super::format::render_table;

#[derive(Tabled)]
struct CategoryRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Icon")]
    icon: String,
}

/// Format categories as two tables, income first
pub fn format_category_list(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.\n\nRun 'expense init' to create default categories."
            .to_string();
    }

    let mut sections = Vec::new();
    for (category_type, title) in [
        (CategoryType::Income, "Income"),
        (CategoryType::Expense, "Expense"),
    ] {
        let rows: Vec<CategoryRow> = categories
            .iter()
            .filter(|c| c.category_type == category_type)
            .map(|c| CategoryRow {
                id: c.id.to_string(),
                name: c.name.clone(),
                icon: format!("{} {}", c.icon.name, c.icon.background_color),
            })
            .collect();

        if !rows.is_empty() {
            sections.push(format!("{}\n{}", title, render_table(rows, 3)));
        }
    }

    sections.join("\n\n")
}

pub fn format_category_details(category: &Category) -> String {
    format!(
        "Category: {}\n  ID:     {}\n  Type:   {}\n  Icon:   {} ({})\n",
        category.name,
        category.id,
        category.category_type,
        category.icon.name,
        category.icon.background_color
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_category_list() {
        let categories = vec![
            Category::new("Food", CategoryType::Expense),
            Category::new("Salary", CategoryType::Income),
        ];
        let output = format_category_list(&categories);
        let income_at = output.find("Income").unwrap();
        let expense_at = output.find("Expense").unwrap();
        assert!(income_at < expense_at);
        assert!(output.find("Salary").unwrap() < expense_at);
        assert!(output.find("Food").unwrap() > expense_at);
    }

    #[test]
    fn test_empty_list_hints_init() {
        assert!(format_category_list(&[]).contains("expense init"));
    }
}
