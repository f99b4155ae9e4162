//! Category CLI commands

use clap::Subcommand;

use crate::display::category::{format_category_details, format_category_list};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::CategoryType;
use crate::services::CategoryService;
use crate::storage::Storage;

use super::icon_from_args;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        category_type: String,
        #[arg(long)]
        icon: Option<String>,
        /// Icon background colour (#rrggbb)
        #[arg(long)]
        color: Option<String>,
    },
    /// List categories
    List {
        /// Only income or only expense categories
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,
    },
    /// Show category details
    Show {
        /// Category name or ID
        category: String,
    },
    /// Edit a category
    Edit {
        /// Category name or ID
        category: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short = 't', long = "type")]
        category_type: Option<String>,
        #[arg(long)]
        icon: Option<String>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Delete a category no transaction uses
    Delete {
        /// Category name or ID
        category: String,
    },
}

fn parse_category_type(input: &str) -> ExpenseResult<CategoryType> {
    CategoryType::parse(input).ok_or_else(|| {
        ExpenseError::Validation(format!(
            "Invalid category type: '{}'. Use income or expense",
            input
        ))
    })
}

/// Handle a category command
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> ExpenseResult<()> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Create {
            name,
            category_type,
            icon,
            color,
        } => {
            let category = service.create(
                &name,
                parse_category_type(&category_type)?,
                icon_from_args(icon, color, None),
            )?;
            println!(
                "Created {} category: {} ({})",
                category.category_type, category.name, category.id
            );
        }

        CategoryCommands::List { category_type } => {
            let categories = match category_type {
                Some(t) => service.list_by_type(parse_category_type(&t)?)?,
                None => service.list()?,
            };
            println!("{}", format_category_list(&categories));
        }

        CategoryCommands::Show { category } => {
            print!("{}", format_category_details(&service.resolve(&category)?));
        }

        CategoryCommands::Edit {
            category,
            name,
            category_type,
            icon,
            color,
        } => {
            let found = service.resolve(&category)?;
            let category_type = category_type
                .as_deref()
                .map(parse_category_type)
                .transpose()?;
            let icon = icon_from_args(icon, color, Some(&found.icon));

            if name.is_none() && category_type.is_none() && icon.is_none() {
                println!("No changes specified. Use --name, --type, --icon or --color.");
                return Ok(());
            }

            let updated = service.update(found.id, name.as_deref(), category_type, icon)?;
            println!("Updated category: {}", updated.name);
        }

        CategoryCommands::Delete { category } => {
            let found = service.resolve(&category)?;
            let deleted = service.delete(found.id)?;
            println!("Deleted category: {}", deleted.name);
        }
    }

    Ok(())
}
