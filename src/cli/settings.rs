//! Settings CLI commands

use clap::Subcommand;

use crate::audit::EntityType;
use crate::config::settings::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Currency, DateRange, SymbolPosition};
use crate::storage::Storage;

/// Settings subcommands
#[derive(Subcommand)]
pub enum SettingsCommands {
    /// Show current settings
    Show,
    /// Set the display currency
    Currency {
        /// Currency symbol (e.g., "$", "€", "kr")
        symbol: String,
        /// prefix or suffix
        #[arg(short, long, default_value = "prefix")]
        position: String,
    },
    /// Set the default summary range
    Range {
        /// today, week, month, year, all or YYYY-MM-DD..YYYY-MM-DD
        range: String,
    },
    /// Set the first day of the week
    WeekStart {
        /// sunday or monday
        day: String,
    },
    /// Set the date display format (strftime, e.g. "%Y-%m-%d")
    DateFormat { format: String },
}

fn parse_week_start(input: &str) -> ExpenseResult<u8> {
    match input.trim().to_lowercase().as_str() {
        "sunday" | "sun" | "0" => Ok(0),
        "monday" | "mon" | "1" => Ok(1),
        _ => Err(ExpenseError::Validation(format!(
            "Invalid week start '{}'. Use sunday or monday",
            input
        ))),
    }
}

fn format_settings(settings: &Settings) -> String {
    format!(
        "Currency:     {}\nDate range:   {}\nWeek starts:  {}\nDate format:  {}\n",
        settings.currency,
        settings.date_range,
        settings.week_start(),
        settings.date_format
    )
}

/// Handle a settings command; changes are saved and audited
pub fn handle_settings_command(
    storage: &Storage,
    settings: &mut Settings,
    cmd: SettingsCommands,
) -> ExpenseResult<()> {
    let before = settings.clone();

    match cmd {
        SettingsCommands::Show => {
            print!("{}", format_settings(settings));
            return Ok(());
        }
        SettingsCommands::Currency { symbol, position } => {
            let position = SymbolPosition::parse(&position).ok_or_else(|| {
                ExpenseError::Validation(format!(
                    "Invalid symbol position '{}'. Use prefix or suffix",
                    position
                ))
            })?;
            if symbol.trim().is_empty() {
                return Err(ExpenseError::Validation(
                    "Currency symbol cannot be empty".into(),
                ));
            }
            settings.currency = Currency::new(symbol.trim(), position);
        }
        SettingsCommands::Range { range } => {
            settings.date_range = DateRange::parse(&range)?;
        }
        SettingsCommands::WeekStart { day } => {
            settings.first_day_of_week = parse_week_start(&day)?;
        }
        SettingsCommands::DateFormat { format } => {
            if format.trim().is_empty() {
                return Err(ExpenseError::Validation(
                    "Date format cannot be empty".into(),
                ));
            }
            settings.date_format = format;
        }
    }

    settings.save(storage.paths())?;
    storage.log_update(
        EntityType::Settings,
        "settings".to_string(),
        None,
        &before,
        &*settings,
    )?;

    print!("Settings updated.\n{}", format_settings(settings));
    Ok(())
}
