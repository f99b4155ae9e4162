//! User settings for the expense ledger
//!
//! Display currency, the selected date range, week start and date format.

use chrono::Weekday;
use serde::{Deserialize, Serialize};

use super::paths::LedgerPaths;
use crate::error::ExpenseError;
use crate::models::{Currency, DateRange};

/// User settings, persisted as `config.json`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Currency used when formatting amounts
    #[serde(default)]
    pub currency: Currency,

    /// Range used by `summary` when none is given
    #[serde(default)]
    pub date_range: DateRange,

    /// First day of week (0 = Sunday, 1 = Monday)
    #[serde(default = "default_first_day_of_week")]
    pub first_day_of_week: u8,

    /// Date format preference (strftime format)
    #[serde(default = "default_date_format")]
    pub date_format: String,

    /// Whether `init` has completed
    #[serde(default)]
    pub onboarding_completed: bool,
}

fn default_schema_version() -> u32 {
    1
}

fn default_first_day_of_week() -> u8 {
    0 // Sunday
}

fn default_date_format() -> String {
    "%d/%m/%Y".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            currency: Currency::default(),
            date_range: DateRange::default(),
            first_day_of_week: default_first_day_of_week(),
            date_format: default_date_format(),
            onboarding_completed: false,
        }
    }
}

impl Settings {
    /// Week start as a chrono weekday; anything but 1 means Sunday
    pub fn week_start(&self) -> Weekday {
        if self.first_day_of_week == 1 {
            Weekday::Mon
        } else {
            Weekday::Sun
        }
    }

    /// Load settings from disk, or defaults if the file doesn't exist
    pub fn load_or_create(paths: &LedgerPaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            // Not persisted until the caller saves
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| ExpenseError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ExpenseError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &LedgerPaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ExpenseError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ExpenseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymbolPosition;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.schema_version, 1);
        assert_eq!(settings.currency.symbol, "$");
        assert_eq!(settings.date_range, DateRange::ThisMonth);
        assert_eq!(settings.week_start(), Weekday::Sun);
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());

        let mut settings = Settings::default();
        settings.currency = Currency::new("€", SymbolPosition::Suffix);
        settings.date_range = DateRange::ThisYear;
        settings.first_day_of_week = 1;
        settings.save(&paths).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.currency, settings.currency);
        assert_eq!(loaded.date_range, DateRange::ThisYear);
        assert_eq!(loaded.week_start(), Weekday::Mon);
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let paths = LedgerPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();
        std::fs::write(paths.settings_file(), r#"{"schema_version": 1}"#).unwrap();

        let loaded = Settings::load_or_create(&paths).unwrap();
        assert_eq!(loaded.date_format, "%d/%m/%Y");
        assert!(!loaded.onboarding_completed);
    }
}
