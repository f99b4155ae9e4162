//! Icon reference stored alongside accounts and categories

use serde::{Deserialize, Serialize};
use std::fmt;

/// Icon name plus its background colour (`#rgb` or `#rrggbb`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredIcon {
    pub name: String,
    pub background_color: String,
}

impl StoredIcon {
    pub fn new(name: impl Into<String>, background_color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            background_color: background_color.into(),
        }
    }

    pub fn validate(&self) -> Result<(), IconValidationError> {
        if self.name.trim().is_empty() {
            return Err(IconValidationError::EmptyName);
        }
        if self.background_color.trim().is_empty() {
            return Err(IconValidationError::EmptyColor);
        }
        if !is_hex_color(&self.background_color) {
            return Err(IconValidationError::InvalidColor(
                self.background_color.clone(),
            ));
        }
        Ok(())
    }
}

impl Default for StoredIcon {
    fn default() -> Self {
        Self::new("wallet", "#43a546")
    }
}

fn is_hex_color(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(hex) => {
            matches!(hex.len(), 3 | 6 | 8) && hex.chars().all(|c| c.is_ascii_hexdigit())
        }
        None => false,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconValidationError {
    EmptyName,
    EmptyColor,
    InvalidColor(String),
}

impl fmt::Display for IconValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Icon name cannot be empty"),
            Self::EmptyColor => write!(f, "Icon background color cannot be empty"),
            Self::InvalidColor(c) => write!(f, "Invalid icon background color: '{}'", c),
        }
    }
}

impl std::error::Error for IconValidationError {}
