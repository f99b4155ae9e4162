//! Currency formatting
//!
//! A currency is a symbol and where it sits relative to the number. Amounts
//! are always formatted with two decimal places and thousands separators.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::money::Money;

/// Placement of the currency symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SymbolPosition {
    #[default]
    Prefix,
    Suffix,
}

impl SymbolPosition {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "prefix" | "before" => Some(Self::Prefix),
            "suffix" | "after" => Some(Self::Suffix),
            _ => None,
        }
    }
}

/// Display currency for formatted amounts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub symbol: String,
    #[serde(default)]
    pub position: SymbolPosition,
}

impl Default for Currency {
    fn default() -> Self {
        Self {
            symbol: "$".to_string(),
            position: SymbolPosition::Prefix,
        }
    }
}

impl Currency {
    pub fn new(symbol: impl Into<String>, position: SymbolPosition) -> Self {
        Self {
            symbol: symbol.into(),
            position,
        }
    }

    /// Format an amount, e.g. `-$1,234.50` or `1,234.50 €`
    pub fn format(&self, amount: Money) -> String {
        let sign = if amount.is_negative() { "-" } else { "" };
        let number = format!(
            "{}.{:02}",
            group_thousands(amount.units().unsigned_abs()),
            amount.cents_part()
        );
        match self.position {
            SymbolPosition::Prefix => format!("{}{}{}", sign, self.symbol, number),
            SymbolPosition::Suffix => format!("{}{} {}", sign, number, self.symbol),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            SymbolPosition::Prefix => write!(f, "{} (prefix)", self.symbol),
            SymbolPosition::Suffix => write!(f, "{} (suffix)", self.symbol),
        }
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_format() {
        let usd = Currency::default();
        assert_eq!(usd.format(Money::from_cents(123450)), "$1,234.50");
        assert_eq!(usd.format(Money::from_cents(-5)), "-$0.05");
        assert_eq!(usd.format(Money::zero()), "$0.00");
    }

    #[test]
    fn test_suffix_format() {
        let eur = Currency::new("€", SymbolPosition::Suffix);
        assert_eq!(eur.format(Money::from_cents(100000050)), "1,000,000.50 €");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands(0), "0");
        assert_eq!(group_thousands(999), "999");
        assert_eq!(group_thousands(1000), "1,000");
        assert_eq!(group_thousands(123456789), "123,456,789");
    }

    #[test]
    fn test_position_parse() {
        assert_eq!(SymbolPosition::parse("after"), Some(SymbolPosition::Suffix));
        assert_eq!(SymbolPosition::parse("PREFIX"), Some(SymbolPosition::Prefix));
        assert_eq!(SymbolPosition::parse("middle"), None);
    }
}
