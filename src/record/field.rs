//! Field names and typed field values
//!
//! Attribute names arrive as text from the query layer; values arrive as
//! text too and are parsed here into the record's native types.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{CabinetError, Result};

/// Accepted date formats, tried in order
const DATE_FORMATS: [&str; 2] = ["%m/%d/%Y", "%Y-%m-%d"];

/// A record attribute
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    Height,
    CashSavings,
    FavoriteLetter,
}

impl Field {
    /// Every field, in slot order
    pub const ALL: [Field; 7] = [
        Field::Id,
        Field::FirstName,
        Field::LastName,
        Field::DateOfBirth,
        Field::Height,
        Field::CashSavings,
        Field::FavoriteLetter,
    ];

    /// Canonical lowercase name
    pub fn name(self) -> &'static str {
        match self {
            Field::Id => "id",
            Field::FirstName => "firstname",
            Field::LastName => "lastname",
            Field::DateOfBirth => "dateofbirth",
            Field::Height => "height",
            Field::CashSavings => "cashsavings",
            Field::FavoriteLetter => "favoriteletter",
        }
    }

    /// Parse a textual value for this field
    ///
    /// Surrounding whitespace and a single pair of enclosing single quotes
    /// are stripped first.
    pub fn parse_value(self, text: &str) -> Result<FieldValue> {
        let raw = unquote(text);
        let invalid = |reason: &str| CabinetError::invalid_value(self.name(), raw, reason);

        let value = match self {
            Field::Id => FieldValue::Id(raw.parse().map_err(|_| invalid("expected a positive integer"))?),
            Field::FirstName => FieldValue::FirstName(raw.to_string()),
            Field::LastName => FieldValue::LastName(raw.to_string()),
            Field::DateOfBirth => FieldValue::DateOfBirth(parse_date(raw).ok_or_else(|| {
                invalid("expected MM/DD/YYYY or YYYY-MM-DD")
            })?),
            Field::Height => FieldValue::Height(raw.parse().map_err(|_| invalid("expected a 16-bit integer"))?),
            Field::CashSavings => FieldValue::CashSavings(
                Decimal::from_str(raw).map_err(|e| invalid(&e.to_string()))?,
            ),
            Field::FavoriteLetter => {
                let mut chars = raw.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => FieldValue::FavoriteLetter(c),
                    _ => return Err(invalid("expected a single character")),
                }
            }
        };

        Ok(value)
    }
}

impl FromStr for Field {
    type Err = CabinetError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| *c != '_' && *c != '-')
            .collect::<String>()
            .to_lowercase();

        Field::ALL
            .into_iter()
            .find(|f| f.name() == normalized)
            .ok_or_else(|| CabinetError::UnknownField(s.trim().to_string()))
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A parsed value tagged with the field it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Id(u32),
    FirstName(String),
    LastName(String),
    DateOfBirth(NaiveDate),
    Height(i16),
    CashSavings(Decimal),
    FavoriteLetter(char),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Id(_) => Field::Id,
            FieldValue::FirstName(_) => Field::FirstName,
            FieldValue::LastName(_) => Field::LastName,
            FieldValue::DateOfBirth(_) => Field::DateOfBirth,
            FieldValue::Height(_) => Field::Height,
            FieldValue::CashSavings(_) => Field::CashSavings,
            FieldValue::FavoriteLetter(_) => Field::FavoriteLetter,
        }
    }
}

fn unquote(text: &str) -> &str {
    let trimmed = text.trim();
    trimmed
        .strip_prefix('\'')
        .and_then(|s| s.strip_suffix('\''))
        .unwrap_or(trimmed)
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(text, fmt).ok())
}
