//! Validation bounds
//!
//! Numeric and length limits consumed by the field rules. Two presets are
//! built in; a JSON rules file may override any subset of either:
//!
//! ```json
//! {
//!   "default": { "height": { "min": 60, "max": 220 } },
//!   "custom":  { "firstName": { "min": 1, "max": 20 } }
//! }
//! ```

use std::path::Path;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CabinetError, Result};

/// Which preset a deployment starts from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuleSet {
    #[default]
    Default,
    Custom,
}

impl std::str::FromStr for RuleSet {
    type Err = CabinetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "default" => Ok(RuleSet::Default),
            "custom" => Ok(RuleSet::Custom),
            other => Err(CabinetError::Config(format!(
                "Unknown validation rule set '{}'. Expected \"default\" or \"custom\".",
                other
            ))),
        }
    }
}

/// Inclusive character-count bounds for a name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LengthBounds {
    pub min: usize,
    pub max: usize,
}

/// Inclusive date range; `to: None` means "today" at validation time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateBounds {
    pub from: NaiveDate,
    #[serde(default)]
    pub to: Option<NaiveDate>,
}

/// Inclusive numeric range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeBounds<T> {
    pub min: T,
    pub max: T,
}

/// Complete bound set for every validated field
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationBounds {
    pub first_name: LengthBounds,
    pub last_name: LengthBounds,
    pub date_of_birth: DateBounds,
    pub height: RangeBounds<i16>,
    pub cash_savings: RangeBounds<Decimal>,
}

impl ValidationBounds {
    /// The `default` preset
    pub fn default_rules() -> Self {
        Self {
            first_name: LengthBounds { min: 2, max: 60 },
            last_name: LengthBounds { min: 2, max: 60 },
            date_of_birth: DateBounds {
                from: ymd(1950, 1, 1),
                to: None,
            },
            height: RangeBounds { min: 50, max: 250 },
            cash_savings: RangeBounds {
                min: Decimal::ZERO,
                max: Decimal::new(1_000_000, 0),
            },
        }
    }

    /// The `custom` preset
    pub fn custom_rules() -> Self {
        Self {
            first_name: LengthBounds { min: 1, max: 30 },
            last_name: LengthBounds { min: 1, max: 30 },
            date_of_birth: DateBounds {
                from: ymd(1900, 1, 1),
                to: None,
            },
            height: RangeBounds { min: 30, max: 300 },
            cash_savings: RangeBounds {
                min: Decimal::new(100, 0),
                max: Decimal::new(100_000, 0),
            },
        }
    }

    pub fn preset(rule_set: RuleSet) -> Self {
        match rule_set {
            RuleSet::Default => Self::default_rules(),
            RuleSet::Custom => Self::custom_rules(),
        }
    }
}

impl Default for ValidationBounds {
    fn default() -> Self {
        Self::default_rules()
    }
}

/// Partial bounds read from a rules file; unset fields keep the preset
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoundsOverride {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<LengthBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<LengthBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<DateBounds>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<RangeBounds<i16>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cash_savings: Option<RangeBounds<Decimal>>,
}

impl BoundsOverride {
    pub fn apply_to(&self, mut bounds: ValidationBounds) -> ValidationBounds {
        if let Some(b) = self.first_name {
            bounds.first_name = b;
        }
        if let Some(b) = self.last_name {
            bounds.last_name = b;
        }
        if let Some(b) = self.date_of_birth {
            bounds.date_of_birth = b;
        }
        if let Some(b) = self.height {
            bounds.height = b;
        }
        if let Some(b) = self.cash_savings {
            bounds.cash_savings = b;
        }
        bounds
    }
}

/// Contents of a validation rules file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesFile {
    #[serde(default)]
    pub default: Option<BoundsOverride>,
    #[serde(default)]
    pub custom: Option<BoundsOverride>,
}

impl RulesFile {
    /// Read and parse a rules file.
    ///
    /// # Errors
    ///
    /// Returns `CabinetError::Config` if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            CabinetError::Config(format!(
                "Failed to read rules file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_json(&content).map_err(|e| match e {
            CabinetError::Config(msg) => {
                CabinetError::Config(format!("{} (in '{}')", msg, path.display()))
            }
            other => other,
        })
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| CabinetError::Config(format!("Failed to parse rules: {}", e)))
    }

    /// Resolve the bounds for `rule_set`: the preset with this file's section applied
    pub fn bounds(&self, rule_set: RuleSet) -> ValidationBounds {
        let preset = ValidationBounds::preset(rule_set);
        let section = match rule_set {
            RuleSet::Default => self.default.as_ref(),
            RuleSet::Custom => self.custom.as_ref(),
        };
        match section {
            Some(over) => over.apply_to(preset),
            None => preset,
        }
    }
}

fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap_or_default()
}
