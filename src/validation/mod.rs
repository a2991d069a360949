//! Validation Module
//!
//! Domain checks run before any record is created, edited, or restored.
//!
//! ## Responsibilities
//! - One rule per field (name length/alphabet, date range, numeric ranges,
//!   letter alphabet)
//! - Compose rules with `ValidatorBuilder`; the first failing rule aborts
//! - Two built-in bound presets (`default`, `custom`), optionally overridden
//!   from a JSON rules file
//!
//! Validation is a pure check: it never mutates the parameters and keeps no
//! state between calls.

mod bounds;
mod builder;
mod rules;

pub use bounds::{BoundsOverride, RangeBounds, DateBounds, LengthBounds, RuleSet, RulesFile, ValidationBounds};
pub use builder::{CompositeValidator, ValidatorBuilder};
pub use rules::{
    CashSavingsValidator, DateOfBirthValidator, FavoriteLetterValidator, FirstNameValidator,
    HeightValidator, LastNameValidator,
};

use crate::error::Result;
use crate::record::RecordParameters;

/// A check over record parameters
///
/// Returns `CabinetError::Validation` naming the offending field.
pub trait RecordValidator: Send + Sync {
    fn validate(&self, params: &RecordParameters) -> Result<()>;
}

impl<V: RecordValidator + ?Sized> RecordValidator for Box<V> {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        (**self).validate(params)
    }
}
