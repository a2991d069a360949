//! Validator composition
//!
//! `ValidatorBuilder` collects field rules in order; `CompositeValidator`
//! runs them and stops at the first failure.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::Result;
use crate::record::RecordParameters;

use super::{
    CashSavingsValidator, DateBounds, DateOfBirthValidator, FavoriteLetterValidator,
    FirstNameValidator, HeightValidator, LastNameValidator, LengthBounds, RangeBounds,
    RecordValidator, RuleSet, ValidationBounds,
};

/// Runs a list of validators in insertion order
pub struct CompositeValidator {
    validators: Vec<Box<dyn RecordValidator>>,
}

impl CompositeValidator {
    pub fn new(validators: Vec<Box<dyn RecordValidator>>) -> Self {
        Self { validators }
    }

    /// Number of composed rules
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl RecordValidator for CompositeValidator {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        for validator in &self.validators {
            validator.validate(params)?;
        }
        Ok(())
    }
}

/// Builder for a `CompositeValidator`
#[derive(Default)]
pub struct ValidatorBuilder {
    validators: Vec<Box<dyn RecordValidator>>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// All six field rules using the given bounds
    pub fn from_bounds(bounds: &ValidationBounds) -> Self {
        Self::new()
            .first_name(bounds.first_name.min, bounds.first_name.max)
            .last_name(bounds.last_name.min, bounds.last_name.max)
            .date_of_birth(bounds.date_of_birth.from, bounds.date_of_birth.to)
            .height(bounds.height.min, bounds.height.max)
            .cash_savings(bounds.cash_savings.min, bounds.cash_savings.max)
            .favorite_letter()
    }

    /// All six field rules using a built-in preset
    pub fn preset(rule_set: RuleSet) -> Self {
        Self::from_bounds(&ValidationBounds::preset(rule_set))
    }

    pub fn first_name(self, min: usize, max: usize) -> Self {
        self.rule(FirstNameValidator {
            bounds: LengthBounds { min, max },
        })
    }

    pub fn last_name(self, min: usize, max: usize) -> Self {
        self.rule(LastNameValidator {
            bounds: LengthBounds { min, max },
        })
    }

    /// `to: None` accepts dates up to the current day
    pub fn date_of_birth(self, from: NaiveDate, to: Option<NaiveDate>) -> Self {
        self.rule(DateOfBirthValidator {
            bounds: DateBounds { from, to },
        })
    }

    pub fn height(self, min: i16, max: i16) -> Self {
        self.rule(HeightValidator {
            bounds: RangeBounds { min, max },
        })
    }

    pub fn cash_savings(self, min: Decimal, max: Decimal) -> Self {
        self.rule(CashSavingsValidator {
            bounds: RangeBounds { min, max },
        })
    }

    pub fn favorite_letter(self) -> Self {
        self.rule(FavoriteLetterValidator)
    }

    /// Append any validator
    pub fn rule(mut self, validator: impl RecordValidator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn build(self) -> CompositeValidator {
        CompositeValidator::new(self.validators)
    }
}
