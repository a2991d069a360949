//! Per-field validation rules

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::error::{CabinetError, Result};
use crate::record::{Field, RecordParameters};
use crate::store::NAME_WIDTH;

use super::{DateBounds, LengthBounds, RangeBounds, RecordValidator};

/// Shared check for name fields: length in characters, letters only, and
/// no more than `NAME_WIDTH` bytes of UTF-8 so every backend can store it
fn check_name(field: Field, value: &str, bounds: LengthBounds) -> Result<()> {
    if value.len() > NAME_WIDTH {
        return Err(CabinetError::validation(
            field.name(),
            format!("must fit in {} bytes of UTF-8, got {}", NAME_WIDTH, value.len()),
        ));
    }
    let len = value.chars().count();
    if len < bounds.min || len > bounds.max {
        return Err(CabinetError::validation(
            field.name(),
            format!(
                "length must be between {} and {} characters, got {}",
                bounds.min, bounds.max, len
            ),
        ));
    }
    if !value.chars().all(char::is_alphabetic) {
        return Err(CabinetError::validation(
            field.name(),
            "only letters are allowed",
        ));
    }
    Ok(())
}

fn check_range<T>(field: Field, value: T, bounds: RangeBounds<T>) -> Result<()>
where
    T: PartialOrd + std::fmt::Display + Copy,
{
    if value < bounds.min || value > bounds.max {
        return Err(CabinetError::validation(
            field.name(),
            format!("must be between {} and {}, got {}", bounds.min, bounds.max, value),
        ));
    }
    Ok(())
}

/// First name: length bounds, alphabetic only
#[derive(Debug, Clone, Copy)]
pub struct FirstNameValidator {
    pub bounds: LengthBounds,
}

impl RecordValidator for FirstNameValidator {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        check_name(Field::FirstName, &params.first_name, self.bounds)
    }
}

/// Last name: length bounds, alphabetic only
#[derive(Debug, Clone, Copy)]
pub struct LastNameValidator {
    pub bounds: LengthBounds,
}

impl RecordValidator for LastNameValidator {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        check_name(Field::LastName, &params.last_name, self.bounds)
    }
}

/// Date of birth: inclusive range, open upper end resolves to today
#[derive(Debug, Clone, Copy)]
pub struct DateOfBirthValidator {
    pub bounds: DateBounds,
}

impl DateOfBirthValidator {
    fn upper(&self) -> NaiveDate {
        self.bounds.to.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl RecordValidator for DateOfBirthValidator {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        let from = self.bounds.from;
        let to = self.upper();
        let dob = params.date_of_birth;
        if dob < from || dob > to {
            return Err(CabinetError::validation(
                Field::DateOfBirth.name(),
                format!("must be between {} and {}, got {}", from, to, dob),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct HeightValidator {
    pub bounds: RangeBounds<i16>,
}

impl RecordValidator for HeightValidator {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        check_range(Field::Height, params.height, self.bounds)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct CashSavingsValidator {
    pub bounds: RangeBounds<Decimal>,
}

impl RecordValidator for CashSavingsValidator {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        check_range(Field::CashSavings, params.cash_savings, self.bounds)
    }
}

/// Favorite letter: one ASCII letter (it occupies a single byte on disk)
#[derive(Debug, Clone, Copy, Default)]
pub struct FavoriteLetterValidator;

impl RecordValidator for FavoriteLetterValidator {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        if !params.favorite_letter.is_ascii_alphabetic() {
            return Err(CabinetError::validation(
                Field::FavoriteLetter.name(),
                format!("must be a latin letter, got {:?}", params.favorite_letter),
            ));
        }
        Ok(())
    }
}
