//! Record Module
//!
//! The record entity and the mutable parameters used to create or edit it.
//!
//! ## Types
//! - `Record`: a stored record with an immutable `id`
//! - `RecordParameters`: transient carrier of the same fields, plus an
//!   optional explicit id, passed to create/insert/edit
//! - `Field` / `FieldValue`: attribute names and parsed typed values, shared
//!   by the validator, the index set, and the query evaluator

mod field;

pub use field::{Field, FieldValue};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{CabinetError, Result};

/// A stored record
///
/// The `id` is fixed at creation; every other field may be overwritten by
/// an edit or update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    id: u32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub height: i16,
    pub cash_savings: Decimal,
    pub favorite_letter: char,
}

impl Record {
    /// Build a record with the given id from a parameter set
    ///
    /// The parameters' own explicit id is ignored; `id` wins.
    pub fn new(id: u32, params: &RecordParameters) -> Self {
        Self {
            id,
            first_name: params.first_name.clone(),
            last_name: params.last_name.clone(),
            date_of_birth: params.date_of_birth,
            height: params.height,
            cash_savings: params.cash_savings,
            favorite_letter: params.favorite_letter,
        }
    }

    /// The record's identity
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Overwrite every mutable field from a parameter set
    pub fn apply(&mut self, params: &RecordParameters) {
        self.first_name = params.first_name.clone();
        self.last_name = params.last_name.clone();
        self.date_of_birth = params.date_of_birth;
        self.height = params.height;
        self.cash_savings = params.cash_savings;
        self.favorite_letter = params.favorite_letter;
    }

    /// The typed value this record holds for `field`
    pub fn value_of(&self, field: Field) -> FieldValue {
        match field {
            Field::Id => FieldValue::Id(self.id),
            Field::FirstName => FieldValue::FirstName(self.first_name.clone()),
            Field::LastName => FieldValue::LastName(self.last_name.clone()),
            Field::DateOfBirth => FieldValue::DateOfBirth(self.date_of_birth),
            Field::Height => FieldValue::Height(self.height),
            Field::CashSavings => FieldValue::CashSavings(self.cash_savings),
            Field::FavoriteLetter => FieldValue::FavoriteLetter(self.favorite_letter),
        }
    }
}

/// Mutable parameters for create, insert, and edit
///
/// `id` is `None` (or `Some(0)`) when the store should assign one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordParameters {
    pub id: Option<u32>,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub height: i16,
    pub cash_savings: Decimal,
    pub favorite_letter: char,
}

impl RecordParameters {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        height: i16,
        cash_savings: Decimal,
        favorite_letter: char,
    ) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            height,
            cash_savings,
            favorite_letter,
        }
    }

    /// Set an explicit id
    pub fn with_id(mut self, id: u32) -> Self {
        self.id = Some(id);
        self
    }

    /// The explicit id, if one was given and is non-zero
    pub fn explicit_id(&self) -> Option<u32> {
        self.id.filter(|&id| id != 0)
    }

    /// Replace one field with a parsed value
    ///
    /// The id is immutable through this path; edits address records by the
    /// `id` field directly.
    pub fn set(&mut self, value: FieldValue) -> Result<()> {
        match value {
            FieldValue::Id(_) => {
                return Err(CabinetError::ImmutableField(Field::Id.name().to_string()))
            }
            FieldValue::FirstName(v) => self.first_name = v,
            FieldValue::LastName(v) => self.last_name = v,
            FieldValue::DateOfBirth(v) => self.date_of_birth = v,
            FieldValue::Height(v) => self.height = v,
            FieldValue::CashSavings(v) => self.cash_savings = v,
            FieldValue::FavoriteLetter(v) => self.favorite_letter = v,
        }
        Ok(())
    }

    /// Parse `text` for `field` and assign it
    pub fn assign(&mut self, field: Field, text: &str) -> Result<()> {
        if field == Field::Id {
            return Err(CabinetError::ImmutableField(field.name().to_string()));
        }
        self.set(field.parse_value(text)?)
    }
}

impl From<&Record> for RecordParameters {
    fn from(record: &Record) -> Self {
        Self {
            id: Some(record.id),
            first_name: record.first_name.clone(),
            last_name: record.last_name.clone(),
            date_of_birth: record.date_of_birth,
            height: record.height,
            cash_savings: record.cash_savings,
            favorite_letter: record.favorite_letter,
        }
    }
}
