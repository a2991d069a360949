//! Tests for record validation
//!
//! These tests verify:
//! - Each field rule accepts in-range values and rejects the rest
//! - The first failing rule decides the error
//! - Presets differ in bounds only
//! - Builders compose arbitrary rule subsets

use chrono::{Duration, Local, NaiveDate};
use filecabinet::validation::{RecordValidator, RuleSet, ValidatorBuilder};
use filecabinet::{CabinetError, RecordParameters};
use rust_decimal::Decimal;

// =============================================================================
// Helper Functions
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn valid_params() -> RecordParameters {
    RecordParameters::new("Ann", "Lee", date(1990, 1, 1), 170, Decimal::new(1000, 0), 'A')
}

fn failing_field(result: filecabinet::Result<()>) -> &'static str {
    match result {
        Err(CabinetError::Validation { field, .. }) => field,
        other => panic!("expected a validation error, got {:?}", other),
    }
}

// =============================================================================
// Default Preset Tests
// =============================================================================

#[test]
fn test_default_accepts_valid_params() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();
    assert_eq!(validator.len(), 6);
    validator.validate(&valid_params()).unwrap();
}

#[test]
fn test_name_length_bounds() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();

    let mut p = valid_params();
    p.first_name = "A".to_string();
    assert_eq!(failing_field(validator.validate(&p)), "firstname");

    let mut p = valid_params();
    p.last_name = "L".repeat(61);
    assert_eq!(failing_field(validator.validate(&p)), "lastname");

    let mut p = valid_params();
    p.last_name = "L".repeat(60);
    validator.validate(&p).unwrap();
}

#[test]
fn test_names_must_be_alphabetic() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();

    let mut p = valid_params();
    p.first_name = "Ann2".to_string();
    assert_eq!(failing_field(validator.validate(&p)), "firstname");

    let mut p = valid_params();
    p.last_name = "Van Dyke".to_string();
    assert_eq!(failing_field(validator.validate(&p)), "lastname");
}

#[test]
fn test_names_must_fit_slot_bytes() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();

    // 40 three-byte characters fill the slot exactly; 41 do not
    let mut p = valid_params();
    p.first_name = "語".repeat(40);
    validator.validate(&p).unwrap();

    p.first_name = "語".repeat(41);
    assert_eq!(failing_field(validator.validate(&p)), "firstname");
}

#[test]
fn test_date_of_birth_range() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();

    let mut p = valid_params();
    p.date_of_birth = date(1949, 12, 31);
    assert_eq!(failing_field(validator.validate(&p)), "dateofbirth");

    let mut p = valid_params();
    p.date_of_birth = Local::now().date_naive() + Duration::days(1);
    assert_eq!(failing_field(validator.validate(&p)), "dateofbirth");

    let mut p = valid_params();
    p.date_of_birth = date(1950, 1, 1);
    validator.validate(&p).unwrap();
}

#[test]
fn test_height_and_savings_ranges() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();

    let mut p = valid_params();
    p.height = 49;
    assert_eq!(failing_field(validator.validate(&p)), "height");

    let mut p = valid_params();
    p.cash_savings = Decimal::new(-1, 2);
    assert_eq!(failing_field(validator.validate(&p)), "cashsavings");
}

#[test]
fn test_favorite_letter_must_be_a_letter() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();

    for bad in ['1', ' ', 'ж'] {
        let mut p = valid_params();
        p.favorite_letter = bad;
        assert_eq!(failing_field(validator.validate(&p)), "favoriteletter");
    }
}

#[test]
fn test_first_failing_rule_wins() {
    let validator = ValidatorBuilder::preset(RuleSet::Default).build();

    let mut p = valid_params();
    p.first_name = "1".to_string();
    p.height = 0;
    assert_eq!(failing_field(validator.validate(&p)), "firstname");
}

// =============================================================================
// Custom Preset Tests
// =============================================================================

#[test]
fn test_custom_preset_uses_other_bounds() {
    let default = ValidatorBuilder::preset(RuleSet::Default).build();
    let custom = ValidatorBuilder::preset(RuleSet::Custom).build();

    // Savings of 50 is fine by default, below the custom minimum of 100
    let mut p = valid_params();
    p.cash_savings = Decimal::new(50, 0);
    default.validate(&p).unwrap();
    assert_eq!(failing_field(custom.validate(&p)), "cashsavings");

    // One-letter names pass only the custom preset
    let mut p = valid_params();
    p.first_name = "J".to_string();
    custom.validate(&p).unwrap();
    assert!(default.validate(&p).is_err());
}

// =============================================================================
// Builder Tests
// =============================================================================

#[test]
fn test_builder_composes_subset() {
    let validator = ValidatorBuilder::new().height(100, 120).build();
    assert_eq!(validator.len(), 1);

    // Only height is checked
    let mut p = valid_params();
    p.first_name = String::new();
    p.height = 110;
    validator.validate(&p).unwrap();

    p.height = 170;
    assert_eq!(failing_field(validator.validate(&p)), "height");
}

#[test]
fn test_empty_builder_accepts_everything() {
    let validator = ValidatorBuilder::new().build();
    assert!(validator.is_empty());
    validator.validate(&RecordParameters::default()).unwrap();
}

#[test]
fn test_mixed_bounds_per_field() {
    let validator = ValidatorBuilder::new()
        .first_name(1, 30)
        .last_name(2, 60)
        .date_of_birth(date(1900, 1, 1), Some(date(2000, 1, 1)))
        .height(50, 250)
        .cash_savings(Decimal::ZERO, Decimal::new(500, 0))
        .favorite_letter()
        .build();

    let mut p = valid_params();
    p.cash_savings = Decimal::new(400, 0);
    validator.validate(&p).unwrap();

    p.date_of_birth = date(2001, 1, 1);
    assert_eq!(failing_field(validator.validate(&p)), "dateofbirth");
}
