//! Tests for predicate selection
//!
//! Every scenario runs against both backends; results must agree.
//!
//! These tests verify:
//! - `and`, `or`, single-clause, and select-all predicates
//! - Case-insensitive name matching and value normalization
//! - Parse-failure handling per connective
//! - Delete and update driven by predicates

use chrono::NaiveDate;
use filecabinet::validation::{RuleSet, ValidatorBuilder};
use filecabinet::{
    CabinetError, FileStore, MemoryStore, RecordParameters, RecordStore, SearchOptions,
};
use rust_decimal::Decimal;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed() -> Vec<RecordParameters> {
    vec![
        RecordParameters::new("Ann", "Lee", date(1990, 1, 1), 170, Decimal::new(1000, 0), 'A'),
        RecordParameters::new("Bob", "Lee", date(1985, 5, 5), 180, Decimal::new(2000, 0), 'B'),
        RecordParameters::new("Cid", "Kim", date(1990, 1, 1), 170, Decimal::new(50025, 2), 'A'),
    ]
}

/// Run `check` against a seeded memory store and a seeded file store
fn on_both_backends(check: impl Fn(&str, &mut dyn RecordStore)) {
    let dir = TempDir::new().unwrap();
    let mut memory = MemoryStore::new(ValidatorBuilder::preset(RuleSet::Default).build());
    let mut file = FileStore::open(
        dir.path().join("cabinet.db"),
        ValidatorBuilder::preset(RuleSet::Default).build(),
    )
    .unwrap();

    let stores: [(&str, &mut dyn RecordStore); 2] = [("memory", &mut memory), ("file", &mut file)];
    for (name, store) in stores {
        for params in seed() {
            store.create(&params).unwrap();
        }
        check(name, store);
    }
}

fn select(store: &mut dyn RecordStore, pairs: &[(&str, &str)], connective: &str) -> Vec<u32> {
    let options = SearchOptions::parse(pairs.iter().copied(), connective).unwrap();
    store.select_by_options(&options).unwrap().ids()
}

fn select_err(store: &mut dyn RecordStore, pairs: &[(&str, &str)], connective: &str) -> CabinetError {
    let options = SearchOptions::parse(pairs.iter().copied(), connective).unwrap();
    store.select_by_options(&options).unwrap_err()
}

// =============================================================================
// Connective Tests
// =============================================================================

#[test]
fn test_and_intersects() {
    on_both_backends(|name, store| {
        assert_eq!(
            select(store, &[("firstname", "Ann"), ("lastname", "Lee")], "and"),
            vec![1],
            "{name}"
        );
        assert_eq!(
            select(store, &[("dateofbirth", "1990-01-01"), ("height", "170")], "and"),
            vec![1, 3],
            "{name}"
        );
        assert!(select(store, &[("firstname", "Ann"), ("lastname", "Kim")], "and").is_empty());
    });
}

#[test]
fn test_or_concatenates_with_duplicates() {
    on_both_backends(|name, store| {
        assert_eq!(
            select(store, &[("firstname", "Ann"), ("lastname", "Lee")], "or"),
            vec![1, 1, 2],
            "{name}"
        );
    });
}

#[test]
fn test_single_clause() {
    on_both_backends(|name, store| {
        assert_eq!(select(store, &[("lastname", "Lee")], ""), vec![1, 2], "{name}");
        assert_eq!(select(store, &[("favoriteletter", "A")], ""), vec![1, 3], "{name}");
    });
}

#[test]
fn test_missing_connective_with_many_clauses_is_and() {
    on_both_backends(|name, store| {
        assert_eq!(
            select(store, &[("lastname", "Lee"), ("height", "180")], ""),
            vec![2],
            "{name}"
        );
    });
}

#[test]
fn test_select_all_forms() {
    on_both_backends(|name, store| {
        assert_eq!(select(store, &[], "*"), vec![1, 2, 3], "{name}");
        assert_eq!(select(store, &[("*", "*")], ""), vec![1, 2, 3], "{name}");
        assert_eq!(select(store, &[], ""), vec![1, 2, 3], "{name}");
        assert_eq!(
            store.select_by_options(&SearchOptions::all()).unwrap().len(),
            3,
            "{name}"
        );
    });
}

// =============================================================================
// Value Normalization Tests
// =============================================================================

#[test]
fn test_names_match_case_insensitively() {
    on_both_backends(|name, store| {
        assert_eq!(select(store, &[("lastname", "LEE")], ""), vec![1, 2], "{name}");
        assert_eq!(store.find_by_first_name("aNN").unwrap().ids(), vec![1], "{name}");
    });
}

#[test]
fn test_quotes_and_whitespace_are_stripped() {
    on_both_backends(|name, store| {
        assert_eq!(select(store, &[("firstname", " 'Bob' ")], ""), vec![2], "{name}");
    });
}

#[test]
fn test_attribute_name_spellings() {
    on_both_backends(|name, store| {
        assert_eq!(select(store, &[("First_Name", "Cid")], ""), vec![3], "{name}");
        assert_eq!(select(store, &[("date-of-birth", "05/05/1985")], ""), vec![2], "{name}");
        assert_eq!(select(store, &[("CashSavings", "500.25")], ""), vec![3], "{name}");
    });
}

#[test]
fn test_id_clause() {
    on_both_backends(|name, store| {
        assert_eq!(select(store, &[("id", "2")], ""), vec![2], "{name}");
        assert!(select(store, &[("id", "99")], "").is_empty(), "{name}");
        assert_eq!(
            select(store, &[("id", "3"), ("lastname", "Kim")], "and"),
            vec![3],
            "{name}"
        );
    });
}

// =============================================================================
// Parse Failure Tests
// =============================================================================

#[test]
fn test_bad_typed_value_is_empty_under_or() {
    on_both_backends(|name, store| {
        assert_eq!(
            select(store, &[("height", "tall"), ("firstname", "Bob")], "or"),
            vec![2],
            "{name}"
        );
        assert_eq!(
            select(store, &[("dateofbirth", "yesterday"), ("favoriteletter", "AB")], "or"),
            Vec::<u32>::new(),
            "{name}"
        );
    });
}

#[test]
fn test_bad_typed_value_aborts_otherwise() {
    on_both_backends(|name, store| {
        let err = select_err(store, &[("height", "tall"), ("firstname", "Bob")], "and");
        assert!(matches!(err, CabinetError::InvalidValue { field: "height", .. }), "{name}");

        let err = select_err(store, &[("cashsavings", "lots")], "");
        assert!(matches!(err, CabinetError::InvalidValue { .. }), "{name}");
    });
}

#[test]
fn test_bad_id_aborts_even_under_or() {
    on_both_backends(|name, store| {
        let err = select_err(store, &[("id", "abc"), ("firstname", "Bob")], "or");
        assert!(matches!(err, CabinetError::InvalidValue { field: "id", .. }), "{name}");
    });
}

#[test]
fn test_unknown_attribute_always_aborts() {
    on_both_backends(|name, store| {
        for connective in ["and", "or", ""] {
            let err = select_err(store, &[("nickname", "Bo")], connective);
            assert!(matches!(err, CabinetError::UnknownField(_)), "{name}");
        }
    });
}

#[test]
fn test_unknown_connective_is_rejected() {
    assert!(matches!(
        SearchOptions::parse([("lastname", "Lee")], "xor"),
        Err(CabinetError::InvalidValue { .. })
    ));
}

// =============================================================================
// Mutation Through Predicates
// =============================================================================

#[test]
fn test_delete_by_last_name() {
    on_both_backends(|name, store| {
        assert_eq!(
            store.delete(&SearchOptions::single("lastname", "Lee")).unwrap(),
            vec![1, 2],
            "{name}"
        );
        assert!(select(store, &[("lastname", "Lee")], "").is_empty(), "{name}");
        assert_eq!(select(store, &[], "*"), vec![3], "{name}");
        assert_eq!(store.stat().unwrap().active(), 1, "{name}");
    });
}

#[test]
fn test_update_then_select() {
    on_both_backends(|name, store| {
        let updated = store
            .update(
                &[("height".to_string(), "190".to_string())],
                &SearchOptions::parse([("favoriteletter", "A")], "").unwrap(),
            )
            .unwrap();
        assert_eq!(updated, vec![1, 3], "{name}");

        assert!(select(store, &[("height", "170")], "").is_empty(), "{name}");
        let mut tall = select(store, &[("height", "190")], "");
        tall.sort_unstable();
        assert_eq!(tall, vec![1, 3], "{name}");
    });
}

#[test]
fn test_removed_records_are_invisible() {
    on_both_backends(|name, store| {
        store.remove(1).unwrap();
        assert_eq!(
            select(store, &[("firstname", "Ann"), ("lastname", "Lee")], "or"),
            vec![2],
            "{name}"
        );
        assert!(select(store, &[("id", "1")], "").is_empty(), "{name}");
        assert!(store.find_by_date_of_birth(date(1990, 1, 1)).unwrap().ids() == vec![3]);
    });
}
