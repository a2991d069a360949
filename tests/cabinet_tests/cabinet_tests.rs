//! Tests for the assembled cabinet
//!
//! These tests verify:
//! - Backend selection and decorator stacking from Config
//! - Validation presets and rules-file overrides
//! - Decorators do not change results
//! - Snapshot export/import round trips
//! - Created records read back unchanged (property test)

use std::fs;

use chrono::NaiveDate;
use filecabinet::validation::RuleSet;
use filecabinet::{
    Cabinet, CabinetError, Config, Record, RecordParameters, RecordStore, SearchOptions, Snapshot,
    StorageKind,
};
use proptest::prelude::*;
use rust_decimal::Decimal;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn ann() -> RecordParameters {
    RecordParameters::new("Ann", "Lee", date(1990, 1, 1), 170, Decimal::new(1000, 0), 'A')
}

fn bob() -> RecordParameters {
    RecordParameters::new("Bob", "Lee", date(1985, 5, 5), 180, Decimal::new(2000, 0), 'B')
}

fn file_config(dir: &TempDir) -> Config {
    Config::builder()
        .storage(StorageKind::File)
        .data_file(dir.path().join("cabinet.db"))
        .build()
}

/// Apply the same script to a store and report what it observed
fn run_script(store: &mut dyn RecordStore) -> (Vec<u32>, Vec<u32>, Vec<Record>, String) {
    store.create(&ann()).unwrap();
    store.create(&bob()).unwrap();
    let selected = store
        .select_by_options(&SearchOptions::single("lastname", "lee"))
        .unwrap()
        .ids();
    let updated = store
        .update(
            &[("height".to_string(), "175".to_string())],
            &SearchOptions::single("firstname", "Bob"),
        )
        .unwrap();
    let err = store.edit(&ann().with_id(77)).unwrap_err().to_string();
    (selected, updated, store.get_all().unwrap(), err)
}

// =============================================================================
// Config Tests
// =============================================================================

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.storage, StorageKind::Memory);
    assert_eq!(config.rule_set, RuleSet::Default);
    assert!(config.rules_file.is_none());
    assert!(!config.use_logger);
    assert!(!config.use_stopwatch);
}

#[test]
fn test_storage_kind_parse() {
    assert_eq!("FILE".parse::<StorageKind>().unwrap(), StorageKind::File);
    assert_eq!("memory".parse::<StorageKind>().unwrap(), StorageKind::Memory);
    assert!(matches!(
        "disk".parse::<StorageKind>(),
        Err(CabinetError::Config(_))
    ));
    assert_eq!("Custom".parse::<RuleSet>().unwrap(), RuleSet::Custom);
}

#[test]
fn test_open_memory_cabinet() {
    let mut cabinet = Cabinet::open(Config::default()).unwrap();
    assert_eq!(cabinet.config().storage, StorageKind::Memory);

    let id = cabinet.store().create(&ann()).unwrap();
    assert_eq!(cabinet.store().get_by_id(id).unwrap().first_name, "Ann");
}

#[test]
fn test_open_file_cabinet_persists() {
    let dir = TempDir::new().unwrap();

    {
        let mut cabinet = Cabinet::open(file_config(&dir)).unwrap();
        cabinet.store().create(&ann()).unwrap();
    }

    let mut cabinet = Cabinet::open(file_config(&dir)).unwrap();
    assert_eq!(cabinet.store().stat().unwrap().active(), 1);
    assert_eq!(cabinet.store().find_by_first_name("ann").unwrap().ids(), vec![1]);
}

// =============================================================================
// Validation Preset Tests
// =============================================================================

#[test]
fn test_custom_rule_set_applies() {
    let config = Config::builder().rule_set(RuleSet::Custom).build();
    let mut cabinet = Cabinet::open(config).unwrap();

    let mut params = ann();
    params.cash_savings = Decimal::new(50, 0);
    assert!(matches!(
        cabinet.store().create(&params),
        Err(CabinetError::Validation { field: "cashsavings", .. })
    ));
}

#[test]
fn test_rules_file_overrides_preset() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("validation-rules.json");
    fs::write(
        &rules,
        r#"{ "default": { "height": { "min": 100, "max": 160 } } }"#,
    )
    .unwrap();

    let config = Config::builder().rules_file(&rules).build();
    let mut cabinet = Cabinet::open(config).unwrap();

    // 170 is fine under the preset but above the overridden maximum
    assert!(matches!(
        cabinet.store().create(&ann()),
        Err(CabinetError::Validation { field: "height", .. })
    ));

    let mut params = ann();
    params.height = 150;
    cabinet.store().create(&params).unwrap();
}

#[test]
fn test_missing_rules_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let config = Config::builder()
        .rules_file(dir.path().join("absent.json"))
        .build();

    assert!(matches!(Cabinet::open(config), Err(CabinetError::Config(_))));
}

#[test]
fn test_malformed_rules_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let rules = dir.path().join("rules.json");
    fs::write(&rules, "{ not json").unwrap();

    let config = Config::builder().rules_file(&rules).build();
    assert!(matches!(Cabinet::open(config), Err(CabinetError::Config(_))));
}

// =============================================================================
// Decorator Tests
// =============================================================================

#[test]
fn test_decorators_are_transparent() {
    let mut plain = Cabinet::open(Config::default()).unwrap();
    let expected = run_script(plain.store());

    for (logger, stopwatch) in [(true, false), (false, true), (true, true)] {
        let config = Config::builder()
            .use_logger(logger)
            .use_stopwatch(stopwatch)
            .build();
        let mut decorated = Cabinet::open(config).unwrap();
        assert_eq!(run_script(decorated.store()), expected);
    }
}

#[test]
fn test_decorated_file_cabinet_soft_deletes() {
    let dir = TempDir::new().unwrap();
    let mut config = file_config(&dir);
    config.use_logger = true;
    config.use_stopwatch = true;
    let mut cabinet = Cabinet::open(config).unwrap();

    cabinet.store().create(&ann()).unwrap();
    cabinet.store().create(&bob()).unwrap();
    assert_eq!(
        cabinet
            .store()
            .delete(&SearchOptions::single("lastname", "Lee"))
            .unwrap(),
        vec![1, 2]
    );

    let stat = cabinet.store().stat().unwrap();
    assert_eq!((stat.total, stat.deleted), (2, 2));
    assert_eq!(
        cabinet.store().purge().unwrap().to_string(),
        "2 of 2 records were purged"
    );
}

// =============================================================================
// Snapshot Tests
// =============================================================================

#[test]
fn test_snapshot_json_round_trip_between_backends() {
    let dir = TempDir::new().unwrap();

    let mut source = Cabinet::open(file_config(&dir)).unwrap();
    source.store().create(&ann()).unwrap();
    source.store().create(&bob()).unwrap();
    source.store().remove(1).unwrap();
    let snapshot = source.store().make_snapshot().unwrap();
    assert_eq!(snapshot.len(), 1);

    let json = serde_json::to_string(&snapshot).unwrap();
    let parsed: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, snapshot);

    let mut target = Cabinet::open(Config::default()).unwrap();
    assert_eq!(target.store().restore(&parsed).unwrap(), 1);
    assert_eq!(target.store().get_all().unwrap(), snapshot.records().to_vec());
    assert_eq!(target.store().get_by_id(2).unwrap().first_name, "Bob");
}

#[test]
fn test_restore_into_file_edits_and_appends() {
    let dir = TempDir::new().unwrap();
    let mut cabinet = Cabinet::open(file_config(&dir)).unwrap();
    cabinet.store().create(&ann()).unwrap();

    let mut changed = ann();
    changed.last_name = "Park".to_string();
    let snapshot = Snapshot::new(vec![Record::new(1, &changed), Record::new(5, &bob())]);

    assert_eq!(cabinet.store().restore(&snapshot).unwrap(), 2);
    let stat = cabinet.store().stat().unwrap();
    assert_eq!((stat.total, stat.deleted), (2, 0));
    assert_eq!(cabinet.store().get_by_id(1).unwrap().last_name, "Park");
    assert_eq!(cabinet.store().get_by_id(5).unwrap().first_name, "Bob");
}

// =============================================================================
// Property Tests
// =============================================================================

fn valid_params() -> impl Strategy<Value = RecordParameters> {
    (
        "[A-Za-z]{2,20}",
        "[A-Za-z]{2,20}",
        (1950i32..2020, 1u32..=12, 1u32..=28),
        50i16..=250,
        (0i64..1_000_000, 0u32..=2),
        proptest::char::range('A', 'Z'),
    )
        .prop_map(|(first, last, (y, m, d), height, (cents, scale), letter)| {
            RecordParameters::new(
                first,
                last,
                date(y, m, d),
                height,
                Decimal::new(cents, scale),
                letter,
            )
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_created_record_reads_back(params in valid_params()) {
        let mut cabinet = Cabinet::open(Config::default()).unwrap();
        let id = cabinet.store().create(&params).unwrap();
        prop_assert_eq!(cabinet.store().get_by_id(id).unwrap(), Record::new(id, &params));
    }

    #[test]
    fn prop_file_slot_preserves_fields(params in valid_params()) {
        let dir = TempDir::new().unwrap();
        let mut cabinet = Cabinet::open(file_config(&dir)).unwrap();
        let id = cabinet.store().create(&params).unwrap();
        prop_assert_eq!(cabinet.store().get_by_id(id).unwrap(), Record::new(id, &params));
    }
}
