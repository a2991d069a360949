//! Index Module
//!
//! Secondary indexes over record attributes, shared by both backends.
//!
//! ## Responsibilities
//! - One map per indexed attribute: value → locations
//! - Name keys are case-insensitive
//! - Generic over the location type: the memory store locates records by
//!   id, the file store by byte offset
//!
//! ## Consistency
//! Every active record sits in exactly one bucket per map, and every bucket
//! entry points at an active record. Callers add after writing a record and
//! remove before (or in the same step as) dropping it; `replace` does both
//! for an in-place edit. Buckets keep insertion order, which is the order
//! query results are reported in.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::record::{FieldValue, Record};

/// Anything that can identify a record inside a store
pub trait Location: Copy + Eq + Debug {}

impl<T: Copy + Eq + Debug> Location for T {}

/// Attribute → locations maps for one store
#[derive(Debug, Clone)]
pub struct IndexSet<L> {
    first_name: HashMap<String, Vec<L>>,
    last_name: HashMap<String, Vec<L>>,
    date_of_birth: HashMap<NaiveDate, Vec<L>>,
    height: HashMap<i16, Vec<L>>,
    cash_savings: HashMap<Decimal, Vec<L>>,
    favorite_letter: HashMap<char, Vec<L>>,
}

impl<L: Location> IndexSet<L> {
    pub fn new() -> Self {
        Self {
            first_name: HashMap::new(),
            last_name: HashMap::new(),
            date_of_birth: HashMap::new(),
            height: HashMap::new(),
            cash_savings: HashMap::new(),
            favorite_letter: HashMap::new(),
        }
    }

    /// Index `record` at `location` in every map
    pub fn add(&mut self, record: &Record, location: L) {
        push(&mut self.first_name, name_key(&record.first_name), location);
        push(&mut self.last_name, name_key(&record.last_name), location);
        push(&mut self.date_of_birth, record.date_of_birth, location);
        push(&mut self.height, record.height, location);
        push(&mut self.cash_savings, record.cash_savings, location);
        push(&mut self.favorite_letter, record.favorite_letter, location);
    }

    /// Drop `location` from every bucket `record`'s values map to
    pub fn remove(&mut self, record: &Record, location: L) {
        pull(&mut self.first_name, &name_key(&record.first_name), location);
        pull(&mut self.last_name, &name_key(&record.last_name), location);
        pull(&mut self.date_of_birth, &record.date_of_birth, location);
        pull(&mut self.height, &record.height, location);
        pull(&mut self.cash_savings, &record.cash_savings, location);
        pull(&mut self.favorite_letter, &record.favorite_letter, location);
    }

    /// Move `location` from `old`'s buckets to `new`'s
    pub fn replace(&mut self, old: &Record, new: &Record, location: L) {
        self.remove(old, location);
        self.add(new, location);
    }

    /// Locations whose attribute equals `value`, in insertion order
    ///
    /// `FieldValue::Id` is not indexed and always yields `None`; callers
    /// resolve ids against the store directly.
    pub fn lookup(&self, value: &FieldValue) -> Option<&[L]> {
        let bucket = match value {
            FieldValue::Id(_) => return None,
            FieldValue::FirstName(v) => self.first_name.get(&name_key(v)),
            FieldValue::LastName(v) => self.last_name.get(&name_key(v)),
            FieldValue::DateOfBirth(v) => self.date_of_birth.get(v),
            FieldValue::Height(v) => self.height.get(v),
            FieldValue::CashSavings(v) => self.cash_savings.get(v),
            FieldValue::FavoriteLetter(v) => self.favorite_letter.get(v),
        };
        Some(bucket.map(Vec::as_slice).unwrap_or(&[]))
    }

    /// Drop every entry
    pub fn clear(&mut self) {
        self.first_name.clear();
        self.last_name.clear();
        self.date_of_birth.clear();
        self.height.clear();
        self.cash_savings.clear();
        self.favorite_letter.clear();
    }

    /// Number of locations indexed (counted through the first-name map)
    pub fn len(&self) -> usize {
        self.first_name.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.first_name.is_empty()
    }
}

impl<L: Location> Default for IndexSet<L> {
    fn default() -> Self {
        Self::new()
    }
}

fn name_key(name: &str) -> String {
    name.to_lowercase()
}

fn push<K: Hash + Eq, L: Location>(map: &mut HashMap<K, Vec<L>>, key: K, location: L) {
    map.entry(key).or_default().push(location);
}

fn pull<K: Hash + Eq, L: Location>(map: &mut HashMap<K, Vec<L>>, key: &K, location: L) {
    if let Some(bucket) = map.get_mut(key) {
        bucket.retain(|l| *l != location);
        if bucket.is_empty() {
            map.remove(key);
        }
    }
}
