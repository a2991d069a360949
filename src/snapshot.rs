//! Snapshot
//!
//! An ordered, immutable copy of a store's active records taken at one
//! instant. Export writers read it; `restore` replays it into a store.

use serde::{Deserialize, Serialize};

use crate::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    records: Vec<Record>,
}

impl Snapshot {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<'a> IntoIterator for &'a Snapshot {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl From<Vec<Record>> for Snapshot {
    fn from(records: Vec<Record>) -> Self {
        Self::new(records)
    }
}
