//! Query results
//!
//! A `Selection` is a finite, ordered answer to one predicate. It owns its
//! records, so iterating it any number of times yields the same sequence and
//! no cursor state leaks back into the store.

use crate::record::Record;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    records: Vec<Record>,
}

impl Selection {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
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

    /// Ids in result order (duplicates kept)
    pub fn ids(&self) -> Vec<u32> {
        self.records.iter().map(Record::id).collect()
    }

    pub fn as_slice(&self) -> &[Record] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<Record> {
        self.records
    }
}

impl IntoIterator for Selection {
    type Item = Record;
    type IntoIter = std::vec::IntoIter<Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for Selection {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
