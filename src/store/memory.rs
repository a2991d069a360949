//! In-memory store
//!
//! Records live in a `Vec` in creation order; the index set maps attribute
//! values to record ids. Ids are unique within the store, so an id is a
//! stable location across removals.

use chrono::NaiveDate;

use crate::error::{CabinetError, Result};
use crate::index::IndexSet;
use crate::query::{evaluate, IndexedSource, SearchOptions, Selection};
use crate::record::{FieldValue, Record, RecordParameters};
use crate::snapshot::Snapshot;
use crate::validation::RecordValidator;

use super::{check_id, PurgeReport, RecordStore, Stat};

/// Record store held entirely in process memory
pub struct MemoryStore {
    /// Records in creation order
    records: Vec<Record>,

    /// Attribute → record id
    index: IndexSet<u32>,

    validator: Box<dyn RecordValidator>,
}

impl MemoryStore {
    pub fn new(validator: impl RecordValidator + 'static) -> Self {
        Self {
            records: Vec::new(),
            index: IndexSet::new(),
            validator: Box::new(validator),
        }
    }

    /// Number of records held
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn position(&self, id: u32) -> Option<usize> {
        self.records.iter().position(|r| r.id() == id)
    }

    fn next_id(&self) -> u32 {
        self.records
            .last()
            .map(|r| r.id().saturating_add(1))
            .unwrap_or(1)
    }

    fn materialize(&self, ids: &[u32]) -> Selection {
        ids.iter()
            .filter_map(|id| self.position(*id).map(|pos| self.records[pos].clone()))
            .collect()
    }

    fn find(&self, value: &FieldValue) -> Selection {
        self.materialize(self.index.lookup(value).unwrap_or(&[]))
    }
}

impl IndexedSource for MemoryStore {
    type Location = u32;

    fn index(&self) -> &IndexSet<u32> {
        &self.index
    }

    fn locate_id(&mut self, id: u32) -> Result<Option<u32>> {
        Ok(self.position(id).map(|_| id))
    }

    fn active_locations(&mut self) -> Result<Vec<u32>> {
        Ok(self.records.iter().map(Record::id).collect())
    }
}

impl RecordStore for MemoryStore {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        self.validator.validate(params)
    }

    fn create(&mut self, params: &RecordParameters) -> Result<u32> {
        self.validator.validate(params)?;

        let id = check_id(params.explicit_id().unwrap_or_else(|| self.next_id()))?;
        if self.position(id).is_some() {
            return Err(CabinetError::DuplicateId(id));
        }

        let record = Record::new(id, params);
        self.index.add(&record, id);
        self.records.push(record);

        tracing::debug!("Created record #{}", id);
        Ok(id)
    }

    fn edit(&mut self, params: &RecordParameters) -> Result<()> {
        let id = params.explicit_id().ok_or(CabinetError::NotFound(0))?;
        self.validator.validate(params)?;
        let pos = self.position(id).ok_or(CabinetError::NotFound(id))?;

        let old = self.records[pos].clone();
        self.records[pos].apply(params);
        self.index.replace(&old, &self.records[pos], id);

        tracing::debug!("Edited record #{}", id);
        Ok(())
    }

    fn remove(&mut self, id: u32) -> Result<bool> {
        let Some(pos) = self.position(id) else {
            return Ok(false);
        };

        let record = self.records.remove(pos);
        self.index.remove(&record, id);

        tracing::debug!("Removed record #{}", id);
        Ok(true)
    }

    fn get_by_id(&mut self, id: u32) -> Result<Record> {
        self.position(id)
            .map(|pos| self.records[pos].clone())
            .ok_or(CabinetError::NotFound(id))
    }

    fn get_all(&mut self) -> Result<Vec<Record>> {
        Ok(self.records.clone())
    }

    fn find_by_first_name(&mut self, first_name: &str) -> Result<Selection> {
        Ok(self.find(&FieldValue::FirstName(first_name.to_string())))
    }

    fn find_by_last_name(&mut self, last_name: &str) -> Result<Selection> {
        Ok(self.find(&FieldValue::LastName(last_name.to_string())))
    }

    fn find_by_date_of_birth(&mut self, date_of_birth: NaiveDate) -> Result<Selection> {
        Ok(self.find(&FieldValue::DateOfBirth(date_of_birth)))
    }

    fn select_by_options(&mut self, options: &SearchOptions) -> Result<Selection> {
        let ids = evaluate(self, options)?;
        Ok(self.materialize(&ids))
    }

    fn stat(&mut self) -> Result<Stat> {
        Ok(Stat {
            total: self.records.len(),
            deleted: 0,
        })
    }

    fn make_snapshot(&mut self) -> Result<Snapshot> {
        Ok(Snapshot::new(self.records.clone()))
    }

    /// Nothing to reclaim: removals drop records immediately
    fn purge(&mut self) -> Result<PurgeReport> {
        Ok(PurgeReport {
            purged: 0,
            total: self.records.len(),
        })
    }
}
