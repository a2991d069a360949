//! Store Module
//!
//! The record store interface and its two backends.
//!
//! ## Backends
//! - `MemoryStore`: records in an ordered `Vec`, indexed by id
//! - `FileStore`: fixed-size binary slots in a flat file, indexed by byte
//!   offset, with soft delete and offline compaction (`purge`)
//!
//! ## Shared Operations
//! `insert`, `delete`, `update`, and `restore` are written once here on top
//! of the primitive operations each backend provides. Every operation either
//! completes or leaves records and indexes untouched; `restore` is the one
//! deliberate exception and skips records that fail validation.

mod file;
mod memory;

pub use file::{FileStore, DELETED_FLAG, NAME_WIDTH, SLOT_SIZE};
pub use memory::MemoryStore;

use std::fmt;

use chrono::NaiveDate;

use crate::error::{CabinetError, Result};
use crate::query::{parse_assignments, SearchOptions, Selection};
use crate::record::{Record, RecordParameters};
use crate::snapshot::Snapshot;

/// Largest id either backend accepts; slots store ids as `i32`
pub const MAX_ID: u32 = i32::MAX as u32;

/// Reject ids above `MAX_ID`
pub(crate) fn check_id(id: u32) -> Result<u32> {
    if id > MAX_ID {
        return Err(CabinetError::invalid_value(
            "id",
            id.to_string(),
            format!("must not exceed {}", MAX_ID),
        ));
    }
    Ok(id)
}

/// Record counts for a store
///
/// `total` counts every slot the store holds, including soft-deleted ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stat {
    pub total: usize,
    pub deleted: usize,
}

impl Stat {
    /// Records visible to reads
    pub fn active(&self) -> usize {
        self.total - self.deleted
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} record(s), {} deleted", self.total, self.deleted)
    }
}

/// Outcome of a compaction pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PurgeReport {
    pub purged: usize,
    pub total: usize,
}

impl fmt::Display for PurgeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {} records were purged", self.purged, self.total)
    }
}

/// The record store interface
///
/// Methods take `&mut self`: the file backend seeks a single owned handle
/// even for reads.
pub trait RecordStore {
    /// Run the store's validator over `params` without touching anything
    fn validate(&self, params: &RecordParameters) -> Result<()>;

    /// Validate and append a record; returns its id
    ///
    /// The id is the explicit one if non-zero, otherwise one more than the
    /// last record's id (1 for an empty store). Either way it must not
    /// exceed `MAX_ID` or belong to an active record (`DuplicateId`).
    fn create(&mut self, params: &RecordParameters) -> Result<u32>;

    /// Validate and overwrite the record whose id is `params.id`
    fn edit(&mut self, params: &RecordParameters) -> Result<()>;

    /// Delete one record; `false` if no active record has `id`
    fn remove(&mut self, id: u32) -> Result<bool>;

    fn get_by_id(&mut self, id: u32) -> Result<Record>;

    fn get_all(&mut self) -> Result<Vec<Record>>;

    fn find_by_first_name(&mut self, first_name: &str) -> Result<Selection>;

    fn find_by_last_name(&mut self, last_name: &str) -> Result<Selection>;

    fn find_by_date_of_birth(&mut self, date_of_birth: NaiveDate) -> Result<Selection>;

    fn select_by_options(&mut self, options: &SearchOptions) -> Result<Selection>;

    fn stat(&mut self) -> Result<Stat>;

    fn make_snapshot(&mut self) -> Result<Snapshot>;

    /// Reclaim space held by deleted records
    fn purge(&mut self) -> Result<PurgeReport>;

    /// Like `create`, but an explicit id already in use is an error
    fn insert(&mut self, params: &RecordParameters) -> Result<u32> {
        if let Some(id) = params.explicit_id() {
            match self.get_by_id(id) {
                Ok(_) => return Err(CabinetError::DuplicateId(id)),
                Err(CabinetError::NotFound(_)) => {}
                Err(e) => return Err(e),
            }
        }
        self.create(params)
    }

    /// Delete every record the predicate matches; returns removed ids in
    /// match order
    fn delete(&mut self, options: &SearchOptions) -> Result<Vec<u32>> {
        let ids = self.select_by_options(options)?.ids();
        if ids.is_empty() {
            return Err(CabinetError::NoMatch);
        }

        let mut removed = Vec::with_capacity(ids.len());
        for id in ids {
            if self.remove(id)? {
                removed.push(id);
            }
        }
        Ok(removed)
    }

    /// Apply `field = value` assignments to every matching record
    ///
    /// All assignments are parsed and every changed record is validated
    /// before the first edit, so a bad value or a failing rule leaves the
    /// store unchanged. Returns updated ids in match order.
    fn update(
        &mut self,
        assignments: &[(String, String)],
        options: &SearchOptions,
    ) -> Result<Vec<u32>> {
        let values = parse_assignments(assignments)?;
        let selection = self.select_by_options(options)?;
        if selection.is_empty() {
            return Err(CabinetError::NoMatch);
        }

        let mut pending: Vec<(u32, RecordParameters)> = Vec::with_capacity(selection.len());
        for record in &selection {
            if pending.iter().any(|(id, _)| *id == record.id()) {
                continue;
            }
            let mut params = RecordParameters::from(record);
            for value in &values {
                params.set(value.clone())?;
            }
            self.validate(&params)?;
            pending.push((record.id(), params));
        }

        let mut updated = Vec::with_capacity(pending.len());
        for (id, params) in &pending {
            self.edit(params)?;
            updated.push(*id);
        }
        Ok(updated)
    }

    /// Replay a snapshot: edit records whose id exists, create the rest
    ///
    /// Records failing validation are logged and skipped. The returned count
    /// is the number that passed validation, whether or not the edit/create
    /// fallback then stored them. I/O errors abort.
    fn restore(&mut self, snapshot: &Snapshot) -> Result<usize> {
        let mut imported = 0;

        for record in snapshot {
            let params = RecordParameters::from(record);
            if let Err(e) = self.validate(&params) {
                tracing::warn!("Record #{} skipped during restore: {}", record.id(), e);
                continue;
            }
            imported += 1;

            let stored = match self.edit(&params) {
                Err(CabinetError::NotFound(_)) => self.create(&params).map(|_| ()),
                other => other,
            };
            match stored {
                Ok(()) => {}
                Err(e @ CabinetError::Io(_)) => return Err(e),
                Err(e) => tracing::warn!("Record #{} not restored: {}", record.id(), e),
            }
        }

        tracing::info!("Restored {} of {} records", imported, snapshot.len());
        Ok(imported)
    }
}

impl<S: RecordStore + ?Sized> RecordStore for Box<S> {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        (**self).validate(params)
    }

    fn create(&mut self, params: &RecordParameters) -> Result<u32> {
        (**self).create(params)
    }

    fn edit(&mut self, params: &RecordParameters) -> Result<()> {
        (**self).edit(params)
    }

    fn remove(&mut self, id: u32) -> Result<bool> {
        (**self).remove(id)
    }

    fn get_by_id(&mut self, id: u32) -> Result<Record> {
        (**self).get_by_id(id)
    }

    fn get_all(&mut self) -> Result<Vec<Record>> {
        (**self).get_all()
    }

    fn find_by_first_name(&mut self, first_name: &str) -> Result<Selection> {
        (**self).find_by_first_name(first_name)
    }

    fn find_by_last_name(&mut self, last_name: &str) -> Result<Selection> {
        (**self).find_by_last_name(last_name)
    }

    fn find_by_date_of_birth(&mut self, date_of_birth: NaiveDate) -> Result<Selection> {
        (**self).find_by_date_of_birth(date_of_birth)
    }

    fn select_by_options(&mut self, options: &SearchOptions) -> Result<Selection> {
        (**self).select_by_options(options)
    }

    fn stat(&mut self) -> Result<Stat> {
        (**self).stat()
    }

    fn make_snapshot(&mut self) -> Result<Snapshot> {
        (**self).make_snapshot()
    }

    fn purge(&mut self) -> Result<PurgeReport> {
        (**self).purge()
    }

    fn insert(&mut self, params: &RecordParameters) -> Result<u32> {
        (**self).insert(params)
    }

    fn delete(&mut self, options: &SearchOptions) -> Result<Vec<u32>> {
        (**self).delete(options)
    }

    fn update(
        &mut self,
        assignments: &[(String, String)],
        options: &SearchOptions,
    ) -> Result<Vec<u32>> {
        (**self).update(assignments, options)
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<usize> {
        (**self).restore(snapshot)
    }
}
