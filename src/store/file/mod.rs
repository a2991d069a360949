//! File-backed store
//!
//! Records live in a flat file of fixed-size slots (see `slot`). The index
//! set maps attribute values to slot byte offsets and is rebuilt from the
//! file on open; nothing but records is persisted.
//!
//! ## Deletion
//! Removing a record sets `DELETED_FLAG` in its slot's status field. The
//! slot keeps its bytes and position until `purge` compacts the file.
//! Deleted slots are invisible to every read path and to the indexes.
//!
//! ## Ownership
//! The store owns its file handle exclusively. No locking is done; another
//! writer on the same file would invalidate the in-memory offsets.

mod slot;

pub use slot::{Slot, DELETED_FLAG, NAME_WIDTH, SLOT_SIZE};

use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use chrono::NaiveDate;

use crate::error::{CabinetError, Result};
use crate::index::IndexSet;
use crate::query::{evaluate, IndexedSource, SearchOptions, Selection};
use crate::record::{FieldValue, Record, RecordParameters};
use crate::snapshot::Snapshot;
use crate::validation::RecordValidator;

use super::{check_id, PurgeReport, RecordStore, Stat};

/// Record store over a flat file of fixed-size slots
pub struct FileStore {
    /// Path of the data file
    path: PathBuf,

    /// Exclusively owned read/write handle
    file: File,

    /// Attribute → slot offset, active slots only
    index: IndexSet<u64>,

    /// Soft-deleted slots still occupying space
    deleted: usize,

    validator: Box<dyn RecordValidator>,
}

impl FileStore {
    /// Open or create a data file
    ///
    /// Scans every slot once to rebuild the indexes and the deleted count.
    /// A file whose length is not a whole number of slots is corrupt.
    pub fn open(path: impl AsRef<Path>, validator: impl RecordValidator + 'static) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)?;

        let mut store = Self {
            path,
            file,
            index: IndexSet::new(),
            deleted: 0,
            validator: Box::new(validator),
        };
        store.rebuild_index()?;

        tracing::info!(
            "Opened {} with {} active and {} deleted records",
            store.path.display(),
            store.index.len(),
            store.deleted
        );
        Ok(store)
    }

    /// Path of the data file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current data file length in bytes
    pub fn file_len(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    /// Soft-delete every record whose `attribute` equals `value`
    ///
    /// Typed attributes must parse or the call fails; no match is `NoMatch`.
    pub fn delete_by(&mut self, attribute: &str, value: &str) -> Result<Vec<u32>> {
        self.delete(&SearchOptions::single(attribute, value))
    }

    // =========================================================================
    // Slot I/O
    // =========================================================================

    /// Whole file contents, checked to be a whole number of slots
    fn read_file(&mut self) -> Result<Vec<u8>> {
        let mut data = Vec::new();
        self.file.seek(SeekFrom::Start(0))?;
        self.file.read_to_end(&mut data)?;

        if data.len() % SLOT_SIZE != 0 {
            return Err(CabinetError::CorruptRecord(format!(
                "{} is {} bytes, not a multiple of the {}-byte slot",
                self.path.display(),
                data.len(),
                SLOT_SIZE
            )));
        }
        Ok(data)
    }

    /// Every slot with its offset, in file order
    fn read_slots(&mut self) -> Result<Vec<(u64, Slot)>> {
        let data = self.read_file()?;
        data.chunks(SLOT_SIZE)
            .enumerate()
            .map(|(i, chunk)| Ok(((i * SLOT_SIZE) as u64, slot::decode(chunk)?)))
            .collect()
    }

    fn read_slot(&mut self, offset: u64) -> Result<Slot> {
        let mut buf = [0u8; SLOT_SIZE];
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.read_exact(&mut buf).map_err(|e| match e.kind() {
            std::io::ErrorKind::UnexpectedEof => CabinetError::CorruptRecord(format!(
                "Short slot at offset {} in {}",
                offset,
                self.path.display()
            )),
            _ => CabinetError::Io(e),
        })?;
        slot::decode(&buf)
    }

    fn write_at(&mut self, offset: u64, bytes: &[u8]) -> Result<()> {
        self.file.seek(SeekFrom::Start(offset))?;
        self.file.write_all(bytes)?;
        self.file.flush()?;
        Ok(())
    }

    /// Flip the deleted bit of the slot at `offset` and unindex it
    fn mark_deleted(&mut self, offset: u64, slot: &Slot) -> Result<()> {
        let status = slot.status | DELETED_FLAG;
        self.write_at(offset, &status.to_le_bytes())?;
        self.index.remove(&slot.record, offset);
        self.deleted += 1;

        tracing::debug!("Soft-deleted record #{} at offset {}", slot.record.id(), offset);
        Ok(())
    }

    /// First slot carrying `id`; deleted slots are considered only when
    /// `include_deleted` is set
    fn find_slot(&mut self, id: u32, include_deleted: bool) -> Result<Option<(u64, Slot)>> {
        Ok(self
            .read_slots()?
            .into_iter()
            .find(|(_, s)| s.record.id() == id && (include_deleted || !s.is_deleted())))
    }

    /// Id of the last active slot scanning backward, or 0 when none
    fn last_active_id(&mut self) -> Result<u32> {
        Ok(self
            .read_slots()?
            .into_iter()
            .rev()
            .find(|(_, s)| !s.is_deleted())
            .map(|(_, s)| s.record.id())
            .unwrap_or(0))
    }

    fn rebuild_index(&mut self) -> Result<()> {
        let slots = self.read_slots()?;
        self.index.clear();
        self.deleted = 0;
        for (offset, slot) in &slots {
            if slot.is_deleted() {
                self.deleted += 1;
            } else {
                self.index.add(&slot.record, *offset);
            }
        }
        Ok(())
    }

    fn materialize(&mut self, offsets: &[u64]) -> Result<Selection> {
        offsets
            .iter()
            .map(|offset| Ok(self.read_slot(*offset)?.record))
            .collect::<Result<Vec<_>>>()
            .map(Selection::new)
    }

    fn find(&mut self, value: &FieldValue) -> Result<Selection> {
        let offsets = self.index.lookup(value).map(<[u64]>::to_vec).unwrap_or_default();
        self.materialize(&offsets)
    }
}

impl IndexedSource for FileStore {
    type Location = u64;

    fn index(&self) -> &IndexSet<u64> {
        &self.index
    }

    fn locate_id(&mut self, id: u32) -> Result<Option<u64>> {
        Ok(self.find_slot(id, false)?.map(|(offset, _)| offset))
    }

    fn active_locations(&mut self) -> Result<Vec<u64>> {
        Ok(self
            .read_slots()?
            .into_iter()
            .filter(|(_, s)| !s.is_deleted())
            .map(|(offset, _)| offset)
            .collect())
    }
}

impl RecordStore for FileStore {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        self.validator.validate(params)
    }

    fn create(&mut self, params: &RecordParameters) -> Result<u32> {
        self.validator.validate(params)?;

        let id = match params.explicit_id() {
            Some(id) => id,
            None => self.last_active_id()?.saturating_add(1),
        };
        let id = check_id(id)?;
        if self.find_slot(id, false)?.is_some() {
            return Err(CabinetError::DuplicateId(id));
        }

        let record = Record::new(id, params);
        let bytes = slot::encode(&record, 0)?;

        let offset = self.file.seek(SeekFrom::End(0))?;
        self.write_at(offset, &bytes)?;
        self.index.add(&record, offset);

        tracing::debug!("Created record #{} at offset {}", id, offset);
        Ok(id)
    }

    /// The first slot carrying the id decides: if it is deleted, the edit
    /// fails with `NotFound` even when a later active slot has the same id.
    fn edit(&mut self, params: &RecordParameters) -> Result<()> {
        let id = params.explicit_id().ok_or(CabinetError::NotFound(0))?;
        self.validator.validate(params)?;

        let (offset, old) = match self.find_slot(id, true)? {
            Some((offset, slot)) if !slot.is_deleted() => (offset, slot),
            _ => return Err(CabinetError::NotFound(id)),
        };

        let record = Record::new(id, params);
        let bytes = slot::encode(&record, old.status)?;
        self.write_at(offset, &bytes)?;
        self.index.replace(&old.record, &record, offset);

        tracing::debug!("Edited record #{} at offset {}", id, offset);
        Ok(())
    }

    fn remove(&mut self, id: u32) -> Result<bool> {
        match self.find_slot(id, false)? {
            Some((offset, slot)) => {
                self.mark_deleted(offset, &slot)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Resolve the predicate to offsets and soft-delete each slot once
    fn delete(&mut self, options: &SearchOptions) -> Result<Vec<u32>> {
        let offsets = evaluate(self, options)?;
        if offsets.is_empty() {
            return Err(CabinetError::NoMatch);
        }

        let mut removed = Vec::with_capacity(offsets.len());
        for offset in offsets {
            let slot = self.read_slot(offset)?;
            if slot.is_deleted() {
                continue;
            }
            self.mark_deleted(offset, &slot)?;
            removed.push(slot.record.id());
        }
        Ok(removed)
    }

    fn get_by_id(&mut self, id: u32) -> Result<Record> {
        self.find_slot(id, false)?
            .map(|(_, slot)| slot.record)
            .ok_or(CabinetError::NotFound(id))
    }

    fn get_all(&mut self) -> Result<Vec<Record>> {
        Ok(self
            .read_slots()?
            .into_iter()
            .filter(|(_, s)| !s.is_deleted())
            .map(|(_, s)| s.record)
            .collect())
    }

    fn find_by_first_name(&mut self, first_name: &str) -> Result<Selection> {
        self.find(&FieldValue::FirstName(first_name.to_string()))
    }

    fn find_by_last_name(&mut self, last_name: &str) -> Result<Selection> {
        self.find(&FieldValue::LastName(last_name.to_string()))
    }

    fn find_by_date_of_birth(&mut self, date_of_birth: NaiveDate) -> Result<Selection> {
        self.find(&FieldValue::DateOfBirth(date_of_birth))
    }

    fn select_by_options(&mut self, options: &SearchOptions) -> Result<Selection> {
        let offsets = evaluate(self, options)?;
        self.materialize(&offsets)
    }

    fn stat(&mut self) -> Result<Stat> {
        Ok(Stat {
            total: (self.file_len()? / SLOT_SIZE as u64) as usize,
            deleted: self.deleted,
        })
    }

    fn make_snapshot(&mut self) -> Result<Snapshot> {
        Ok(Snapshot::new(self.get_all()?))
    }

    /// Copy active slots to the front of the file in order, truncate the
    /// tail, and re-index at the new offsets
    fn purge(&mut self) -> Result<PurgeReport> {
        let data = self.read_file()?;
        let total = data.len() / SLOT_SIZE;

        let mut compacted = Vec::with_capacity(data.len());
        for chunk in data.chunks(SLOT_SIZE) {
            if !slot::is_deleted(slot::decode_status(chunk)?) {
                compacted.extend_from_slice(chunk);
            }
        }
        let purged = total - compacted.len() / SLOT_SIZE;

        if purged > 0 {
            self.write_at(0, &compacted)?;
            self.file.set_len(compacted.len() as u64)?;
            self.file.sync_all()?;
        }
        self.rebuild_index()?;

        let report = PurgeReport { purged, total };
        tracing::info!("{}", report);
        Ok(report)
    }
}
