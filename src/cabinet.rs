//! Cabinet Module
//!
//! Assembles a store from configuration.
//!
//! ## Responsibilities
//! - Build the validator from the configured preset and rules file
//! - Select the backend once (`Backend` is a closed set)
//! - Stack the configured decorators on top
//!
//! After `open` returns, the rest of the program talks to one
//! `RecordStore`; nothing switches on the backend again.

use chrono::NaiveDate;

use crate::config::{Config, StorageKind};
use crate::decorator::{LoggingStore, TimingStore};
use crate::error::Result;
use crate::query::{SearchOptions, Selection};
use crate::record::{Record, RecordParameters};
use crate::snapshot::Snapshot;
use crate::store::{FileStore, MemoryStore, PurgeReport, RecordStore, Stat};
use crate::validation::{CompositeValidator, ValidatorBuilder};

/// The available store backends
pub enum Backend {
    Memory(MemoryStore),
    File(FileStore),
}

impl Backend {
    /// Open the backend named by `config.storage`
    pub fn open(config: &Config, validator: CompositeValidator) -> Result<Self> {
        match config.storage {
            StorageKind::Memory => Ok(Backend::Memory(MemoryStore::new(validator))),
            StorageKind::File => Ok(Backend::File(FileStore::open(&config.data_file, validator)?)),
        }
    }

    pub fn kind(&self) -> StorageKind {
        match self {
            Backend::Memory(_) => StorageKind::Memory,
            Backend::File(_) => StorageKind::File,
        }
    }

    fn store(&self) -> &dyn RecordStore {
        match self {
            Backend::Memory(s) => s,
            Backend::File(s) => s,
        }
    }

    fn store_mut(&mut self) -> &mut dyn RecordStore {
        match self {
            Backend::Memory(s) => s,
            Backend::File(s) => s,
        }
    }
}

impl RecordStore for Backend {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        self.store().validate(params)
    }

    fn create(&mut self, params: &RecordParameters) -> Result<u32> {
        self.store_mut().create(params)
    }

    fn edit(&mut self, params: &RecordParameters) -> Result<()> {
        self.store_mut().edit(params)
    }

    fn remove(&mut self, id: u32) -> Result<bool> {
        self.store_mut().remove(id)
    }

    fn get_by_id(&mut self, id: u32) -> Result<Record> {
        self.store_mut().get_by_id(id)
    }

    fn get_all(&mut self) -> Result<Vec<Record>> {
        self.store_mut().get_all()
    }

    fn find_by_first_name(&mut self, first_name: &str) -> Result<Selection> {
        self.store_mut().find_by_first_name(first_name)
    }

    fn find_by_last_name(&mut self, last_name: &str) -> Result<Selection> {
        self.store_mut().find_by_last_name(last_name)
    }

    fn find_by_date_of_birth(&mut self, date_of_birth: NaiveDate) -> Result<Selection> {
        self.store_mut().find_by_date_of_birth(date_of_birth)
    }

    fn select_by_options(&mut self, options: &SearchOptions) -> Result<Selection> {
        self.store_mut().select_by_options(options)
    }

    fn stat(&mut self) -> Result<Stat> {
        self.store_mut().stat()
    }

    fn make_snapshot(&mut self) -> Result<Snapshot> {
        self.store_mut().make_snapshot()
    }

    fn purge(&mut self) -> Result<PurgeReport> {
        self.store_mut().purge()
    }

    fn delete(&mut self, options: &SearchOptions) -> Result<Vec<u32>> {
        self.store_mut().delete(options)
    }
}

/// A configured store plus the configuration it came from
pub struct Cabinet {
    config: Config,
    store: Box<dyn RecordStore>,
}

impl Cabinet {
    /// Open the configured backend with its validator and decorators
    ///
    /// Decorators stack with timing outermost, so timings include the cost
    /// of audit logging.
    pub fn open(config: Config) -> Result<Self> {
        let bounds = config.validation_bounds()?;
        let validator = ValidatorBuilder::from_bounds(&bounds).build();
        let backend = Backend::open(&config, validator)?;

        tracing::info!(
            "Opened {:?} cabinet with {:?} validation rules",
            backend.kind(),
            config.rule_set
        );

        let store: Box<dyn RecordStore> = match (config.use_logger, config.use_stopwatch) {
            (false, false) => Box::new(backend),
            (true, false) => Box::new(LoggingStore::new(backend)),
            (false, true) => Box::new(TimingStore::new(backend)),
            (true, true) => Box::new(TimingStore::new(LoggingStore::new(backend))),
        };

        Ok(Self { config, store })
    }

    /// The store all operations go through
    pub fn store(&mut self) -> &mut dyn RecordStore {
        self.store.as_mut()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}
