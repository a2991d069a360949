//! Configuration for the file cabinet
//!
//! Centralized configuration with sensible defaults, chosen once at startup.

use std::path::PathBuf;

use crate::error::{CabinetError, Result};
use crate::validation::{RuleSet, RulesFile, ValidationBounds};

/// Main configuration for a cabinet instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Which backend holds the records
    pub storage: StorageKind,

    /// Data file for the file backend (ignored by the memory backend)
    pub data_file: PathBuf,

    // -------------------------------------------------------------------------
    // Validation Configuration
    // -------------------------------------------------------------------------
    /// Built-in bound preset
    pub rule_set: RuleSet,

    /// Optional JSON file overriding preset bounds
    pub rules_file: Option<PathBuf>,

    // -------------------------------------------------------------------------
    // Decorators
    // -------------------------------------------------------------------------
    /// Wrap the store in `LoggingStore`
    pub use_logger: bool,

    /// Wrap the store in `TimingStore`
    pub use_stopwatch: bool,
}

/// Store backend selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    /// Records held in process memory, gone on exit
    #[default]
    Memory,

    /// Records held in a flat file of fixed-size slots
    File,
}

impl std::str::FromStr for StorageKind {
    type Err = CabinetError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "memory" => Ok(StorageKind::Memory),
            "file" => Ok(StorageKind::File),
            other => Err(CabinetError::Config(format!(
                "Unknown storage '{}'. Expected \"memory\" or \"file\".",
                other
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage: StorageKind::Memory,
            data_file: PathBuf::from("cabinet.db"),
            rule_set: RuleSet::Default,
            rules_file: None,
            use_logger: false,
            use_stopwatch: false,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Resolve validation bounds: the preset, overridden by the rules file
    /// section for the same rule set if a file is configured
    pub fn validation_bounds(&self) -> Result<ValidationBounds> {
        match &self.rules_file {
            Some(path) => Ok(RulesFile::from_file(path)?.bounds(self.rule_set)),
            None => Ok(ValidationBounds::preset(self.rule_set)),
        }
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the storage backend
    pub fn storage(mut self, storage: StorageKind) -> Self {
        self.config.storage = storage;
        self
    }

    /// Set the data file used by the file backend
    pub fn data_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.data_file = path.into();
        self
    }

    /// Set the validation preset
    pub fn rule_set(mut self, rule_set: RuleSet) -> Self {
        self.config.rule_set = rule_set;
        self
    }

    /// Set a JSON validation rules file
    pub fn rules_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.rules_file = Some(path.into());
        self
    }

    /// Enable the audit logging decorator
    pub fn use_logger(mut self, enabled: bool) -> Self {
        self.config.use_logger = enabled;
        self
    }

    /// Enable the timing decorator
    pub fn use_stopwatch(mut self, enabled: bool) -> Self {
        self.config.use_stopwatch = enabled;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
