//! # File Cabinet
//!
//! A single-process record manager storing fixed-schema personal records:
//! - Two interchangeable backends (in-memory and flat-file)
//! - Secondary indexes over every record attribute
//! - A small predicate language for select, delete, and update
//! - Soft delete and offline compaction for the flat-file backend
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                Decorators (logging, timing)                 │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │  RecordStore
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │            Backend (chosen once from Config)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!          ┌────────────┴────────────┐
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │ MemoryStore │          │  FileStore  │
//!   │ IndexSet<id>│          │IndexSet<off>│
//!   └──────┬──────┘          └──────┬──────┘
//!          └────────────┬───────────┘
//!                       ▼
//!        Validator · Predicate evaluator · Snapshot
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod validation;
pub mod index;
pub mod query;
pub mod store;
pub mod snapshot;
pub mod decorator;
pub mod cabinet;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CabinetError, Result};
pub use config::{Config, StorageKind};
pub use cabinet::{Backend, Cabinet};
pub use query::{SearchOptions, Selection};
pub use record::{Field, Record, RecordParameters};
pub use snapshot::Snapshot;
pub use store::{FileStore, MemoryStore, RecordStore, Stat};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of the file cabinet
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
