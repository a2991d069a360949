//! Decorator Module
//!
//! Transparent wrappers around any `RecordStore`.
//!
//! - `LoggingStore`: one audit event per call and one per outcome
//! - `TimingStore`: elapsed time per call
//!
//! Decorators are composed by explicit construction and forward every
//! method, including the shared `insert`/`delete`/`update`/`restore`, to the
//! wrapped store. They never change results, errors, or call order.
//!
//! ```text
//! TimingStore::new(LoggingStore::new(backend))
//! ```

mod logging;
mod timing;

pub use logging::LoggingStore;
pub use timing::TimingStore;
