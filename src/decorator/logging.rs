//! Audit logging decorator

use std::fmt::Debug;

use chrono::NaiveDate;

use crate::error::Result;
use crate::query::{SearchOptions, Selection};
use crate::record::{Record, RecordParameters};
use crate::snapshot::Snapshot;
use crate::store::{PurgeReport, RecordStore, Stat};

const TARGET: &str = "filecabinet::audit";

/// Logs each call and its outcome under the `filecabinet::audit` target
pub struct LoggingStore<S> {
    inner: S,
}

impl<S: RecordStore> LoggingStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

/// Log the outcome of `method` and hand the result back untouched
fn outcome<T: Debug>(method: &str, result: Result<T>) -> Result<T> {
    match &result {
        Ok(value) => tracing::info!(target: TARGET, "{}() returned {:?}", method, value),
        Err(e) => tracing::info!(target: TARGET, "{}() failed: {}", method, e),
    }
    result
}

/// Short form for results too large to print in full
fn summarize<T>(method: &str, result: Result<Vec<T>>, noun: &str) -> Result<Vec<T>> {
    match &result {
        Ok(items) => tracing::info!(target: TARGET, "{}() returned {} {}", method, items.len(), noun),
        Err(e) => tracing::info!(target: TARGET, "{}() failed: {}", method, e),
    }
    result
}

fn selected(method: &str, result: Result<Selection>) -> Result<Selection> {
    match &result {
        Ok(selection) => {
            tracing::info!(target: TARGET, "{}() returned ids {:?}", method, selection.ids())
        }
        Err(e) => tracing::info!(target: TARGET, "{}() failed: {}", method, e),
    }
    result
}

impl<S: RecordStore> RecordStore for LoggingStore<S> {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        self.inner.validate(params)
    }

    fn create(&mut self, params: &RecordParameters) -> Result<u32> {
        tracing::info!(target: TARGET, "create() with {:?}", params);
        outcome("create", self.inner.create(params))
    }

    fn edit(&mut self, params: &RecordParameters) -> Result<()> {
        tracing::info!(target: TARGET, "edit() with {:?}", params);
        outcome("edit", self.inner.edit(params))
    }

    fn remove(&mut self, id: u32) -> Result<bool> {
        tracing::info!(target: TARGET, "remove() with id = {}", id);
        outcome("remove", self.inner.remove(id))
    }

    fn get_by_id(&mut self, id: u32) -> Result<Record> {
        tracing::info!(target: TARGET, "get_by_id() with id = {}", id);
        outcome("get_by_id", self.inner.get_by_id(id))
    }

    fn get_all(&mut self) -> Result<Vec<Record>> {
        tracing::info!(target: TARGET, "get_all()");
        summarize("get_all", self.inner.get_all(), "records")
    }

    fn find_by_first_name(&mut self, first_name: &str) -> Result<Selection> {
        tracing::info!(target: TARGET, "find_by_first_name() with '{}'", first_name);
        selected("find_by_first_name", self.inner.find_by_first_name(first_name))
    }

    fn find_by_last_name(&mut self, last_name: &str) -> Result<Selection> {
        tracing::info!(target: TARGET, "find_by_last_name() with '{}'", last_name);
        selected("find_by_last_name", self.inner.find_by_last_name(last_name))
    }

    fn find_by_date_of_birth(&mut self, date_of_birth: NaiveDate) -> Result<Selection> {
        tracing::info!(target: TARGET, "find_by_date_of_birth() with {}", date_of_birth);
        selected("find_by_date_of_birth", self.inner.find_by_date_of_birth(date_of_birth))
    }

    fn select_by_options(&mut self, options: &SearchOptions) -> Result<Selection> {
        tracing::info!(target: TARGET, "select_by_options() where {}", options);
        selected("select_by_options", self.inner.select_by_options(options))
    }

    fn stat(&mut self) -> Result<Stat> {
        tracing::info!(target: TARGET, "stat()");
        outcome("stat", self.inner.stat())
    }

    fn make_snapshot(&mut self) -> Result<Snapshot> {
        tracing::info!(target: TARGET, "make_snapshot()");
        let result = self.inner.make_snapshot();
        match &result {
            Ok(snapshot) => {
                tracing::info!(target: TARGET, "make_snapshot() captured {} records", snapshot.len())
            }
            Err(e) => tracing::info!(target: TARGET, "make_snapshot() failed: {}", e),
        }
        result
    }

    fn purge(&mut self) -> Result<PurgeReport> {
        tracing::info!(target: TARGET, "purge()");
        outcome("purge", self.inner.purge())
    }

    fn insert(&mut self, params: &RecordParameters) -> Result<u32> {
        tracing::info!(target: TARGET, "insert() with {:?}", params);
        outcome("insert", self.inner.insert(params))
    }

    fn delete(&mut self, options: &SearchOptions) -> Result<Vec<u32>> {
        tracing::info!(target: TARGET, "delete() where {}", options);
        outcome("delete", self.inner.delete(options))
    }

    fn update(
        &mut self,
        assignments: &[(String, String)],
        options: &SearchOptions,
    ) -> Result<Vec<u32>> {
        tracing::info!(target: TARGET, "update() set {:?} where {}", assignments, options);
        outcome("update", self.inner.update(assignments, options))
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<usize> {
        tracing::info!(target: TARGET, "restore() with {} records", snapshot.len());
        outcome("restore", self.inner.restore(snapshot))
    }
}
