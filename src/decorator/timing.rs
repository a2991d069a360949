//! Timing decorator

use std::time::Instant;

use chrono::NaiveDate;

use crate::error::Result;
use crate::query::{SearchOptions, Selection};
use crate::record::{Record, RecordParameters};
use crate::snapshot::Snapshot;
use crate::store::{PurgeReport, RecordStore, Stat};

const TARGET: &str = "filecabinet::timing";

/// Reports how long each wrapped call took
pub struct TimingStore<S> {
    inner: S,
}

impl<S: RecordStore> TimingStore<S> {
    pub fn new(inner: S) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn into_inner(self) -> S {
        self.inner
    }

    fn timed<T>(&mut self, method: &str, call: impl FnOnce(&mut S) -> T) -> T {
        let start = Instant::now();
        let result = call(&mut self.inner);
        let elapsed_us = start.elapsed().as_micros() as u64;
        tracing::info!(target: TARGET, method, elapsed_us, "{} took {}us", method, elapsed_us);
        result
    }
}

impl<S: RecordStore> RecordStore for TimingStore<S> {
    fn validate(&self, params: &RecordParameters) -> Result<()> {
        self.inner.validate(params)
    }

    fn create(&mut self, params: &RecordParameters) -> Result<u32> {
        self.timed("create", |s| s.create(params))
    }

    fn edit(&mut self, params: &RecordParameters) -> Result<()> {
        self.timed("edit", |s| s.edit(params))
    }

    fn remove(&mut self, id: u32) -> Result<bool> {
        self.timed("remove", |s| s.remove(id))
    }

    fn get_by_id(&mut self, id: u32) -> Result<Record> {
        self.timed("get_by_id", |s| s.get_by_id(id))
    }

    fn get_all(&mut self) -> Result<Vec<Record>> {
        self.timed("get_all", |s| s.get_all())
    }

    fn find_by_first_name(&mut self, first_name: &str) -> Result<Selection> {
        self.timed("find_by_first_name", |s| s.find_by_first_name(first_name))
    }

    fn find_by_last_name(&mut self, last_name: &str) -> Result<Selection> {
        self.timed("find_by_last_name", |s| s.find_by_last_name(last_name))
    }

    fn find_by_date_of_birth(&mut self, date_of_birth: NaiveDate) -> Result<Selection> {
        self.timed("find_by_date_of_birth", |s| s.find_by_date_of_birth(date_of_birth))
    }

    fn select_by_options(&mut self, options: &SearchOptions) -> Result<Selection> {
        self.timed("select_by_options", |s| s.select_by_options(options))
    }

    fn stat(&mut self) -> Result<Stat> {
        self.timed("stat", |s| s.stat())
    }

    fn make_snapshot(&mut self) -> Result<Snapshot> {
        self.timed("make_snapshot", |s| s.make_snapshot())
    }

    fn purge(&mut self) -> Result<PurgeReport> {
        self.timed("purge", |s| s.purge())
    }

    fn insert(&mut self, params: &RecordParameters) -> Result<u32> {
        self.timed("insert", |s| s.insert(params))
    }

    fn delete(&mut self, options: &SearchOptions) -> Result<Vec<u32>> {
        self.timed("delete", |s| s.delete(options))
    }

    fn update(
        &mut self,
        assignments: &[(String, String)],
        options: &SearchOptions,
    ) -> Result<Vec<u32>> {
        self.timed("update", |s| s.update(assignments, options))
    }

    fn restore(&mut self, snapshot: &Snapshot) -> Result<usize> {
        self.timed("restore", |s| s.restore(snapshot))
    }
}
