//! In-memory collaborators.
//!
//! [`MemoryCatalog`] and [`MemoryJobRegistry`] back the CLI's demo director
//! (rows and live jobs come from the `[[record]]` and `[[running]]` tables of
//! the configuration) and the test suite.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::collab::{Catalog, JobRegistry};
use crate::error::CatalogError;
use crate::types::{DbId, JobId, LiveJob, Record, RecordKind};

/// Catalog over a vector of records.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    records: Vec<Record>,
    unavailable: Option<String>,
    lookups: AtomicUsize,
}

impl MemoryCatalog {
    pub fn new(records: impl IntoIterator<Item = Record>) -> Self {
        Self {
            records: records.into_iter().collect(),
            unavailable: None,
            lookups: AtomicUsize::new(0),
        }
    }

    /// A catalog whose every query fails with [`CatalogError::Unavailable`].
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            unavailable: Some(reason.into()),
            ..Self::default()
        }
    }

    pub fn insert(&mut self, record: Record) {
        self.records.push(record);
    }

    /// Number of single-row lookups (by id or by name) served so far.
    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::Relaxed)
    }

    fn check(&self) -> Result<(), CatalogError> {
        match &self.unavailable {
            Some(reason) => Err(CatalogError::Unavailable(reason.clone())),
            None => Ok(()),
        }
    }

    fn rows(&self, kind: RecordKind) -> impl Iterator<Item = &Record> {
        self.records.iter().filter(move |r| r.kind == kind)
    }
}

impl Catalog for MemoryCatalog {
    fn list_ids(&self, kind: RecordKind) -> Result<Vec<DbId>, CatalogError> {
        self.check()?;
        Ok(self.rows(kind).map(|r| r.id).collect())
    }

    fn lookup_by_id(&self, kind: RecordKind, id: DbId) -> Result<Option<Record>, CatalogError> {
        self.check()?;
        self.lookups.fetch_add(1, Ordering::Relaxed);
        Ok(self.rows(kind).find(|r| r.id == id).cloned())
    }

    fn lookup_by_name(
        &self,
        kind: RecordKind,
        name: &str,
    ) -> Result<Option<Record>, CatalogError> {
        self.check()?;
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let found = self
            .rows(kind)
            .find(|r| match kind {
                RecordKind::Job => r.unique_name.as_deref() == Some(name),
                _ => r.name == name,
            })
            .cloned();
        debug!(kind = kind.label(), name, found = found.is_some(), "catalog lookup");
        Ok(found)
    }

    fn list_media(&self, pool_id: Option<DbId>) -> Result<Vec<Record>, CatalogError> {
        self.check()?;
        Ok(self
            .rows(RecordKind::Media)
            .filter(|r| pool_id.is_none() || r.pool_id == pool_id)
            .cloned()
            .collect())
    }

    fn list_jobs(&self, job_name: Option<&str>) -> Result<Vec<Record>, CatalogError> {
        self.check()?;
        Ok(self
            .rows(RecordKind::Job)
            .filter(|r| job_name.is_none_or(|name| r.name == name))
            .cloned()
            .collect())
    }
}

/// Live job registry safe to mutate from other threads while a console
/// selects from it.
#[derive(Debug, Default)]
pub struct MemoryJobRegistry {
    jobs: RwLock<Vec<LiveJob>>,
}

impl MemoryJobRegistry {
    pub fn new(jobs: impl IntoIterator<Item = LiveJob>) -> Self {
        Self {
            jobs: RwLock::new(jobs.into_iter().collect()),
        }
    }

    /// Register a job, replacing any job with the same id.
    pub fn start(&self, job: LiveJob) {
        let mut jobs = self.write();
        jobs.retain(|j| j.id != job.id);
        jobs.push(job);
    }

    /// Remove a job. Returns false when it was not registered.
    pub fn finish(&self, id: JobId) -> bool {
        let mut jobs = self.write();
        let before = jobs.len();
        jobs.retain(|j| j.id != id);
        jobs.len() != before
    }

    // A panicking writer cannot leave the vector half-updated, so a poisoned
    // lock is still safe to read.
    fn read(&self) -> RwLockReadGuard<'_, Vec<LiveJob>> {
        self.jobs.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<LiveJob>> {
        self.jobs.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl JobRegistry for MemoryJobRegistry {
    fn by_id(&self, id: JobId) -> Option<LiveJob> {
        self.read().iter().find(|j| j.id == id).cloned()
    }

    fn by_partial_name(&self, prefix: &str) -> Option<LiveJob> {
        self.read()
            .iter()
            .find(|j| j.unique_name.starts_with(prefix))
            .cloned()
    }

    fn by_full_name(&self, unique_name: &str) -> Option<LiveJob> {
        self.read()
            .iter()
            .find(|j| j.unique_name == unique_name)
            .cloned()
    }

    fn snapshot(&self) -> Vec<LiveJob> {
        self.read().clone()
    }
}
