use std::{
    cmp::Ordering,
    collections::{BTreeMap, HashMap},
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use tracing::debug;
use uuid::Uuid;

use super::{JobStore, MonthCount, StatusCount, StoreError};
use crate::model::{
    job::{Job, JobPatch, JobStatus, NewJob},
    query::{JobFilter, JobSort, PageRequest},
};

/// In-process store. Used when no database is configured, and by tests.
#[derive(Default)]
pub struct MemoryJobStore {
    jobs: RwLock<Vec<Job>>,
}

fn matches(filter: &JobFilter, job: &Job) -> bool {
    if job.created_by != filter.owner {
        return false;
    }
    if let Some(search) = &filter.search {
        if !job.position.to_lowercase().contains(&search.to_lowercase()) {
            return false;
        }
    }
    if filter.status.is_some_and(|s| s != job.status) {
        return false;
    }
    if filter.job_type.is_some_and(|t| t != job.job_type) {
        return false;
    }
    true
}

fn by_position(a: &Job, b: &Job) -> Ordering {
    a.position
        .to_lowercase()
        .cmp(&b.position.to_lowercase())
        .then_with(|| a.position.cmp(&b.position))
}

fn compare(sort: JobSort, a: &Job, b: &Job) -> Ordering {
    match sort {
        JobSort::Latest => b.created_at.cmp(&a.created_at),
        JobSort::Oldest => a.created_at.cmp(&b.created_at),
        JobSort::AtoZ => by_position(a, b),
        JobSort::ZtoA => by_position(b, a),
    }
}

impl MemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Vec<Job>>, StoreError> {
        self.jobs.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Vec<Job>>, StoreError> {
        self.jobs.write().map_err(|_| StoreError::Poisoned)
    }

    /// Inserts a fully formed record, timestamps included.
    #[cfg(test)]
    pub fn insert(&self, job: Job) {
        self.jobs.write().unwrap().push(job);
    }
}

#[async_trait]
impl JobStore for MemoryJobStore {
    async fn find(
        &self,
        filter: &JobFilter,
        sort: JobSort,
        page: PageRequest,
    ) -> Result<Vec<Job>, StoreError> {
        let jobs = self.read()?;
        let mut found: Vec<Job> = jobs.iter().filter(|j| matches(filter, j)).cloned().collect();
        found.sort_by(|a, b| compare(sort, a, b));

        Ok(found
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .collect())
    }

    async fn count(&self, filter: &JobFilter) -> Result<u64, StoreError> {
        let jobs = self.read()?;
        Ok(jobs.iter().filter(|j| matches(filter, j)).count() as u64)
    }

    async fn find_one(&self, id: &str, owner: u64) -> Result<Option<Job>, StoreError> {
        let jobs = self.read()?;
        Ok(jobs
            .iter()
            .find(|j| j.id == id && j.created_by == owner)
            .cloned())
    }

    async fn create(&self, owner: u64, payload: NewJob) -> Result<Job, StoreError> {
        let now = Utc::now();
        let job = Job {
            id: Uuid::new_v4().to_string(),
            job_location: payload.location().to_string(),
            company: payload.company,
            position: payload.position,
            status: payload.status,
            job_type: payload.job_type,
            created_by: owner,
            created_at: now,
            updated_at: now,
        };

        self.write()?.push(job.clone());
        debug!(job_id = %job.id, owner, "Job stored in memory");
        Ok(job)
    }

    async fn find_one_and_update(
        &self,
        id: &str,
        owner: u64,
        patch: JobPatch,
    ) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.write()?;
        let Some(job) = jobs
            .iter_mut()
            .find(|j| j.id == id && j.created_by == owner)
        else {
            return Ok(None);
        };

        patch.apply(job, Utc::now());
        Ok(Some(job.clone()))
    }

    async fn find_one_and_delete(&self, id: &str, owner: u64) -> Result<Option<Job>, StoreError> {
        let mut jobs = self.write()?;
        let idx = jobs
            .iter()
            .position(|j| j.id == id && j.created_by == owner);

        Ok(idx.map(|i| jobs.remove(i)))
    }

    async fn count_by_status(&self, owner: u64) -> Result<Vec<StatusCount>, StoreError> {
        let jobs = self.read()?;
        let mut counts: HashMap<JobStatus, u64> = HashMap::new();
        for job in jobs.iter().filter(|j| j.created_by == owner) {
            *counts.entry(job.status).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect())
    }

    async fn monthly_counts(&self, owner: u64, limit: u32) -> Result<Vec<MonthCount>, StoreError> {
        let jobs = self.read()?;
        let mut months: BTreeMap<(i32, u32), u64> = BTreeMap::new();
        for job in jobs.iter().filter(|j| j.created_by == owner) {
            let key = (job.created_at.year(), job.created_at.month());
            *months.entry(key).or_default() += 1;
        }

        Ok(months
            .into_iter()
            .rev()
            .take(limit as usize)
            .map(|((year, month), count)| MonthCount { year, month, count })
            .collect())
    }
}
