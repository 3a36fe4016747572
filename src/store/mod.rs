//! Persistence seam for job records.
//!
//! Every operation that touches a single record takes both the record id and
//! the owner id, so ownership is part of the match and never a separate check.

use async_trait::async_trait;

use crate::model::{
    job::{Job, JobPatch, JobStatus, NewJob},
    query::{JobFilter, JobSort, PageRequest},
};

pub mod memory;
pub mod mysql;

pub use memory::MemoryJobStore;
pub use mysql::MySqlJobStore;

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StoreError {
    #[display(fmt = "database error: {}", _0)]
    Database(sqlx::Error),
    #[display(fmt = "corrupt row {}: {}", id, reason)]
    CorruptRow { id: String, reason: String },
    #[display(fmt = "job store lock poisoned")]
    Poisoned,
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        StoreError::Database(e)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusCount {
    pub status: JobStatus,
    pub count: u64,
}

/// Applications created in one calendar month; `month` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub count: u64,
}

#[async_trait]
pub trait JobStore: Send + Sync {
    async fn find(
        &self,
        filter: &JobFilter,
        sort: JobSort,
        page: PageRequest,
    ) -> Result<Vec<Job>, StoreError>;

    async fn count(&self, filter: &JobFilter) -> Result<u64, StoreError>;

    async fn find_one(&self, id: &str, owner: u64) -> Result<Option<Job>, StoreError>;

    async fn create(&self, owner: u64, payload: NewJob) -> Result<Job, StoreError>;

    /// Returns the post-update document, or `None` when nothing matched.
    async fn find_one_and_update(
        &self,
        id: &str,
        owner: u64,
        patch: JobPatch,
    ) -> Result<Option<Job>, StoreError>;

    async fn find_one_and_delete(&self, id: &str, owner: u64) -> Result<Option<Job>, StoreError>;

    async fn count_by_status(&self, owner: u64) -> Result<Vec<StatusCount>, StoreError>;

    /// The `limit` most recent months with at least one application, newest first.
    async fn monthly_counts(&self, owner: u64, limit: u32) -> Result<Vec<MonthCount>, StoreError>;
}
