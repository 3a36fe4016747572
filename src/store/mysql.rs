use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, MySqlPool};
use tracing::{debug, error};
use uuid::Uuid;

use super::{JobStore, MonthCount, StatusCount, StoreError};
use crate::{
    model::{
        job::{Job, JobPatch, JobStatus, JobType, NewJob},
        query::{JobFilter, JobSort, PageRequest},
    },
    utils::db_utils::{
        SqlClause, SqlValue, bind_query, bind_query_as, bind_query_scalar, like_contains,
    },
};

const JOB_COLUMNS: &str = "id, company, position, status, job_type, job_location, \
                           created_by, created_at, updated_at";

#[derive(FromRow)]
struct JobRow {
    id: String,
    company: String,
    position: String,
    status: String,
    job_type: String,
    job_location: String,
    created_by: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<JobRow> for Job {
    type Error = StoreError;

    fn try_from(row: JobRow) -> Result<Self, Self::Error> {
        let status = JobStatus::from_str(&row.status).map_err(|_| StoreError::CorruptRow {
            id: row.id.clone(),
            reason: format!("unknown status '{}'", row.status),
        })?;
        let job_type = JobType::from_str(&row.job_type).map_err(|_| StoreError::CorruptRow {
            id: row.id.clone(),
            reason: format!("unknown job_type '{}'", row.job_type),
        })?;

        Ok(Job {
            id: row.id,
            company: row.company,
            position: row.position,
            status,
            job_type,
            job_location: row.job_location,
            created_by: row.created_by,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

fn where_clause(filter: &JobFilter) -> SqlClause {
    let mut clause = SqlClause::default();
    clause.push("created_by = ?", SqlValue::U64(filter.owner));

    if let Some(search) = &filter.search {
        clause.push(
            "LOWER(position) LIKE ?",
            SqlValue::String(like_contains(&search.to_lowercase())),
        );
    }
    if let Some(status) = filter.status {
        clause.push("status = ?", SqlValue::String(status.to_string()));
    }
    if let Some(job_type) = filter.job_type {
        clause.push("job_type = ?", SqlValue::String(job_type.to_string()));
    }
    clause
}

fn order_by(sort: JobSort) -> &'static str {
    match sort {
        JobSort::Latest => "ORDER BY created_at DESC, id",
        JobSort::Oldest => "ORDER BY created_at ASC, id",
        JobSort::AtoZ => "ORDER BY position ASC, id",
        JobSort::ZtoA => "ORDER BY position DESC, id",
    }
}

fn set_clause(patch: &JobPatch) -> SqlClause {
    let mut clause = SqlClause::default();
    if let Some(company) = &patch.company {
        clause.push("company = ?", SqlValue::String(company.clone()));
    }
    if let Some(position) = &patch.position {
        clause.push("position = ?", SqlValue::String(position.clone()));
    }
    if let Some(status) = patch.status {
        clause.push("status = ?", SqlValue::String(status.to_string()));
    }
    if let Some(job_type) = patch.job_type {
        clause.push("job_type = ?", SqlValue::String(job_type.to_string()));
    }
    if let Some(location) = &patch.job_location {
        clause.push("job_location = ?", SqlValue::String(location.clone()));
    }
    clause
}

pub struct MySqlJobStore {
    pool: MySqlPool,
}

impl MySqlJobStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    async fn fetch_by_id(&self, id: &str, owner: u64) -> Result<Option<Job>, StoreError> {
        let sql = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ? AND created_by = ?");
        let row = sqlx::query_as::<_, JobRow>(&sql)
            .bind(id)
            .bind(owner)
            .fetch_optional(&self.pool)
            .await?;

        row.map(Job::try_from).transpose()
    }
}

#[async_trait]
impl JobStore for MySqlJobStore {
    async fn find(
        &self,
        filter: &JobFilter,
        sort: JobSort,
        page: PageRequest,
    ) -> Result<Vec<Job>, StoreError> {
        let clause = where_clause(filter);
        let sql = format!(
            "SELECT {JOB_COLUMNS} FROM jobs {} {} LIMIT ? OFFSET ?",
            clause.where_sql(),
            order_by(sort)
        );
        debug!(sql = %sql, bindings = ?clause.values, page = page.page, limit = page.limit, "Fetching jobs");

        let rows = bind_query_as(sqlx::query_as::<_, JobRow>(&sql), &clause.values)
            .bind(u64::from(page.limit))
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                error!(error = %e, sql = %sql, "Failed to fetch jobs");
                StoreError::from(e)
            })?;

        rows.into_iter().map(Job::try_from).collect()
    }

    async fn count(&self, filter: &JobFilter) -> Result<u64, StoreError> {
        let clause = where_clause(filter);
        let sql = format!("SELECT COUNT(*) FROM jobs {}", clause.where_sql());
        debug!(sql = %sql, bindings = ?clause.values, "Counting jobs");

        let total = bind_query_scalar(sqlx::query_scalar::<_, i64>(&sql), &clause.values)
            .fetch_one(&self.pool)
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn find_one(&self, id: &str, owner: u64) -> Result<Option<Job>, StoreError> {
        self.fetch_by_id(id, owner).await
    }

    async fn create(&self, owner: u64, payload: NewJob) -> Result<Job, StoreError> {
        let id = Uuid::new_v4().to_string();

        sqlx::query(
            r#"
            INSERT INTO jobs
                (id, company, position, status, job_type, job_location, created_by)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&payload.company)
        .bind(&payload.position)
        .bind(payload.status.as_ref())
        .bind(payload.job_type.as_ref())
        .bind(payload.location())
        .bind(owner)
        .execute(&self.pool)
        .await?;

        self.fetch_by_id(&id, owner)
            .await?
            .ok_or_else(|| StoreError::CorruptRow {
                id,
                reason: "inserted row not readable".to_string(),
            })
    }

    async fn find_one_and_update(
        &self,
        id: &str,
        owner: u64,
        patch: JobPatch,
    ) -> Result<Option<Job>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let locked = sqlx::query_scalar::<_, String>(
            "SELECT id FROM jobs WHERE id = ? AND created_by = ? FOR UPDATE",
        )
        .bind(id)
        .bind(owner)
        .fetch_optional(&mut *tx)
        .await?;

        if locked.is_none() {
            return Ok(None);
        }

        let mut set = set_clause(&patch);
        set.parts.push("updated_at = CURRENT_TIMESTAMP(3)".to_string());
        let sql = format!(
            "UPDATE jobs SET {} WHERE id = ? AND created_by = ?",
            set.set_sql()
        );
        debug!(sql = %sql, bindings = ?set.values, job_id = id, "Updating job");

        bind_query(sqlx::query(&sql), &set.values)
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        let select = format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ? AND created_by = ?");
        let row = sqlx::query_as::<_, JobRow>(&select)
            .bind(id)
            .bind(owner)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Job::try_from(row).map(Some)
    }

    async fn find_one_and_delete(&self, id: &str, owner: u64) -> Result<Option<Job>, StoreError> {
        let mut tx = self.pool.begin().await?;

        let select =
            format!("SELECT {JOB_COLUMNS} FROM jobs WHERE id = ? AND created_by = ? FOR UPDATE");
        let Some(row) = sqlx::query_as::<_, JobRow>(&select)
            .bind(id)
            .bind(owner)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(None);
        };

        sqlx::query("DELETE FROM jobs WHERE id = ? AND created_by = ?")
            .bind(id)
            .bind(owner)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Job::try_from(row).map(Some)
    }

    async fn count_by_status(&self, owner: u64) -> Result<Vec<StatusCount>, StoreError> {
        let rows = sqlx::query_as::<_, (String, i64)>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM jobs
            WHERE created_by = ?
            GROUP BY status
            "#,
        )
        .bind(owner)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(status, count)| {
                let status = JobStatus::from_str(&status).map_err(|_| StoreError::CorruptRow {
                    id: format!("owner:{owner}"),
                    reason: format!("unknown status '{status}'"),
                })?;
                Ok(StatusCount {
                    status,
                    count: count.max(0) as u64,
                })
            })
            .collect()
    }

    async fn monthly_counts(&self, owner: u64, limit: u32) -> Result<Vec<MonthCount>, StoreError> {
        let rows = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT
                CAST(YEAR(created_at) AS SIGNED) AS year,
                CAST(MONTH(created_at) AS SIGNED) AS month,
                COUNT(*) AS count
            FROM jobs
            WHERE created_by = ?
            GROUP BY year, month
            ORDER BY year DESC, month DESC
            LIMIT ?
            "#,
        )
        .bind(owner)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(year, month, count)| MonthCount {
                year: year as i32,
                month: month as u32,
                count: count.max(0) as u64,
            })
            .collect())
    }
}
