use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

pub const COMPANY_MAX_LEN: usize = 50;
pub const POSITION_MAX_LEN: usize = 100;
pub const DEFAULT_JOB_LOCATION: &str = "my city";

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum JobStatus {
    #[default]
    Pending,
    Interview,
    Declined,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, ToSchema,
    Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum JobType {
    #[default]
    FullTime,
    PartTime,
    Remote,
    Internship,
    Contract,
}

/// A tracked job application, always owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
#[schema(example = json!({
    "_id": "5f1c7a52-8a0e-4d7e-9a38-1f4f0b8c2d11",
    "company": "Acme",
    "position": "Backend Engineer",
    "status": "pending",
    "jobType": "full-time",
    "jobLocation": "Berlin",
    "createdBy": 42,
    "createdAt": "2026-03-01T09:30:00Z",
    "updatedAt": "2026-03-01T09:30:00Z"
}))]
pub struct Job {
    #[serde(rename = "_id")]
    pub id: String,
    pub company: String,
    pub position: String,
    pub status: JobStatus,
    pub job_type: JobType,
    pub job_location: String,
    pub created_by: u64,
    #[schema(value_type = String, format = "date-time")]
    pub created_at: DateTime<Utc>,
    #[schema(value_type = String, format = "date-time")]
    pub updated_at: DateTime<Utc>,
}

/// Create payload. Unknown keys (including a client supplied `createdBy`)
/// are dropped during deserialization.
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewJob {
    #[schema(example = "Acme")]
    pub company: String,
    #[schema(example = "Backend Engineer")]
    pub position: String,
    #[serde(default)]
    pub status: JobStatus,
    #[serde(default)]
    pub job_type: JobType,
    #[schema(example = "Berlin")]
    pub job_location: Option<String>,
}

/// Partial update payload; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobPatch {
    pub company: Option<String>,
    pub position: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
    pub job_location: Option<String>,
}

#[derive(Debug, PartialEq, Eq, derive_more::Display)]
pub enum ValidationError {
    #[display(fmt = "Please provide {}", _0)]
    Missing(&'static str),
    #[display(fmt = "{} cannot be longer than {} characters", _0, _1)]
    TooLong(&'static str, usize),
}

fn check_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong(field, max));
    }
    Ok(())
}

impl NewJob {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.company.trim().is_empty() {
            return Err(ValidationError::Missing("company"));
        }
        if self.position.trim().is_empty() {
            return Err(ValidationError::Missing("position"));
        }
        check_len("company", &self.company, COMPANY_MAX_LEN)?;
        check_len("position", &self.position, POSITION_MAX_LEN)
    }

    pub fn location(&self) -> &str {
        match self.job_location.as_deref() {
            Some(loc) if !loc.trim().is_empty() => loc,
            _ => DEFAULT_JOB_LOCATION,
        }
    }
}

impl JobPatch {
    /// Company and position may be omitted but never blanked out.
    pub fn has_empty_required(&self) -> bool {
        self.company.as_deref() == Some("") || self.position.as_deref() == Some("")
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(company) = &self.company {
            check_len("company", company, COMPANY_MAX_LEN)?;
        }
        if let Some(position) = &self.position {
            check_len("position", position, POSITION_MAX_LEN)?;
        }
        Ok(())
    }

    /// Applies the present fields onto `job` and bumps `updated_at`.
    pub fn apply(self, job: &mut Job, now: DateTime<Utc>) {
        if let Some(company) = self.company {
            job.company = company;
        }
        if let Some(position) = self.position {
            job.position = position;
        }
        if let Some(status) = self.status {
            job.status = status;
        }
        if let Some(job_type) = self.job_type {
            job.job_type = job_type;
        }
        if let Some(location) = self.job_location {
            job.job_location = location;
        }
        job.updated_at = now;
    }
}
