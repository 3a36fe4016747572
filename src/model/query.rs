use std::str::FromStr;

use serde::Deserialize;
use strum_macros::{AsRefStr, EnumString};
use utoipa::{IntoParams, ToSchema};

use crate::model::job::{JobStatus, JobType};

pub const DEFAULT_PAGE_SIZE: u32 = 10;
pub const FILTER_ALL: &str = "all";

/// Raw query string of the job list endpoint.
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct JobQuery {
    /// Case-insensitive substring matched against position
    #[schema(example = "engineer")]
    pub search: Option<String>,
    /// pending | interview | declined | all
    #[schema(example = "all")]
    pub status: Option<String>,
    /// full-time | part-time | remote | internship | contract | all
    #[schema(example = "all")]
    pub job_type: Option<String>,
    /// latest | oldest | a-z | z-a
    #[schema(example = "latest")]
    pub sort: Option<String>,
    /// Accepted for client compatibility, not used for filtering
    pub location: Option<String>,
    #[schema(example = 1)]
    pub page: Option<u32>,
    #[schema(example = 10)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, AsRefStr)]
pub enum JobSort {
    #[default]
    #[strum(serialize = "latest")]
    Latest,
    #[strum(serialize = "oldest")]
    Oldest,
    #[strum(serialize = "a-z")]
    AtoZ,
    #[strum(serialize = "z-a")]
    ZtoA,
}

/// Typed filter, always scoped to one owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobFilter {
    pub owner: u64,
    pub search: Option<String>,
    pub status: Option<JobStatus>,
    pub job_type: Option<JobType>,
}

impl JobFilter {
    pub fn owned_by(owner: u64) -> Self {
        Self {
            owner,
            search: None,
            status: None,
            job_type: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub fn new(page: Option<u32>, limit: Option<u32>, max_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(DEFAULT_PAGE_SIZE)
                .clamp(1, max_limit.max(1)),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// ceil(total / limit), zero when nothing matched
    pub fn num_of_pages(&self, total: u64) -> u64 {
        total.div_ceil(u64::from(self.limit))
    }
}

#[derive(Debug, PartialEq, Eq, derive_more::Display)]
pub enum QueryError {
    #[display(fmt = "Invalid status filter: {}", _0)]
    Status(String),
    #[display(fmt = "Invalid jobType filter: {}", _0)]
    JobType(String),
    #[display(fmt = "Invalid sort option: {}", _0)]
    Sort(String),
}

/// `None` for absent, empty, or the `all` sentinel.
fn enum_filter<T: FromStr>(
    raw: Option<&str>,
    err: impl FnOnce(String) -> QueryError,
) -> Result<Option<T>, QueryError> {
    match raw.map(str::trim) {
        None | Some("") | Some(FILTER_ALL) => Ok(None),
        Some(value) => T::from_str(value)
            .map(Some)
            .map_err(|_| err(value.to_string())),
    }
}

impl JobQuery {
    pub fn into_parts(
        self,
        owner: u64,
        max_limit: u32,
    ) -> Result<(JobFilter, JobSort, PageRequest), QueryError> {
        let status = enum_filter(self.status.as_deref(), QueryError::Status)?;
        let job_type = enum_filter(self.job_type.as_deref(), QueryError::JobType)?;

        let sort = match self.sort.as_deref().map(str::trim) {
            None | Some("") => JobSort::default(),
            Some(value) => {
                JobSort::from_str(value).map_err(|_| QueryError::Sort(value.to_string()))?
            }
        };

        let search = self
            .search
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let filter = JobFilter {
            owner,
            search,
            status,
            job_type,
        };

        Ok((filter, sort, PageRequest::new(self.page, self.limit, max_limit)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_sentinel_disables_enum_filters() {
        let query = JobQuery {
            status: Some("all".into()),
            job_type: Some("all".into()),
            ..Default::default()
        };
        let (filter, sort, page) = query.into_parts(3, 100).unwrap();

        assert_eq!(filter, JobFilter::owned_by(3));
        assert_eq!(sort, JobSort::Latest);
        assert_eq!(page, PageRequest { page: 1, limit: 10 });
    }

    #[test]
    fn parses_every_sort_key_independently() {
        for (raw, expected) in [
            ("latest", JobSort::Latest),
            ("oldest", JobSort::Oldest),
            ("a-z", JobSort::AtoZ),
            ("z-a", JobSort::ZtoA),
        ] {
            let query = JobQuery {
                sort: Some(raw.into()),
                ..Default::default()
            };
            assert_eq!(query.into_parts(1, 100).unwrap().1, expected);
        }
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let query = JobQuery {
            status: Some("hired".into()),
            ..Default::default()
        };
        assert_eq!(
            query.into_parts(1, 100).unwrap_err(),
            QueryError::Status("hired".into())
        );

        let query = JobQuery {
            sort: Some("newest".into()),
            ..Default::default()
        };
        assert!(matches!(
            query.into_parts(1, 100),
            Err(QueryError::Sort(_))
        ));
    }

    #[test]
    fn location_is_ignored() {
        let query = JobQuery {
            location: Some("Berlin".into()),
            search: Some("  dev ".into()),
            job_type: Some("remote".into()),
            ..Default::default()
        };
        let (filter, _, _) = query.into_parts(9, 100).unwrap();

        assert_eq!(filter.search.as_deref(), Some("dev"));
        assert_eq!(filter.job_type, Some(JobType::Remote));
    }

    #[test]
    fn page_math() {
        let page = PageRequest::new(Some(0), Some(0), 100);
        assert_eq!(page, PageRequest { page: 1, limit: 1 });

        let page = PageRequest::new(Some(3), Some(5000), 100);
        assert_eq!(page.limit, 100);
        assert_eq!(page.offset(), 200);

        let page = PageRequest::new(None, None, 100);
        assert_eq!(page.num_of_pages(0), 0);
        assert_eq!(page.num_of_pages(10), 1);
        assert_eq!(page.num_of_pages(11), 2);
    }
}
