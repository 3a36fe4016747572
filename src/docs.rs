use crate::api::job::{JobListResponse, JobResponse};
use crate::api::stats::{DefaultStats, MonthlyApplication, StatsResponse};
use crate::model::job::{Job, JobPatch, JobStatus, JobType, NewJob};
use crate::model::query::JobQuery;
use utoipa::Modify;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Jobify API",
        version = "1.0.0",
        description = r#"
## Job Application Tracker

Keep track of the jobs you applied to and how each application is going.

### Features
- **Jobs**
  - Create, update, delete and view your job applications
  - Search by position, filter by status and job type, sort and paginate
- **Stats**
  - Applications per status and per month for the last six months

### Security
Every endpoint requires a **JWT Bearer** access token. Jobs are only ever
visible to the user who created them.

### Response Format
- JSON bodies, errors as `{"message": "..."}`
"#,
    ),
    paths(
        crate::api::job::list_jobs,
        crate::api::job::get_job,
        crate::api::job::create_job,
        crate::api::job::update_job,
        crate::api::job::delete_job,

        crate::api::stats::show_stats
    ),
    components(
        schemas(
            Job,
            JobStatus,
            JobType,
            NewJob,
            JobPatch,
            JobQuery,
            JobResponse,
            JobListResponse,
            DefaultStats,
            MonthlyApplication,
            StatsResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Jobs", description = "Job application APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn documents_every_job_route() {
        let doc = ApiDoc::openapi();
        let paths: Vec<&String> = doc.paths.paths.keys().collect();

        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/jobs"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/jobs/stats"));
        assert!(paths.iter().any(|p| p.as_str() == "/api/v1/jobs/{job_id}"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("bearer_auth"))
        );
    }
}
