use crate::{
    auth::auth::AuthUser,
    config::Config,
    error::ApiError,
    model::{
        job::{Job, JobPatch, NewJob},
        query::JobQuery,
    },
    store::JobStore,
};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{debug, info, instrument};
use utoipa::ToSchema;

const EMPTY_FIELDS: &str = "Company or Position fields cannot be empty";

#[derive(Serialize, ToSchema)]
pub struct JobResponse {
    pub job: Job,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct JobListResponse {
    pub jobs: Vec<Job>,
    /// Number of jobs on this page
    #[schema(example = 10)]
    pub count: usize,
    /// Number of jobs matching the filter across all pages
    #[schema(example = 23)]
    pub total_jobs: u64,
    #[schema(example = 3)]
    pub num_of_pages: u64,
}

/// List the caller's jobs
#[utoipa::path(
    get,
    path = "/api/v1/jobs",
    params(JobQuery),
    responses(
        (status = 200, description = "Paginated job list", body = JobListResponse),
        (status = 400, description = "Unknown filter or sort value", body = Object, example = json!({
            "message": "Invalid sort option: newest"
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Jobs",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "list_jobs", skip_all, fields(user_id = auth.user_id, username = %auth.username))]
pub async fn list_jobs(
    auth: AuthUser,
    store: web::Data<dyn JobStore>,
    config: web::Data<Config>,
    query: web::Query<JobQuery>,
) -> Result<HttpResponse, ApiError> {
    let (filter, sort, page) = query
        .into_inner()
        .into_parts(auth.user_id, config.max_page_size)?;
    debug!(?filter, sort = sort.as_ref(), ?page, "Listing jobs");

    let jobs = store.find(&filter, sort, page).await?;
    let total_jobs = store.count(&filter).await?;

    Ok(HttpResponse::Ok().json(JobListResponse {
        count: jobs.len(),
        jobs,
        total_jobs,
        num_of_pages: page.num_of_pages(total_jobs),
    }))
}

/// Get one of the caller's jobs
#[utoipa::path(
    get,
    path = "/api/v1/jobs/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job found", body = JobResponse),
        (status = 404, description = "Job not found", body = Object, example = json!({
            "message": "No job with id 5f1c7a52-8a0e-4d7e-9a38-1f4f0b8c2d11"
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Jobs",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_job(
    auth: AuthUser,
    store: web::Data<dyn JobStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();

    let job = store
        .find_one(&job_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::job_not_found(&job_id))?;

    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

/// Create Job
#[utoipa::path(
    post,
    path = "/api/v1/jobs",
    request_body = NewJob,
    responses(
        (status = 201, description = "Job created", body = JobResponse),
        (status = 400, description = "Missing or invalid fields", body = Object, example = json!({
            "message": "Please provide company"
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Jobs",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "create_job", skip_all, fields(user_id = auth.user_id, username = %auth.username))]
pub async fn create_job(
    auth: AuthUser,
    store: web::Data<dyn JobStore>,
    payload: web::Json<NewJob>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    payload.validate()?;

    let job = store.create(auth.user_id, payload).await?;
    info!(job_id = %job.id, "Job created");

    Ok(HttpResponse::Created().json(JobResponse { job }))
}

/// Update Job
#[utoipa::path(
    patch,
    path = "/api/v1/jobs/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    request_body = JobPatch,
    responses(
        (status = 200, description = "Updated job", body = JobResponse),
        (status = 400, description = "Company or position blank", body = Object, example = json!({
            "message": "Company or Position fields cannot be empty"
        })),
        (status = 404, description = "Job not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Jobs",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "update_job", skip_all, fields(user_id = auth.user_id, username = %auth.username))]
pub async fn update_job(
    auth: AuthUser,
    store: web::Data<dyn JobStore>,
    path: web::Path<String>,
    body: web::Json<JobPatch>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();
    let patch = body.into_inner();

    if patch.has_empty_required() {
        return Err(ApiError::BadRequest(EMPTY_FIELDS.to_string()));
    }
    patch.validate()?;

    let job = store
        .find_one_and_update(&job_id, auth.user_id, patch)
        .await?
        .ok_or_else(|| ApiError::job_not_found(&job_id))?;
    info!(job_id = %job.id, "Job updated");

    Ok(HttpResponse::Ok().json(JobResponse { job }))
}

/// Delete Job
#[utoipa::path(
    delete,
    path = "/api/v1/jobs/{job_id}",
    params(
        ("job_id" = String, Path, description = "Job ID")
    ),
    responses(
        (status = 200, description = "Job deleted, empty body"),
        (status = 404, description = "Job not found"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Jobs",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "delete_job", skip_all, fields(user_id = auth.user_id, username = %auth.username))]
pub async fn delete_job(
    auth: AuthUser,
    store: web::Data<dyn JobStore>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let job_id = path.into_inner();

    store
        .find_one_and_delete(&job_id, auth.user_id)
        .await?
        .ok_or_else(|| ApiError::job_not_found(&job_id))?;
    info!(job_id = %job_id, "Job deleted");

    Ok(HttpResponse::Ok().finish())
}
