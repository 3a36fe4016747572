use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use serde_json::json;

use crate::{
    model::{job::ValidationError, query::QueryError},
    store::StoreError,
};

#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ApiError {
    #[display(fmt = "{}", _0)]
    NotFound(#[error(not(source))] String),
    #[display(fmt = "{}", _0)]
    BadRequest(#[error(not(source))] String),
    #[display(fmt = "Something went wrong, try again later")]
    Internal,
}

impl ApiError {
    pub fn job_not_found(job_id: &str) -> Self {
        ApiError::NotFound(format!("No job with id {job_id}"))
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        tracing::error!(error = %e, "Job store failure");
        ApiError::Internal
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl From<QueryError> for ApiError {
    fn from(e: QueryError) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}
