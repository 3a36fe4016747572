use crate::{
    auth::auth::AuthUser,
    error::ApiError,
    model::job::JobStatus,
    store::{JobStore, MonthCount, StatusCount},
};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{instrument, warn};
use utoipa::ToSchema;

/// Number of most recent months reported in `monthlyApplications`.
pub const MONTHLY_WINDOW: u32 = 6;

#[derive(Debug, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct DefaultStats {
    pub pending: u64,
    pub interview: u64,
    pub declined: u64,
}

#[derive(Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct MonthlyApplication {
    #[schema(example = "Mar 2026")]
    pub date: String,
    #[schema(example = 4)]
    pub count: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub default_stats: DefaultStats,
    pub monthly_applications: Vec<MonthlyApplication>,
}

/// Label a calendar month as `"Mon YYYY"`; chrono months are 1-based like the store's.
pub fn month_label(year: i32, month: u32) -> Option<String> {
    NaiveDate::from_ymd_opt(year, month, 1).map(|d| d.format("%b %Y").to_string())
}

pub fn fold_status_counts(counts: &[StatusCount]) -> DefaultStats {
    counts
        .iter()
        .fold(DefaultStats::default(), |mut stats, c| {
            match c.status {
                JobStatus::Pending => stats.pending += c.count,
                JobStatus::Interview => stats.interview += c.count,
                JobStatus::Declined => stats.declined += c.count,
            }
            stats
        })
}

/// Input is newest first, output is oldest first.
pub fn monthly_applications(months: Vec<MonthCount>) -> Vec<MonthlyApplication> {
    months
        .into_iter()
        .rev()
        .filter_map(|m| match month_label(m.year, m.month) {
            Some(date) => Some(MonthlyApplication {
                date,
                count: m.count,
            }),
            None => {
                warn!(year = m.year, month = m.month, "Skipping invalid month bucket");
                None
            }
        })
        .collect()
}

/// Application statistics for the caller
#[utoipa::path(
    get,
    path = "/api/v1/jobs/stats",
    responses(
        (status = 200, description = "Status breakdown and monthly applications", body = StatsResponse, example = json!({
            "defaultStats": { "pending": 3, "interview": 1, "declined": 2 },
            "monthlyApplications": [
                { "date": "Feb 2026", "count": 2 },
                { "date": "Mar 2026", "count": 4 }
            ]
        })),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Jobs",
    security(
        ("bearer_auth" = [])
    )
)]
#[instrument(name = "show_stats", skip_all, fields(user_id = auth.user_id, username = %auth.username))]
pub async fn show_stats(
    auth: AuthUser,
    store: web::Data<dyn JobStore>,
) -> Result<HttpResponse, ApiError> {
    let by_status = store.count_by_status(auth.user_id).await?;
    let by_month = store.monthly_counts(auth.user_id, MONTHLY_WINDOW).await?;

    Ok(HttpResponse::Ok().json(StatsResponse {
        default_stats: fold_status_counts(&by_status),
        monthly_applications: monthly_applications(by_month),
    }))
}
