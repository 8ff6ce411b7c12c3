use actix_web::{web, HttpResponse};
use sqlx::PgPool;

use super::DashboardError;
use crate::{
    auth::guard::AuthenticatedUser,
    domain::{newsletter::Newsletter, profile::Profile},
    store::{newsletters::list_newsletters, subscribers::count_active_subscribers},
};

const RECENT_NEWSLETTERS: i64 = 10;

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardHome {
    pub profile: Profile,
    pub newsletters: Vec<Newsletter>,
    pub subscriber_count: i64,
}

#[tracing::instrument(
    name = "Dashboard home handler",
    skip(authenticated, db_pool),
    fields(user_id = %authenticated.profile.id)
)]
pub async fn handle_dashboard_home(
    authenticated: AuthenticatedUser,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let newsletters = list_newsletters(&db_pool, Some(RECENT_NEWSLETTERS)).await?;
    let subscriber_count = count_active_subscribers(&db_pool).await?;

    Ok(HttpResponse::Ok().json(DashboardHome {
        profile: authenticated.profile,
        newsletters,
        subscriber_count,
    }))
}
