use actix_web::{web, HttpResponse};
use sqlx::PgPool;
use uuid::Uuid;

use super::DashboardError;
use crate::{
    auth::guard::AuthenticatedUser,
    domain::{
        subscriber::Subscriber,
        subscriber_filter::{SubscriberQuery, SubscriberQueryParameters, SubscriberStats},
    },
    store::subscribers::{list_subscribers, toggle_subscriber_status},
};

#[derive(serde::Serialize)]
pub struct SubscriberDirectory<'a> {
    pub subscribers: Vec<&'a Subscriber>,
    pub stats: SubscriberStats,
}

#[derive(serde::Serialize)]
pub struct SubscriberResponse {
    pub subscriber: Subscriber,
}

/// Loads the whole list and filters it in memory. There is no pagination.
#[tracing::instrument(name = "Subscriber directory handler", skip(_authenticated, db_pool))]
pub async fn handle_subscriber_directory(
    _authenticated: AuthenticatedUser,
    parameters: web::Query<SubscriberQueryParameters>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let query: SubscriberQuery = parameters
        .into_inner()
        .try_into()
        .map_err(DashboardError::ValidationError)?;
    let subscribers = list_subscribers(&db_pool).await?;

    Ok(HttpResponse::Ok().json(SubscriberDirectory {
        subscribers: query.apply(&subscribers),
        stats: SubscriberStats::from(subscribers.as_slice()),
    }))
}

#[tracing::instrument(name = "Toggle subscriber status handler", skip(_authenticated, db_pool))]
pub async fn handle_toggle_subscriber(
    _authenticated: AuthenticatedUser,
    subscriber_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let subscriber = toggle_subscriber_status(&db_pool, subscriber_id.into_inner())
        .await?
        .ok_or(DashboardError::NotFound("Subscriber"))?;

    Ok(HttpResponse::Ok().json(SubscriberResponse { subscriber }))
}
