use actix_web::{web, HttpResponse};
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use super::DashboardError;
use crate::{
    auth::guard::AuthenticatedUser,
    domain::newsletter::{Newsletter, NewsletterDraft, NewsletterDraftBody},
    store::newsletters::{
        delete_newsletter, get_newsletter, insert_newsletter, list_newsletters,
        toggle_newsletter_publication, update_authored_newsletter,
    },
};

#[derive(serde::Serialize)]
pub struct NewsletterResponse {
    pub newsletter: Newsletter,
}

#[derive(serde::Serialize)]
pub struct NewslettersResponse {
    pub newsletters: Vec<Newsletter>,
}

#[tracing::instrument(name = "List newsletters handler", skip(_authenticated, db_pool))]
pub async fn handle_list_newsletters(
    _authenticated: AuthenticatedUser,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let newsletters = list_newsletters(&db_pool, None).await?;

    Ok(HttpResponse::Ok().json(NewslettersResponse { newsletters }))
}

#[tracing::instrument(name = "Get newsletter handler", skip(_authenticated, db_pool))]
pub async fn handle_get_newsletter(
    _authenticated: AuthenticatedUser,
    newsletter_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let newsletter = get_newsletter(&db_pool, newsletter_id.into_inner())
        .await?
        .ok_or(DashboardError::NotFound("Newsletter"))?;

    Ok(HttpResponse::Ok().json(NewsletterResponse { newsletter }))
}

#[tracing::instrument(
    name = "Create newsletter handler",
    skip(authenticated, body, db_pool),
    fields(user_id = %authenticated.profile.id, title = %body.title)
)]
pub async fn handle_create_newsletter(
    authenticated: AuthenticatedUser,
    body: web::Json<NewsletterDraftBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let draft: NewsletterDraft = body
        .into_inner()
        .try_into()
        .map_err(DashboardError::ValidationError)?;

    let newsletter = insert_newsletter(&db_pool, &draft, authenticated.profile.id).await?;

    Ok(HttpResponse::Created().json(NewsletterResponse { newsletter }))
}

/// Editors can only overwrite their own newsletters.
#[tracing::instrument(
    name = "Update newsletter handler",
    skip(authenticated, body, db_pool),
    fields(user_id = %authenticated.profile.id, title = %body.title)
)]
pub async fn handle_update_newsletter(
    authenticated: AuthenticatedUser,
    newsletter_id: web::Path<Uuid>,
    body: web::Json<NewsletterDraftBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let draft: NewsletterDraft = body
        .into_inner()
        .try_into()
        .map_err(DashboardError::ValidationError)?;

    let newsletter = update_authored_newsletter(
        &db_pool,
        newsletter_id.into_inner(),
        authenticated.profile.id,
        &draft,
    )
    .await?
    .ok_or(DashboardError::NotFound("Newsletter"))?;

    Ok(HttpResponse::Ok().json(NewsletterResponse { newsletter }))
}

#[tracing::instrument(name = "Toggle newsletter publication handler", skip(_authenticated, db_pool))]
pub async fn handle_toggle_publish(
    _authenticated: AuthenticatedUser,
    newsletter_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let newsletter =
        toggle_newsletter_publication(&db_pool, newsletter_id.into_inner(), Utc::now())
            .await?
            .ok_or(DashboardError::NotFound("Newsletter"))?;

    tracing::info!(
        "Newsletter {} is now {}",
        newsletter.id,
        if newsletter.is_published {
            "published"
        } else {
            "a draft"
        }
    );

    Ok(HttpResponse::Ok().json(NewsletterResponse { newsletter }))
}

#[tracing::instrument(name = "Delete newsletter handler", skip(_authenticated, db_pool))]
pub async fn handle_delete_newsletter(
    _authenticated: AuthenticatedUser,
    newsletter_id: web::Path<Uuid>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    if !delete_newsletter(&db_pool, newsletter_id.into_inner()).await? {
        return Err(DashboardError::NotFound("Newsletter"));
    }

    Ok(HttpResponse::NoContent().finish())
}
