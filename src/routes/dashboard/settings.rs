use actix_web::{web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;

use super::DashboardError;
use crate::{
    auth::guard::AuthenticatedUser, domain::profile::Profile,
    domain::subscriber_name::SubscriberName, store::profiles::update_profile_name,
};

#[derive(Deserialize, Debug)]
pub struct ProfileSettingsBody {
    pub name: Option<String>,
}

#[derive(serde::Serialize)]
pub struct ProfileResponse {
    pub profile: Profile,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

#[tracing::instrument(
    name = "Get profile settings handler",
    skip(authenticated),
    fields(user_id = %authenticated.profile.id)
)]
pub async fn handle_get_settings(authenticated: AuthenticatedUser) -> HttpResponse {
    HttpResponse::Ok().json(ProfileResponse {
        profile: authenticated.profile,
        message: None,
    })
}

/// Only the display name is editable here: email comes from the auth provider and roles are not granted by
/// the user themselves.
#[tracing::instrument(
    name = "Update profile settings handler",
    skip(authenticated, body, db_pool),
    fields(user_id = %authenticated.profile.id)
)]
pub async fn handle_update_settings(
    authenticated: AuthenticatedUser,
    body: web::Json<ProfileSettingsBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, DashboardError> {
    let name = SubscriberName::parse_optional(body.into_inner().name)
        .map_err(DashboardError::ValidationError)?;

    let profile = update_profile_name(
        &db_pool,
        authenticated.profile.id,
        name.as_ref().map(|name| name.as_ref()),
    )
    .await?
    .ok_or(DashboardError::NotFound("Profile"))?;

    Ok(HttpResponse::Ok().json(ProfileResponse {
        profile,
        message: Some("Profile updated successfully!"),
    }))
}
