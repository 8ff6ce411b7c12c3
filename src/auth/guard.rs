use actix_web::{
    dev::Payload, http::header::LOCATION, http::StatusCode, web, FromRequest, HttpRequest,
    HttpResponse, ResponseError,
};
use futures_util::future::LocalBoxFuture;
use sqlx::PgPool;

use crate::auth::auth_client::AuthClient;
use crate::auth::session::{get_session_access_token, SESSION_COOKIE};
use crate::domain::profile::Profile;
use crate::errors::{error_chain_fmt, json_error_response};
use crate::store::profiles::get_or_create_profile;

pub const LOGIN_PATH: &str = "/auth/login";

/// Extractor guarding the dashboard: a handler taking an `AuthenticatedUser` only runs for requests carrying
/// a live session. Anything else is redirected to the login page.
///
/// The profile of the user is created on the first authenticated request.
#[derive(Debug)]
pub struct AuthenticatedUser {
    pub profile: Profile,
}

#[derive(thiserror::Error)]
pub enum AuthGuardError {
    #[error("The request does not carry a session cookie.")]
    MissingSession,
    #[error("The session is unknown or expired.")]
    ExpiredSession,
    #[error("Failed to read the session.")]
    SessionStoreError(#[source] redis::RedisError),
    #[error("The auth provider did not resolve the session user.")]
    ProviderError(#[source] reqwest::Error),
    #[error("Failed to load the profile of the authenticated user.")]
    ProfileError(#[source] sqlx::Error),
    #[error("Application state {0} is not registered.")]
    MissingAppState(&'static str),
}

impl std::fmt::Debug for AuthGuardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for AuthGuardError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthGuardError::MissingSession
            | AuthGuardError::ExpiredSession
            | AuthGuardError::SessionStoreError(_)
            | AuthGuardError::ProviderError(_) => StatusCode::SEE_OTHER,
            AuthGuardError::ProfileError(_) | AuthGuardError::MissingAppState(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self.status_code() {
            StatusCode::SEE_OTHER => HttpResponse::SeeOther()
                .insert_header((LOCATION, LOGIN_PATH))
                .finish(),
            status => json_error_response(status, &self.to_string()),
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthGuardError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move { authenticate(&req).await })
    }
}

fn app_state<T: 'static>(
    req: &HttpRequest,
    name: &'static str,
) -> Result<web::Data<T>, AuthGuardError> {
    req.app_data::<web::Data<T>>()
        .cloned()
        .ok_or(AuthGuardError::MissingAppState(name))
}

#[tracing::instrument(
    name = "Authenticate a dashboard request",
    skip(req),
    fields(user_id = tracing::field::Empty)
)]
async fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthGuardError> {
    let session_token = req
        .cookie(SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string())
        .ok_or(AuthGuardError::MissingSession)?;
    let redis_client = app_state::<redis::Client>(req, "redis client")?;
    let auth_client = app_state::<AuthClient>(req, "auth client")?;
    let db_pool = app_state::<PgPool>(req, "database pool")?;

    let access_token = get_session_access_token(&redis_client, &session_token)
        .await
        .map_err(AuthGuardError::SessionStoreError)?
        .ok_or(AuthGuardError::ExpiredSession)?;
    let user = auth_client
        .get_user(&access_token)
        .await
        .map_err(AuthGuardError::ProviderError)?;

    tracing::Span::current().record("user_id", &tracing::field::display(&user.id));

    let profile = get_or_create_profile(&db_pool, user.id, user.email(), user.name())
        .await
        .map_err(AuthGuardError::ProfileError)?;

    Ok(AuthenticatedUser { profile })
}
