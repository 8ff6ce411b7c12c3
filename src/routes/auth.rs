use actix_web::{
    cookie::{Cookie, SameSite},
    http::header::LOCATION,
    web, HttpRequest, HttpResponse,
};
use serde::Deserialize;

use crate::{
    auth::{
        auth_client::AuthClient,
        session::{delete_session, generate_session_token, store_session, SESSION_COOKIE},
    },
    errors::error_chain_fmt,
};

const CODE_VERIFIER_COOKIE: &str = "code_verifier";

#[derive(Deserialize, Debug)]
pub struct CallbackParameters {
    pub code: Option<String>,
}

#[derive(thiserror::Error)]
pub enum StartSessionError {
    #[error("Failed to exchange the login code for a session.")]
    ExchangeError(#[source] reqwest::Error),
    #[error("Failed to store the session.")]
    StoreError(#[source] redis::RedisError),
}

impl std::fmt::Debug for StartSessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

fn session_cookie(session_token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, session_token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

fn removal_cookie(name: &'static str) -> Cookie<'static> {
    let mut cookie = Cookie::build(name, "").path("/").finish();
    cookie.make_removal();
    cookie
}

/// Landing point after the auth provider login. Whatever happens the user is sent to the dashboard, which
/// bounces back to the login page when no session could be started.
#[tracing::instrument(
    name = "Auth callback handler",
    skip(req, parameters, auth_client, redis_client)
)]
pub async fn handle_auth_callback(
    req: HttpRequest,
    parameters: web::Query<CallbackParameters>,
    auth_client: web::Data<AuthClient>,
    redis_client: web::Data<redis::Client>,
) -> HttpResponse {
    let mut response = HttpResponse::SeeOther();
    response.insert_header((LOCATION, "/dashboard"));

    if let Some(code) = &parameters.code {
        let code_verifier = req
            .cookie(CODE_VERIFIER_COOKIE)
            .map(|cookie| cookie.value().to_string());

        match start_session(&auth_client, &redis_client, code, code_verifier.as_deref()).await {
            Ok(session_token) => {
                response.cookie(session_cookie(session_token));
                response.cookie(removal_cookie(CODE_VERIFIER_COOKIE));
            }
            Err(err) => tracing::error!("Failed to start a session: {:?}", err),
        }
    }

    response.finish()
}

async fn start_session(
    auth_client: &AuthClient,
    redis_client: &redis::Client,
    code: &str,
    code_verifier: Option<&str>,
) -> Result<String, StartSessionError> {
    let auth_session = auth_client
        .exchange_code_for_session(code, code_verifier)
        .await
        .map_err(StartSessionError::ExchangeError)?;
    let session_token = generate_session_token();

    store_session(
        redis_client,
        &session_token,
        &auth_session.access_token,
        auth_session.expires_in,
    )
    .await
    .map_err(StartSessionError::StoreError)?;

    Ok(session_token)
}

#[tracing::instrument(name = "Logout handler", skip(req, redis_client))]
pub async fn handle_logout(req: HttpRequest, redis_client: web::Data<redis::Client>) -> HttpResponse {
    if let Some(cookie) = req.cookie(SESSION_COOKIE) {
        if let Err(err) = delete_session(&redis_client, cookie.value()).await {
            tracing::error!("Failed to delete the session: {:?}", err);
        }
    }

    HttpResponse::SeeOther()
        .insert_header((LOCATION, "/"))
        .cookie(removal_cookie(SESSION_COOKIE))
        .finish()
}
