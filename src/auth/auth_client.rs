use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time;
use uuid::Uuid;

const DEFAULT_SESSION_LIFETIME_SECONDS: u64 = 3600;

/// HTTP client of the hosted auth provider. Users, passwords and sessions live there, this service only
/// resolves access tokens to users and exchanges login codes for sessions.
pub struct AuthClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: Option<String>,
    pub user_metadata: Option<UserMetadata>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct UserMetadata {
    pub name: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct AuthSession {
    pub access_token: Secret<String>,
    #[serde(default = "default_session_lifetime")]
    pub expires_in: u64,
}

#[derive(serde::Serialize)]
struct ExchangeCodeBody<'a> {
    auth_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
}

fn default_session_lifetime() -> u64 {
    DEFAULT_SESSION_LIFETIME_SECONDS
}

impl AuthUser {
    pub fn email(&self) -> &str {
        self.email.as_deref().unwrap_or_default()
    }

    pub fn name(&self) -> Option<&str> {
        self.user_metadata
            .as_ref()
            .and_then(|metadata| metadata.name.as_deref())
            .filter(|name| !name.trim().is_empty())
    }
}

impl AuthClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        timeout: time::Duration,
    ) -> Result<AuthClient, reqwest::Error> {
        let http_client = Client::builder().timeout(timeout).build()?;

        Ok(AuthClient {
            http_client,
            base_url,
            api_key,
        })
    }

    /// Resolves the user owning `access_token`. Expired or revoked tokens make the provider answer 401,
    /// which is returned as an error.
    #[tracing::instrument(name = "Get the authenticated user from the auth provider", skip_all)]
    pub async fn get_user(&self, access_token: &Secret<String>) -> Result<AuthUser, reqwest::Error> {
        let url = format!("{}/auth/v1/user", self.base_url);

        self.http_client
            .get(&url)
            .header("apikey", self.api_key.expose_secret())
            .bearer_auth(access_token.expose_secret())
            .send()
            .await?
            .error_for_status()? // return an error when server response status code is 4xx or 5xx
            .json::<AuthUser>()
            .await
    }

    #[tracing::instrument(name = "Exchange a login code for a session", skip_all)]
    pub async fn exchange_code_for_session(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, reqwest::Error> {
        let url = format!("{}/auth/v1/token", self.base_url);
        let body = ExchangeCodeBody {
            auth_code: code,
            code_verifier,
        };

        self.http_client
            .post(&url)
            .query(&[("grant_type", "pkce")])
            .header("apikey", self.api_key.expose_secret())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json::<AuthSession>()
            .await
    }
}
