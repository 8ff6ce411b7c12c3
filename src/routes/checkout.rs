use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use reqwest::Url;
use serde::Deserialize;
use sqlx::PgPool;

use crate::{
    domain::{subscriber_email::SubscriberEmail, subscription_tier::SubscriptionTier},
    errors::{error_chain_fmt, json_error_response},
    startup::{ApplicationBaseUrl, SimulatedLatency},
    store::subscribers::find_subscriber_by_email,
};

#[derive(Deserialize, Debug)]
pub struct CheckoutBody {
    pub email: Option<String>,
    pub tier: Option<String>,
}

/// Checkout request with both fields present and a known tier.
#[derive(Debug)]
pub struct CheckoutRequest {
    pub email: SubscriberEmail,
    pub tier: SubscriptionTier,
}

impl TryFrom<CheckoutBody> for CheckoutRequest {
    type Error = CheckoutError;

    fn try_from(body: CheckoutBody) -> Result<Self, Self::Error> {
        let (email, tier) = match (body.email, body.tier) {
            (Some(email), Some(tier)) if !tier.is_empty() => (email, tier),
            _ => return Err(CheckoutError::MissingFields),
        };
        let email = SubscriberEmail::parse(email).map_err(|_| CheckoutError::MissingFields)?;
        let tier = SubscriptionTier::parse(tier).map_err(CheckoutError::ValidationError)?;

        Ok(CheckoutRequest { email, tier })
    }
}

#[derive(serde::Serialize, Debug)]
pub struct CheckoutUrlResponse {
    pub url: String,
}

#[derive(serde::Serialize, Debug)]
pub struct CheckoutCompletedResponse<'a> {
    pub message: &'static str,
    pub email: &'a str,
    pub tier: SubscriptionTier,
}

#[derive(thiserror::Error)]
pub enum CheckoutError {
    #[error("Email and tier are required")]
    MissingFields,
    #[error("{0}")]
    ValidationError(String),
    #[error("Subscriber not found")]
    SubscriberNotFound,
    #[error("Failed to look up the subscriber.")]
    LookupError(#[source] sqlx::Error),
    #[error("Failed to build the checkout url.")]
    UrlError(#[source] url::ParseError),
}

impl std::fmt::Debug for CheckoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for CheckoutError {
    fn status_code(&self) -> StatusCode {
        match self {
            CheckoutError::MissingFields | CheckoutError::ValidationError(_) => {
                StatusCode::BAD_REQUEST
            }
            CheckoutError::SubscriberNotFound => StatusCode::NOT_FOUND,
            CheckoutError::LookupError(_) | CheckoutError::UrlError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error_response(self.status_code(), &self.to_string())
    }
}

/// `{base_url}/checkout?email=..&tier=..`, with the query string url encoded.
pub fn checkout_url(base_url: &str, request: &CheckoutRequest) -> Result<Url, url::ParseError> {
    Url::parse_with_params(
        &format!("{}/checkout", base_url),
        &[
            ("email", request.email.as_ref()),
            ("tier", request.tier.as_ref()),
        ],
    )
}

/// Builds the url of the local checkout page. No payment provider is called.
#[tracing::instrument(
    name = "Create a checkout url",
    skip(body, db_pool, base_url),
    fields(email = ?body.email, tier = ?body.tier)
)]
pub async fn handle_create_checkout(
    body: web::Json<CheckoutBody>,
    db_pool: web::Data<PgPool>,
    base_url: web::Data<ApplicationBaseUrl>,
) -> Result<HttpResponse, CheckoutError> {
    let request: CheckoutRequest = body.into_inner().try_into()?;

    find_subscriber_by_email(&db_pool, request.email.as_ref())
        .await
        .map_err(CheckoutError::LookupError)?
        .ok_or(CheckoutError::SubscriberNotFound)?;

    let url = checkout_url(&base_url.0, &request).map_err(CheckoutError::UrlError)?;

    Ok(HttpResponse::Ok().json(CheckoutUrlResponse {
        url: url.to_string(),
    }))
}

/// Simulated payment: waits and reports success. The subscriber tier is left untouched.
#[tracing::instrument(
    name = "Complete a simulated checkout",
    skip(body, latency),
    fields(email = ?body.email, tier = ?body.tier)
)]
pub async fn handle_complete_checkout(
    body: web::Json<CheckoutBody>,
    latency: web::Data<SimulatedLatency>,
) -> Result<HttpResponse, CheckoutError> {
    let request: CheckoutRequest = body.into_inner().try_into()?;

    tokio::time::sleep(latency.checkout).await;

    Ok(HttpResponse::Ok().json(CheckoutCompletedResponse {
        message: "Payment Successful!",
        email: request.email.as_ref(),
        tier: request.tier,
    }))
}
