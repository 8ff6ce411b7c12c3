use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    dispatch::{dispatch_newsletter, DispatchError},
    errors::{error_chain_fmt, json_error_response},
    startup::SimulatedLatency,
};

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SendNewsletterBody {
    pub newsletter_id: Option<String>,
}

#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SendNewsletterResponse {
    pub message: &'static str,
    pub sent_count: usize,
    pub newsletter_title: String,
}

#[derive(thiserror::Error)]
pub enum SendNewsletterError {
    #[error("Newsletter ID is required")]
    MissingNewsletterId,
    #[error(transparent)]
    DispatchError(#[from] DispatchError),
}

impl std::fmt::Debug for SendNewsletterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SendNewsletterError {
    fn status_code(&self) -> StatusCode {
        match self {
            SendNewsletterError::MissingNewsletterId => StatusCode::BAD_REQUEST,
            SendNewsletterError::DispatchError(err) => match err {
                DispatchError::NewsletterNotFound => StatusCode::NOT_FOUND,
                DispatchError::NotPublished
                | DispatchError::NoActiveSubscribers
                | DispatchError::NoProSubscribers
                | DispatchError::NoEligibleSubscribers => StatusCode::BAD_REQUEST,
                DispatchError::NewsletterQueryError(_)
                | DispatchError::SubscribersQueryError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error_response(self.status_code(), &self.to_string())
    }
}

#[tracing::instrument(
    name = "Sending a newsletter to its subscribers",
    skip(body, db_pool, latency),
    fields(newsletter_id = ?body.newsletter_id)
)]
pub async fn handle_send_newsletter(
    body: web::Json<SendNewsletterBody>,
    db_pool: web::Data<PgPool>,
    latency: web::Data<SimulatedLatency>,
) -> Result<HttpResponse, SendNewsletterError> {
    let newsletter_id = body
        .newsletter_id
        .as_deref()
        .filter(|id| !id.trim().is_empty())
        .ok_or(SendNewsletterError::MissingNewsletterId)?;
    // An id that is not a uuid cannot match any newsletter
    let newsletter_id =
        Uuid::parse_str(newsletter_id).map_err(|_| DispatchError::NewsletterNotFound)?;

    let report = dispatch_newsletter(&db_pool, newsletter_id, latency.send_newsletter).await?;

    Ok(HttpResponse::Ok().json(SendNewsletterResponse {
        message: "Newsletter sent successfully",
        sent_count: report.sent_count,
        newsletter_title: report.newsletter_title,
    }))
}
