use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use sqlx::PgPool;

use crate::{
    domain::new_subscriber::{NewSubscriber, NewSubscriberBody},
    errors::{error_chain_fmt, json_error_response},
    routes::MessageResponse,
    store::subscribers::{find_subscriber_by_email, insert_subscriber, reactivate_subscriber},
};

#[derive(thiserror::Error)]
pub enum SubscribeError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Email already subscribed")]
    AlreadySubscribed,
    #[error("Failed to look up the subscriber.")]
    LookupError(#[source] sqlx::Error),
    #[error("Failed to reactivate the subscriber.")]
    ReactivateError(#[source] sqlx::Error),
    #[error("Failed to insert the new subscriber.")]
    InsertError(#[source] sqlx::Error),
}

impl std::fmt::Debug for SubscribeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for SubscribeError {
    fn status_code(&self) -> StatusCode {
        match self {
            SubscribeError::ValidationError(_) | SubscribeError::AlreadySubscribed => {
                StatusCode::BAD_REQUEST
            }
            SubscribeError::LookupError(_)
            | SubscribeError::ReactivateError(_)
            | SubscribeError::InsertError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error_response(self.status_code(), &self.to_string())
    }
}

/// Public subscription form. Inactive subscribers coming back are reactivated instead of duplicated.
#[tracing::instrument(
    name = "Creating a new subscriber handler",
    skip(body, db_pool),
    fields(
        subscriber_email = ?body.email,
        subscriber_name = ?body.name
    )
)]
pub async fn handle_subscribe(
    body: web::Json<NewSubscriberBody>,
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, SubscribeError> {
    let new_subscriber: NewSubscriber = body
        .into_inner()
        .try_into()
        .map_err(SubscribeError::ValidationError)?;

    let existing_subscriber = find_subscriber_by_email(&db_pool, new_subscriber.email.as_ref())
        .await
        .map_err(SubscribeError::LookupError)?;

    let message = match existing_subscriber {
        Some(subscriber) if subscriber.is_active => {
            return Err(SubscribeError::AlreadySubscribed);
        }
        Some(subscriber) => {
            reactivate_subscriber(&db_pool, subscriber.id)
                .await
                .map_err(SubscribeError::ReactivateError)?;

            "Successfully resubscribed!"
        }
        None => {
            insert_subscriber(&db_pool, &new_subscriber)
                .await
                .map_err(SubscribeError::InsertError)?;

            "Successfully subscribed!"
        }
    };

    Ok(HttpResponse::Ok().json(MessageResponse { message }))
}
