use actix_web::{http::StatusCode, web, HttpResponse, ResponseError};
use sqlx::PgPool;

use crate::{
    domain::subscriber::Subscriber,
    errors::{error_chain_fmt, json_error_response},
    store::subscribers::list_subscribers,
};

#[derive(serde::Serialize)]
pub struct SubscribersResponse<'a> {
    pub subscribers: &'a [Subscriber],
}

#[derive(thiserror::Error)]
#[error("Failed to fetch subscribers.")]
pub struct ListSubscribersError(#[source] sqlx::Error);

impl std::fmt::Debug for ListSubscribersError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for ListSubscribersError {
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    fn error_response(&self) -> HttpResponse {
        json_error_response(self.status_code(), &self.to_string())
    }
}

#[tracing::instrument(name = "List subscribers handler", skip(db_pool))]
pub async fn handle_list_subscribers(
    db_pool: web::Data<PgPool>,
) -> Result<HttpResponse, ListSubscribersError> {
    let subscribers = list_subscribers(&db_pool)
        .await
        .map_err(ListSubscribersError)?;

    Ok(HttpResponse::Ok().json(SubscribersResponse {
        subscribers: &subscribers,
    }))
}
