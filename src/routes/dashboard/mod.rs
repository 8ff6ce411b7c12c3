//! Routes behind the session guard. Every handler takes an [`AuthenticatedUser`], so reaching one without a
//! live session redirects to the login page.
//!
//! [`AuthenticatedUser`]: crate::auth::guard::AuthenticatedUser

mod analytics;
mod home;
mod newsletters;
mod settings;
mod subscribers;

pub use analytics::*;
pub use home::*;
pub use newsletters::*;
pub use settings::*;
pub use subscribers::*;

use actix_web::{http::StatusCode, HttpResponse, ResponseError};

use crate::errors::{error_chain_fmt, json_error_response};

#[derive(thiserror::Error)]
pub enum DashboardError {
    #[error("{0}")]
    ValidationError(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("Failed to query the content store.")]
    StoreError(#[from] sqlx::Error),
}

impl std::fmt::Debug for DashboardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl ResponseError for DashboardError {
    fn status_code(&self) -> StatusCode {
        match self {
            DashboardError::ValidationError(_) => StatusCode::BAD_REQUEST,
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::StoreError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        json_error_response(self.status_code(), &self.to_string())
    }
}
