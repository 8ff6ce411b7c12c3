mod auth;
mod checkout;
mod dashboard;
mod health_check;
mod newsletters;
mod stats;
mod subscribers;
mod subscriptions;

pub use auth::*;
pub use checkout::*;
pub use dashboard::*;
pub use health_check::*;
pub use newsletters::*;
pub use stats::*;
pub use subscribers::*;
pub use subscriptions::*;

#[derive(serde::Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}
