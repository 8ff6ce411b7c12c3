pub mod auth_client;
pub mod guard;
pub mod session;
