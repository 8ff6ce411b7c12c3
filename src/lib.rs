pub mod auth;
pub mod config;
pub mod dispatch;
pub mod domain;
pub mod errors;
pub mod routes;
pub mod startup;
pub mod store;
pub mod telemetry;
