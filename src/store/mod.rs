//! Row level queries against the content tables. Every function is a single round trip to Postgres,
//! nothing here is cached or retried.

pub mod newsletter_sends;
pub mod newsletters;
pub mod profiles;
pub mod subscribers;

/// Wraps a domain parsing error for a value read back from the database.
fn decode_error(err: String) -> sqlx::Error {
    sqlx::Error::Decode(err.into())
}
