use rand::Rng;
use secrecy::{ExposeSecret, Secret};

pub const SESSION_COOKIE: &str = "session_id";
const SESSION_TOKEN_LENGTH: usize = 30;

fn session_key(session_token: &str) -> String {
    format!("session:{}:access_token", session_token)
}

/// Random alphanumeric value of the session cookie.
pub fn generate_session_token() -> String {
    let mut rng = rand::thread_rng();

    std::iter::repeat_with(|| rng.sample(rand::distributions::Alphanumeric))
        .map(char::from)
        .take(SESSION_TOKEN_LENGTH)
        .collect()
}

/// Stores the provider access token behind `session_token`. The entry expires together with the token.
#[tracing::instrument(
    name = "Store a session in Redis",
    skip(redis_client, session_token, access_token)
)]
pub async fn store_session(
    redis_client: &redis::Client,
    session_token: &str,
    access_token: &Secret<String>,
    ttl_seconds: u64,
) -> Result<(), redis::RedisError> {
    let mut redis_conn = redis_client.get_tokio_connection().await?;

    redis::cmd("SET")
        .arg(session_key(session_token))
        .arg(access_token.expose_secret())
        .arg("EX")
        .arg(ttl_seconds.max(1))
        .query_async(&mut redis_conn)
        .await
}

#[tracing::instrument(name = "Get a session from Redis", skip_all)]
pub async fn get_session_access_token(
    redis_client: &redis::Client,
    session_token: &str,
) -> Result<Option<Secret<String>>, redis::RedisError> {
    let mut redis_conn = redis_client.get_tokio_connection().await?;

    let access_token: Option<String> = redis::cmd("GET")
        .arg(session_key(session_token))
        .query_async(&mut redis_conn)
        .await?;

    Ok(access_token.map(Secret::new))
}

#[tracing::instrument(name = "Delete a session from Redis", skip_all)]
pub async fn delete_session(
    redis_client: &redis::Client,
    session_token: &str,
) -> Result<(), redis::RedisError> {
    let mut redis_conn = redis_client.get_tokio_connection().await?;

    redis::cmd("DEL")
        .arg(session_key(session_token))
        .query_async(&mut redis_conn)
        .await
}
