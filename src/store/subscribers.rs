use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use super::decode_error;
use crate::domain::{
    new_subscriber::NewSubscriber, subscriber::Subscriber, subscriber_email::SubscriberEmail,
    subscription_tier::SubscriptionTier,
};

fn subscriber_from_row(row: PgRow) -> Result<Subscriber, sqlx::Error> {
    Ok(Subscriber {
        id: row.try_get("id")?,
        email: SubscriberEmail::parse(row.try_get("email")?).map_err(decode_error)?,
        name: row.try_get("name")?,
        subscription_tier: SubscriptionTier::parse(row.try_get("subscription_tier")?)
            .map_err(decode_error)?,
        is_active: row.try_get("is_active")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

#[tracing::instrument(name = "Find a subscriber by email", skip(db_pool))]
pub async fn find_subscriber_by_email(
    db_pool: &PgPool,
    email: &str,
) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, name, subscription_tier, is_active, created_at, updated_at
        FROM subscribers
        WHERE email = $1
        "#,
    )
    .bind(email)
    .try_map(subscriber_from_row)
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(
    name = "Insert a new subscriber into the database",
    skip(new_subscriber, db_pool)
)]
pub async fn insert_subscriber(
    db_pool: &PgPool,
    new_subscriber: &NewSubscriber,
) -> Result<Subscriber, sqlx::Error> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO subscribers (id, email, name, subscription_tier, is_active, created_at, updated_at)
        VALUES ($1, $2, $3, 'free', TRUE, $4, $4)
        RETURNING id, email, name, subscription_tier, is_active, created_at, updated_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new_subscriber.email.as_ref())
    .bind(new_subscriber.name.as_ref().map(|name| name.as_ref()))
    .bind(now)
    .try_map(subscriber_from_row)
    .fetch_one(db_pool)
    .await
}

#[tracing::instrument(name = "Reactivate an inactive subscriber", skip(db_pool))]
pub async fn reactivate_subscriber(db_pool: &PgPool, subscriber_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE subscribers
        SET is_active = TRUE, updated_at = $2
        WHERE id = $1
        "#,
    )
    .bind(subscriber_id)
    .bind(Utc::now())
    .execute(db_pool)
    .await?;

    Ok(())
}

/// Flips `is_active`. Returns `None` when the subscriber does not exist.
#[tracing::instrument(name = "Toggle the status of a subscriber", skip(db_pool))]
pub async fn toggle_subscriber_status(
    db_pool: &PgPool,
    subscriber_id: Uuid,
) -> Result<Option<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE subscribers
        SET is_active = NOT is_active, updated_at = $2
        WHERE id = $1
        RETURNING id, email, name, subscription_tier, is_active, created_at, updated_at
        "#,
    )
    .bind(subscriber_id)
    .bind(Utc::now())
    .try_map(subscriber_from_row)
    .fetch_optional(db_pool)
    .await
}

/// Newest subscribers first.
#[tracing::instrument(name = "List all subscribers", skip(db_pool))]
pub async fn list_subscribers(db_pool: &PgPool) -> Result<Vec<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, name, subscription_tier, is_active, created_at, updated_at
        FROM subscribers
        ORDER BY created_at DESC
        "#,
    )
    .try_map(subscriber_from_row)
    .fetch_all(db_pool)
    .await
}

#[tracing::instrument(name = "List active subscribers", skip(db_pool))]
pub async fn list_active_subscribers(db_pool: &PgPool) -> Result<Vec<Subscriber>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, name, subscription_tier, is_active, created_at, updated_at
        FROM subscribers
        WHERE is_active = TRUE
        "#,
    )
    .try_map(subscriber_from_row)
    .fetch_all(db_pool)
    .await
}

#[tracing::instrument(name = "Count active subscribers", skip(db_pool))]
pub async fn count_active_subscribers(db_pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscribers WHERE is_active = TRUE")
        .fetch_one(db_pool)
        .await
}
