use chrono::Utc;
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use super::decode_error;
use crate::domain::{
    profile::{Profile, ProfileRole},
    subscription_tier::SubscriptionTier,
};

fn profile_from_row(row: PgRow) -> Result<Profile, sqlx::Error> {
    Ok(Profile {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        name: row.try_get("name")?,
        role: ProfileRole::parse(row.try_get("role")?).map_err(decode_error)?,
        subscription_tier: SubscriptionTier::parse(row.try_get("subscription_tier")?)
            .map_err(decode_error)?,
        created_at: row.try_get("created_at")?,
    })
}

/// Returns the profile of `user_id`, creating it with the `subscriber` role when the user has none yet.
/// Concurrent first visits are safe: the insert is a no-op when another request won the race.
#[tracing::instrument(name = "Get or create a user profile", skip(db_pool, email, name))]
pub async fn get_or_create_profile(
    db_pool: &PgPool,
    user_id: Uuid,
    email: &str,
    name: Option<&str>,
) -> Result<Profile, sqlx::Error> {
    let inserted = sqlx::query(
        r#"
        INSERT INTO profiles (id, email, name, role, subscription_tier, created_at)
        VALUES ($1, $2, $3, 'subscriber', 'free', $4)
        ON CONFLICT (id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(email)
    .bind(name)
    .bind(Utc::now())
    .execute(db_pool)
    .await?;

    if inserted.rows_affected() > 0 {
        tracing::info!("Created a profile for user {}", user_id);
    }

    get_profile(db_pool, user_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

#[tracing::instrument(name = "Get a user profile", skip(db_pool))]
pub async fn get_profile(db_pool: &PgPool, user_id: Uuid) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, email, name, role, subscription_tier, created_at
        FROM profiles
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .try_map(profile_from_row)
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Update a user profile name", skip(db_pool, name))]
pub async fn update_profile_name(
    db_pool: &PgPool,
    user_id: Uuid,
    name: Option<&str>,
) -> Result<Option<Profile>, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE profiles
        SET name = $2
        WHERE id = $1
        RETURNING id, email, name, role, subscription_tier, created_at
        "#,
    )
    .bind(user_id)
    .bind(name)
    .try_map(profile_from_row)
    .fetch_optional(db_pool)
    .await
}
