use chrono::{DateTime, Utc};
use sqlx::{postgres::PgRow, PgPool, Row};
use uuid::Uuid;

use crate::domain::newsletter::{Newsletter, NewsletterDraft};

fn newsletter_from_row(row: PgRow) -> Result<Newsletter, sqlx::Error> {
    Ok(Newsletter {
        id: row.try_get("id")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        excerpt: row.try_get("excerpt")?,
        is_published: row.try_get("is_published")?,
        is_premium: row.try_get("is_premium")?,
        published_at: row.try_get("published_at")?,
        view_count: row.try_get("view_count")?,
        author_id: row.try_get("author_id")?,
        created_at: row.try_get("created_at")?,
    })
}

#[tracing::instrument(
    name = "Insert a new newsletter into the database",
    skip(db_pool, draft),
    fields(title = %draft.title.as_ref(), publish = draft.publish)
)]
pub async fn insert_newsletter(
    db_pool: &PgPool,
    draft: &NewsletterDraft,
    author_id: Uuid,
) -> Result<Newsletter, sqlx::Error> {
    let now = Utc::now();

    sqlx::query(
        r#"
        INSERT INTO newsletters (id, title, content, excerpt, is_published, is_premium, published_at, view_count, author_id, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, 0, $8, $9)
        RETURNING id, title, content, excerpt, is_published, is_premium, published_at, view_count, author_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(draft.title.as_ref())
    .bind(&draft.content)
    .bind(&draft.excerpt)
    .bind(draft.publish)
    .bind(draft.is_premium)
    .bind(draft.published_at(now))
    .bind(author_id)
    .bind(now)
    .try_map(newsletter_from_row)
    .fetch_one(db_pool)
    .await
}

/// Overwrites a newsletter with the editor content. Only the author can update it: `None` is returned when
/// the newsletter does not exist or belongs to somebody else.
#[tracing::instrument(
    name = "Update a newsletter",
    skip(db_pool, draft),
    fields(title = %draft.title.as_ref(), publish = draft.publish)
)]
pub async fn update_authored_newsletter(
    db_pool: &PgPool,
    newsletter_id: Uuid,
    author_id: Uuid,
    draft: &NewsletterDraft,
) -> Result<Option<Newsletter>, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE newsletters
        SET title = $3, content = $4, excerpt = $5, is_published = $6, is_premium = $7, published_at = $8
        WHERE id = $1 AND author_id = $2
        RETURNING id, title, content, excerpt, is_published, is_premium, published_at, view_count, author_id, created_at
        "#,
    )
    .bind(newsletter_id)
    .bind(author_id)
    .bind(draft.title.as_ref())
    .bind(&draft.content)
    .bind(&draft.excerpt)
    .bind(draft.publish)
    .bind(draft.is_premium)
    .bind(draft.published_at(Utc::now()))
    .try_map(newsletter_from_row)
    .fetch_optional(db_pool)
    .await
}

#[tracing::instrument(name = "Get a newsletter", skip(db_pool))]
pub async fn get_newsletter(
    db_pool: &PgPool,
    newsletter_id: Uuid,
) -> Result<Option<Newsletter>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, title, content, excerpt, is_published, is_premium, published_at, view_count, author_id, created_at
        FROM newsletters
        WHERE id = $1
        "#,
    )
    .bind(newsletter_id)
    .try_map(newsletter_from_row)
    .fetch_optional(db_pool)
    .await
}

/// Newest newsletters first, optionally capped to `limit` rows.
#[tracing::instrument(name = "List newsletters", skip(db_pool))]
pub async fn list_newsletters(
    db_pool: &PgPool,
    limit: Option<i64>,
) -> Result<Vec<Newsletter>, sqlx::Error> {
    sqlx::query(
        r#"
        SELECT id, title, content, excerpt, is_published, is_premium, published_at, view_count, author_id, created_at
        FROM newsletters
        ORDER BY created_at DESC
        LIMIT $1
        "#,
    )
    // LIMIT NULL means no limit in Postgres
    .bind(limit)
    .try_map(newsletter_from_row)
    .fetch_all(db_pool)
    .await
}

/// Flips `is_published`. Publishing stamps `published_at` with `now`, unpublishing clears it.
/// The CASE reads the value from before the update.
#[tracing::instrument(name = "Toggle newsletter publication", skip(db_pool))]
pub async fn toggle_newsletter_publication(
    db_pool: &PgPool,
    newsletter_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Option<Newsletter>, sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE newsletters
        SET is_published = NOT is_published,
            published_at = CASE WHEN is_published THEN NULL ELSE $2::timestamptz END
        WHERE id = $1
        RETURNING id, title, content, excerpt, is_published, is_premium, published_at, view_count, author_id, created_at
        "#,
    )
    .bind(newsletter_id)
    .bind(now)
    .try_map(newsletter_from_row)
    .fetch_optional(db_pool)
    .await
}

/// Removes the row only. Send records pointing at it are left untouched.
#[tracing::instrument(name = "Delete a newsletter", skip(db_pool))]
pub async fn delete_newsletter(db_pool: &PgPool, newsletter_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM newsletters WHERE id = $1")
        .bind(newsletter_id)
        .execute(db_pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[tracing::instrument(name = "Count newsletters", skip(db_pool))]
pub async fn count_newsletters(db_pool: &PgPool) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM newsletters")
        .fetch_one(db_pool)
        .await
}

#[tracing::instrument(name = "Count newsletters by publication status", skip(db_pool))]
pub async fn count_newsletters_by_status(
    db_pool: &PgPool,
    is_published: bool,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM newsletters WHERE is_published = $1")
        .bind(is_published)
        .fetch_one(db_pool)
        .await
}
