use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// Appends one send record per subscriber, all stamped with the same `sent_at`, in a single statement.
/// Nothing prevents a second call from recording the same (newsletter, subscriber) pairs again.
#[tracing::instrument(
    name = "Insert newsletter send records",
    skip(db_pool, subscriber_ids),
    fields(records = subscriber_ids.len())
)]
pub async fn insert_newsletter_sends(
    db_pool: &PgPool,
    newsletter_id: Uuid,
    subscriber_ids: &[Uuid],
    sent_at: DateTime<Utc>,
) -> Result<u64, sqlx::Error> {
    let send_ids: Vec<Uuid> = subscriber_ids.iter().map(|_| Uuid::new_v4()).collect();

    let result = sqlx::query(
        r#"
        INSERT INTO newsletter_sends (id, newsletter_id, subscriber_id, sent_at)
        SELECT send_id, $1, subscriber_id, $2
        FROM UNNEST($3::uuid[], $4::uuid[]) AS records(send_id, subscriber_id)
        "#,
    )
    .bind(newsletter_id)
    .bind(sent_at)
    .bind(send_ids)
    .bind(subscriber_ids.to_vec())
    .execute(db_pool)
    .await?;

    Ok(result.rows_affected())
}
