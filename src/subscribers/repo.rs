use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Newsletter subscriber.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Subscriber {
    pub id: Uuid,
    pub email: String,
    pub is_active: bool,
    #[serde(with = "time::serde::rfc3339")]
    pub subscribed_at: OffsetDateTime,
}

impl Subscriber {
    pub async fn find_by_email(db: &PgPool, email: &str) -> anyhow::Result<Option<Subscriber>> {
        let row = sqlx::query_as::<_, Subscriber>(
            r#"
            SELECT id, email, is_active, subscribed_at
            FROM subscribers
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(db)
        .await?;
        Ok(row)
    }

    pub async fn create(db: &PgPool, email: &str) -> anyhow::Result<Subscriber> {
        let row = sqlx::query_as::<_, Subscriber>(
            r#"
            INSERT INTO subscribers (email)
            VALUES ($1)
            RETURNING id, email, is_active, subscribed_at
            "#,
        )
        .bind(email)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    /// Reactivate a lapsed subscription with a fresh timestamp.
    pub async fn reactivate(db: &PgPool, id: Uuid) -> anyhow::Result<Subscriber> {
        let row = sqlx::query_as::<_, Subscriber>(
            r#"
            UPDATE subscribers
            SET is_active = TRUE, subscribed_at = now()
            WHERE id = $1
            RETURNING id, email, is_active, subscribed_at
            "#,
        )
        .bind(id)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_all(db: &PgPool) -> anyhow::Result<Vec<Subscriber>> {
        let rows = sqlx::query_as::<_, Subscriber>(
            r#"
            SELECT id, email, is_active, subscribed_at
            FROM subscribers
            ORDER BY subscribed_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM subscribers")
            .fetch_one(db)
            .await?;
        Ok(count)
    }
}
