use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use time::OffsetDateTime;
use uuid::Uuid;

/// Payment record. `member` holds the payer's external identity id when
/// present, otherwise the user id rendered as text; it is deliberately
/// not a foreign key.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub member: String,
    pub plan: String,
    pub amount: f64,
    pub payment_method: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Payment {
    pub async fn create(
        db: &PgPool,
        member: &str,
        plan: &str,
        amount: f64,
        payment_method: &str,
    ) -> anyhow::Result<Payment> {
        let row = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments (member, plan, amount, payment_method)
            VALUES ($1, $2, $3, $4)
            RETURNING id, member, plan, amount, payment_method, status, created_at
            "#,
        )
        .bind(member)
        .bind(plan)
        .bind(amount)
        .bind(payment_method)
        .fetch_one(db)
        .await?;
        Ok(row)
    }

    pub async fn list_desc(db: &PgPool) -> anyhow::Result<Vec<Payment>> {
        let rows = sqlx::query_as::<_, Payment>(
            r#"
            SELECT id, member, plan, amount, payment_method, status, created_at
            FROM payments
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(db)
        .await?;
        Ok(rows)
    }

    pub async fn count(db: &PgPool) -> anyhow::Result<i64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM payments")
            .fetch_one(db)
            .await?;
        Ok(count)
    }

    pub async fn total_revenue(db: &PgPool) -> anyhow::Result<f64> {
        let total = sqlx::query_scalar::<_, f64>(
            "SELECT COALESCE(SUM(amount), 0)::DOUBLE PRECISION FROM payments",
        )
        .fetch_one(db)
        .await?;
        Ok(total)
    }
}
