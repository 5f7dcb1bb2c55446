//! PostgreSQL Repository Implementation

use chrono::{DateTime, Utc};
use kernel::id::Id;
use sqlx::PgPool;

use crate::domain::{ContactMessage, ContactRepository};
use crate::error::ContactResult;

/// PostgreSQL-backed contact repository
#[derive(Clone)]
pub struct PgContactRepository {
    pool: PgPool,
}

impl PgContactRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl ContactRepository for PgContactRepository {
    async fn save(&self, subject: &str, message: &str) -> ContactResult<ContactMessage> {
        let row = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            INSERT INTO contact_messages (subject, message)
            VALUES ($1, $2)
            RETURNING id, subject, message, created_at
            "#,
        )
        .bind(subject)
        .bind(message)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into_message())
    }

    async fn list_all(&self) -> ContactResult<Vec<ContactMessage>> {
        let rows = sqlx::query_as::<_, ContactMessageRow>(
            r#"
            SELECT id, subject, message, created_at
            FROM contact_messages
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| r.into_message()).collect())
    }
}

#[derive(sqlx::FromRow)]
struct ContactMessageRow {
    id: i64,
    subject: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl ContactMessageRow {
    fn into_message(self) -> ContactMessage {
        ContactMessage {
            id: Id::from_i64(self.id),
            subject: self.subject,
            message: self.message,
            created_at: self.created_at,
        }
    }
}
