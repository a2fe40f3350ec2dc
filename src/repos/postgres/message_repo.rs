/*
 * Responsibility
 * - messages テーブル向け SQLx 操作
 * - status は TEXT で保存し、読み出し時に MessageStatus へ戻す
 */
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::{Message, MessageStatus};
use crate::repos::{MessageRepo, RepoError, RepoResult};

#[derive(Debug, FromRow)]
struct MessageRow {
    id: Uuid,
    sender_id: String,
    receiver_id: String,
    content: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<MessageRow> for Message {
    type Error = RepoError;

    fn try_from(row: MessageRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<MessageStatus>()
            .map_err(|e| RepoError::Corrupt(e.to_string()))?;

        Ok(Message {
            id: row.id,
            sender_id: row.sender_id,
            receiver_id: row.receiver_id,
            content: row.content,
            created_at: row.created_at,
            status,
        })
    }
}

fn into_messages(rows: Vec<MessageRow>) -> RepoResult<Vec<Message>> {
    rows.into_iter().map(Message::try_from).collect()
}

#[derive(Clone, Debug)]
pub struct PgMessageRepo {
    pool: PgPool,
}

impl PgMessageRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepo for PgMessageRepo {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, sender_id, receiver_id, content, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(message.id)
        .bind(&message.sender_id)
        .bind(&message.receiver_id)
        .bind(&message.content)
        .bind(message.status.as_str())
        .bind(message.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_by_sender(&self, sender_id: &str) -> RepoResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, sender_id, receiver_id, content, status, created_at
            FROM messages
            WHERE sender_id = $1
            ORDER BY seq
            "#,
        )
        .bind(sender_id)
        .fetch_all(&self.pool)
        .await?;

        into_messages(rows)
    }

    async fn list_by_receiver(
        &self,
        receiver_id: &str,
        limit: usize,
        offset: usize,
    ) -> RepoResult<Vec<Message>> {
        let rows = sqlx::query_as::<_, MessageRow>(
            r#"
            SELECT id, sender_id, receiver_id, content, status, created_at
            FROM messages
            WHERE receiver_id = $1
            ORDER BY seq
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(receiver_id)
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        into_messages(rows)
    }

    async fn set_status(&self, id: Uuid, status: MessageStatus) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages
            SET status = $2
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(status: &str) -> MessageRow {
        MessageRow {
            id: Uuid::new_v4(),
            sender_id: "user-1".to_string(),
            receiver_id: "user-2".to_string(),
            content: "hi".to_string(),
            status: status.to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn maps_stored_status() {
        let message = Message::try_from(row("delivered")).unwrap();
        assert_eq!(message.status, MessageStatus::Delivered);
    }

    #[test]
    fn unknown_stored_status_is_corrupt() {
        let err = Message::try_from(row("lost")).unwrap_err();
        assert!(matches!(err, RepoError::Corrupt(_)));
    }
}
