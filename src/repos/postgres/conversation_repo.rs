use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::domain::Conversation;
use crate::repos::{ConversationRepo, RepoResult};

#[derive(Debug, FromRow)]
struct ConversationRow {
    id: Uuid,
    participant_ids: Vec<String>,
    created_at: DateTime<Utc>,
}

impl From<ConversationRow> for Conversation {
    fn from(row: ConversationRow) -> Self {
        Conversation {
            id: row.id,
            participant_ids: row.participant_ids,
            created_at: row.created_at,
        }
    }
}

#[derive(Clone, Debug)]
pub struct PgConversationRepo {
    pool: PgPool,
}

impl PgConversationRepo {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConversationRepo for PgConversationRepo {
    async fn create(&self, conversation: &Conversation) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO conversations (id, participant_ids, created_at)
            VALUES ($1, $2, $3)
            "#,
        )
        .bind(conversation.id)
        .bind(&conversation.participant_ids)
        .bind(conversation.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_participant(&self, user_id: &str) -> RepoResult<Vec<Conversation>> {
        let rows = sqlx::query_as::<_, ConversationRow>(
            r#"
            SELECT id, participant_ids, created_at
            FROM conversations
            WHERE $1 = ANY(participant_ids)
            ORDER BY seq
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Conversation::from).collect())
    }
}
