/*
 * Responsibility
 * - 永続化の port (trait) 定義
 * - service はこの trait だけを見る。実装は memory / postgres
 */
use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Conversation, Message, MessageStatus, User};

pub mod error;
pub mod memory;
pub mod postgres;

pub use error::{RepoError, RepoResult};

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Fails with `RepoError::Conflict` if the username is taken.
    async fn create(&self, user: &User) -> RepoResult<()>;

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>>;
}

#[async_trait]
pub trait ConversationRepo: Send + Sync {
    async fn create(&self, conversation: &Conversation) -> RepoResult<()>;

    /// Conversations that list `user_id` as a participant, oldest first.
    async fn find_by_participant(&self, user_id: &str) -> RepoResult<Vec<Conversation>>;
}

#[async_trait]
pub trait MessageRepo: Send + Sync {
    async fn create(&self, message: &Message) -> RepoResult<()>;

    async fn list_by_sender(&self, sender_id: &str) -> RepoResult<Vec<Message>>;

    /// Oldest first. `offset`/`limit` past the end yield a shorter (or empty) page.
    async fn list_by_receiver(
        &self,
        receiver_id: &str,
        limit: usize,
        offset: usize,
    ) -> RepoResult<Vec<Message>>;

    /// Fails with `RepoError::NotFound` for an unknown id.
    async fn set_status(&self, id: Uuid, status: MessageStatus) -> RepoResult<()>;
}
