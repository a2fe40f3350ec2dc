use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Message, MessageStatus};
use crate::repos::{MessageRepo, RepoError, RepoResult};

#[derive(Debug, Default)]
pub struct MemoryMessageRepo {
    messages: RwLock<Vec<Message>>,
}

impl MemoryMessageRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MessageRepo for MemoryMessageRepo {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages.write().await.push(message.clone());
        Ok(())
    }

    async fn list_by_sender(&self, sender_id: &str) -> RepoResult<Vec<Message>> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.sender_id == sender_id)
            .cloned()
            .collect())
    }

    async fn list_by_receiver(
        &self,
        receiver_id: &str,
        limit: usize,
        offset: usize,
    ) -> RepoResult<Vec<Message>> {
        let messages = self.messages.read().await;
        Ok(messages
            .iter()
            .filter(|m| m.receiver_id == receiver_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn set_status(&self, id: Uuid, status: MessageStatus) -> RepoResult<()> {
        let mut messages = self.messages.write().await;
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(RepoError::NotFound)?;
        message.status = status;
        Ok(())
    }
}
