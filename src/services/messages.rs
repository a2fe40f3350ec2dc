/*
 * Responsibility
 * - message の送信 (保存 → 受信者へ通知)、受信箱/送信済み一覧、status 更新
 * - 通知の失敗は送信自体を失敗させない (保存済みのため)
 */
use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::{Message, MessageStatus};
use crate::repos::{MessageRepo, RepoError};
use crate::services::notify::Notifier;

const NEW_MESSAGE_NOTICE: &str = "You have a new message!";

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message content cannot be empty")]
    ContentRequired,
    #[error("invalid message id")]
    InvalidMessageId(#[source] uuid::Error),
    #[error("message not found")]
    NotFound,
    #[error(transparent)]
    Repo(RepoError),
}

impl From<RepoError> for MessageError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => MessageError::NotFound,
            other => MessageError::Repo(other),
        }
    }
}

pub struct MessageService {
    repo: Arc<dyn MessageRepo>,
    notifier: Arc<dyn Notifier>,
}

impl MessageService {
    pub fn new(repo: Arc<dyn MessageRepo>, notifier: Arc<dyn Notifier>) -> Self {
        Self { repo, notifier }
    }

    pub async fn create_message(
        &self,
        sender_id: &str,
        receiver_id: &str,
        content: &str,
    ) -> Result<Message, MessageError> {
        if content.is_empty() {
            return Err(MessageError::ContentRequired);
        }

        let message = Message {
            id: Uuid::new_v4(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
            created_at: Utc::now(),
            status: MessageStatus::Sent,
        };
        self.repo.create(&message).await?;

        if let Err(err) = self.notifier.notify(receiver_id, NEW_MESSAGE_NOTICE).await {
            tracing::warn!(error = %err, message_id = %message.id, "failed to notify receiver");
        }

        Ok(message)
    }

    pub async fn messages_by_receiver(
        &self,
        receiver_id: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Message>, MessageError> {
        Ok(self.repo.list_by_receiver(receiver_id, limit, offset).await?)
    }

    pub async fn messages_by_sender(&self, sender_id: &str) -> Result<Vec<Message>, MessageError> {
        Ok(self.repo.list_by_sender(sender_id).await?)
    }

    pub async fn set_message_status(
        &self,
        message_id: &str,
        status: MessageStatus,
    ) -> Result<(), MessageError> {
        let id = Uuid::parse_str(message_id).map_err(MessageError::InvalidMessageId)?;
        self.repo.set_status(id, status).await?;
        Ok(())
    }
}
