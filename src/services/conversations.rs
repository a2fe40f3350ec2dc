use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use crate::domain::Conversation;
use crate::repos::{ConversationRepo, RepoError};

#[derive(Debug, Error)]
pub enum ConversationError {
    #[error("a conversation requires at least two participants")]
    TooFewParticipants,
    #[error(transparent)]
    Repo(#[from] RepoError),
}

pub struct ConversationService {
    repo: Arc<dyn ConversationRepo>,
}

impl ConversationService {
    pub fn new(repo: Arc<dyn ConversationRepo>) -> Self {
        Self { repo }
    }

    pub async fn create_conversation(
        &self,
        participant_ids: Vec<String>,
    ) -> Result<Conversation, ConversationError> {
        if participant_ids.len() < 2 {
            return Err(ConversationError::TooFewParticipants);
        }

        let conversation = Conversation {
            id: Uuid::new_v4(),
            participant_ids,
            created_at: Utc::now(),
        };
        self.repo.create(&conversation).await?;

        Ok(conversation)
    }

    pub async fn conversations_for_user(
        &self,
        user_id: &str,
    ) -> Result<Vec<Conversation>, ConversationError> {
        Ok(self.repo.find_by_participant(user_id).await?)
    }
}
