use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::Conversation;
use crate::repos::{ConversationRepo, RepoResult};

#[derive(Debug, Default)]
pub struct MemoryConversationRepo {
    conversations: RwLock<Vec<Conversation>>,
}

impl MemoryConversationRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConversationRepo for MemoryConversationRepo {
    async fn create(&self, conversation: &Conversation) -> RepoResult<()> {
        self.conversations.write().await.push(conversation.clone());
        Ok(())
    }

    async fn find_by_participant(&self, user_id: &str) -> RepoResult<Vec<Conversation>> {
        let conversations = self.conversations.read().await;
        Ok(conversations
            .iter()
            .filter(|c| c.includes(user_id))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use uuid::Uuid;

    use super::*;

    fn conversation(participants: &[&str]) -> Conversation {
        Conversation {
            id: Uuid::new_v4(),
            participant_ids: participants.iter().map(|p| p.to_string()).collect(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn finds_by_any_participant() {
        let repo = MemoryConversationRepo::new();
        let ab = conversation(&["alice", "bob"]);
        let bc = conversation(&["bob", "carol"]);
        repo.create(&ab).await.unwrap();
        repo.create(&bc).await.unwrap();

        assert_eq!(repo.find_by_participant("alice").await.unwrap(), vec![ab.clone()]);
        assert_eq!(repo.find_by_participant("bob").await.unwrap(), vec![ab, bc.clone()]);
        assert_eq!(repo.find_by_participant("carol").await.unwrap(), vec![bc]);
        assert!(repo.find_by_participant("dave").await.unwrap().is_empty());
    }
}
