use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::Conversation;

#[derive(Debug, Deserialize)]
pub struct CreateConversationRequest {
    #[serde(default)]
    pub participant_ids: Vec<String>,
}

impl CreateConversationRequest {
    /// Participants with the caller included exactly once, order preserved.
    pub fn participants_with(self, caller_id: &str) -> Vec<String> {
        let mut ids: Vec<String> = Vec::with_capacity(self.participant_ids.len() + 1);
        for id in self.participant_ids {
            let id = id.trim().to_string();
            if !id.is_empty() && !ids.contains(&id) {
                ids.push(id);
            }
        }
        if !ids.iter().any(|id| id == caller_id) {
            ids.push(caller_id.to_string());
        }
        ids
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationResponse {
    pub id: Uuid,
    pub participant_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationResponse {
    fn from(c: Conversation) -> Self {
        Self {
            id: c.id,
            participant_ids: c.participant_ids,
            created_at: c.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn req(ids: &[&str]) -> CreateConversationRequest {
        CreateConversationRequest {
            participant_ids: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn caller_is_appended_when_missing() {
        assert_eq!(req(&["bob"]).participants_with("alice"), vec!["bob", "alice"]);
    }

    #[test]
    fn caller_and_duplicates_are_not_repeated() {
        assert_eq!(
            req(&["alice", "bob", "bob", " "]).participants_with("alice"),
            vec!["alice", "bob"]
        );
        assert_eq!(req(&[]).participants_with("alice"), vec!["alice"]);
    }
}
