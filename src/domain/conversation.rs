use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Conversation {
    pub id: Uuid,
    pub participant_ids: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Conversation {
    pub fn includes(&self, user_id: &str) -> bool {
        self.participant_ids.iter().any(|p| p == user_id)
    }
}
