use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::User;
use crate::repos::{RepoError, RepoResult, UserRepo};

/// Users keyed by username.
#[derive(Debug, Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn create(&self, user: &User) -> RepoResult<()> {
        let mut users = self.users.write().await;
        if users.contains_key(&user.username) {
            return Err(RepoError::Conflict);
        }
        users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn find_by_username(&self, username: &str) -> RepoResult<Option<User>> {
        Ok(self.users.read().await.get(username).cloned())
    }
}
