/*
 * Responsibility
 * - Router に紐づける共有コンテキスト (AppState)
 *   - ex: auth: TokenCodec, users/conversations/messages: service
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::repos::memory::{MemoryConversationRepo, MemoryMessageRepo, MemoryUserRepo};
use crate::services::auth::{PasswordHasher, TokenCodec};
use crate::services::{ConsoleNotifier, ConversationService, MessageService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<TokenCodec>,
    pub users: Arc<UserService>,
    pub conversations: Arc<ConversationService>,
    pub messages: Arc<MessageService>,
}

impl AppState {
    pub fn new(
        auth: Arc<TokenCodec>,
        users: Arc<UserService>,
        conversations: Arc<ConversationService>,
        messages: Arc<MessageService>,
    ) -> Self {
        Self {
            auth,
            users,
            conversations,
            messages,
        }
    }

    /// Everything in process memory; used by the `memory` backend and tests.
    pub fn in_memory(auth: Arc<TokenCodec>, hasher: PasswordHasher) -> Self {
        let users = UserService::new(Arc::new(MemoryUserRepo::new()), auth.clone(), hasher);
        let conversations = ConversationService::new(Arc::new(MemoryConversationRepo::new()));
        let messages = MessageService::new(
            Arc::new(MemoryMessageRepo::new()),
            Arc::new(ConsoleNotifier),
        );

        Self::new(
            auth,
            Arc::new(users),
            Arc::new(conversations),
            Arc::new(messages),
        )
    }
}
