//! In-process repositories. Data lives as long as the process.

mod conversation_repo;
mod message_repo;
mod user_repo;

pub use conversation_repo::MemoryConversationRepo;
pub use message_repo::MemoryMessageRepo;
pub use user_repo::MemoryUserRepo;
