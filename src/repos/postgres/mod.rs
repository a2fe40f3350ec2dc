/*
 * Responsibility
 * - PgPool の生成と migration 適用
 * - 各 repo は pool を clone して持つ (PgPool は内部 Arc)
 */
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::repos::RepoResult;

mod conversation_repo;
mod message_repo;
mod user_repo;

pub use conversation_repo::PgConversationRepo;
pub use message_repo::PgMessageRepo;
pub use user_repo::PgUserRepo;

pub async fn connect(database_url: &str, max_connections: u32) -> RepoResult<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("database migrations applied");

    Ok(pool)
}
