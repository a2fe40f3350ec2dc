/*
 * Responsibility
 * - ユーザーへの通知 port
 * - ConsoleNotifier はログに出すだけ (配送は行わない)
 */
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("notification failed: {0}")]
pub struct NotifyError(pub String);

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, user_id: &str, message: &str) -> Result<(), NotifyError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleNotifier;

#[async_trait]
impl Notifier for ConsoleNotifier {
    async fn notify(&self, user_id: &str, message: &str) -> Result<(), NotifyError> {
        tracing::info!(target: "notification", user_id, notice = message, "notification sent");
        Ok(())
    }
}
