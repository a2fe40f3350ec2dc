/*
 * Responsibility
 * - password の bcrypt hash / verify
 * - bcrypt は CPU bound なので tokio の blocking pool で実行する
 */
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PasswordError {
    #[error("bcrypt failure: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),

    #[error("password task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let password = password.to_owned();
        let cost = self.cost;
        let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost)).await??;
        Ok(hashed)
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub async fn verify(&self, password: &str, password_hash: &str) -> Result<bool, PasswordError> {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();
        let ok = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await??;
        Ok(ok)
    }
}
