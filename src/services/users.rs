/*
 * Responsibility
 * - register: 入力チェック → 重複チェック → bcrypt → 保存
 * - login: 認証 → access token 発行
 * - 未登録ユーザーとパスワード不一致は区別しない (InvalidCredentials)
 */
use std::sync::Arc;

use thiserror::Error;
use uuid::Uuid;

use crate::domain::User;
use crate::repos::{RepoError, UserRepo};
use crate::services::auth::{PasswordError, PasswordHasher, TokenCodec, TokenError};

#[derive(Debug, Error)]
pub enum UserError {
    #[error("username cannot be empty")]
    UsernameRequired,
    #[error("password cannot be empty")]
    PasswordRequired,
    #[error("username is already taken")]
    UsernameTaken,
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error(transparent)]
    Repo(RepoError),
    #[error(transparent)]
    Password(#[from] PasswordError),
    #[error(transparent)]
    Token(#[from] TokenError),
}

impl From<RepoError> for UserError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict => UserError::UsernameTaken,
            other => UserError::Repo(other),
        }
    }
}

/// Access token handed out by `login`.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    /// Seconds until expiry.
    pub expires_in: i64,
}

pub struct UserService {
    repo: Arc<dyn UserRepo>,
    tokens: Arc<TokenCodec>,
    hasher: PasswordHasher,
}

impl UserService {
    pub fn new(repo: Arc<dyn UserRepo>, tokens: Arc<TokenCodec>, hasher: PasswordHasher) -> Self {
        Self {
            repo,
            tokens,
            hasher,
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<User, UserError> {
        if username.trim().is_empty() {
            return Err(UserError::UsernameRequired);
        }
        if password.is_empty() {
            return Err(UserError::PasswordRequired);
        }

        if self.repo.find_by_username(username).await?.is_some() {
            return Err(UserError::UsernameTaken);
        }

        let user = User {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: self.hasher.hash(password).await?,
        };

        // A concurrent register can still win the race; the repo reports Conflict.
        self.repo.create(&user).await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, UserError> {
        let Some(user) = self.repo.find_by_username(username).await? else {
            return Err(UserError::InvalidCredentials);
        };

        if !self.hasher.verify(password, &user.password_hash).await? {
            return Err(UserError::InvalidCredentials);
        }

        let token = self
            .tokens
            .issue_access_token(&user.username, &user.id.to_string())?;

        Ok(IssuedToken {
            token,
            expires_in: self.tokens.ttl().num_seconds(),
        })
    }
}
