/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - service 層の error を HTTP の意味に変換 (内部原因はログのみ、レスポンスには出さない)
 */
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::RepoError;
use crate::services::{ConversationError, MessageError, UserError};

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("unauthorized")]
    Unauthorized,
    #[error("not found: {resource}")]
    NotFound { resource: &'static str },
    #[error("{code}: {message}")]
    Conflict { code: &'static str, message: String },
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn not_found(resource: &'static str) -> Self {
        Self::NotFound { resource }
    }

    pub fn conflict(code: &'static str, message: impl Into<String>) -> Self {
        Self::Conflict {
            code,
            message: message.into(),
        }
    }

    fn internal(source: &dyn std::error::Error) -> Self {
        tracing::error!(error = %source, "internal error");
        Self::Internal
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match self {
            AppError::BadRequest { code, message } => (StatusCode::BAD_REQUEST, code, message),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "unauthorized".into(),
            ),
            AppError::NotFound { resource } => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{resource} not found."),
            ),
            AppError::Conflict { code, message } => (StatusCode::CONFLICT, code, message),
            AppError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_SERVER_ERROR",
                "internal server error".into(),
            ),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::NotFound => AppError::not_found("resource"),
            RepoError::Conflict => AppError::conflict("CONFLICT", "conflict"),
            other => AppError::internal(&other),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::UsernameRequired | UserError::PasswordRequired => {
                AppError::bad_request("INVALID_REQUEST", e.to_string())
            }
            UserError::UsernameTaken => AppError::conflict("USERNAME_TAKEN", e.to_string()),
            UserError::InvalidCredentials => AppError::Unauthorized,
            UserError::Repo(_) | UserError::Password(_) | UserError::Token(_) => {
                AppError::internal(&e)
            }
        }
    }
}

impl From<ConversationError> for AppError {
    fn from(e: ConversationError) -> Self {
        match e {
            ConversationError::TooFewParticipants => {
                AppError::bad_request("INVALID_REQUEST", e.to_string())
            }
            ConversationError::Repo(inner) => inner.into(),
        }
    }
}

impl From<MessageError> for AppError {
    fn from(e: MessageError) -> Self {
        match e {
            MessageError::ContentRequired => AppError::bad_request("INVALID_REQUEST", e.to_string()),
            MessageError::InvalidMessageId(_) => {
                AppError::bad_request("INVALID_MESSAGE_ID", "invalid message id")
            }
            MessageError::NotFound => AppError::not_found("message"),
            MessageError::Repo(inner) => inner.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::body::to_bytes;
    use serde_json::Value;

    use super::*;

    async fn render(err: AppError) -> (StatusCode, Value) {
        let res = err.into_response();
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn unauthorized_body_is_uniform() {
        let (status, body) = render(AppError::Unauthorized).await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            body,
            serde_json::json!({"error": {"code": "UNAUTHORIZED", "message": "unauthorized"}})
        );
    }

    #[tokio::test]
    async fn service_errors_map_to_statuses() {
        let (status, body) = render(UserError::UsernameTaken.into()).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"]["code"], "USERNAME_TAKEN");

        let (status, _) = render(UserError::InvalidCredentials.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);

        let (status, _) = render(ConversationError::TooFewParticipants.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = render(MessageError::NotFound.into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn internal_errors_do_not_leak_details() {
        let err: AppError = MessageError::Repo(RepoError::Corrupt("bad row 42".into())).into();
        let (status, body) = render(err).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"]["message"], "internal server error");
    }
}
