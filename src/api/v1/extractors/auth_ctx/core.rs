use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::AppError;
use crate::state::AppState;

use super::AuthCtx;

/// Handler で AuthCtx を受け取るための extractor
/// middleware が AuthCtx を request.extensions() に insert 済みである前提
/// 見つからない・中身が空の場合は 401 (ミドルウェア未設定のルートなど)
pub struct AuthCtxExtractor(pub AuthCtx);

impl FromRequestParts<AppState> for AuthCtxExtractor {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<AuthCtx>() {
            Some(ctx) if ctx.is_complete() => Ok(AuthCtxExtractor(ctx.clone())),
            _ => {
                tracing::warn!("request reached a protected handler without identity");
                Err(AppError::Unauthorized)
            }
        }
    }
}
