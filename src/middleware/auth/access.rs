/*
 * Responsibility
 * - Bearer トークンの検証 (ヘッダ抽出 → 検証 → 拒否)
 * - 成功時に、認証済み主体 (AuthCtx) を request extensions に載せる
 * - 失敗理由はログにのみ残し、レスポンスは常に同じ 401
 */
use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

const BEARER_PREFIX: &str = "Bearer ";

/// Protects every route already registered on `router`.
///
/// Uses `route_layer`, so unmatched paths still fall through to 404 instead
/// of 401.
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // from_fn は State extractor を受け取れないため from_fn_with_state で渡す
    router.route_layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Raw token from `Authorization: Bearer <token>`, if the header has that shape.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix(BEARER_PREFIX))
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(token) = bearer_token(req.headers()) else {
        tracing::debug!("missing or non-bearer authorization header");
        return Err(AppError::Unauthorized);
    };

    let claims = match state.auth.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(error = ?err, "access token verification failed");
            return Err(AppError::Unauthorized);
        }
    };

    let auth_ctx = AuthCtx::new(claims.user_id, claims.username);
    if !auth_ctx.is_complete() {
        tracing::warn!("access token carries an empty identity");
        return Err(AppError::Unauthorized);
    }

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}
