/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - 公開ルート (health/register/login) と保護ルート (conversations/messages) を分け、
 *   保護ルートにだけ access middleware を route_layer で掛ける
 */
use axum::{
    Router,
    routing::{get, post, put},
};

use crate::api::v1::handlers::{
    conversations::{create_conversation, list_conversations},
    health::health,
    messages::{list_received, list_sent, send_message, update_status},
    users::{login, register},
};
use crate::middleware;
use crate::state::AppState;

pub fn routes(state: AppState) -> Router<AppState> {
    let public = Router::new()
        .route("/health", get(health))
        .route("/register", post(register))
        .route("/login", post(login));

    let protected = Router::new()
        .route(
            "/conversations",
            get(list_conversations).post(create_conversation),
        )
        .route("/messages", get(list_received).post(send_message))
        .route("/messages/sent", get(list_sent))
        .route("/messages/{message_id}/status", put(update_status));
    let protected = middleware::auth::access::apply(protected, state);

    public.merge(protected)
}
