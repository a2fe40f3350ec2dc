/*
 * Responsibility
 * - POST /conversations, GET /conversations (要認証)
 * - 呼び出し元は AuthCtx から取り、participant に必ず含める
 */
use axum::{Json, extract::State, http::StatusCode};

use crate::{
    api::v1::{
        dto::conversations::{ConversationResponse, CreateConversationRequest},
        extractors::AuthCtxExtractor,
    },
    error::AppError,
    state::AppState,
};

pub async fn create_conversation(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<CreateConversationRequest>,
) -> Result<(StatusCode, Json<ConversationResponse>), AppError> {
    let participants = req.participants_with(&ctx.user_id);
    let conversation = state
        .conversations
        .create_conversation(participants)
        .await?;

    Ok((StatusCode::CREATED, Json(conversation.into())))
}

pub async fn list_conversations(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<ConversationResponse>>, AppError> {
    let conversations = state
        .conversations
        .conversations_for_user(&ctx.user_id)
        .await?;

    Ok(Json(conversations.into_iter().map(Into::into).collect()))
}
