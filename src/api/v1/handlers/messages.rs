/*
 * Responsibility
 * - /messages 系 handler (要認証)
 * - sender は常に AuthCtx の user_id (body では受けない)
 */
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};

use crate::{
    api::v1::{
        dto::messages::{ListMessagesQuery, MessageResponse, SendMessageRequest, UpdateStatusRequest},
        extractors::AuthCtxExtractor,
    },
    domain::MessageStatus,
    error::AppError,
    state::AppState,
};

pub async fn send_message(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Json(req): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<MessageResponse>), AppError> {
    if req.receiver_id.trim().is_empty() {
        return Err(AppError::bad_request(
            "INVALID_REQUEST",
            "receiver_id is required",
        ));
    }

    let message = state
        .messages
        .create_message(&ctx.user_id, &req.receiver_id, &req.content)
        .await?;

    Ok((StatusCode::CREATED, Json(message.into())))
}

pub async fn list_received(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
    Query(query): Query<ListMessagesQuery>,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let page = query
        .page()
        .map_err(|msg| AppError::bad_request("INVALID_PAGINATION", msg))?;

    let messages = state
        .messages
        .messages_by_receiver(&ctx.user_id, page.limit, page.offset)
        .await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

pub async fn list_sent(
    State(state): State<AppState>,
    AuthCtxExtractor(ctx): AuthCtxExtractor,
) -> Result<Json<Vec<MessageResponse>>, AppError> {
    let messages = state.messages.messages_by_sender(&ctx.user_id).await?;

    Ok(Json(messages.into_iter().map(Into::into).collect()))
}

pub async fn update_status(
    State(state): State<AppState>,
    AuthCtxExtractor(_ctx): AuthCtxExtractor,
    Path(message_id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> Result<StatusCode, AppError> {
    let status = req
        .status
        .parse::<MessageStatus>()
        .map_err(|e| AppError::bad_request("INVALID_STATUS", e.to_string()))?;

    state
        .messages
        .set_message_status(&message_id, status)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
