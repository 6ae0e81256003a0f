use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::types::{Affected, ApiResponse};
use milan_shared::AppResult;

use super::{ensure_manager, ensure_party};
use crate::events::publisher;
use crate::models::{Chat, Message, MessageInput};
use crate::services::message_service;
use crate::AppState;

// --- POST /messages ---

pub async fn send_message(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<MessageInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Message>>)> {
    if input.sender_profile_id != input.receiver_profile_id {
        ensure_manager(state.store.as_ref(), &auth, input.sender_profile_id)?;
    }

    let message = message_service::send(state.store.as_ref(), input)?;
    publisher::publish_message_sent(&state.events, &message, auth.id).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(message))))
}

// --- GET /messages/:id ---

pub async fn get_message(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Message>>> {
    let message = message_service::get(state.store.as_ref(), message_id)?;
    ensure_party(state.store.as_ref(), &auth, message.sender_profile_id, message.receiver_profile_id)?;
    Ok(Json(ApiResponse::ok(message)))
}

// --- DELETE /messages/:id ---

pub async fn delete_message(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(message_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    let message = message_service::get(state.store.as_ref(), message_id)?;
    ensure_manager(state.store.as_ref(), &auth, message.sender_profile_id)?;
    message_service::delete(state.store.as_ref(), message_id)?;
    Ok(Json(ApiResponse::ok("message deleted")))
}

// --- GET /profiles/:id/chats ---

pub async fn list_chats(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Chat>>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let chats = message_service::chats(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(chats)))
}

// --- GET /profiles/:id/chats/:partner ---

pub async fn get_conversation(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path((profile_id, partner_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Vec<Message>>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let messages = message_service::conversation(state.store.as_ref(), profile_id, partner_id)?;
    Ok(Json(ApiResponse::ok(messages)))
}

// --- PUT /profiles/:id/chats/:partner/read ---

pub async fn mark_conversation_read(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path((profile_id, partner_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let changed = message_service::mark_read(state.store.as_ref(), profile_id, partner_id)?;
    Ok(Json(ApiResponse::ok(Affected::new(changed))))
}
