use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::types::ApiResponse;
use milan_shared::{AppError, AppResult, ErrorCode};

use super::{ensure_manager, ensure_party};
use crate::events::publisher;
use crate::models::MatchRequest;
use crate::services::match_request_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct SendMatchRequest {
    pub sent_profile_id: Uuid,
    pub received_profile_id: Uuid,
}

/// Body of approve / reject: the profile answering.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    pub profile_id: Uuid,
}

// --- POST /match-requests ---

pub async fn send_match_request(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(req): Json<SendMatchRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<MatchRequest>>)> {
    // Self-requests are refused before any ownership lookup.
    if req.sent_profile_id != req.received_profile_id {
        ensure_manager(state.store.as_ref(), &auth, req.sent_profile_id)?;
    }

    let request = match_request_service::send(state.store.as_ref(), req.sent_profile_id, req.received_profile_id)?;
    publisher::publish_match_request_sent(&state.events, &request, auth.id).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(request))))
}

// --- GET /match-requests/:id ---

pub async fn get_match_request(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MatchRequest>>> {
    let request = match_request_service::get(state.store.as_ref(), request_id)?;
    ensure_party(state.store.as_ref(), &auth, request.sent_profile_id, request.received_profile_id)?;
    Ok(Json(ApiResponse::ok(request)))
}

// --- DELETE /match-requests/:id ---

pub async fn delete_match_request(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    let request = match_request_service::get(state.store.as_ref(), request_id)?;
    ensure_manager(state.store.as_ref(), &auth, request.sent_profile_id)?;
    match_request_service::delete(state.store.as_ref(), request_id)?;
    Ok(Json(ApiResponse::ok("match request deleted")))
}

// --- PUT /match-requests/:id/approve ---

pub async fn approve_match_request(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> AppResult<Json<ApiResponse<MatchRequest>>> {
    answer(&state, &auth, request_id, req.profile_id, true).await
}

// --- PUT /match-requests/:id/reject ---

pub async fn reject_match_request(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(request_id): Path<Uuid>,
    Json(req): Json<AnswerRequest>,
) -> AppResult<Json<ApiResponse<MatchRequest>>> {
    answer(&state, &auth, request_id, req.profile_id, false).await
}

async fn answer(
    state: &AppState,
    auth: &AuthUser,
    request_id: Uuid,
    profile_id: Uuid,
    like: bool,
) -> AppResult<Json<ApiResponse<MatchRequest>>> {
    let store = state.store.as_ref();
    match_request_service::get(store, request_id)?;
    // An unknown answering profile is a wrong recipient, not a missing resource.
    if let Some(profile) = store.profiles().get_by_id(profile_id)? {
        if profile.user_id != auth.id && !auth.is_staff() {
            return Err(AppError::new(ErrorCode::NotProfileManager, "you do not manage this profile"));
        }
    }

    let request = if like {
        match_request_service::approve(store, request_id, profile_id)?
    } else {
        match_request_service::reject(store, request_id, profile_id)?
    };
    publisher::publish_match_request_answered(&state.events, &request, auth.id).await;

    Ok(Json(ApiResponse::ok(request)))
}

// --- GET /profiles/:id/match-requests ---

pub async fn list_received(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<MatchRequest>>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let requests = match_request_service::received(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(requests)))
}

// --- GET /profiles/:id/match-requests/sent ---

pub async fn list_sent(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<MatchRequest>>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let requests = match_request_service::sent(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(requests)))
}

// --- GET /profiles/:id/match-requests/accepted ---

pub async fn list_accepted(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<MatchRequest>>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let requests = match_request_service::accepted(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(requests)))
}
