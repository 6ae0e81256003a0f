use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::types::ApiResponse;
use milan_shared::AppResult;

use super::ensure_self_or_admin;
use crate::models::{Membership, User, UserInput};
use crate::services::{membership_service, user_service};
use crate::AppState;

// --- POST /users ---

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    Json(input): Json<UserInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<User>>)> {
    let user = user_service::add(state.store.as_ref(), input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(user))))
}

// --- GET /users/:id ---

pub async fn get_user(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<User>>> {
    ensure_self_or_admin(&auth, user_id)?;
    let user = user_service::get(state.store.as_ref(), user_id)?;
    Ok(Json(ApiResponse::ok(user)))
}

// --- PUT /users/:id ---

pub async fn update_user(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UserInput>,
) -> AppResult<Json<ApiResponse<User>>> {
    ensure_self_or_admin(&auth, user_id)?;
    let user = user_service::update(state.store.as_ref(), user_id, input)?;
    Ok(Json(ApiResponse::ok(user)))
}

// --- DELETE /users/:id ---

pub async fn delete_user(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    ensure_self_or_admin(&auth, user_id)?;
    user_service::delete(state.store.as_ref(), user_id)?;
    Ok(Json(ApiResponse::ok("user deleted")))
}

// --- GET /users/:id/memberships ---

pub async fn list_user_memberships(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Membership>>>> {
    if !auth.is_staff() {
        ensure_self_or_admin(&auth, user_id)?;
    }
    let memberships = membership_service::get_by_user_id(state.store.as_ref(), user_id)?;
    Ok(Json(ApiResponse::ok(memberships)))
}
