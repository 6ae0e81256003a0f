use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::middleware::AdminUser;
use milan_shared::types::auth::AuthUser;
use milan_shared::types::{Affected, ApiResponse};
use milan_shared::AppResult;

use super::ensure_manager;
use crate::events::publisher;
use crate::models::ProfileView;
use crate::services::profile_view_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordViewRequest {
    pub viewer_profile_id: Uuid,
}

#[derive(Debug, Deserialize)]
pub struct CleanupParams {
    pub before: DateTime<Utc>,
}

// --- POST /profiles/:id/views ---

pub async fn record_view(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(viewed_id): Path<Uuid>,
    Json(req): Json<RecordViewRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<ProfileView>>)> {
    if req.viewer_profile_id != viewed_id {
        ensure_manager(state.store.as_ref(), &auth, req.viewer_profile_id)?;
    }

    let view = profile_view_service::add_view(state.store.as_ref(), req.viewer_profile_id, viewed_id)?;
    publisher::publish_profile_viewed(&state.events, &view).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(view))))
}

// --- GET /profiles/:id/views ---

pub async fn list_views(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<ProfileView>>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let views = profile_view_service::get_views_by_profile_id(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(views)))
}

// --- DELETE /profile-views?before= ---

pub async fn delete_old_views(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Query(params): Query<CleanupParams>,
) -> AppResult<Json<ApiResponse<Affected>>> {
    let deleted = profile_view_service::delete_old_views(state.store.as_ref(), params.before)?;
    Ok(Json(ApiResponse::ok(Affected::new(deleted))))
}
