use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::types::ApiResponse;
use milan_shared::AppResult;

use super::ensure_manager;
use crate::models::{Preference, PreferenceInput};
use crate::services::preference_service;
use crate::AppState;

pub async fn create_preference(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<PreferenceInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Preference>>)> {
    ensure_manager(state.store.as_ref(), &auth, input.profile_id)?;
    let preference = preference_service::add(state.store.as_ref(), input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(preference))))
}

pub async fn get_preference(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(preference_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Preference>>> {
    let preference = preference_service::get(state.store.as_ref(), preference_id)?;
    ensure_manager(state.store.as_ref(), &auth, preference.profile_id)?;
    Ok(Json(ApiResponse::ok(preference)))
}

pub async fn update_preference(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(preference_id): Path<Uuid>,
    Json(input): Json<PreferenceInput>,
) -> AppResult<Json<ApiResponse<Preference>>> {
    let existing = preference_service::get(state.store.as_ref(), preference_id)?;
    ensure_manager(state.store.as_ref(), &auth, existing.profile_id)?;
    if input.profile_id != existing.profile_id {
        ensure_manager(state.store.as_ref(), &auth, input.profile_id)?;
    }

    let preference = preference_service::update(state.store.as_ref(), preference_id, input)?;
    Ok(Json(ApiResponse::ok(preference)))
}

pub async fn delete_preference(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(preference_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    let preference = preference_service::get(state.store.as_ref(), preference_id)?;
    ensure_manager(state.store.as_ref(), &auth, preference.profile_id)?;
    preference_service::delete(state.store.as_ref(), preference_id)?;
    Ok(Json(ApiResponse::ok("preference deleted")))
}
