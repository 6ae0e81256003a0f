use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::types::pagination::{Paginated, PaginationParams};
use milan_shared::types::ApiResponse;
use milan_shared::{AppError, AppResult, ErrorCode};

use super::ensure_manager;
use crate::events::publisher;
use crate::models::{Address, Membership, Preference, Profile, ProfileInput};
use crate::services::{address_service, membership_service, preference_service, profile_service};
use crate::AppState;

// --- GET /profiles ---

pub async fn list_profiles(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Query(params): Query<PaginationParams>,
) -> AppResult<Json<ApiResponse<Paginated<Profile>>>> {
    let page = profile_service::list(state.store.as_ref(), &params)?;
    Ok(Json(ApiResponse::ok(page)))
}

// --- POST /profiles ---

pub async fn create_profile(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<ProfileInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Profile>>)> {
    if input.user_id != auth.id && !auth.is_staff() {
        return Err(AppError::new(
            ErrorCode::NotProfileManager,
            "profiles can only be created for your own account",
        ));
    }

    let profile = profile_service::add(state.store.as_ref(), input)?;
    publisher::publish_profile_created(&state.events, &profile).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(profile))))
}

// --- GET /profiles/:id ---

pub async fn get_profile(
    _auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let profile = profile_service::get(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(profile)))
}

// --- PUT /profiles/:id ---

pub async fn update_profile(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
    Json(input): Json<ProfileInput>,
) -> AppResult<Json<ApiResponse<Profile>>> {
    let existing = profile_service::ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    if input.user_id != existing.user_id && !auth.is_staff() {
        return Err(AppError::new(
            ErrorCode::NotProfileManager,
            "only staff can hand a profile to another user",
        ));
    }

    let profile = profile_service::update(state.store.as_ref(), profile_id, input)?;
    Ok(Json(ApiResponse::ok(profile)))
}

// --- DELETE /profiles/:id ---

pub async fn delete_profile(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    profile_service::delete(state.store.as_ref(), profile_id)?;
    publisher::publish_profile_deleted(&state.events, profile_id, auth.id).await;

    Ok(Json(ApiResponse::ok("profile deleted")))
}

// --- GET /profiles/:id/matches ---

pub async fn get_matches(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Vec<Profile>>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let matches = profile_service::get_matches(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(matches)))
}

// --- GET /profiles/:id/membership ---

pub async fn get_profile_membership(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Membership>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let membership = membership_service::get_by_profile_id(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(membership)))
}

// --- GET /profiles/:id/preference ---

pub async fn get_profile_preference(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Preference>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let preference = preference_service::get_by_profile_id(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(preference)))
}

// --- GET /profiles/:id/address ---

pub async fn get_profile_address(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(profile_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Address>>> {
    ensure_manager(state.store.as_ref(), &auth, profile_id)?;
    let address = address_service::get_by_profile_id(state.store.as_ref(), profile_id)?;
    Ok(Json(ApiResponse::ok(address)))
}
