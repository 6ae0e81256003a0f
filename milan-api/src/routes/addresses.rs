use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::types::auth::AuthUser;
use milan_shared::types::ApiResponse;
use milan_shared::AppResult;

use super::ensure_manager;
use crate::models::{Address, AddressInput};
use crate::services::address_service;
use crate::AppState;

pub async fn create_address(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<AddressInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Address>>)> {
    ensure_manager(state.store.as_ref(), &auth, input.profile_id)?;
    let address = address_service::add(state.store.as_ref(), input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(address))))
}

pub async fn get_address(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(address_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Address>>> {
    let address = address_service::get(state.store.as_ref(), address_id)?;
    ensure_manager(state.store.as_ref(), &auth, address.profile_id)?;
    Ok(Json(ApiResponse::ok(address)))
}

pub async fn update_address(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(address_id): Path<Uuid>,
    Json(input): Json<AddressInput>,
) -> AppResult<Json<ApiResponse<Address>>> {
    let existing = address_service::get(state.store.as_ref(), address_id)?;
    ensure_manager(state.store.as_ref(), &auth, existing.profile_id)?;
    if input.profile_id != existing.profile_id {
        ensure_manager(state.store.as_ref(), &auth, input.profile_id)?;
    }

    let address = address_service::update(state.store.as_ref(), address_id, input)?;
    Ok(Json(ApiResponse::ok(address)))
}

pub async fn delete_address(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(address_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    let address = address_service::get(state.store.as_ref(), address_id)?;
    ensure_manager(state.store.as_ref(), &auth, address.profile_id)?;
    address_service::delete(state.store.as_ref(), address_id)?;
    Ok(Json(ApiResponse::ok("address deleted")))
}
