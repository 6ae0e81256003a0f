use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::middleware::AdminUser;
use milan_shared::types::ApiResponse;
use milan_shared::AppResult;

use crate::models::{Staff, StaffInput};
use crate::services::staff_service;
use crate::AppState;

pub async fn create_staff(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(input): Json<StaffInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Staff>>)> {
    let staff = staff_service::add(state.store.as_ref(), input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(staff))))
}

pub async fn list_staff(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<Vec<Staff>>>> {
    let staff = staff_service::list(state.store.as_ref())?;
    Ok(Json(ApiResponse::ok(staff)))
}

pub async fn get_staff(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Staff>>> {
    let staff = staff_service::get(state.store.as_ref(), staff_id)?;
    Ok(Json(ApiResponse::ok(staff)))
}

pub async fn update_staff(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(staff_id): Path<Uuid>,
    Json(input): Json<StaffInput>,
) -> AppResult<Json<ApiResponse<Staff>>> {
    let staff = staff_service::update(state.store.as_ref(), staff_id, input)?;
    Ok(Json(ApiResponse::ok(staff)))
}

pub async fn delete_staff(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(staff_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    staff_service::delete(state.store.as_ref(), staff_id)?;
    Ok(Json(ApiResponse::ok("staff member removed")))
}
