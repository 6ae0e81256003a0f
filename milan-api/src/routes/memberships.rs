use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::middleware::AdminUser;
use milan_shared::types::auth::AuthUser;
use milan_shared::types::ApiResponse;
use milan_shared::AppResult;

use super::ensure_manager;
use crate::events::publisher;
use crate::models::{Membership, MembershipInput};
use crate::services::membership_service::{self, SweepSummary, ValidatedMembership};
use crate::AppState;

// --- POST /memberships ---

pub async fn create_membership(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Json(input): Json<MembershipInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Membership>>)> {
    let membership = membership_service::add(state.store.as_ref(), input)?;
    Ok((StatusCode::CREATED, Json(ApiResponse::ok(membership))))
}

// --- GET /memberships/:id ---

pub async fn get_membership(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Membership>>> {
    let membership = membership_service::get(state.store.as_ref(), membership_id)?;
    ensure_manager(state.store.as_ref(), &auth, membership.profile_id)?;
    Ok(Json(ApiResponse::ok(membership)))
}

// --- PUT /memberships/:id ---

pub async fn update_membership(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(membership_id): Path<Uuid>,
    Json(input): Json<MembershipInput>,
) -> AppResult<Json<ApiResponse<Membership>>> {
    let membership = membership_service::update(state.store.as_ref(), membership_id, input)?;
    Ok(Json(ApiResponse::ok(membership)))
}

// --- DELETE /memberships/:id ---

pub async fn delete_membership(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<&'static str>>> {
    membership_service::delete(state.store.as_ref(), membership_id)?;
    Ok(Json(ApiResponse::ok("membership deleted")))
}

// --- POST /memberships/:id/validate ---

pub async fn validate_membership(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
    Path(membership_id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<ValidatedMembership>>> {
    let validated = membership_service::validate(state.store.as_ref(), membership_id)?;
    publisher::publish_membership_changed(&state.events, &validated).await;
    Ok(Json(ApiResponse::ok(validated)))
}

// --- POST /memberships/validate ---

pub async fn validate_all_memberships(
    State(state): State<Arc<AppState>>,
    _admin: AdminUser,
) -> AppResult<Json<ApiResponse<SweepSummary>>> {
    let summary = membership_service::validate_all(state.store.as_ref())?;
    for validated in &summary.changed {
        publisher::publish_membership_changed(&state.events, validated).await;
    }
    Ok(Json(ApiResponse::ok(summary)))
}
