use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use milan_shared::middleware::StaffUser;
use milan_shared::types::auth::AuthUser;
use milan_shared::types::pagination::{Paginated, PaginationParams};
use milan_shared::types::ApiResponse;
use milan_shared::AppResult;

use super::ensure_manager;
use crate::events::publisher;
use crate::models::{Report, ReportInput};
use crate::services::report_service;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct ReportFilterParams {
    #[serde(default = "default_page")]
    pub page: u64,
    #[serde(default = "default_per_page")]
    pub per_page: u64,
    pub status: Option<String>,
}

fn default_page() -> u64 { 1 }
fn default_per_page() -> u64 { 20 }

impl ReportFilterParams {
    fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page,
            per_page: self.per_page,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ReviewReportRequest {
    #[serde(default)]
    pub dismiss: bool,
}

// --- POST /reports ---

pub async fn create_report(
    auth: AuthUser,
    State(state): State<Arc<AppState>>,
    Json(input): Json<ReportInput>,
) -> AppResult<(StatusCode, Json<ApiResponse<Report>>)> {
    if input.reporter_profile_id != input.reported_profile_id {
        ensure_manager(state.store.as_ref(), &auth, input.reporter_profile_id)?;
    }

    let report = report_service::create(state.store.as_ref(), input)?;
    publisher::publish_report_created(&state.events, &report, auth.id).await;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(report))))
}

// --- GET /reports ---

pub async fn list_reports(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Query(params): Query<ReportFilterParams>,
) -> AppResult<Json<ApiResponse<Paginated<Report>>>> {
    let page = report_service::list(state.store.as_ref(), params.status.as_deref(), &params.pagination())?;
    Ok(Json(ApiResponse::ok(page)))
}

// --- PUT /reports/:id/review ---

pub async fn review_report(
    State(state): State<Arc<AppState>>,
    staff: StaffUser,
    Path(report_id): Path<Uuid>,
    Json(body): Json<ReviewReportRequest>,
) -> AppResult<Json<ApiResponse<Report>>> {
    let report = report_service::review(state.store.as_ref(), report_id, staff.0.id, body.dismiss)?;
    Ok(Json(ApiResponse::ok(report)))
}
