//! Milan matrimony API: profiles, preferences, match requests, memberships,
//! profile views, chat and reports over a pluggable store.

pub mod config;
pub mod events;
pub mod jobs;
pub mod models;
pub mod repository;
pub mod routes;
pub mod schema;
pub mod services;

#[cfg(test)]
mod test_support;

use axum::routing::{delete, get, post, put};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use milan_shared::middleware::metrics_middleware;

use config::AppConfig;
use events::EventBus;
use repository::Store;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub config: AppConfig,
    pub events: EventBus,
    pub metrics: PrometheusHandle,
}

pub fn app(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(routes::health::health_check))
        .route("/metrics", get(routes::health::metrics))
        // Users
        .route("/users", post(routes::users::create_user))
        .route(
            "/users/:id",
            get(routes::users::get_user)
                .put(routes::users::update_user)
                .delete(routes::users::delete_user),
        )
        .route("/users/:id/memberships", get(routes::users::list_user_memberships))
        // Profiles
        .route(
            "/profiles",
            get(routes::profiles::list_profiles).post(routes::profiles::create_profile),
        )
        .route(
            "/profiles/:id",
            get(routes::profiles::get_profile)
                .put(routes::profiles::update_profile)
                .delete(routes::profiles::delete_profile),
        )
        .route("/profiles/:id/matches", get(routes::profiles::get_matches))
        .route("/profiles/:id/membership", get(routes::profiles::get_profile_membership))
        .route("/profiles/:id/preference", get(routes::profiles::get_profile_preference))
        .route("/profiles/:id/address", get(routes::profiles::get_profile_address))
        .route("/profiles/:id/match-requests", get(routes::match_requests::list_received))
        .route("/profiles/:id/match-requests/sent", get(routes::match_requests::list_sent))
        .route("/profiles/:id/match-requests/accepted", get(routes::match_requests::list_accepted))
        .route(
            "/profiles/:id/views",
            get(routes::profile_views::list_views).post(routes::profile_views::record_view),
        )
        .route("/profiles/:id/chats", get(routes::messages::list_chats))
        .route("/profiles/:id/chats/:partner", get(routes::messages::get_conversation))
        .route("/profiles/:id/chats/:partner/read", put(routes::messages::mark_conversation_read))
        // Match requests
        .route("/match-requests", post(routes::match_requests::send_match_request))
        .route(
            "/match-requests/:id",
            get(routes::match_requests::get_match_request).delete(routes::match_requests::delete_match_request),
        )
        .route("/match-requests/:id/approve", put(routes::match_requests::approve_match_request))
        .route("/match-requests/:id/reject", put(routes::match_requests::reject_match_request))
        // Memberships
        .route("/memberships", post(routes::memberships::create_membership))
        .route("/memberships/validate", post(routes::memberships::validate_all_memberships))
        .route(
            "/memberships/:id",
            get(routes::memberships::get_membership)
                .put(routes::memberships::update_membership)
                .delete(routes::memberships::delete_membership),
        )
        .route("/memberships/:id/validate", post(routes::memberships::validate_membership))
        .route("/profile-views", delete(routes::profile_views::delete_old_views))
        // Preferences and addresses
        .route("/preferences", post(routes::preferences::create_preference))
        .route(
            "/preferences/:id",
            get(routes::preferences::get_preference)
                .put(routes::preferences::update_preference)
                .delete(routes::preferences::delete_preference),
        )
        .route("/addresses", post(routes::addresses::create_address))
        .route(
            "/addresses/:id",
            get(routes::addresses::get_address)
                .put(routes::addresses::update_address)
                .delete(routes::addresses::delete_address),
        )
        // Messaging
        .route("/messages", post(routes::messages::send_message))
        .route(
            "/messages/:id",
            get(routes::messages::get_message).delete(routes::messages::delete_message),
        )
        // Reports and staff
        .route(
            "/reports",
            get(routes::reports::list_reports).post(routes::reports::create_report),
        )
        .route("/reports/:id/review", put(routes::reports::review_report))
        .route(
            "/staff",
            get(routes::staff::list_staff).post(routes::staff::create_staff),
        )
        .route(
            "/staff/:id",
            get(routes::staff::get_staff)
                .put(routes::staff::update_staff)
                .delete(routes::staff::delete_staff),
        )
        .layer(axum::middleware::from_fn(metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
