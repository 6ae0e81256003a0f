use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use milan_shared::middleware::{detached_metrics_handle, jwt_secret};
use milan_shared::types::auth::{Claims, UserRole};

use crate::config::AppConfig;
use crate::events::EventBus;
use crate::models::{MembershipType, Profile, User};
use crate::repository::{MemoryStore, Store};
use crate::test_support::{membership_fixture, profile_fixture, user_fixture};
use crate::{app, AppState};

struct Harness {
    router: Router,
    store: Arc<MemoryStore>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::new());
    let state = Arc::new(AppState {
        store: store.clone(),
        config: AppConfig::default(),
        events: EventBus::disabled(),
        metrics: detached_metrics_handle(),
    });
    Harness { router: app(state), store }
}

fn token(user_id: Uuid, role: UserRole) -> String {
    encode(
        &Header::default(),
        &Claims::new(user_id, role, 600),
        &EncodingKey::from_secret(jwt_secret().as_bytes()),
    )
    .unwrap()
}

impl Harness {
    async fn call(&self, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, value)
    }

    /// A member with one profile, plus a token for them.
    fn member(&self, email: &str) -> (User, Profile, String) {
        let user = self.store.users().add(&user_fixture(email)).unwrap();
        let profile = self.store.profiles().add(&profile_fixture(user.id)).unwrap();
        let token = token(user.id, UserRole::Member);
        (user, profile, token)
    }
}

#[tokio::test]
async fn health_reports_store_check() {
    let h = harness();
    let (status, body) = h.call(Method::GET, "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["checks"][0]["name"], "store");
}

#[tokio::test]
async fn metrics_endpoint_is_served() {
    let h = harness();
    let (status, _) = h.call(Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let h = harness();
    let (status, body) = h.call(Method::GET, "/profiles", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"]["code"], "E0004");
}

#[tokio::test]
async fn register_then_create_and_fetch_profile() {
    let h = harness();
    let (status, body) = h
        .call(
            Method::POST,
            "/users",
            None,
            Some(json!({ "email": "Priya@Example.com", "full_name": "Priya Shah", "phone": null })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["email"], "priya@example.com");

    let user_id: Uuid = serde_json::from_value(body["data"]["id"].clone()).unwrap();
    let token = token(user_id, UserRole::Member);

    let (status, body) = h
        .call(
            Method::POST,
            "/profiles",
            Some(&token),
            Some(json!({
                "user_id": user_id,
                "first_name": "Priya",
                "last_name": "Shah",
                "date_of_birth": "1996-08-21",
                "gender": "female",
                "marital_status": "never_married",
                "mother_tongue": "gujarati",
                "religion": null,
                "ethnicity": null,
                "education": null,
                "occupation": "architect",
                "height_cm": 160,
                "weight_kg": null,
                "bio": null
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let profile_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = h.call(Method::GET, &format!("/profiles/{profile_id}"), Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["occupation"], "architect");
    assert_eq!(body["data"]["date_of_birth"], "1996-08-21");
}

#[tokio::test]
async fn duplicate_email_is_a_conflict() {
    let h = harness();
    let body = json!({ "email": "dup@example.com", "full_name": "Dup", "phone": null });

    h.call(Method::POST, "/users", None, Some(body.clone())).await;
    let (status, body) = h.call(Method::POST, "/users", None, Some(body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "E1002");
}

#[tokio::test]
async fn only_the_manager_may_edit_a_profile() {
    let h = harness();
    let (_, profile, _) = h.member("owner@example.com");
    let (_, _, stranger) = h.member("stranger@example.com");

    let (status, body) = h
        .call(Method::DELETE, &format!("/profiles/{}", profile.id), Some(&stranger), None)
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E1004");
    assert!(h.store.profiles().get_by_id(profile.id).unwrap().is_some());
}

#[tokio::test]
async fn match_request_round_trip() {
    let h = harness();
    let (_, a, token_a) = h.member("a@example.com");
    let (_, b, token_b) = h.member("b@example.com");
    let send = json!({ "sent_profile_id": a.id, "received_profile_id": b.id });

    let (status, body) = h.call(Method::POST, "/match-requests", Some(&token_a), Some(send.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let request_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = h.call(Method::POST, "/match-requests", Some(&token_a), Some(send)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "E2002");

    // The sender answering its own request is a validation failure.
    let (status, _) = h
        .call(
            Method::PUT,
            &format!("/match-requests/{request_id}/approve"),
            Some(&token_a),
            Some(json!({ "profile_id": a.id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = h
        .call(
            Method::PUT,
            &format!("/match-requests/{request_id}/approve"),
            Some(&token_b),
            Some(json!({ "profile_id": b.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["receiver_like"], true);

    let (status, body) = h
        .call(Method::GET, &format!("/profiles/{}/match-requests/accepted", a.id), Some(&token_a), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["received_profile_id"], b.id.to_string());
}

#[tokio::test]
async fn answering_a_missing_request_is_not_found() {
    let h = harness();
    let (_, _, token_a) = h.member("a@example.com");
    let (_, b, _) = h.member("b@example.com");

    let (status, body) = h
        .call(
            Method::PUT,
            &format!("/match-requests/{}/approve", Uuid::now_v7()),
            Some(&token_a),
            Some(json!({ "profile_id": b.id })),
        )
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "E2001");
}

#[tokio::test]
async fn huge_page_number_returns_an_empty_page() {
    let h = harness();
    let (_, _, token) = h.member("a@example.com");

    let (status, body) = h
        .call(Method::GET, &format!("/profiles?page={}", u64::MAX), Some(&token), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 1);
    assert!(body["data"]["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn self_match_request_is_bad_request() {
    let h = harness();
    let (_, a, token_a) = h.member("a@example.com");

    let (status, body) = h
        .call(
            Method::POST,
            "/match-requests",
            Some(&token_a),
            Some(json!({ "sent_profile_id": a.id, "received_profile_id": a.id })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "E2003");
}

#[tokio::test]
async fn view_history_is_gated_on_membership() {
    let h = harness();
    let (_, me, token_me) = h.member("me@example.com");
    let (_, viewer, token_viewer) = h.member("viewer@example.com");

    let (status, _) = h
        .call(
            Method::POST,
            &format!("/profiles/{}/views", me.id),
            Some(&token_viewer),
            Some(json!({ "viewer_profile_id": viewer.id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let uri = format!("/profiles/{}/views", me.id);
    let (status, body) = h.call(Method::GET, &uri, Some(&token_me), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E3003");

    h.store
        .memberships()
        .add(&membership_fixture(me.id, MembershipType::Premium, Utc::now() + Duration::days(30)))
        .unwrap();

    let (status, body) = h.call(Method::GET, &uri, Some(&token_me), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["viewer_profile_id"], viewer.id.to_string());
}

#[tokio::test]
async fn membership_writes_are_admin_only() {
    let h = harness();
    let (_, profile, member_token) = h.member("member@example.com");
    let admin_token = token(Uuid::now_v7(), UserRole::Admin);
    let now = Utc::now();
    let body = json!({
        "profile_id": profile.id,
        "membership_type": "PremiumUser",
        "starts_at": now - Duration::days(40),
        "ends_at": now - Duration::days(1),
    });

    let (status, _) = h.call(Method::POST, "/memberships", Some(&member_token), Some(body.clone())).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = h.call(Method::POST, "/memberships", Some(&admin_token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED);
    let membership_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = h
        .call(Method::POST, &format!("/memberships/{membership_id}/validate"), Some(&admin_token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["change"], "downgraded");
    assert_eq!(body["data"]["membership"]["membership_type"], "FreeUser");
}

#[tokio::test]
async fn chat_flow_marks_messages_read() {
    let h = harness();
    let (_, a, token_a) = h.member("a@example.com");
    let (_, b, token_b) = h.member("b@example.com");

    for content in ["hello", "how are you?"] {
        let (status, _) = h
            .call(
                Method::POST,
                "/messages",
                Some(&token_b),
                Some(json!({ "sender_profile_id": b.id, "receiver_profile_id": a.id, "content": content })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = h.call(Method::GET, &format!("/profiles/{}/chats", a.id), Some(&token_a), None).await;
    assert_eq!(body["data"][0]["unread_count"], 2);
    assert_eq!(body["data"][0]["last_message"]["content"], "how are you?");

    let (status, body) = h
        .call(Method::PUT, &format!("/profiles/{}/chats/{}/read", a.id, b.id), Some(&token_a), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["affected"], 2);
}

#[tokio::test]
async fn reports_are_reviewed_by_staff() {
    let h = harness();
    let (_, a, token_a) = h.member("a@example.com");
    let (_, b, _) = h.member("b@example.com");

    let (status, body) = h
        .call(
            Method::POST,
            "/reports",
            Some(&token_a),
            Some(json!({ "reporter_profile_id": a.id, "reported_profile_id": b.id, "reason": "spam", "details": null })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let report_id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, _) = h.call(Method::GET, "/reports", Some(&token_a), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A staff-role token without a staff record cannot review.
    let staff_user = h.store.users().add(&user_fixture("mod@example.com")).unwrap();
    let staff_token = token(staff_user.id, UserRole::Staff);
    let review_uri = format!("/reports/{report_id}/review");
    let (status, body) = h.call(Method::PUT, &review_uri, Some(&staff_token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], "E6006");

    let admin_token = token(Uuid::now_v7(), UserRole::Admin);
    let (status, _) = h
        .call(
            Method::POST,
            "/staff",
            Some(&admin_token),
            Some(json!({
                "user_id": staff_user.id,
                "full_name": "Moderator",
                "email": "mod@example.com",
                "role": "moderator"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = h.call(Method::PUT, &review_uri, Some(&staff_token), Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "reviewed");

    let (status, body) = h.call(Method::GET, "/reports?status=pending", Some(&staff_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total"], 0);
}
