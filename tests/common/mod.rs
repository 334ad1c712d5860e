use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use http_body_util::BodyExt;
use pitchconnect_back::{
    auth::RoleTag,
    config::AppConfig,
    dao::{MemoryStore, models::UserRecord},
    routes,
    state::{AppState, SharedState},
};
use tower::ServiceExt;
use uuid::Uuid;

/// Build an application against a fresh in-memory store.
pub fn setup_app() -> (SharedState, Router<()>) {
    let state = AppState::new(AppConfig::default(), Arc::new(MemoryStore::new()));
    let app = routes::router(state.clone());
    (state, app)
}

/// Create a user with the given roles and return its id plus a session token.
pub async fn create_test_user(
    state: &SharedState,
    email: &str,
    roles: &[RoleTag],
    super_admin: bool,
) -> (Uuid, String) {
    let user = UserRecord {
        id: Uuid::new_v4(),
        email: email.to_string(),
        display_name: format!("Test {email}"),
        roles: roles.to_vec(),
        is_super_admin: super_admin,
        club_id: None,
        team_id: None,
    };
    state
        .store()
        .save_user(user.clone())
        .await
        .expect("save test user");

    let session = state.sessions().issue(&user);
    (user.id, session.token)
}

/// Fire one request at the router and decode the JSON response body.
///
/// Returns `Value::Null` for empty bodies (204s and friends).
pub async fn request(
    app: &Router<()>,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }

    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .expect("build request"),
        None => builder.body(Body::empty()).expect("build request"),
    };

    let response = app.clone().oneshot(request).await.expect("send request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read body")
        .to_bytes();

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::String(
            String::from_utf8_lossy(&bytes).into_owned(),
        ))
    };

    (status, json)
}
