use axum::{Json, Router, extract::State, routing::{get, post}};

use crate::{
    auth::CurrentUser,
    dto::users::{LogoutResponse, MeResponse},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/auth/me",
    tag = "auth",
    responses(
        (status = 200, description = "Caller identity and permissions", body = MeResponse),
        (status = 401, description = "No resolvable session")
    )
)]
/// Resolve the caller's identity, primary role, and permission set.
pub async fn me(CurrentUser(session): CurrentUser) -> Json<MeResponse> {
    Json(session.into())
}

#[utoipa::path(
    post,
    path = "/auth/logout",
    tag = "auth",
    responses(
        (status = 200, description = "Session revoked", body = LogoutResponse),
        (status = 401, description = "No resolvable session")
    )
)]
/// Revoke the presented session.
pub async fn logout(
    State(state): State<SharedState>,
    CurrentUser(session): CurrentUser,
) -> Json<LogoutResponse> {
    let revoked = state.sessions().revoke(&session.token);
    Json(LogoutResponse { revoked })
}

/// Configure the auth routes subtree.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new()
        .route("/auth/me", get(me))
        .route("/auth/logout", post(logout))
}
