use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};

use crate::{auth::session::AuthSession, error::AppError, state::SharedState};

/// Extractor for handlers that require an authenticated caller.
///
/// Rejects with a generic 401 when the `Authorization` header is missing,
/// malformed, or does not resolve to a live session; the response never says
/// which of those it was.
pub struct CurrentUser(pub AuthSession);

impl FromRequestParts<SharedState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        bearer_token(parts)
            .and_then(|token| state.sessions().resolve(token))
            .map(CurrentUser)
            .ok_or_else(|| AppError::Unauthorized("authentication required".into()))
    }
}

/// Extractor for handlers that render differently when authenticated but do
/// not require it.
pub struct MaybeUser(pub Option<AuthSession>);

impl FromRequestParts<SharedState> for MaybeUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &SharedState,
    ) -> Result<Self, Self::Rejection> {
        let session = bearer_token(parts).and_then(|token| state.sessions().resolve(token));
        Ok(MaybeUser(session))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
}
