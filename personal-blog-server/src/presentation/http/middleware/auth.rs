use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use tracing::debug;

use crate::presentation::AppState;
use crate::presentation::http::app_error::AppError;

/// Caller identity established by [`jwt_auth_middleware`].
#[derive(Debug, Clone)]
pub(crate) struct AuthenticatedUser {
    pub(crate) user_id: i64,
    pub(crate) username: String,
}

impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .cloned()
            .ok_or(AppError::Unauthorized)
    }
}

pub(crate) async fn jwt_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers()).ok_or_else(|| {
        debug!(path = %request.uri().path(), "missing or malformed bearer token");
        AppError::Unauthorized
    })?;

    let claims = state.jwt.verify_token(token).map_err(|err| {
        debug!(error = %err, "bearer token rejected");
        AppError::Unauthorized
    })?;

    request.extensions_mut().insert(AuthenticatedUser {
        user_id: claims.user_id,
        username: claims.username,
    });

    Ok(next.run(request).await)
}

/// Extracts `<token>` from exactly `Bearer <token>`; the scheme is case-insensitive.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let auth_header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;

    let mut parts = auth_header.split_whitespace();
    let scheme = parts.next()?;
    let token = parts.next()?;
    if parts.next().is_some() || !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    Some(token)
}
