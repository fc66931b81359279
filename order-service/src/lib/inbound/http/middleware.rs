use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::HeaderMap;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use thiserror::Error;

use super::handlers::ApiError;
use crate::domain::access::models::Identity;
use crate::domain::user::models::UserId;
use crate::inbound::http::router::AppState;

const BEARER_SCHEME: &str = "Bearer";

/// Rejections produced while establishing the caller's identity.
///
/// Every token failure (bad header shape, signature, algorithm, expiry,
/// claims) collapses into `InvalidToken`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("user not logged in")]
    Unauthenticated,

    #[error("invalid token")]
    InvalidToken,
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        ApiError::Unauthorized(err.to_string())
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::from(self).into_response()
    }
}

/// Identity of the caller, available to handlers behind
/// [`require_authentication`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .copied()
            .map(AuthenticatedUser)
            .ok_or(AuthError::Unauthenticated)
    }
}

/// Middleware that verifies the bearer token and attaches the caller's
/// [`Identity`] to the request extensions.
pub async fn require_authentication(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(req.headers())?;

    let claims = state.authenticator.validate_token(token).map_err(|e| {
        tracing::warn!(error = %e, "Token verification failed");
        AuthError::InvalidToken
    })?;

    let user_id = UserId::new(claims.user_id).map_err(|e| {
        tracing::warn!(error = %e, "Token names an invalid user");
        AuthError::InvalidToken
    })?;

    req.extensions_mut().insert(Identity::new(user_id));

    Ok(next.run(req).await)
}

/// Extract the token from `Authorization: Bearer <token>`.
///
/// The value must split on single spaces into exactly two parts, the first
/// being the case-sensitive scheme `Bearer`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = match headers.get(AUTHORIZATION) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthError::Unauthenticated),
    };

    let value = value.to_str().map_err(|_| AuthError::InvalidToken)?;

    let mut parts = value.split(' ');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(BEARER_SCHEME), Some(token), None) if !token.is_empty() => Ok(token),
        _ => Err(AuthError::InvalidToken),
    }
}
