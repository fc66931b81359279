use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use super::ApiSuccess;
use super::AuthSessionData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<ApiSuccess<AuthSessionData>, ApiError> {
    // A malformed email cannot match an account; answer like any other miss
    let email =
        EmailAddress::new(body.email).map_err(|_| ApiError::from(UserError::InvalidCredentials))?;

    state
        .user_service
        .login(LoginCommand::new(email, body.password))
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::OK, session.into()))
}

#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequest {
    email: String,
    password: String,
}
