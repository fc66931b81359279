use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::User;
use crate::inbound::http::middleware::AuthenticatedUser;
use crate::inbound::http::router::AppState;

pub async fn get_current_user(
    State(state): State<AppState>,
    AuthenticatedUser(identity): AuthenticatedUser,
) -> Result<ApiSuccess<GetCurrentUserResponseData>, ApiError> {
    state
        .user_service
        .get_user(&identity)
        .await
        .map_err(ApiError::from)
        .map(|ref user| ApiSuccess::new(StatusCode::OK, user.into()))
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GetCurrentUserResponseData {
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl From<&User> for GetCurrentUserResponseData {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id.as_i64(),
            username: user.username.as_str().to_string(),
            email: user.email.as_str().to_string(),
            first_name: user.profile.first_name.clone(),
            last_name: user.profile.last_name.clone(),
            phone_number: user.profile.phone_number.clone(),
        }
    }
}
