use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Serialize;

use crate::access::errors::AccessError;
use crate::user::errors::UserError;
use crate::user::models::AuthSession;

pub mod get_current_user;
pub mod login;
pub mod signup;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

#[derive(Debug, Clone)]
pub struct ApiSuccess<T: Serialize + PartialEq>(StatusCode, Json<ApiResponseBody<T>>);

impl<T> PartialEq for ApiSuccess<T>
where
    T: Serialize + PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0 && self.1 .0 == other.1 .0
    }
}

impl<T: Serialize + PartialEq> ApiSuccess<T> {
    pub fn new(status: StatusCode, data: T) -> Self {
        ApiSuccess(status, Json(ApiResponseBody::new(status, data)))
    }
}

impl<T: Serialize + PartialEq> IntoResponse for ApiSuccess<T> {
    fn into_response(self) -> Response {
        (self.0, self.1).into_response()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// Detail is logged, never sent to the client.
    InternalServerError(String),
    UnprocessableEntity(String),
    BadRequest(String),
    NotFound(String),
    Conflict(String),
    Unauthorized(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::InternalServerError(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_ERROR_MESSAGE.to_string(),
                )
            }
            ApiError::UnprocessableEntity(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
        };

        (status, Json(ApiResponseBody::new_error(status, message))).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(_) => ApiError::NotFound(err.to_string()),
            UserError::AlreadyExists => ApiError::Conflict(err.to_string()),
            UserError::InvalidCredentials => ApiError::Unauthorized(err.to_string()),
            UserError::PasswordTooLong { .. } => ApiError::BadRequest(err.to_string()),
            UserError::InvalidUserId(_)
            | UserError::InvalidUsername(_)
            | UserError::InvalidEmail(_)
            | UserError::InvalidProfile(_) => ApiError::UnprocessableEntity(err.to_string()),
            UserError::Credential(_) | UserError::DatabaseError(_) | UserError::Unknown(_) => {
                ApiError::InternalServerError(err.to_string())
            }
        }
    }
}

impl From<AccessError> for ApiError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::NotFound => ApiError::NotFound(err.to_string()),
            AccessError::Store(_) => ApiError::InternalServerError(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiResponseBody<T: Serialize + PartialEq> {
    status_code: u16,
    data: T,
}

impl<T: Serialize + PartialEq> ApiResponseBody<T> {
    pub fn new(status_code: StatusCode, data: T) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data,
        }
    }
}

impl ApiResponseBody<ApiErrorData> {
    pub fn new_error(status_code: StatusCode, message: String) -> Self {
        Self {
            status_code: status_code.as_u16(),
            data: ApiErrorData { message },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ApiErrorData {
    pub message: String,
}

/// Token payload returned by signup and login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthSessionData {
    pub user_id: i64,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl From<&AuthSession> for AuthSessionData {
    fn from(session: &AuthSession) -> Self {
        Self {
            user_id: session.user_id.as_i64(),
            token: session.token.clone(),
            expires_at: session.expires_at,
        }
    }
}
