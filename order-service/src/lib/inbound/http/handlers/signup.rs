use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use super::AuthSessionData;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::Profile;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::EmailError;
use crate::user::errors::ProfileError;
use crate::user::errors::UsernameError;

pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<ApiSuccess<AuthSessionData>, ApiError> {
    state
        .user_service
        .signup(body.try_into_command()?)
        .await
        .map_err(ApiError::from)
        .map(|ref session| ApiSuccess::new(StatusCode::CREATED, session.into()))
}

/// HTTP request body for registering an account (raw JSON)
#[derive(Clone, PartialEq, Eq, Deserialize)]
pub struct SignupRequest {
    username: String,
    password: String,
    email: String,
    first_name: String,
    last_name: String,
    phone_number: String,
}

#[derive(Debug, Clone, Error)]
enum ParseSignupRequestError {
    #[error("Invalid username: {0}")]
    Username(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    Email(#[from] EmailError),

    #[error("Invalid profile: {0}")]
    Profile(#[from] ProfileError),

    #[error("password is required")]
    MissingPassword,
}

impl SignupRequest {
    fn try_into_command(self) -> Result<SignupCommand, ParseSignupRequestError> {
        let username = Username::new(self.username)?;
        let email = EmailAddress::new(self.email)?;
        let profile = Profile::new(self.first_name, self.last_name, self.phone_number)?;

        if self.password.is_empty() {
            return Err(ParseSignupRequestError::MissingPassword);
        }

        Ok(SignupCommand::new(username, email, profile, self.password))
    }
}

impl From<ParseSignupRequestError> for ApiError {
    fn from(err: ParseSignupRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> SignupRequest {
        SignupRequest {
            username: "nicola".to_string(),
            password: "pass_word!".to_string(),
            email: "nicola@example.com".to_string(),
            first_name: "Nicola".to_string(),
            last_name: "Rossi".to_string(),
            phone_number: "555-0100".to_string(),
        }
    }

    #[test]
    fn test_valid_request() {
        let command = request().try_into_command().unwrap();

        assert_eq!(command.username.as_str(), "nicola");
        assert_eq!(command.email.as_str(), "nicola@example.com");
        assert_eq!(command.profile.last_name, "Rossi");
        assert_eq!(command.password, "pass_word!");
    }

    #[test]
    fn test_empty_password_is_rejected() {
        let mut request = request();
        request.password = String::new();

        assert!(matches!(
            request.try_into_command(),
            Err(ParseSignupRequestError::MissingPassword)
        ));
    }

    #[test]
    fn test_invalid_fields_are_unprocessable() {
        let mut request = request();
        request.email = "not-an-email".to_string();

        let err = ApiError::from(request.try_into_command().unwrap_err());
        assert!(matches!(err, ApiError::UnprocessableEntity(msg) if msg.contains("email")));
    }
}
