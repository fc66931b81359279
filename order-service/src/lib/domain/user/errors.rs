use auth::AuthenticationError;
use auth::JwtError;
use auth::PasswordError;
use thiserror::Error;

/// Error for UserId parsing failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UserIdError {
    #[error("User ID must be positive, got {0}")]
    NotPositive(i64),
}

/// Error for Username validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UsernameError {
    #[error("Username too short: minimum {min} characters, got {actual}")]
    TooShort { min: usize, actual: usize },

    #[error("Username too long: maximum {max} characters, got {actual}")]
    TooLong { max: usize, actual: usize },

    #[error(
        "Username contains invalid characters (only alphanumeric, underscore, and hyphen allowed)"
    )]
    InvalidCharacters,
}

/// Error for EmailAddress validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EmailError {
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// Error for contact profile validation failures
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("{field} is required")]
    Missing { field: &'static str },

    #[error("{field} too long: maximum {max} characters, got {actual}")]
    TooLong {
        field: &'static str,
        max: usize,
        actual: usize,
    },
}

/// Top-level error for all user-related operations
#[derive(Debug, Clone, Error)]
pub enum UserError {
    // Value object validation errors (automatically converted via #[from])
    #[error("Invalid user ID: {0}")]
    InvalidUserId(#[from] UserIdError),

    #[error("Invalid username: {0}")]
    InvalidUsername(#[from] UsernameError),

    #[error("Invalid email: {0}")]
    InvalidEmail(#[from] EmailError),

    #[error("Invalid profile: {0}")]
    InvalidProfile(#[from] ProfileError),

    #[error("password too long: maximum {max} bytes")]
    PasswordTooLong { max: usize },

    // Domain-level errors
    #[error("user with this username or email already exists")]
    AlreadyExists,

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("invalid user or password")]
    InvalidCredentials,

    // Infrastructure errors
    #[error("Credential error: {0}")]
    Credential(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<PasswordError> for UserError {
    fn from(err: PasswordError) -> Self {
        match err {
            PasswordError::SecretTooLong { max, .. } => UserError::PasswordTooLong { max },
            PasswordError::InvalidParameters(_)
            | PasswordError::HashingFailed(_)
            | PasswordError::VerificationFailed(_) => UserError::Credential(err.to_string()),
        }
    }
}

impl From<JwtError> for UserError {
    fn from(err: JwtError) -> Self {
        UserError::Credential(err.to_string())
    }
}

impl From<AuthenticationError> for UserError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            AuthenticationError::PasswordError(e) => e.into(),
            AuthenticationError::JwtError(e) => e.into(),
        }
    }
}
