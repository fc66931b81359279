use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Password too long: maximum {max} bytes, got {actual}")]
    SecretTooLong { max: usize, actual: usize },

    #[error("Invalid password hashing parameters: {0}")]
    InvalidParameters(String),

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}
