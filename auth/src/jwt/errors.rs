use jsonwebtoken::errors::ErrorKind;
use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Signing secret is not configured")]
    MissingSecret,

    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token algorithm is not accepted")]
    InvalidAlgorithm,

    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token claims are invalid: {0}")]
    InvalidClaims(String),
}

impl From<jsonwebtoken::errors::Error> for JwtError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => JwtError::TokenExpired,
            ErrorKind::InvalidSignature => JwtError::InvalidSignature,
            ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::MissingAlgorithm => JwtError::InvalidAlgorithm,
            ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                JwtError::InvalidClaims(err.to_string())
            }
            _ => JwtError::Malformed(err.to_string()),
        }
    }
}
