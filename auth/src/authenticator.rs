use chrono::DateTime;
use chrono::Utc;

use crate::jwt::Claims;
use crate::jwt::IssuedToken;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and JWT generation.
///
/// Provides high-level authentication operations by coordinating
/// password hashing and JWT token handling. Built once at startup and shared
/// read-only between requests.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
}

/// Result of successful authentication.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
    /// Claims carried by the access token
    pub claims: Claims,
}

impl AuthenticationResult {
    /// Identifier of the authenticated user.
    pub fn user_id(&self) -> i64 {
        self.claims.user_id
    }

    /// Expiry of the access token.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.claims.expires_at()
    }
}

impl From<IssuedToken> for AuthenticationResult {
    fn from(issued: IssuedToken) -> Self {
        Self {
            access_token: issued.token,
            claims: issued.claims,
        }
    }
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator from its parts.
    ///
    /// # Arguments
    /// * `password_hasher` - Credential hasher with the configured work factor
    /// * `jwt_handler` - Token issuer/verifier holding the signing secret
    pub fn new(password_hasher: PasswordHasher, jwt_handler: JwtHandler) -> Self {
        Self {
            password_hasher,
            jwt_handler,
        }
    }

    /// Create an authenticator with default hashing parameters.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    ///
    /// # Errors
    /// * `MissingSecret` - The secret is empty
    pub fn from_secret(jwt_secret: &[u8]) -> Result<Self, JwtError> {
        Ok(Self::new(PasswordHasher::new(), JwtHandler::new(jwt_secret)?))
    }

    /// Hash a password for storage.
    ///
    /// # Arguments
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Hashed password string
    ///
    /// # Errors
    /// * `SecretTooLong` - Password exceeds the hasher's input limit
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user_id` - Identifier to embed in the token
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user_id: i64,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        let is_valid = self.password_hasher.verify(password, stored_hash)?;

        if !is_valid {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.generate_token(user_id)?)
    }

    /// Reject a login attempt for which no account exists.
    ///
    /// Performs a throwaway verification first so the failure takes as long as
    /// a wrong password would.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_dummy(password);
        AuthenticationError::InvalidCredentials
    }

    /// Generate JWT token without password verification.
    ///
    /// Used right after signup, when the credential has just been created.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn generate_token(&self, user_id: i64) -> Result<AuthenticationResult, JwtError> {
        self.jwt_handler.issue(user_id).map(AuthenticationResult::from)
    }

    /// Validate and decode JWT token.
    ///
    /// # Arguments
    /// * `token` - JWT token string
    ///
    /// # Returns
    /// Decoded claims
    ///
    /// # Errors
    /// * `JwtError` - Token validation or decoding failed
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.verify(token)
    }
}
