//! Authentication utilities library
//!
//! Provides the authentication core used by the order service:
//! - Password hashing (Argon2id) with a fixed input length limit
//! - Identity token issuance and strict verification (HMAC-signed JWT)
//! - Authentication coordination
//!
//! Services define their own identity types and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::JwtHandler;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let issued = handler.issue(42).unwrap();
//! let claims = handler.verify(&issued.token).unwrap();
//! assert_eq!(claims.user_id, 42);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::Authenticator;
//!
//! let auth = Authenticator::from_secret(b"secret_key_at_least_32_bytes_long!").unwrap();
//!
//! // Signup: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate token
//! let result = auth.authenticate("password123", &hash, 7).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&result.access_token).unwrap();
//! assert_eq!(claims.user_id, 7);
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use jwt::Claims;
pub use jwt::IssuedToken;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use password::PasswordError;
pub use password::PasswordHasher;
