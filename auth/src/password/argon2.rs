use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::Error as HashError;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

const DUMMY_PASSWORD: &str = "dummy-password-for-timing";

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id).
/// The work factor is fixed at construction; verification always uses the
/// parameters encoded in the stored hash.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    dummy_hash: Option<String>,
}

impl PasswordHasher {
    /// Maximum accepted secret length in bytes.
    ///
    /// Longer secrets are rejected rather than truncated.
    pub const MAX_SECRET_LENGTH: usize = 72;

    /// Create a new password hasher with the default Argon2id work factor
    /// (19 MiB memory, 2 iterations, 1 lane).
    ///
    /// # Returns
    /// PasswordHasher instance configured with secure defaults
    pub fn new() -> Self {
        Self::from_params(Params::default())
    }

    /// Create a password hasher with a custom work factor.
    ///
    /// # Arguments
    /// * `memory_kib` - Memory cost in KiB
    /// * `iterations` - Number of passes over memory
    /// * `parallelism` - Degree of parallelism (lanes)
    ///
    /// # Errors
    /// * `InvalidParameters` - The combination is rejected by Argon2
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        Ok(Self::from_params(params))
    }

    fn from_params(params: Params) -> Self {
        let mut hasher = Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
            dummy_hash: None,
        };
        hasher.dummy_hash = hasher.hash(DUMMY_PASSWORD).ok();
        hasher
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `SecretTooLong` - Password exceeds `MAX_SECRET_LENGTH` bytes
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let length = password.len();
        if length > Self::MAX_SECRET_LENGTH {
            return Err(PasswordError::SecretTooLong {
                max: Self::MAX_SECRET_LENGTH,
                actual: length,
            });
        }

        let salt = SaltString::generate(&mut OsRng);

        self.argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid or verification failed
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match self
            .argon2
            .verify_password(password.as_bytes(), &parsed_hash)
        {
            Ok(()) => Ok(true),
            Err(HashError::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }

    /// Spend the cost of one verification without a real credential.
    ///
    /// Used when no account matches a login attempt, so that response time does
    /// not reveal whether the account exists. Always returns false.
    pub fn verify_dummy(&self, password: &str) -> bool {
        match &self.dummy_hash {
            Some(dummy_hash) => {
                let _ = self.verify(password, dummy_hash);
            }
            None => {
                // No reference hash; a fresh hash costs the same
                let salt = SaltString::generate(&mut OsRng);
                let _ = self.argon2.hash_password(password.as_bytes(), &salt);
            }
        }
        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
