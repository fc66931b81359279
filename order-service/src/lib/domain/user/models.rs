use std::fmt;
use std::str::FromStr;

use auth::AuthenticationResult;
use chrono::DateTime;
use chrono::Utc;

use crate::user::errors::EmailError;
use crate::user::errors::ProfileError;
use crate::user::errors::UserError;
use crate::user::errors::UserIdError;
use crate::user::errors::UsernameError;

/// User aggregate entity.
///
/// Represents a registered account. The credential hash is deliberately not
/// part of it; see [`StoredCredential`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: UserId,
    pub username: Username,
    pub email: EmailAddress,
    pub profile: Profile,
}

/// User unique identifier type.
///
/// Assigned by the store, always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    ///
    /// # Errors
    /// * `NotPositive` - Identifier is zero or negative
    pub fn new(id: i64) -> Result<Self, UserIdError> {
        if id > 0 {
            Ok(Self(id))
        } else {
            Err(UserIdError::NotPositive(id))
        }
    }

    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Username value type
///
/// Ensures username is 3-32 characters and contains only alphanumeric, underscore, and hyphen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Username(String);

impl Username {
    const MIN_LENGTH: usize = 3;
    const MAX_LENGTH: usize = 32;

    /// Create a new valid username.
    ///
    /// # Errors
    /// * `TooShort` - Username shorter than 3 characters
    /// * `TooLong` - Username longer than 32 characters
    /// * `InvalidCharacters` - Contains non-alphanumeric characters (except _ and -)
    pub fn new(username: String) -> Result<Self, UsernameError> {
        let username = Self::with_valid_length(username)?;
        let username = Self::with_valid_chars(username)?;
        Ok(Self(username))
    }

    fn with_valid_length(username: String) -> Result<String, UsernameError> {
        let length = username.chars().count();
        if length < Self::MIN_LENGTH {
            Err(UsernameError::TooShort {
                min: Self::MIN_LENGTH,
                actual: length,
            })
        } else if length > Self::MAX_LENGTH {
            Err(UsernameError::TooLong {
                max: Self::MAX_LENGTH,
                actual: length,
            })
        } else {
            Ok(username)
        }
    }

    fn with_valid_chars(username: String) -> Result<String, UsernameError> {
        if username
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
        {
            Ok(username)
        } else {
            Err(UsernameError::InvalidCharacters)
        }
    }

    /// Wrap a username read back from the account store.
    ///
    /// Rows predating the signup rules are accepted as they are.
    pub fn from_stored(username: String) -> Self {
        Self(username)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Email address type
///
/// Validates email format using RFC 5322 compliant parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailAddress(String);

impl EmailAddress {
    /// Create a new validated email address.
    ///
    /// # Errors
    /// * `InvalidFormat` - Email does not conform to RFC 5322
    pub fn new(email: String) -> Result<Self, EmailError> {
        email_address::EmailAddress::from_str(&email)
            .map(|_| EmailAddress(email))
            .map_err(|e| EmailError::InvalidFormat(e.to_string()))
    }

    /// Wrap an address read back from the account store.
    pub fn from_stored(email: String) -> Self {
        Self(email)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Contact details collected at signup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
}

impl Profile {
    const MAX_FIELD_LENGTH: usize = 100;

    /// Create a profile; every field is required.
    ///
    /// # Errors
    /// * `Missing` - A field is empty or whitespace
    /// * `TooLong` - A field is longer than 100 characters
    pub fn new(
        first_name: String,
        last_name: String,
        phone_number: String,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            first_name: Self::required("first_name", first_name)?,
            last_name: Self::required("last_name", last_name)?,
            phone_number: Self::required("phone_number", phone_number)?,
        })
    }

    /// Profile read back from the account store, taken as stored.
    pub fn from_stored(first_name: String, last_name: String, phone_number: String) -> Self {
        Self {
            first_name,
            last_name,
            phone_number,
        }
    }

    fn required(field: &'static str, value: String) -> Result<String, ProfileError> {
        let value = value.trim();
        let length = value.chars().count();

        if length == 0 {
            return Err(ProfileError::Missing { field });
        }
        if length > Self::MAX_FIELD_LENGTH {
            return Err(ProfileError::TooLong {
                field,
                max: Self::MAX_FIELD_LENGTH,
                actual: length,
            });
        }

        Ok(value.to_string())
    }
}

/// Credential record read back at login. Never leaves the domain layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredential {
    pub user_id: UserId,
    pub password_hash: String,
}

/// Account to persist, with its password already hashed.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: Username,
    pub email: EmailAddress,
    pub profile: Profile,
    pub password_hash: String,
}

/// Command to register a new account with domain types
#[derive(Debug)]
pub struct SignupCommand {
    pub username: Username,
    pub email: EmailAddress,
    pub profile: Profile,
    pub password: String,
}

impl SignupCommand {
    /// Construct a new signup command.
    ///
    /// # Arguments
    /// * `username` - Validated username
    /// * `email` - Validated email address
    /// * `profile` - Validated contact details
    /// * `password` - Plain text password (will be hashed by service)
    pub fn new(username: Username, email: EmailAddress, profile: Profile, password: String) -> Self {
        Self {
            username,
            email,
            profile,
            password,
        }
    }
}

/// Command to exchange credentials for a token
#[derive(Debug)]
pub struct LoginCommand {
    pub email: EmailAddress,
    pub password: String,
}

impl LoginCommand {
    pub fn new(email: EmailAddress, password: String) -> Self {
        Self { email, password }
    }
}

/// Token handed to a client after signup or login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub user_id: UserId,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl TryFrom<AuthenticationResult> for AuthSession {
    type Error = UserError;

    fn try_from(result: AuthenticationResult) -> Result<Self, Self::Error> {
        let user_id = UserId::new(result.user_id())?;
        let expires_at = result.expires_at().ok_or_else(|| {
            UserError::Unknown(format!("token expiry out of range: {}", result.claims.exp))
        })?;

        Ok(Self {
            user_id,
            token: result.access_token,
            expires_at,
        })
    }
}
