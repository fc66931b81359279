use async_trait::async_trait;

use crate::domain::access::models::Identity;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::StoredCredential;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;

/// Port for user domain service operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account and issue its first token.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, profile and password
    ///
    /// # Returns
    /// Session for the new account
    ///
    /// # Errors
    /// * `PasswordTooLong` - Password exceeds the hasher's input limit
    /// * `AlreadyExists` - Username or email is already registered
    /// * `Credential` - Hashing or token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn signup(&self, command: SignupCommand) -> Result<AuthSession, UserError>;

    /// Exchange email and password for a token.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown email or wrong password (indistinguishable)
    /// * `Credential` - Stored hash unreadable or token signing failed
    /// * `DatabaseError` - Database operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError>;

    /// Retrieve the account of the authenticated identity.
    ///
    /// # Errors
    /// * `NotFound` - The account no longer exists
    /// * `DatabaseError` - Database operation failed
    async fn get_user(&self, identity: &Identity) -> Result<User, UserError>;
}

/// Persistence operations for accounts and their credentials.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new account with its credential hash.
    ///
    /// # Returns
    /// Identifier assigned by the store
    ///
    /// # Errors
    /// * `AlreadyExists` - Unique constraint on username or email violated
    /// * `DatabaseError` - Database operation failed
    async fn create_credentialed_identity(&self, user: NewUser) -> Result<UserId, UserError>;

    /// Look up the credential registered for an email address.
    ///
    /// # Returns
    /// `None` when no account uses this email
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_credential_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, UserError>;

    /// Retrieve an account by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
}
