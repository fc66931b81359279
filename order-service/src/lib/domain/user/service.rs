use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;

use crate::domain::access::errors::AccessError;
use crate::domain::access::models::Identity;
use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::SignupCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Account persistence implementation
    /// * `authenticator` - Shared credential hasher and token issuer
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    /// Run Argon2 work on the blocking pool so slow hashes never stall the
    /// async workers.
    async fn with_credentials<T, F>(&self, work: F) -> Result<T, UserError>
    where
        F: FnOnce(&Authenticator) -> Result<T, UserError> + Send + 'static,
        T: Send + 'static,
    {
        let authenticator = Arc::clone(&self.authenticator);

        tokio::task::spawn_blocking(move || work(&authenticator))
            .await
            .map_err(|e| UserError::Unknown(format!("credential task failed: {e}")))?
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn signup(&self, command: SignupCommand) -> Result<AuthSession, UserError> {
        let password = command.password;
        let password_hash = self
            .with_credentials(move |authenticator| {
                authenticator
                    .hash_password(&password)
                    .map_err(UserError::from)
            })
            .await?;

        let user_id = self
            .repository
            .create_credentialed_identity(NewUser {
                username: command.username,
                email: command.email,
                profile: command.profile,
                password_hash,
            })
            .await?;

        tracing::info!(user_id = %user_id, "User signed up");

        let result = self.authenticator.generate_token(user_id.as_i64())?;
        AuthSession::try_from(result)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError> {
        let password = command.password;
        let credential = match self
            .repository
            .find_credential_by_email(&command.email)
            .await?
        {
            Some(credential) => credential,
            None => {
                tracing::debug!("Login attempt for unknown email");
                let rejection = self
                    .with_credentials(move |authenticator| {
                        Ok(authenticator.reject_unknown(&password))
                    })
                    .await?;
                return Err(rejection.into());
            }
        };

        let user_id = credential.user_id;
        let password_hash = credential.password_hash;
        let result = self
            .with_credentials(move |authenticator| {
                authenticator
                    .authenticate(&password, &password_hash, user_id.as_i64())
                    .map_err(UserError::from)
            })
            .await
            .inspect_err(|e| {
                tracing::debug!(user_id = %user_id, error = %e, "Login rejected");
            })?;

        tracing::info!(user_id = %user_id, "User logged in");
        AuthSession::try_from(result)
    }

    async fn get_user(&self, identity: &Identity) -> Result<User, UserError> {
        let not_found = || UserError::NotFound(identity.user_id().to_string());

        let user = self
            .repository
            .find_by_id(&identity.user_id())
            .await?
            .ok_or_else(not_found)?;

        identity.ensure_owned(user).map_err(|e| match e {
            AccessError::NotFound => not_found(),
            AccessError::Store(msg) => UserError::DatabaseError(msg),
        })
    }
}
