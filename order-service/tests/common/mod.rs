use std::sync::Arc;

use async_trait::async_trait;
use auth::Authenticator;
use auth::JwtHandler;
use auth::PasswordHasher;
use order_service::domain::user::models::EmailAddress;
use order_service::domain::user::models::NewUser;
use order_service::domain::user::models::Profile;
use order_service::domain::user::models::StoredCredential;
use order_service::domain::user::models::User;
use order_service::domain::user::models::UserId;
use order_service::domain::user::models::Username;
use order_service::domain::user::ports::UserRepository;
use order_service::domain::user::service::UserService;
use order_service::inbound::http::router::create_router;
use order_service::user::errors::UserError;
use tokio::sync::RwLock;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Account store kept in memory, enforcing the same uniqueness rules as the
/// `users` table.
#[derive(Default)]
pub struct InMemoryUserRepository {
    rows: RwLock<Vec<(User, String)>>,
}

impl InMemoryUserRepository {
    /// Insert a row directly, bypassing signup checks, as if written by an
    /// earlier version of the service.
    pub async fn insert_stored(
        &self,
        username: &str,
        email: &str,
        profile: Profile,
        password_hash: String,
    ) -> UserId {
        let mut rows = self.rows.write().await;
        let id = UserId::new(rows.len() as i64 + 1).expect("Ids start at 1");

        rows.push((
            User {
                id,
                username: Username::from_stored(username.to_string()),
                email: EmailAddress::from_stored(email.to_string()),
                profile,
            },
            password_hash,
        ));

        id
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_credentialed_identity(&self, user: NewUser) -> Result<UserId, UserError> {
        let mut rows = self.rows.write().await;

        let taken = rows.iter().any(|(existing, _)| {
            existing.username == user.username || existing.email == user.email
        });
        if taken {
            return Err(UserError::AlreadyExists);
        }

        let id = UserId::new(rows.len() as i64 + 1)?;
        rows.push((
            User {
                id,
                username: user.username,
                email: user.email,
                profile: user.profile,
            },
            user.password_hash,
        ));

        Ok(id)
    }

    async fn find_credential_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, UserError> {
        let rows = self.rows.read().await;

        Ok(rows
            .iter()
            .find(|(user, _)| &user.email == email)
            .map(|(user, password_hash)| StoredCredential {
                user_id: user.id,
                password_hash: password_hash.clone(),
            }))
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let rows = self.rows.read().await;

        Ok(rows
            .iter()
            .find(|(user, _)| &user.id == id)
            .map(|(user, _)| user.clone()))
    }
}

fn cheap_hasher() -> PasswordHasher {
    PasswordHasher::with_params(1024, 1, 1).expect("Invalid hashing parameters")
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
    pub password_hasher: PasswordHasher,
    pub user_repository: Arc<InMemoryUserRepository>,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator = Arc::new(Authenticator::new(
            cheap_hasher(),
            JwtHandler::new(JWT_SECRET).expect("Invalid JWT secret"),
        ));
        let user_repository = Arc::new(InMemoryUserRepository::default());
        let user_service = Arc::new(UserService::new(
            Arc::clone(&user_repository),
            Arc::clone(&authenticator),
        ));

        let router = create_router(user_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(JWT_SECRET).expect("Invalid JWT secret"),
            password_hasher: cheap_hasher(),
            user_repository,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register an account with a fixed profile
    pub async fn signup(&self, username: &str, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/signup")
            .json(&serde_json::json!({
                "username": username,
                "password": password,
                "email": email,
                "first_name": "Ada",
                "last_name": "Lovelace",
                "phone_number": "555-0100"
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, email: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }
}
