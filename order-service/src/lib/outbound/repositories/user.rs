use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::PgPool;
use sqlx::Row;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::Profile;
use crate::domain::user::models::StoredCredential;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

/// Postgres-backed account store.
///
/// Expects a `users` table with a generated `user_id` and unique `username`
/// and `email` columns; the credential hash lives in `password`.
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn database_error(e: sqlx::Error) -> UserError {
    UserError::DatabaseError(e.to_string())
}

fn stored_user_id(user_id: i64) -> Result<UserId, UserError> {
    UserId::new(user_id).map_err(|e| UserError::DatabaseError(e.to_string()))
}

/// Rows are trusted as written; signup rules apply to input only.
fn user_from_row(row: &PgRow) -> Result<User, UserError> {
    let user_id: i64 = row.try_get("user_id").map_err(database_error)?;
    let username: String = row.try_get("username").map_err(database_error)?;
    let email: String = row.try_get("email").map_err(database_error)?;
    let first_name: String = row.try_get("first_name").map_err(database_error)?;
    let last_name: String = row.try_get("last_name").map_err(database_error)?;
    let phone_number: String = row.try_get("phone_number").map_err(database_error)?;

    Ok(User {
        id: stored_user_id(user_id)?,
        username: Username::from_stored(username),
        email: EmailAddress::from_stored(email),
        profile: Profile::from_stored(first_name, last_name, phone_number),
    })
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_credentialed_identity(&self, user: NewUser) -> Result<UserId, UserError> {
        let row = sqlx::query(
            r#"
            INSERT INTO users (username, password, email, first_name, last_name, phone_number)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING user_id
            "#,
        )
        .bind(user.username.as_str())
        .bind(&user.password_hash)
        .bind(user.email.as_str())
        .bind(&user.profile.first_name)
        .bind(&user.profile.last_name)
        .bind(&user.profile.phone_number)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return UserError::AlreadyExists;
                }
            }
            database_error(e)
        })?;

        let user_id: i64 = row.try_get("user_id").map_err(database_error)?;

        stored_user_id(user_id)
    }

    async fn find_credential_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<StoredCredential>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, password
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        match row {
            Some(r) => Ok(Some(StoredCredential {
                user_id: stored_user_id(r.try_get("user_id").map_err(database_error)?)?,
                password_hash: r.try_get("password").map_err(database_error)?,
            })),
            None => Ok(None),
        }
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let row = sqlx::query(
            r#"
            SELECT user_id, username, email, first_name, last_name, phone_number
            FROM users
            WHERE user_id = $1
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&self.pool)
        .await
        .map_err(database_error)?;

        row.as_ref().map(user_from_row).transpose()
    }
}
