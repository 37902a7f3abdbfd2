use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::account::errors::UserError;
use crate::account::models::EmailAddress;
use crate::account::models::SecurityStamp;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::Username;
use crate::account::ports::CredentialStore;

const USERNAME_UNIQUE_CONSTRAINT: &str = "users_normalized_username_key";

/// PostgreSQL-backed credential store.
///
/// Username uniqueness is enforced by a unique constraint on
/// `normalized_username`, so concurrent inserts race inside the database.
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    security_stamp: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(row.id),
            username: Username::new(row.username)?,
            email: EmailAddress::new(row.email)?,
            password_hash: row.password_hash,
            security_stamp: SecurityStamp::from_string(row.security_stamp),
            created_at: row.created_at,
        })
    }
}

fn is_connectivity_error(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed
    )
}

fn map_create_error(e: sqlx::Error, username: &Username) -> UserError {
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() && db_err.constraint() == Some(USERNAME_UNIQUE_CONSTRAINT)
        {
            return UserError::UsernameAlreadyExists(username.to_string());
        }
    }

    if is_connectivity_error(&e) {
        UserError::StorageUnavailable(e.to_string())
    } else {
        UserError::CreationFailed(e.to_string())
    }
}

#[async_trait]
impl CredentialStore for PostgresCredentialStore {
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            SELECT id, username, email, password_hash, security_stamp, created_at
            FROM users
            WHERE normalized_username = $1
            "#,
        )
        .bind(username.normalized())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| UserError::StorageUnavailable(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users (id, username, normalized_username, email, password_hash, security_stamp, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.username.normalized())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.security_stamp.as_str())
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| map_create_error(e, &user.username))?;

        Ok(user)
    }
}
