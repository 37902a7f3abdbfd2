use std::sync::Arc;

use async_trait::async_trait;
use auth::SubjectClaims;
use auth::TokenIssuer;
use chrono::Utc;

use crate::account::errors::UserError;
use crate::account::models::AccessToken;
use crate::account::models::LoginCommand;
use crate::account::models::RegisterCommand;
use crate::account::models::SecurityStamp;
use crate::account::models::User;
use crate::account::models::UserId;
use crate::account::models::Username;
use crate::account::ports::AuthServicePort;
use crate::account::ports::CredentialStore;
use crate::account::ports::PasswordHashing;

/// Hashed when the service is built to give unknown-user logins a real verification.
const DUMMY_PASSWORD: &str = "dummy-password-for-timing-equalization";

/// Domain service implementation for register and login.
///
/// Concrete implementation of AuthServicePort with dependency injection.
pub struct AuthService<CS, PH>
where
    CS: CredentialStore,
    PH: PasswordHashing,
{
    store: Arc<CS>,
    password_hasher: Arc<PH>,
    token_issuer: Arc<TokenIssuer>,
    dummy_verifier: String,
}

impl<CS, PH> AuthService<CS, PH>
where
    CS: CredentialStore,
    PH: PasswordHashing,
{
    /// Create a new auth service with injected dependencies.
    ///
    /// # Arguments
    /// * `store` - User persistence implementation
    /// * `password_hasher` - Password hashing implementation
    /// * `token_issuer` - Signs tokens for successful logins
    ///
    /// # Returns
    /// Configured auth service instance. The dummy verifier is hashed here,
    /// so the first unknown-user login costs the same as every later one.
    ///
    /// # Errors
    /// * `Hashing` - The dummy verifier could not be hashed
    pub fn new(
        store: Arc<CS>,
        password_hasher: Arc<PH>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Result<Self, UserError> {
        let dummy_verifier = password_hasher.hash(DUMMY_PASSWORD)?;

        Ok(Self {
            store,
            password_hasher,
            token_issuer,
            dummy_verifier,
        })
    }

    async fn hash_password(&self, password: String) -> Result<String, UserError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| UserError::Unknown(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, verifier: String) -> Result<bool, UserError> {
        let hasher = Arc::clone(&self.password_hasher);

        tokio::task::spawn_blocking(move || hasher.verify(&password, &verifier))
            .await
            .map_err(|e| UserError::Unknown(format!("Password verification task failed: {}", e)))
    }

    async fn find_user(&self, username: String) -> Result<Option<User>, UserError> {
        match Username::new(username) {
            Ok(username) => self.store.find_by_username(&username).await,
            // Nobody can have registered an invalid username.
            Err(_) => Ok(None),
        }
    }
}

#[async_trait]
impl<CS, PH> AuthServicePort for AuthService<CS, PH>
where
    CS: CredentialStore,
    PH: PasswordHashing,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError> {
        if self
            .store
            .find_by_username(&command.username)
            .await?
            .is_some()
        {
            tracing::info!(
                username = %command.username,
                "Registration rejected: username already exists"
            );
            return Err(UserError::UsernameAlreadyExists(
                command.username.to_string(),
            ));
        }

        let password_hash = self
            .hash_password(command.password.as_str().to_string())
            .await?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            security_stamp: SecurityStamp::generate(),
            created_at: Utc::now(),
        };

        let created_user = self.store.create(user).await?;

        tracing::info!(
            user_id = %created_user.id,
            username = %created_user.username,
            "User registered"
        );

        Ok(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError> {
        let LoginCommand { username, password } = command;

        let Some(user) = self.find_user(username).await? else {
            self.verify_password(password, self.dummy_verifier.clone())
                .await?;

            tracing::info!("Login rejected: unknown username");
            return Err(UserError::InvalidCredentials);
        };

        if !self
            .verify_password(password, user.password_hash.clone())
            .await?
        {
            tracing::info!(user_id = %user.id, "Login rejected: wrong password");
            return Err(UserError::InvalidCredentials);
        }

        let claims =
            SubjectClaims::new(user.username.as_str()).with_extra("uid", user.id.to_string());
        let issued = self.token_issuer.issue(claims, Utc::now())?;

        tracing::info!(
            user_id = %user.id,
            token_id = %issued.token_id,
            expires_at = %issued.expires_at,
            "Token issued"
        );

        Ok(AccessToken {
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }
}
