use async_trait::async_trait;

use crate::account::errors::UserError;
use crate::account::models::AccessToken;
use crate::account::models::LoginCommand;
use crate::account::models::RegisterCommand;
use crate::account::models::User;
use crate::account::models::Username;

/// Port for register and login operations.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// Does not log the user in.
    ///
    /// # Arguments
    /// * `command` - Validated username, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken (case-insensitive)
    /// * `CreationFailed` - Store rejected the record for another reason
    /// * `StorageUnavailable` - Store could not be reached
    /// * `Hashing` - Password hashing failed
    async fn register(&self, command: RegisterCommand) -> Result<User, UserError>;

    /// Verify credentials and issue a bearer token.
    ///
    /// # Arguments
    /// * `command` - Username and password as presented
    ///
    /// # Returns
    /// Signed token and its expiry
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user or wrong password, indistinguishably
    /// * `StorageUnavailable` - Store could not be reached
    /// * `TokenIssuance` - Token could not be signed
    async fn login(&self, command: LoginCommand) -> Result<AccessToken, UserError>;
}

/// Persistence operations for user records.
///
/// Implementations enforce username uniqueness themselves; a concurrent
/// `create` for the same normalized username must lose with
/// `UsernameAlreadyExists`.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Retrieve user by username, ignoring case.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StorageUnavailable` - Store could not be reached
    async fn find_by_username(&self, username: &Username) -> Result<Option<User>, UserError>;

    /// Persist new user to storage.
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `UsernameAlreadyExists` - Username is already taken
    /// * `CreationFailed` - Record was rejected for another reason
    /// * `StorageUnavailable` - Store could not be reached
    async fn create(&self, user: User) -> Result<User, UserError>;
}

/// One-way password transform.
///
/// Calls are CPU-bound and slow by construction; the service runs them on
/// the blocking thread pool.
pub trait PasswordHashing: Send + Sync + 'static {
    /// Produce a salted verifier for `password`.
    fn hash(&self, password: &str) -> Result<String, UserError>;

    /// Check `password` against a stored verifier. Malformed verifiers never match.
    fn verify(&self, password: &str, verifier: &str) -> bool;
}
