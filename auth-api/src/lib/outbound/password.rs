use auth::PasswordHasher;

use crate::account::errors::UserError;
use crate::account::ports::PasswordHashing;

/// Argon2id adapter for the password hashing port.
impl PasswordHashing for PasswordHasher {
    fn hash(&self, password: &str) -> Result<String, UserError> {
        PasswordHasher::hash(self, password).map_err(UserError::from)
    }

    fn verify(&self, password: &str, verifier: &str) -> bool {
        PasswordHasher::verify(self, password, verifier)
    }
}
