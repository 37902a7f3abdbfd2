//! Credential primitives
//!
//! Provides the building blocks of the credential lifecycle:
//! - Password hashing (Argon2id, salted, tunable work factor)
//! - Signed token issuance (HS256 JWT with `sub`, `jti`, `iat`, `exp`, `iss`, `aud`)
//! - Token validation (signature first, then issuer, audience and expiry)
//!
//! Services define their own ports and adapt these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_params(1024, 1, 1).unwrap();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash));
//! assert!(!hasher.verify("other_password", &hash));
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::{JwtSettings, SubjectClaims, TokenIssuer, TokenValidator};
//! use chrono::{Duration, Utc};
//!
//! let settings = JwtSettings::new(
//!     "secret_key_at_least_32_bytes_long!",
//!     "auth-api",
//!     "auth-api-clients",
//!     Duration::hours(3),
//! )
//! .unwrap();
//!
//! let issuer = TokenIssuer::new(settings.clone());
//! let validator = TokenValidator::new(&settings);
//!
//! let now = Utc::now();
//! let issued = issuer.issue(SubjectClaims::new("alice"), now).unwrap();
//! let identity = validator.validate(&issued.token, now).unwrap();
//! assert_eq!(identity.username, "alice");
//! ```

pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::Identity;
pub use jwt::IssuedToken;
pub use jwt::JwtConfigError;
pub use jwt::JwtError;
pub use jwt::JwtSettings;
pub use jwt::SubjectClaims;
pub use jwt::TokenError;
pub use jwt::TokenIssuer;
pub use jwt::TokenValidator;
pub use password::PasswordError;
pub use password::PasswordHasher;
