use std::fmt;

use chrono::Duration;

use super::errors::JwtConfigError;

/// Validated signing configuration shared by `TokenIssuer` and `TokenValidator`.
///
/// Built once at startup. Construction rejects anything that would make the
/// HS256 signature weaker than its 256-bit security level.
#[derive(Clone)]
pub struct JwtSettings {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
    lifetime: Duration,
}

impl JwtSettings {
    /// Minimum secret length for HMAC-SHA256 (256 bits).
    pub const MIN_SECRET_BYTES: usize = 32;

    /// Default token lifetime.
    pub const DEFAULT_LIFETIME_HOURS: i64 = 3;

    /// Longest accepted token lifetime (one year).
    pub const MAX_LIFETIME_HOURS: i64 = 24 * 365;

    /// Create validated settings.
    ///
    /// # Arguments
    /// * `secret` - Symmetric signing key
    /// * `issuer` - Value written to and required in the `iss` claim
    /// * `audience` - Value written to and required in the `aud` claim
    /// * `lifetime` - Time between issuance and expiry
    ///
    /// # Errors
    /// * `MissingSecret` - Secret is empty
    /// * `SecretTooShort` - Secret is shorter than 32 bytes
    /// * `MissingIssuer` / `MissingAudience` - Blank issuer or audience
    /// * `InvalidLifetime` - Lifetime is zero or negative
    /// * `LifetimeTooLong` - Lifetime exceeds `MAX_LIFETIME_HOURS`
    pub fn new(
        secret: impl Into<Vec<u8>>,
        issuer: impl Into<String>,
        audience: impl Into<String>,
        lifetime: Duration,
    ) -> Result<Self, JwtConfigError> {
        let secret = secret.into();
        let issuer = issuer.into();
        let audience = audience.into();

        if secret.is_empty() {
            return Err(JwtConfigError::MissingSecret);
        }
        if secret.len() < Self::MIN_SECRET_BYTES {
            return Err(JwtConfigError::SecretTooShort {
                min: Self::MIN_SECRET_BYTES,
                actual: secret.len(),
            });
        }
        if issuer.trim().is_empty() {
            return Err(JwtConfigError::MissingIssuer);
        }
        if audience.trim().is_empty() {
            return Err(JwtConfigError::MissingAudience);
        }
        if lifetime <= Duration::zero() {
            return Err(JwtConfigError::InvalidLifetime(lifetime.num_seconds()));
        }
        if lifetime > Duration::hours(Self::MAX_LIFETIME_HOURS) {
            return Err(JwtConfigError::LifetimeTooLong {
                max_hours: Self::MAX_LIFETIME_HOURS,
                actual_hours: lifetime.num_hours(),
            });
        }

        Ok(Self {
            secret,
            issuer,
            audience,
            lifetime,
        })
    }

    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn audience(&self) -> &str {
        &self.audience
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }
}

impl fmt::Debug for JwtSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtSettings")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("lifetime", &self.lifetime)
            .finish()
    }
}
