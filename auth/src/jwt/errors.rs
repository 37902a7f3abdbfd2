use thiserror::Error;

/// Rejected JWT configuration. Fatal at startup.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtConfigError {
    #[error("Signing secret is missing")]
    MissingSecret,

    #[error("Signing secret too short: minimum {min} bytes, got {actual}")]
    SecretTooShort { min: usize, actual: usize },

    #[error("Token issuer is missing")]
    MissingIssuer,

    #[error("Token audience is missing")]
    MissingAudience,

    #[error("Token lifetime must be positive, got {0} seconds")]
    InvalidLifetime(i64),

    #[error("Token lifetime too long: maximum {max_hours} hours, got {actual_hours}")]
    LifetimeTooLong { max_hours: i64, actual_hours: i64 },
}

/// Error type for token issuance.
#[derive(Debug, Clone, Error)]
pub enum JwtError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token expiry is out of range")]
    ExpiryOutOfRange,
}

/// Reason a presented token was rejected.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("Token is malformed: {0}")]
    Malformed(String),

    #[error("Token signature is invalid")]
    BadSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token issuer is not accepted")]
    WrongIssuer,

    #[error("Token audience is not accepted")]
    WrongAudience,
}
