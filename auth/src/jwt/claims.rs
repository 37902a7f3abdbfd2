use std::collections::HashMap;

use serde::Deserialize;
use serde::Serialize;

/// JWT claims carried by every issued token.
///
/// The registered claims (RFC 7519) are always present. Additional identity
/// data travels in `extra`, flattened into the payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Claims {
    /// Subject (authenticated username)
    pub sub: String,

    /// JWT ID (unique token identifier)
    pub jti: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,

    /// Audience
    pub aud: String,

    /// Additional custom fields (flattened into token)
    #[serde(flatten)]
    pub extra: HashMap<String, serde_json::Value>,
}

/// Identity data supplied by the caller when requesting a token.
///
/// The issuer completes it with `jti`, `iat`, `exp`, `iss` and `aud`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubjectClaims {
    pub subject: String,
    pub extra: HashMap<String, serde_json::Value>,
}

impl SubjectClaims {
    /// Create claims for a subject.
    pub fn new(subject: impl ToString) -> Self {
        Self {
            subject: subject.to_string(),
            extra: HashMap::new(),
        }
    }

    /// Add a custom field.
    pub fn with_extra(mut self, key: impl ToString, value: impl Serialize) -> Self {
        if let Ok(json_value) = serde_json::to_value(value) {
            self.extra.insert(key.to_string(), json_value);
        }
        self
    }
}

impl Claims {
    /// Get a custom string field.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(|v| v.as_str())
    }

    /// Check if token is expired.
    ///
    /// A token is still valid at exactly its expiration second.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        self.exp < current_timestamp
    }
}
