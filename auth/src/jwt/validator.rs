use std::collections::HashMap;

use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::Validation;

use super::claims::Claims;
use super::errors::TokenError;
use super::settings::JwtSettings;

/// Identity extracted from a token that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    pub username: String,
    pub token_id: String,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub extra: HashMap<String, serde_json::Value>,
}

/// Verifies HS256 tokens produced by `TokenIssuer`.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenValidator {
    /// Create a validator from validated settings.
    ///
    /// Only HS256 is accepted. Issuer and audience must match the settings.
    pub fn new(settings: &JwtSettings) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[settings.issuer()]);
        validation.set_audience(&[settings.audience()]);
        validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
        // Expiry is checked against the caller's clock in `validate`.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(settings.secret()),
            validation,
        }
    }

    /// Validate a token at instant `now`.
    ///
    /// The signature is verified before any claim is read. Issuer and
    /// audience come next, expiry last. A token is accepted up to and
    /// including its `exp` second.
    ///
    /// # Errors
    /// * `Malformed` - Not a decodable JWT or a required claim is missing
    /// * `BadSignature` - Signature or algorithm does not match
    /// * `WrongIssuer` / `WrongAudience` - Claim does not match the settings
    /// * `Expired` - `now` is past `exp`
    pub fn validate(&self, token: &str, now: DateTime<Utc>) -> Result<Identity, TokenError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| classify(e.kind()))?;
        let claims = token_data.claims;

        if claims.is_expired(now.timestamp()) {
            return Err(TokenError::Expired);
        }

        let issued_at = timestamp(claims.iat)?;
        let expires_at = timestamp(claims.exp)?;

        Ok(Identity {
            username: claims.sub,
            token_id: claims.jti,
            issued_at,
            expires_at,
            extra: claims.extra,
        })
    }
}

fn classify(kind: &ErrorKind) -> TokenError {
    match kind {
        ErrorKind::InvalidSignature | ErrorKind::InvalidAlgorithm => TokenError::BadSignature,
        ErrorKind::InvalidIssuer => TokenError::WrongIssuer,
        ErrorKind::InvalidAudience => TokenError::WrongAudience,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::MissingRequiredClaim(claim) => {
            TokenError::Malformed(format!("missing required claim: {}", claim))
        }
        other => TokenError::Malformed(format!("{:?}", other)),
    }
}

fn timestamp(seconds: i64) -> Result<DateTime<Utc>, TokenError> {
    DateTime::from_timestamp(seconds, 0)
        .ok_or_else(|| TokenError::Malformed(format!("timestamp out of range: {}", seconds)))
}
