use chrono::DateTime;
use chrono::Utc;
use jsonwebtoken::encode;
use jsonwebtoken::Algorithm;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use uuid::Uuid;

use super::claims::Claims;
use super::claims::SubjectClaims;
use super::errors::JwtError;
use super::settings::JwtSettings;

/// A freshly signed token.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    /// Compact JWS string (`header.payload.signature`)
    pub token: String,
    /// Value of the `jti` claim
    pub token_id: String,
    /// Value of the `exp` claim
    pub expires_at: DateTime<Utc>,
}

/// Signs HS256 tokens for authenticated subjects.
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    header: Header,
    settings: JwtSettings,
}

impl TokenIssuer {
    /// Create an issuer from validated settings.
    pub fn new(settings: JwtSettings) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(settings.secret()),
            header: Header::new(Algorithm::HS256),
            settings,
        }
    }

    /// Sign a token for `subject`, valid from `now` until `now + lifetime`.
    ///
    /// Every call mints a new `jti`.
    ///
    /// # Errors
    /// * `ExpiryOutOfRange` - `now + lifetime` is not a representable instant
    /// * `EncodingFailed` - Claims could not be serialized or signed
    pub fn issue(
        &self,
        subject: SubjectClaims,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, JwtError> {
        let expires_at = now
            .checked_add_signed(self.settings.lifetime())
            .ok_or(JwtError::ExpiryOutOfRange)?;
        let token_id = Uuid::new_v4().to_string();

        let claims = Claims {
            sub: subject.subject,
            jti: token_id.clone(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.settings.issuer().to_string(),
            aud: self.settings.audience().to_string(),
            extra: subject.extra,
        };

        let token = encode(&self.header, &claims, &self.encoding_key)
            .map_err(|e| JwtError::EncodingFailed(e.to_string()))?;

        Ok(IssuedToken {
            token,
            token_id,
            expires_at,
        })
    }

    pub fn settings(&self) -> &JwtSettings {
        &self.settings
    }
}
