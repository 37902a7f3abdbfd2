pub mod claims;
pub mod errors;
pub mod issuer;
pub mod settings;
pub mod validator;

pub use claims::Claims;
pub use claims::SubjectClaims;
pub use errors::JwtConfigError;
pub use errors::JwtError;
pub use errors::TokenError;
pub use issuer::IssuedToken;
pub use issuer::TokenIssuer;
pub use settings::JwtSettings;
pub use validator::Identity;
pub use validator::TokenValidator;
