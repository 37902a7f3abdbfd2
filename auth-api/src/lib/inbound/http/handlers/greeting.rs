use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiSuccess;
use crate::inbound::http::middleware::AuthenticatedUser;

/// Protected endpoint confirming who the bearer token belongs to.
pub async fn greeting(
    Extension(user): Extension<AuthenticatedUser>,
) -> ApiSuccess<GreetingResponseData> {
    ApiSuccess::new(
        StatusCode::OK,
        GreetingResponseData {
            message: format!("Hello, {}! You are authenticated.", user.username),
            username: user.username,
            token_id: user.token_id,
        },
    )
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GreetingResponseData {
    pub message: String,
    pub username: String,
    /// `jti` of the presented token.
    pub token_id: String,
}
