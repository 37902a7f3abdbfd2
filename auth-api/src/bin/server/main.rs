use std::sync::Arc;

use auth::TokenIssuer;
use auth::TokenValidator;
use auth_api::account::ports::AuthServicePort;
use auth_api::account::service::AuthService;
use auth_api::config::Config;
use auth_api::inbound::http::router::create_router;
use auth_api::outbound::repositories::InMemoryCredentialStore;
use auth_api::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "auth_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "auth-api",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        http_port = config.server.http_port,
        database = config.database.is_some(),
        jwt_issuer = %config.jwt.issuer,
        jwt_audience = %config.jwt.audience,
        jwt_expiration_hours = config.jwt.expiration_hours,
        "Configuration loaded"
    );

    let jwt_settings = config.jwt.to_settings().map_err(|e| {
        tracing::error!(error = %e, "Invalid JWT configuration");
        e
    })?;
    let password_hasher = Arc::new(config.password.build_hasher().map_err(|e| {
        tracing::error!(error = %e, "Invalid password hashing configuration");
        e
    })?);

    let token_issuer = Arc::new(TokenIssuer::new(jwt_settings.clone()));
    let token_validator = Arc::new(TokenValidator::new(&jwt_settings));

    let auth_service: Arc<dyn AuthServicePort> = match &config.database {
        Some(database) => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(database.max_connections)
                .connect(&database.url)
                .await?;
            tracing::info!(
                max_connections = database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let store = Arc::new(PostgresCredentialStore::new(pg_pool));
            Arc::new(AuthService::new(store, password_hasher, token_issuer)?)
        }
        None => {
            tracing::warn!("No database configured, users are kept in memory");
            let store = Arc::new(InMemoryCredentialStore::new());
            Arc::new(AuthService::new(store, password_hasher, token_issuer)?)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    let http_application = create_router(auth_service, token_validator);

    if let Err(e) = axum::serve(http_listener, http_application).await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    tracing::info!("Server exited successfully");
    Ok(())
}
