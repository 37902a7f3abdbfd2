#![allow(dead_code)]

use std::sync::Arc;

use auth::JwtSettings;
use auth::PasswordHasher;
use auth::TokenIssuer;
use auth::TokenValidator;
use auth_api::account::ports::AuthServicePort;
use auth_api::account::ports::CredentialStore;
use auth_api::account::service::AuthService;
use auth_api::inbound::http::router::create_router;
use auth_api::outbound::repositories::InMemoryCredentialStore;
use auth_api::outbound::repositories::PostgresCredentialStore;
use sqlx::postgres::PgConnectOptions;
use sqlx::postgres::PgPoolOptions;
use sqlx::Connection;
use sqlx::Executor;
use sqlx::PgConnection;
use sqlx::PgPool;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const TEST_ISSUER: &str = "auth-api";
pub const TEST_AUDIENCE: &str = "auth-api-clients";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub token_validator: TokenValidator,
}

/// Test database helper
pub struct TestDb {
    pub pool: PgPool,
    pub db_name: String,
}

pub fn jwt_settings() -> JwtSettings {
    JwtSettings::new(
        TEST_SECRET,
        TEST_ISSUER,
        TEST_AUDIENCE,
        chrono::Duration::hours(3),
    )
    .expect("Invalid test JWT settings")
}

impl TestApp {
    /// Spawn the application backed by an in-memory store.
    pub async fn spawn() -> (Self, InMemoryCredentialStore) {
        let store = InMemoryCredentialStore::new();
        let app = Self::spawn_with_store(Arc::new(store.clone())).await;
        (app, store)
    }

    /// Spawn the application backed by a fresh Postgres database.
    pub async fn spawn_with_postgres(db: &TestDb) -> Self {
        let store = Arc::new(PostgresCredentialStore::new(db.pool.clone()));
        Self::spawn_with_store(store).await
    }

    async fn spawn_with_store<CS: CredentialStore>(store: Arc<CS>) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        // Cheap work factor keeps the suite fast
        let password_hasher =
            Arc::new(PasswordHasher::with_params(1024, 1, 1).expect("Invalid Argon2 params"));
        let token_issuer = Arc::new(TokenIssuer::new(jwt_settings()));
        let auth_service: Arc<dyn AuthServicePort> =
            Arc::new(
                AuthService::new(store, password_hasher, token_issuer)
                    .expect("Failed to build auth service"),
            );

        let router = create_router(
            auth_service,
            Arc::new(TokenValidator::new(&jwt_settings())),
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .build()
                .expect("Failed to create reqwest client"),
            token_validator: TokenValidator::new(&jwt_settings()),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    pub async fn register(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/register")
            .json(&serde_json::json!({
                "username": username,
                "email": format!("{}@example.com", username.to_lowercase()),
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post("/api/auth/login")
            .json(&serde_json::json!({
                "username": username,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request")
    }

    /// Register then log in, returning the bearer token.
    pub async fn register_and_login(&self, username: &str, password: &str) -> String {
        self.register(username, password).await;
        let body: serde_json::Value = self
            .login(username, password)
            .await
            .json()
            .await
            .expect("Failed to parse response");
        body["data"]["token"]
            .as_str()
            .expect("No token in login response")
            .to_string()
    }
}

impl TestDb {
    /// Create a new test database with a unique name.
    ///
    /// Returns `None` when `DATABASE_URL` is not set so the Postgres suite
    /// can be skipped on machines without a server.
    pub async fn new() -> Option<Self> {
        let postgres_url = std::env::var("DATABASE_URL").ok()?;

        let db_name = format!(
            "test_auth_api_{}",
            uuid::Uuid::new_v4().to_string().replace('-', "_")
        );

        let mut conn = PgConnection::connect(&postgres_url)
            .await
            .expect("Failed to connect to Postgres");

        conn.execute(format!(r#"CREATE DATABASE "{}";"#, db_name).as_str())
            .await
            .expect("Failed to create test database");

        let options = postgres_url
            .parse::<PgConnectOptions>()
            .expect("Failed to parse DATABASE_URL")
            .database(&db_name);

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .expect("Failed to connect to test database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        Some(Self { pool, db_name })
    }
}

impl Drop for TestDb {
    fn drop(&mut self) {
        let db_name = self.db_name.clone();
        let Ok(postgres_url) = std::env::var("DATABASE_URL") else {
            return;
        };
        tokio::spawn(async move {
            if let Ok(mut conn) = PgConnection::connect(&postgres_url).await {
                // Terminate existing connections
                let _ = conn
                    .execute(
                        format!(
                            r#"SELECT pg_terminate_backend(pid) FROM pg_stat_activity WHERE datname = '{}';"#,
                            db_name
                        )
                        .as_str(),
                    )
                    .await;

                let _ = conn
                    .execute(format!(r#"DROP DATABASE IF EXISTS "{}";"#, db_name).as_str())
                    .await;
            }
        });
    }
}
