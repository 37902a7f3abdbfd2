use std::env;

use auth::JwtConfigError;
use auth::JwtSettings;
use auth::PasswordError;
use auth::PasswordHasher;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    /// Absent means the in-memory credential store is used.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub password: PasswordConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Deserialize, Clone)]
pub struct JwtConfig {
    #[serde(default)]
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

/// Argon2id work factor.
#[derive(Debug, Deserialize, Clone)]
pub struct PasswordConfig {
    pub memory_kib: u32,
    pub iterations: u32,
    pub parallelism: u32,
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_hours() -> i64 {
    JwtSettings::DEFAULT_LIFETIME_HOURS
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_kib: PasswordHasher::DEFAULT_MEMORY_KIB,
            iterations: PasswordHasher::DEFAULT_ITERATIONS,
            parallelism: PasswordHasher::DEFAULT_PARALLELISM,
        }
    }
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"[REDACTED]")
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("expiration_hours", &self.expiration_hours)
            .finish()
    }
}

impl JwtConfig {
    /// Validate into signing settings.
    ///
    /// # Errors
    /// Any `JwtConfigError`; callers treat it as fatal.
    pub fn to_settings(&self) -> Result<JwtSettings, JwtConfigError> {
        if self.expiration_hours > JwtSettings::MAX_LIFETIME_HOURS {
            return Err(JwtConfigError::LifetimeTooLong {
                max_hours: JwtSettings::MAX_LIFETIME_HOURS,
                actual_hours: self.expiration_hours,
            });
        }
        let lifetime = chrono::Duration::try_hours(self.expiration_hours).ok_or(
            JwtConfigError::InvalidLifetime(self.expiration_hours.saturating_mul(3600)),
        )?;

        JwtSettings::new(
            self.secret.as_bytes(),
            self.issuer.as_str(),
            self.audience.as_str(),
            lifetime,
        )
    }
}

impl PasswordConfig {
    /// Build the hasher for this work factor.
    pub fn build_hasher(&self) -> Result<PasswordHasher, PasswordError> {
        PasswordHasher::with_params(self.memory_kib, self.iterations, self.parallelism)
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::with_prefix("").separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;

        Ok(config)
    }
}
