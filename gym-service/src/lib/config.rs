use std::env;

use chrono::Duration;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

use crate::domain::session::models::SessionPolicy;

pub const DEFAULT_JWT_SECRET: &str = "development-only-jwt-secret-change-me";

/// One day.
pub const MAX_JWT_EXPIRATION_MINUTES: i64 = 24 * 60;
/// One year.
pub const MAX_REFRESH_EXPIRATION_HOURS: i64 = 365 * 24;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub seed: SeedConfig,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
}

impl DatabaseConfig {
    pub fn url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.name
        )
    }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub expiration_minutes: i64,
    pub refresh_expiration_hours: i64,
}

impl JwtConfig {
    pub fn session_policy(&self) -> SessionPolicy {
        SessionPolicy {
            access_ttl: Duration::minutes(self.expiration_minutes),
            refresh_ttl: Duration::hours(self.refresh_expiration_hours),
        }
    }

    /// Refresh cookie lifetime, matching the stored token expiry.
    pub fn refresh_max_age_seconds(&self) -> i64 {
        self.refresh_expiration_hours * 3600
    }

    pub fn uses_default_secret(&self) -> bool {
        self.secret == DEFAULT_JWT_SECRET
    }
}

/// Bootstrap account created at startup when both email and password are set.
#[derive(Clone)]
pub struct SeedAccount {
    pub email: String,
    pub password: String,
    pub name: String,
}

impl std::fmt::Debug for SeedAccount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SeedAccount")
            .field("email", &self.email)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SeedConfig {
    pub admin: Option<SeedAccount>,
    pub dev: Option<SeedAccount>,
}

/// Flat settings as read from `DB_HOST`, `JWT_SECRET` and friends.
#[derive(Debug, Deserialize)]
struct RawSettings {
    db_host: String,
    db_port: u16,
    db_user: String,
    db_password: String,
    db_name: String,
    server_port: u16,
    jwt_secret: String,
    jwt_expiration_minutes: i64,
    refresh_expiration_hours: i64,
    admin_email: Option<String>,
    admin_password: Option<String>,
    admin_name: String,
    dev_email: Option<String>,
    dev_password: Option<String>,
    dev_name: String,
}

fn seed_account(
    email: Option<String>,
    password: Option<String>,
    name: String,
) -> Option<SeedAccount> {
    match (email, password) {
        (Some(email), Some(password)) if !email.is_empty() && !password.is_empty() => {
            Some(SeedAccount {
                email,
                password,
                name,
            })
        }
        _ => None,
    }
}

impl From<RawSettings> for Config {
    fn from(raw: RawSettings) -> Self {
        Self {
            database: DatabaseConfig {
                host: raw.db_host,
                port: raw.db_port,
                user: raw.db_user,
                password: raw.db_password,
                name: raw.db_name,
            },
            server: ServerConfig {
                port: raw.server_port,
            },
            jwt: JwtConfig {
                secret: raw.jwt_secret,
                expiration_minutes: raw.jwt_expiration_minutes,
                refresh_expiration_hours: raw.refresh_expiration_hours,
            },
            seed: SeedConfig {
                admin: seed_account(raw.admin_email, raw.admin_password, raw.admin_name),
                dev: seed_account(raw.dev_email, raw.dev_password, raw.dev_name),
            },
        }
    }
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DB_HOST, JWT_SECRET, REFRESH_EXPIRATION_HOURS, etc.)
    /// 2. Environment-specific config file (config/{RUN_MODE}.toml)
    /// 3. Default config file (config/default.toml)
    /// 4. Built-in defaults
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = Self::with_defaults(ConfigBuilder::builder())?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(Environment::default().try_parsing(true));

        Self::from_builder(builder)
    }

    fn with_defaults(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        builder
            .set_default("db_host", "localhost")?
            .set_default("db_port", 5432)?
            .set_default("db_user", "postgres")?
            .set_default("db_password", "postgres")?
            .set_default("db_name", "gym")?
            .set_default("server_port", 8080)?
            .set_default("jwt_secret", DEFAULT_JWT_SECRET)?
            .set_default("jwt_expiration_minutes", 60)?
            .set_default("refresh_expiration_hours", 168)?
            .set_default("admin_name", "Administrator")?
            .set_default("dev_name", "Developer")
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let raw: RawSettings = builder.build()?.try_deserialize()?;

        if !(1..=MAX_JWT_EXPIRATION_MINUTES).contains(&raw.jwt_expiration_minutes) {
            return Err(ConfigError::Message(format!(
                "jwt_expiration_minutes must be between 1 and {}",
                MAX_JWT_EXPIRATION_MINUTES
            )));
        }

        if !(1..=MAX_REFRESH_EXPIRATION_HOURS).contains(&raw.refresh_expiration_hours) {
            return Err(ConfigError::Message(format!(
                "refresh_expiration_hours must be between 1 and {}",
                MAX_REFRESH_EXPIRATION_HOURS
            )));
        }

        Ok(raw.into())
    }
}
