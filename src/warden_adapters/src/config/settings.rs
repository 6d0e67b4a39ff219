use std::{fmt, path::Path, time::Duration};

use config::{
    Config, ConfigBuilder, ConfigError, Environment, File, builder::DefaultState,
};
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;

use super::constants::{BASE_CONFIG_FILE, CONFIG_DIR, defaults, env};

/// Deployment environment, taken from `APP_ENVIRONMENT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnvironment {
    Local,
    Production,
}

impl AppEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnvironment::Local => "local",
            AppEnvironment::Production => "production",
        }
    }

    /// Unset or unrecognised values mean `Local`.
    pub fn detect() -> Self {
        match std::env::var(env::APP_ENVIRONMENT_ENV_VAR) {
            Ok(value) => value.parse().unwrap_or_else(|_| {
                tracing::warn!(%value, "Unknown APP_ENVIRONMENT, using local");
                AppEnvironment::Local
            }),
            Err(_) => AppEnvironment::Local,
        }
    }
}

impl std::str::FromStr for AppEnvironment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(AppEnvironment::Local),
            "production" => Ok(AppEnvironment::Production),
            other => Err(format!("{other} is not a supported environment")),
        }
    }
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct WardenSettings {
    pub application: ApplicationSettings,
    pub token: TokenSettings,
    pub postgres: PostgresSettings,
    pub redis: RedisSettings,
    #[serde(default)]
    pub allowed_origins: AllowedOrigins,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub host: String,
    pub port: u16,
    pub request_timeout_in_millis: u64,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_in_millis)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TokenSettings {
    pub secret: Secret<String>,
    /// Human readable, e.g. `"24h"`.
    pub duration: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PostgresSettings {
    pub url: Secret<String>,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RedisSettings {
    pub host_name: String,
    #[serde(default)]
    pub password: Option<Secret<String>>,
}

impl RedisSettings {
    pub fn url(&self) -> String {
        match &self.password {
            Some(password) => format!(
                "redis://:{}@{}/",
                password.expose_secret(),
                self.host_name
            ),
            None => format!("redis://{}/", self.host_name),
        }
    }
}

/// Origins allowed by the CORS layer. Empty means no cross-origin access.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct AllowedOrigins(Vec<String>);

impl AllowedOrigins {
    pub fn new(origins: Vec<String>) -> Self {
        Self(origins)
    }

    pub fn contains(&self, origin: &str) -> bool {
        self.0.iter().any(|allowed| allowed == origin)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl WardenSettings {
    /// Loads `config/base.json`, `config/<environment>.json` and `WARDEN__*` variables,
    /// later sources overriding earlier ones. A `.env` file is honoured outside production.
    pub fn load() -> Result<Self, ConfigError> {
        let environment = AppEnvironment::detect();
        if environment != AppEnvironment::Production {
            dotenvy::dotenv().ok();
        }

        Self::load_from(Path::new(CONFIG_DIR), environment)
    }

    pub fn load_from(dir: &Path, environment: AppEnvironment) -> Result<Self, ConfigError> {
        let settings = with_defaults()?
            .add_source(
                File::with_name(&dir.join(BASE_CONFIG_FILE).to_string_lossy()).required(false),
            )
            .add_source(
                File::with_name(&dir.join(environment.as_str()).to_string_lossy()).required(false),
            )
            .add_source(
                Environment::with_prefix(env::SETTINGS_ENV_PREFIX)
                    .prefix_separator(env::SETTINGS_ENV_SEPARATOR)
                    .separator(env::SETTINGS_ENV_SEPARATOR)
                    .list_separator(",")
                    .with_list_parse_key("allowed_origins")
                    .try_parsing(true),
            )
            .build()?;

        let settings: Self = settings.try_deserialize()?;
        tracing::info!(%environment, address = %settings.application.address(), "Settings loaded");
        Ok(settings)
    }
}

fn with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("application.host", defaults::APP_HOST)?
        .set_default("application.port", i64::from(defaults::APP_PORT))?
        .set_default(
            "application.request_timeout_in_millis",
            defaults::REQUEST_TIMEOUT_IN_MILLIS,
        )?
        .set_default("token.duration", defaults::TOKEN_DURATION)?
        .set_default(
            "postgres.max_connections",
            i64::from(defaults::POSTGRES_MAX_CONNECTIONS),
        )?
        .set_default("redis.host_name", defaults::REDIS_HOST_NAME)
}
