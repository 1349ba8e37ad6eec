//! Application configuration schemas.
//!
//! Sources are merged in order: built-in defaults, `config/default.toml`,
//! `config/{env}.toml`, `MEDIDIR__*` variables, and finally the flat
//! deployment variables (`SERVER_PORT`, `DB_HOST`, ...).

pub mod app;
pub mod auth;
pub mod database;
pub mod logging;

use serde::{Deserialize, Serialize};

pub use self::app::{CorsConfig, ServerConfig};
pub use self::auth::AuthConfig;
pub use self::database::DatabaseConfig;
pub use self::logging::LoggingConfig;

use crate::error::AppError;

/// Flat environment variables and the config keys they override.
const LEGACY_ENV: &[(&str, &str)] = &[
    ("SERVER_PORT", "server.port"),
    ("DB_HOST", "database.host"),
    ("DB_PORT", "database.port"),
    ("DB_USER", "database.user"),
    ("DB_PASSWORD", "database.password"),
    ("DB_NAME", "database.name"),
    ("DB_SSLMODE", "database.ssl_mode"),
    ("DB_DRIVER", "database.driver"),
    ("DATABASE_URL", "database.url"),
    ("JWT_SECRET", "auth.jwt_secret"),
];

/// Root application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database connection settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration for the given environment name from files and the
    /// process environment.
    pub fn load(env: &str) -> Result<Self, AppError> {
        Self::load_with(env, |key| std::env::var(key).ok())
    }

    /// Load configuration, resolving the flat deployment variables through
    /// `lookup` instead of the process environment.
    pub fn load_with<F>(env: &str, lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("MEDIDIR")
                    .separator("__")
                    .try_parsing(true),
            );

        for (var, key) in LEGACY_ENV {
            builder = builder.set_override_option(*key, lookup(var))?;
        }

        let config: Self = builder
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))?;

        config.database.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_any_source() {
        let config = AppConfig::load_with("unit-test", lookup(&[])).expect("load");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.port, 3002);
        assert_eq!(config.database.driver, "postgres");
        assert_eq!(config.auth.token_ttl_hours, 24);
    }

    #[test]
    fn test_flat_variables_override_defaults() {
        let config = AppConfig::load_with(
            "unit-test",
            lookup(&[
                ("SERVER_PORT", "9090"),
                ("DB_HOST", "db.internal"),
                ("DB_PORT", "5432"),
                ("DB_NAME", "directory"),
                ("DB_SSLMODE", "require"),
            ]),
        )
        .expect("load");

        assert_eq!(config.server.port, 9090);
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.name, "directory");
        assert_eq!(config.database.ssl_mode, "require");
    }

    #[test]
    fn test_unsupported_driver_is_rejected() {
        let err = AppConfig::load_with("unit-test", lookup(&[("DB_DRIVER", "sqlite")]))
            .unwrap_err();
        assert_eq!(err.kind, crate::error::ErrorKind::Configuration);
    }
}
