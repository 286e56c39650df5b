//! Application configuration.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Server configuration.
    pub server: ServerConfig,
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Moderation configuration.
    pub admin: AdminConfig,
}

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port to bind to.
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Database connection configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// `PostgreSQL` connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    /// Upper bound for a single storage operation, in seconds.
    #[serde(default = "default_operation_timeout_secs")]
    pub operation_timeout_secs: u64,
}

/// Shared-secret moderation settings.
#[derive(Clone, Deserialize)]
pub struct AdminConfig {
    /// Password that unlocks the moderation endpoints.
    pub password: String,
}

impl std::fmt::Debug for AdminConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminConfig")
            .field("password", &"<redacted>")
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

const fn default_max_connections() -> u32 {
    20
}

const fn default_min_connections() -> u32 {
    1
}

const fn default_operation_timeout_secs() -> u64 {
    10
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Configuration is loaded in the following order:
    /// 1. `config/default.toml`
    /// 2. `config/{environment}.toml` (based on `BATTLEFIELD_ENV`)
    /// 3. Environment variables with `BATTLEFIELD_` prefix
    /// 4. `PORT`, which overrides `server.port` when set
    pub fn load() -> Result<Self, config::ConfigError> {
        let env =
            std::env::var("BATTLEFIELD_ENV").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("BATTLEFIELD")
                    .separator("__")
                    .try_parsing(true),
            )
            .set_override_option("server.port", std::env::var("PORT").ok())?
            .build()?;

        let config: Self = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject settings the server cannot run with.
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        if self.admin.password.trim().is_empty() {
            return Err(config::ConfigError::Message(
                "admin.password must not be empty".to_string(),
            ));
        }
        if self.database.operation_timeout_secs == 0 {
            return Err(config::ConfigError::Message(
                "database.operation_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn from_toml(source: &str) -> Result<Config, config::ConfigError> {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    #[test]
    fn test_defaults_are_applied() {
        let config = from_toml(
            r#"
            [server]
            [database]
            url = "postgres://localhost/battlefield"
            [admin]
            password = "hunter2"
            "#,
        )
        .unwrap();

        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.database.operation_timeout_secs, 10);
        assert_eq!(config.database.max_connections, 20);
    }

    #[test]
    fn test_empty_admin_password_is_rejected() {
        let result = from_toml(
            r#"
            [server]
            [database]
            url = "postgres://localhost/battlefield"
            [admin]
            password = "   "
            "#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_admin_password_is_redacted_in_debug() {
        let admin = AdminConfig {
            password: "hunter2".to_string(),
        };
        let debug = format!("{admin:?}");
        assert!(!debug.contains("hunter2"));
    }
}
