use std::env;

use config::builder::DefaultState;
use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
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

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_expiration_hours")]
    pub expiration_hours: i64,
}

/// Argon2id work factor applied to newly created credentials.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct PasswordConfig {
    pub memory_cost_kib: u32,
    pub time_cost: u32,
    pub parallelism: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        Self {
            memory_cost_kib: 19456,
            time_cost: 2,
            parallelism: 1,
        }
    }
}

fn default_max_connections() -> u32 {
    5
}

fn default_expiration_hours() -> i64 {
    24
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, SERVER__HTTP_PORT, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// A missing or empty signing secret is a startup error.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let builder = ConfigBuilder::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Layer on environment variables (with __ as separator)
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"));

        Self::from_builder(builder)
    }

    /// Build and validate configuration from an assembled builder.
    pub fn from_builder(
        builder: config::ConfigBuilder<DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set (JWT__SECRET)".to_string(),
            ));
        }

        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(format!(
                "jwt.expiration_hours must be positive, got {}",
                self.jwt.expiration_hours
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use config::FileFormat;

    use super::*;

    fn builder(toml: &str) -> config::ConfigBuilder<DefaultState> {
        ConfigBuilder::builder().add_source(File::from_str(toml, FileFormat::Toml))
    }

    const BASE: &str = r#"
        [database]
        url = "postgres://localhost/orders"

        [server]
        http_port = 3000
    "#;

    #[test]
    fn test_loads_with_defaults() {
        let toml = format!("{BASE}\n[jwt]\nsecret = \"s3cret\"\n");
        let config = Config::from_builder(builder(&toml)).unwrap();

        assert_eq!(config.server.http_port, 3000);
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.jwt.expiration_hours, 24);
        assert_eq!(config.password, PasswordConfig::default());
    }

    #[test]
    fn test_missing_secret_is_fatal() {
        assert!(Config::from_builder(builder(BASE)).is_err());
    }

    #[test]
    fn test_blank_secret_is_fatal() {
        let toml = format!("{BASE}\n[jwt]\nsecret = \"  \"\n");
        let err = Config::from_builder(builder(&toml)).unwrap_err();

        assert!(err.to_string().contains("jwt.secret"));
    }

    #[test]
    fn test_non_positive_expiration_is_rejected() {
        let toml = format!("{BASE}\n[jwt]\nsecret = \"s3cret\"\nexpiration_hours = 0\n");
        let err = Config::from_builder(builder(&toml)).unwrap_err();

        assert!(err.to_string().contains("expiration_hours"));
    }

    #[test]
    fn test_password_work_factor_override() {
        let toml = format!(
            "{BASE}\n[jwt]\nsecret = \"s3cret\"\n[password]\nmemory_cost_kib = 4096\ntime_cost = 3\nparallelism = 2\n"
        );
        let config = Config::from_builder(builder(&toml)).unwrap();

        assert_eq!(
            config.password,
            PasswordConfig {
                memory_cost_kib: 4096,
                time_cost: 3,
                parallelism: 2,
            }
        );
    }
}
