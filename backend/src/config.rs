//! Configuration management for the Business Management Platform
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with BMS_ prefix

use config::{ConfigError, Environment, File};
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Database configuration
    pub database: DatabaseConfig,

    /// JWT authentication configuration
    pub jwt: JwtConfig,

    /// Low-stock notification configuration
    pub notification: NotificationConfig,

    /// Outbound email gateway configuration
    pub email: EmailConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Minimum number of connections in the pool
    pub min_connections: u32,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    /// Secret key for validating JWT tokens
    pub secret: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct NotificationConfig {
    /// Hours a resolved notification keeps suppressing new ones
    pub cooldown_hours: i64,

    /// Hours between scheduled low-stock sweeps (12 = twice daily)
    pub sweep_interval_hours: u64,

    /// Role whose users are preferred notification recipients
    pub owner_role: String,

    /// Fallback role when no owner exists
    pub admin_role: String,

    /// Final fallback recipient when neither role resolves to a user
    pub fallback_user_email: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    /// Mail gateway endpoint
    pub gateway_url: String,

    /// Mail gateway API key
    pub api_key: String,

    /// From address for outbound notifications
    pub from_address: String,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("BMS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("database.max_connections", 10)?
            .set_default("database.min_connections", 2)?
            .set_default("notification.cooldown_hours", 24)?
            .set_default("notification.sweep_interval_hours", 12)?
            .set_default("notification.owner_role", "owner")?
            .set_default("notification.admin_role", "admin")?
            .set_default("email.from_address", "noreply@example.com")?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (BMS_ prefix)
            .add_source(
                Environment::with_prefix("BMS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}
