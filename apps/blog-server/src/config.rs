//! Application configuration loaded from environment variables.

use std::env;

use blogicum_infra::{DatabaseConfig, JwtConfig};

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the blog on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut database = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                database.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                database.min_connections = min;
            }
            database
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|value| value.parse().ok())
}
