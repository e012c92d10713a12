//! Telemetry initialization.

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const SERVICE_NAME: &str = "blogicum";

/// Telemetry configuration.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Enable JSON logging (for production).
    pub json_logs: bool,
    pub service_name: &'static str,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            json_logs: false,
            service_name: SERVICE_NAME,
        }
    }
}

impl TelemetryConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            json_logs: lookup("LOG_FORMAT")
                .map(|v| v.eq_ignore_ascii_case("json"))
                .unwrap_or(defaults.json_logs),
            ..defaults
        }
    }
}

/// Install the global tracing subscriber.
pub fn init_telemetry(config: &TelemetryConfig) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,blog_server=debug,blogicum_infra=debug"));

    if config.json_logs {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }

    tracing::info!(
        service = config.service_name,
        json_logs = config.json_logs,
        "Telemetry initialized"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_log_format_is_configurable() {
        let config = TelemetryConfig::from_lookup(|key| match key {
            "LOG_FORMAT" => Some("JSON".to_string()),
            "SERVICE_NAME" => Some("someone-else".to_string()),
            _ => None,
        });

        assert!(config.json_logs);
        assert_eq!(config.service_name, "blogicum");

        let config = TelemetryConfig::from_lookup(|_| None);
        assert!(!config.json_logs);
    }
}
