//! services/gateway/src/config.rs
//!
//! Defines the gateway's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Host and port of one gRPC backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServiceEndpoint {
    pub host: String,
    pub port: u16,
}

impl ServiceEndpoint {
    pub fn uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    pub request_timeout: Duration,
    pub body_limit: usize,
    pub cors_origins: Vec<String>,
    pub auth_service: ServiceEndpoint,
    pub ticket_service: ServiceEndpoint,
    pub s3_service: ServiceEndpoint,
    pub analyzer_service: ServiceEndpoint,
    pub suggestions_service: ServiceEndpoint,
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds the configuration from any variable source. Unset variables take
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        // --- Server Settings ---
        let host = var("APP_HOST", "0.0.0.0");
        let port: u16 = parse("APP_PORT", &var("APP_PORT", "8080"))?;
        let bind_address = format!("{}:{}", host, port)
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("APP_HOST".to_string(), e.to_string()))?;

        let log_level_str = var("LOG_LEVEL", "info");
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "LOG_LEVEL".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let timeout_secs: u64 = parse("REQUEST_TIMEOUT_SECS", &var("REQUEST_TIMEOUT_SECS", "30"))?;
        let body_limit: usize = parse("BODY_LIMIT_BYTES", &var("BODY_LIMIT_BYTES", "10485760"))?;

        let cors_origins = var(
            "CORS_ORIGINS",
            "http://localhost:5173,https://localhost:5173",
        )
        .split(',')
        .map(str::trim)
        .filter(|o| !o.is_empty())
        .map(str::to_string)
        .collect();

        // --- Backend Endpoints ---
        let endpoint = |prefix: &str, default_port: &str| -> Result<ServiceEndpoint, ConfigError> {
            let port_var = format!("{}_PORT", prefix);
            Ok(ServiceEndpoint {
                host: var(&format!("{}_HOST", prefix), "localhost"),
                port: parse(&port_var, &var(&port_var, default_port))?,
            })
        };

        Ok(Self {
            bind_address,
            log_level,
            request_timeout: Duration::from_secs(timeout_secs),
            body_limit,
            cors_origins,
            auth_service: endpoint("AUTH_SERVICE", "50051")?,
            ticket_service: endpoint("TICKET_SERVICE", "50052")?,
            s3_service: endpoint("S3_SERVICE", "50053")?,
            analyzer_service: endpoint("PRICE_TAG_ANALYZER", "50054")?,
            suggestions_service: endpoint("SUGGESTIONS", "2020")?,
        })
    }
}

fn parse<T>(name: &str, raw: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|e| ConfigError::InvalidValue(name.to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = load(&[]).unwrap();

        assert_eq!(config.bind_address, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.body_limit, 10 * 1024 * 1024);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(config.auth_service.uri(), "http://localhost:50051");
        assert_eq!(config.suggestions_service.port, 2020);
    }

    #[test]
    fn backend_endpoints_are_read_from_the_environment() {
        let config = load(&[
            ("TICKET_SERVICE_HOST", "tickets.internal"),
            ("TICKET_SERVICE_PORT", "7000"),
            ("PRICE_TAG_ANALYZER_HOST", "analyzer"),
        ])
        .unwrap();

        assert_eq!(config.ticket_service.uri(), "http://tickets.internal:7000");
        assert_eq!(config.analyzer_service.uri(), "http://analyzer:50054");
    }

    #[test]
    fn bad_port_names_the_variable() {
        let err = load(&[("S3_SERVICE_PORT", "not-a-port")]).unwrap_err();

        let ConfigError::InvalidValue(name, _) = err;
        assert_eq!(name, "S3_SERVICE_PORT");
    }

    #[test]
    fn bad_log_level_is_rejected() {
        assert!(load(&[("LOG_LEVEL", "chatty")]).is_err());
    }
}
