use std::{env, fmt::Display, str::FromStr};

use tracing::info;

// ============================================================================
// Configuration
// ============================================================================
//
// Read once at startup from the environment. Unset variables fall back to
// their defaults; set but unparseable variables are an error.
//
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid {key} value {value:?}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StoreBackend::Postgres),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub store_backend: StoreBackend,
    pub db_max_connections: u32,
    pub db_connect_attempts: u32,
    pub app_env: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        Ok(Self {
            host: try_load(&lookup, "HOST", "0.0.0.0")?,
            port: try_load(&lookup, "PORT", "5000")?,
            database_url: try_load(&lookup, "DATABASE_URL", "postgres://127.0.0.1:5432/qmanage")?,
            store_backend: try_load(&lookup, "STORE_BACKEND", "postgres")?,
            db_max_connections: try_load(&lookup, "DB_MAX_CONNECTIONS", "10")?,
            db_connect_attempts: try_load(&lookup, "DB_CONNECT_ATTEMPTS", "5")?,
            app_env: try_load(&lookup, "APP_ENV", "development")?,
        })
    }

    pub fn is_production(&self) -> bool {
        self.app_env == "production"
    }
}

fn try_load<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
    default: &str,
) -> Result<T, ConfigError>
where
    T::Err: Display,
{
    let value = lookup(key).unwrap_or_else(|| {
        info!("{key} not set, using default: {default}");
        default.to_string()
    });

    value.parse().map_err(|e: T::Err| ConfigError::Invalid {
        key,
        value: value.clone(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[]).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 5000);
        assert_eq!(config.store_backend, StoreBackend::Postgres);
        assert_eq!(config.db_max_connections, 10);
        assert_eq!(config.db_connect_attempts, 5);
        assert!(!config.is_production());
    }

    #[test]
    fn test_overrides() {
        let config = load(&[("PORT", "8080"), ("STORE_BACKEND", "Memory"), ("APP_ENV", "production")])
            .unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.store_backend, StoreBackend::Memory);
        assert!(config.is_production());
    }

    #[test]
    fn test_invalid_value_is_an_error() {
        let err = load(&[("PORT", "not-a-port")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));

        assert!(load(&[("STORE_BACKEND", "mongo")]).is_err());
    }
}
