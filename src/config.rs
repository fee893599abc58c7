// ⚙️ Application configuration
//
// Sources, later ones winning: built-in defaults, a JSON file, environment
// variables. Every section is optional in the file.

use crate::chart::LayoutConfig;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::Path;

/// File read when `EXPENSE_TRACKER_CONFIG` is unset
pub const DEFAULT_CONFIG_FILE: &str = "expense-tracker.json";

pub const ENV_CONFIG: &str = "EXPENSE_TRACKER_CONFIG";
pub const ENV_SEED: &str = "EXPENSE_TRACKER_SEED";
pub const ENV_SEED_COUNT: &str = "EXPENSE_TRACKER_SEED_COUNT";
pub const ENV_PORT: &str = "EXPENSE_TRACKER_PORT";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Bar chart margins, padding and tick count
    pub chart: LayoutConfig,

    /// Rows shown on the Recent page
    pub recent_limit: usize,

    pub seed: SeedConfig,

    pub server: ServerSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            chart: LayoutConfig::default(),
            recent_limit: 10,
            seed: SeedConfig::default(),
            server: ServerSettings::default(),
        }
    }
}

/// Sample data loaded into the store at startup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeedConfig {
    pub enabled: bool,
    pub seed: u64,
    pub count: usize,
}

impl Default for SeedConfig {
    fn default() -> Self {
        SeedConfig {
            enabled: true,
            seed: 2024,
            count: 15,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        ServerSettings {
            host: "127.0.0.1".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    /// Resolve `host:port`; host names such as `localhost` go through the system resolver
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        (self.host.as_str(), self.port)
            .to_socket_addrs()
            .with_context(|| format!("Invalid server address: {}:{}", self.host, self.port))?
            .next()
            .with_context(|| format!("No address found for {}:{}", self.host, self.port))
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Defaults, then the config file (if any), then environment overrides
    pub fn load() -> Result<Self> {
        let mut config = match env::var(ENV_CONFIG) {
            Ok(path) => Self::from_file(path)?,
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(DEFAULT_CONFIG_FILE)?
            }
            Err(_) => Self::default(),
        };

        config.apply_overrides(|key| env::var(key).ok())?;
        Ok(config)
    }

    /// Apply overrides from a key lookup (the environment, in `load`)
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed.seed = seed
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid seed: {:?}", ENV_SEED, seed))?;
        }
        if let Some(count) = lookup(ENV_SEED_COUNT) {
            self.seed.count = count
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid count: {:?}", ENV_SEED_COUNT, count))?;
        }
        if let Some(port) = lookup(ENV_PORT) {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("{} is not a valid port: {:?}", ENV_PORT, port))?;
        }
        Ok(())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config: AppConfig = serde_json::from_str(
            r#"{ "recent_limit": 3, "chart": { "left_margin": 30.0 } }"#,
        )
        .unwrap();

        assert_eq!(config.recent_limit, 3);
        assert_eq!(config.chart.left_margin, 30.0);
        assert_eq!(config.chart.bottom_margin, LayoutConfig::default().bottom_margin);
        assert_eq!(config.seed, SeedConfig::default());
        assert_eq!(config.server.port, 3000);
    }

    #[test]
    fn test_from_file() {
        let path =
            env::temp_dir().join(format!("expense-tracker-test-{}.json", std::process::id()));
        fs::write(&path, r#"{ "seed": { "enabled": false } }"#).unwrap();

        let config = AppConfig::from_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(!config.seed.enabled);
        assert_eq!(config.seed.count, SeedConfig::default().count);
    }

    #[test]
    fn test_from_missing_file_fails() {
        let result = AppConfig::from_file("/definitely/not/here.json");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        let lookup = lookup_from(&[(ENV_SEED, "99"), (ENV_SEED_COUNT, "5"), (ENV_PORT, "8080")]);
        config.apply_overrides(lookup).unwrap();

        assert_eq!(config.seed.seed, 99);
        assert_eq!(config.seed.count, 5);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_invalid_override_is_an_error() {
        let mut config = AppConfig::default();
        assert!(config.apply_overrides(lookup_from(&[(ENV_PORT, "http")])).is_err());
    }

    #[test]
    fn test_socket_addr() {
        let settings = ServerSettings::default();
        assert_eq!(settings.socket_addr().unwrap().port(), 3000);

        let named = ServerSettings { host: "localhost".to_string(), port: 8080 };
        let addr = named.socket_addr().unwrap();
        assert!(addr.ip().is_loopback());
        assert_eq!(addr.port(), 8080);

        let nul = ServerSettings { host: "local\0host".to_string(), port: 1 };
        let err = nul.socket_addr().unwrap_err();
        assert!(err.to_string().contains("Invalid server address"));

        let bad = ServerSettings { host: "expense-tracker.invalid".to_string(), port: 1 };
        assert!(bad.socket_addr().is_err());
    }
}
