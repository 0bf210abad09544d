//! Configuration management with file persistence

use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Licdir configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub database: DatabaseSection,
    pub search: SearchSection,
    pub cache: CacheSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseSection {
    /// Path to the SQLite database file; defaults to the platform data dir
    pub path: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSection {
    /// Page size when the caller does not specify one
    pub default_limit: i64,
    /// Upper bound on caller-supplied page sizes
    pub max_limit: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSection {
    /// How long cached search responses stay live, in seconds
    pub ttl_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: DatabaseSection { path: None },
            search: SearchSection {
                default_limit: 20,
                max_limit: 100,
            },
            cache: CacheSection { ttl_secs: 300 },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("LICDIR_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("licdir")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file, or create default if it doesn't exist
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
            config.validate()?;
            Ok(config)
        } else {
            // Return default config without creating file
            Ok(Config::default())
        }
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        self.validate()?;

        let dir = Self::config_dir()?;
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;

        let path = Self::config_path()?;
        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(&path, contents)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.search.default_limit < 1 {
            return Err(anyhow!("search.default_limit must be at least 1"));
        }
        if self.search.max_limit < self.search.default_limit {
            return Err(anyhow!(
                "search.max_limit must be at least search.default_limit"
            ));
        }
        Ok(())
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "database.path" => Ok(self
                .database
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(default)".to_string())),
            "search.default_limit" => Ok(self.search.default_limit.to_string()),
            "search.max_limit" => Ok(self.search.max_limit.to_string()),
            "cache.ttl_secs" => Ok(self.cache.ttl_secs.to_string()),
            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `licdir config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "database.path" => {
                self.database.path = Some(PathBuf::from(value));
            }
            "search.default_limit" => {
                self.search.default_limit = value
                    .parse()
                    .with_context(|| format!("Invalid default_limit value: {}", value))?;
            }
            "search.max_limit" => {
                self.search.max_limit = value
                    .parse()
                    .with_context(|| format!("Invalid max_limit value: {}", value))?;
            }
            "cache.ttl_secs" => {
                self.cache.ttl_secs = value
                    .parse()
                    .with_context(|| format!("Invalid ttl_secs value: {}", value))?;
            }
            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `licdir config list` to see available keys.",
                    key
                ));
            }
        }
        self.validate()
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = vec![
            "database.path",
            "search.default_limit",
            "search.max_limit",
            "cache.ttl_secs",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.search.default_limit, 20);
        assert_eq!(config.search.max_limit, 100);
        assert_eq!(config.cache.ttl_secs, 300);
        assert!(config.database.path.is_none());
        config.validate().expect("defaults should validate");
    }

    #[test]
    fn test_get_set_round_trip() {
        let mut config = Config::default();
        config.set("search.default_limit", "25").unwrap();
        assert_eq!(config.get("search.default_limit").unwrap(), "25");

        config.set("cache.ttl_secs", "60").unwrap();
        assert_eq!(config.cache.ttl_secs, 60);
    }

    #[test]
    fn test_unknown_key_rejected() {
        let mut config = Config::default();
        assert!(config.get("nope").is_err());
        assert!(config.set("nope", "1").is_err());
    }

    #[test]
    fn test_invalid_limits_rejected() {
        let mut config = Config::default();
        assert!(config.set("search.max_limit", "5").is_err());
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();
        assert_eq!(parsed.search.default_limit, config.search.default_limit);
    }
}
