//! CLI configuration management.

use serde::{Deserialize, Serialize};
use sheetbridge_cache::{CacheConfig, CompressionType, DigestAlgorithm};
use std::path::PathBuf;

/// CLI configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CliConfig {
    /// Root of the local cache, property, and spreadsheet stores.
    pub data_dir: Option<PathBuf>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    #[serde(default)]
    pub cache: CacheConfig,
    /// Output format.
    #[serde(default)]
    pub output_format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

fn project_dirs() -> Result<directories::ProjectDirs, Box<dyn std::error::Error>> {
    Ok(directories::ProjectDirs::from("dev", "sheetbridge", "sheetbridge")
        .ok_or("Could not determine project directories")?)
}

impl CliConfig {
    /// Load configuration from file.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            Ok(serde_yaml::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to file.
    pub fn save(&self) -> Result<(), Box<dyn std::error::Error>> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_yaml::to_string(self)?;
        std::fs::write(&path, content)?;
        Ok(())
    }

    /// Get the configuration file path.
    pub fn config_path() -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(project_dirs()?.config_dir().join("config.yaml"))
    }

    pub fn data_dir(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(project_dirs()?.data_dir().to_path_buf()),
        }
    }

    pub fn cache_dir(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(self.data_dir()?.join("cache"))
    }

    pub fn props_dir(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(self.data_dir()?.join("props"))
    }

    pub fn sheets_dir(&self) -> Result<PathBuf, Box<dyn std::error::Error>> {
        Ok(self.data_dir()?.join("sheets"))
    }

    /// Set a configuration value.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), String> {
        let number = |value: &str| {
            value
                .parse::<u64>()
                .map_err(|_| format!("Invalid number for {}: {}", key, value))
        };

        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "database_url" => self.database_url = Some(value.to_string()),
            "output_format" => {
                self.output_format = match value {
                    "json" => OutputFormat::Json,
                    "yaml" => OutputFormat::Yaml,
                    _ => return Err(format!("Invalid output format: {}", value)),
                };
            }
            "cache.default_ttl_minutes" => {
                self.cache.default_ttl_minutes = value
                    .parse()
                    .map_err(|_| format!("Invalid number for {}: {}", key, value))?;
            }
            "cache.lock_timeout_ms" => self.cache.lock_timeout_ms = number(value)?,
            "cache.compression" => {
                self.cache.compression = match value {
                    "gzip" => CompressionType::Gzip,
                    "zstd" => CompressionType::Zstd,
                    "lz4" => CompressionType::Lz4,
                    _ => return Err(format!("Invalid compression: {}", value)),
                };
            }
            "cache.digest" => {
                self.cache.digest = match value {
                    "md5" => DigestAlgorithm::Md5,
                    "sha256" => DigestAlgorithm::Sha256,
                    _ => return Err(format!("Invalid digest: {}", value)),
                };
            }
            _ => return Err(format!("Unknown config key: {}", key)),
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_known_keys() {
        let mut config = CliConfig::default();
        config.set("data_dir", "/tmp/sb").unwrap();
        config.set("cache.compression", "zstd").unwrap();
        config.set("cache.default_ttl_minutes", "15").unwrap();
        config.set("output_format", "yaml").unwrap();

        assert_eq!(config.cache_dir().unwrap(), PathBuf::from("/tmp/sb/cache"));
        assert_eq!(config.cache.compression, CompressionType::Zstd);
        assert_eq!(config.cache.default_ttl_minutes, 15);
        assert_eq!(config.output_format, OutputFormat::Yaml);
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = CliConfig::default();
        assert!(config.set("cache.digest", "crc32").is_err());
        assert!(config.set("cache.lock_timeout_ms", "soon").is_err());
        assert!(config.set("api_url", "x").is_err());
    }

    #[test]
    fn test_yaml_roundtrip_keeps_cache_defaults() {
        let config: CliConfig = serde_yaml::from_str("database_url: postgres://localhost/app\n").unwrap();
        assert_eq!(config.cache.slot_size, 100_000);
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/app"));
    }
}
