//! Application configuration module
//!
//! Handles loading and validating configuration from environment variables.

use serde::Deserialize;
use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid configuration value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: Ipv4Addr,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: Ipv4Addr::new(0, 0, 0, 0),
            port: 3000,
        }
    }
}

/// CORS configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["http://localhost:3001".to_string()],
        }
    }
}

/// What to serve as the verified translation when its file does not exist yet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerifiedFallback {
    /// "Traduction manquante..." placeholder records
    #[default]
    Placeholder,
    /// A copy of the source records
    Source,
}

impl std::str::FromStr for VerifiedFallback {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "placeholder" => Ok(Self::Placeholder),
            "source" => Ok(Self::Source),
            other => Err(format!("expected 'placeholder' or 'source', got '{}'", other)),
        }
    }
}

/// Location and caching of the three JSON stores
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub source_file: String,
    pub verified_file: String,
    pub proposals_file: String,
    /// Time-to-live of cached store reads; zero disables caching
    pub cache_ttl: Duration,
    pub verified_fallback: VerifiedFallback,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("."),
            source_file: "input_data.json".to_string(),
            verified_file: "translated_data_fr.json".to_string(),
            proposals_file: "proposed_translations_fr.json".to_string(),
            cache_ttl: Duration::from_millis(1000),
            verified_fallback: VerifiedFallback::Placeholder,
        }
    }
}

impl StorageConfig {
    pub fn source_path(&self) -> PathBuf {
        self.data_dir.join(&self.source_file)
    }

    pub fn verified_path(&self) -> PathBuf {
        self.data_dir.join(&self.verified_file)
    }

    pub fn proposals_path(&self) -> PathBuf {
        self.data_dir.join(&self.proposals_file)
    }
}

/// Review access
#[derive(Debug, Clone, Default)]
pub struct AdminConfig {
    /// Bearer token required on review routes; `None` leaves them open
    pub token: Option<String>,
}

/// Complete application settings
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub admin: AdminConfig,
}

impl Settings {
    /// Load settings from environment variables
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if it exists (ignore errors if file not found)
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let server_defaults = ServerConfig::default();
        let server = ServerConfig {
            host: match lookup("HOST") {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    var: "HOST",
                    reason: format!("'{}' is not an IPv4 address", raw),
                })?,
                None => server_defaults.host,
            },
            port: match lookup("PORT") {
                Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    var: "PORT",
                    reason: format!("'{}' is not a port number", raw),
                })?,
                None => server_defaults.port,
            },
        };

        let cors = CorsConfig {
            allowed_origins: lookup("ALLOWED_ORIGINS")
                .map(|s| s.split(',').map(|s| s.trim().to_string()).collect())
                .unwrap_or_else(|| CorsConfig::default().allowed_origins),
        };

        let defaults = StorageConfig::default();
        let cache_ttl = match lookup("CACHE_TTL_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
                    var: "CACHE_TTL_MS",
                    reason: format!("'{}' is not a number of milliseconds", raw),
                })?;
                Duration::from_millis(ms)
            }
            None => defaults.cache_ttl,
        };
        let verified_fallback = match lookup("VERIFIED_FALLBACK") {
            Some(raw) => raw.parse().map_err(|reason| ConfigError::InvalidValue {
                var: "VERIFIED_FALLBACK",
                reason,
            })?,
            None => defaults.verified_fallback,
        };

        let storage = StorageConfig {
            data_dir: lookup("DATA_DIR").map(PathBuf::from).unwrap_or(defaults.data_dir),
            source_file: lookup("SOURCE_FILE").unwrap_or(defaults.source_file),
            verified_file: lookup("VERIFIED_FILE").unwrap_or(defaults.verified_file),
            proposals_file: lookup("PROPOSALS_FILE").unwrap_or(defaults.proposals_file),
            cache_ttl,
            verified_fallback,
        };

        let admin = AdminConfig {
            token: lookup("ADMIN_TOKEN")
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty()),
        };

        Ok(Self {
            server,
            cors,
            storage,
            admin,
        })
    }
}
