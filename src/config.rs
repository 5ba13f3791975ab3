//! Configuration management for Crosscast
//!
//! The configuration is immutable after load and is handed to each platform
//! adapter at construction. Endpoint bases are explicit so tests can point
//! the adapters at a local mock server instead of the real networks.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};
use crate::types::Platform;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub http: HttpConfig,
    pub facebook: PlatformEndpoints,
    pub twitter: PlatformEndpoints,
    pub linkedin: PlatformEndpoints,
    pub instagram: PlatformEndpoints,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Timeout applied to every outbound platform call, in seconds.
    /// A timeout on one platform never blocks or cancels the others.
    pub timeout_secs: u64,
    /// Optional ceiling on simultaneous in-flight platform calls per
    /// dispatch. Unset means one in-flight call per requested platform.
    pub max_concurrent_requests: Option<usize>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_concurrent_requests: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEndpoints {
    /// Base URL of the platform API, without a trailing slash.
    pub api_base: String,
}

impl Config {
    /// Load configuration from the default location
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path()?;
        Self::load_from_path(&config_path)
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: &PathBuf) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadError)?;
        let config: Config = toml::from_str(&content).map_err(ConfigError::ParseError)?;
        Ok(config)
    }

    /// Configuration pointing at the real platform APIs.
    pub fn default_config() -> Self {
        Self {
            http: HttpConfig::default(),
            facebook: PlatformEndpoints {
                api_base: "https://graph.facebook.com".to_string(),
            },
            twitter: PlatformEndpoints {
                api_base: "https://api.twitter.com".to_string(),
            },
            linkedin: PlatformEndpoints {
                api_base: "https://api.linkedin.com".to_string(),
            },
            instagram: PlatformEndpoints {
                api_base: "https://graph.instagram.com".to_string(),
            },
        }
    }

    /// Configuration with every platform pointed at the same base URL.
    /// Intended for tests against a local mock server.
    pub fn with_api_base(base: &str) -> Self {
        let endpoints = PlatformEndpoints {
            api_base: base.trim_end_matches('/').to_string(),
        };
        Self {
            http: HttpConfig::default(),
            facebook: endpoints.clone(),
            twitter: endpoints.clone(),
            linkedin: endpoints.clone(),
            instagram: endpoints,
        }
    }

    pub fn endpoints(&self, platform: Platform) -> &PlatformEndpoints {
        match platform {
            Platform::Facebook => &self.facebook,
            Platform::Twitter => &self.twitter,
            Platform::Linkedin => &self.linkedin,
            Platform::Instagram => &self.instagram,
        }
    }
}

/// Resolve the configuration file path following XDG Base Directory spec
pub fn resolve_config_path() -> Result<PathBuf> {
    if let Ok(path) = std::env::var("CROSSCAST_CONFIG") {
        return Ok(PathBuf::from(shellexpand::tilde(&path).to_string()));
    }

    let config_dir = dirs::config_dir()
        .ok_or_else(|| ConfigError::MissingField("config directory".to_string()))?;

    Ok(config_dir.join("crosscast").join("config.toml"))
}
