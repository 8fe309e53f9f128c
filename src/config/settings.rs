//! Application settings configuration
//!
//! Defines the CT aggregator endpoint, HTTP behaviour, issuer caching and
//! the output location.

use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// CT aggregator settings
#[derive(Debug, Clone, Deserialize)]
pub struct CtSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_base_url() -> String {
    "https://crt.sh".to_string()
}

fn default_user_agent() -> String {
    format!("ct-audit/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for CtSettings {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            user_agent: default_user_agent(),
        }
    }
}

/// HTTP client settings
///
/// No timeout is applied unless one is configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpSettings {
    pub timeout_secs: Option<u64>,
}

impl HttpSettings {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

/// Issuer resolution settings
#[derive(Debug, Clone, Deserialize)]
pub struct IssuerSettings {
    #[serde(default = "default_issuer_cache")]
    pub cache: bool,
}

fn default_issuer_cache() -> bool {
    true
}

impl Default for IssuerSettings {
    fn default() -> Self {
        Self { cache: true }
    }
}

/// Result store settings
#[derive(Debug, Clone, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_output_directory")]
    pub directory: PathBuf,
}

fn default_output_directory() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            directory: default_output_directory(),
        }
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub ct: CtSettings,
    #[serde(default)]
    pub http: HttpSettings,
    #[serde(default)]
    pub issuer: IssuerSettings,
    #[serde(default)]
    pub output: OutputSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.ct.base_url.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "ct.base_url".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if self.http.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "http.timeout_secs".to_string(),
                message: "must be greater than zero".to_string(),
            });
        }
        Ok(())
    }
}
