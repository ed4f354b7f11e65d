//! Configuration Management
//!
//! Settings are read once at startup from the environment and an optional
//! JSON file. CLI flags are applied on top by the binary.

use crate::aws::auth::{CredentialSources, DEFAULT_PROFILE};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_ENVIRONMENT: &str = "production";
pub const DEFAULT_BIND: &str = "0.0.0.0:5001";

/// Optional settings file
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct FileConfig {
    #[serde(default)]
    pub region: Option<String>,
    /// Deployment label shown in the page footer
    #[serde(default)]
    pub environment: Option<String>,
    #[serde(default)]
    pub bind: Option<String>,
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl FileConfig {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("awsdash").join("config.json"))
    }

    /// Load configuration from disk; a missing or invalid file yields defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_path() else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!("Ignoring invalid config file {:?}: {}", path, e);
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }
}

/// Effective settings
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
    pub profile: String,
    pub shared_credentials_file: Option<PathBuf>,
    pub region: String,
    pub environment: String,
    pub endpoint_url: Option<String>,
    pub bind: String,
}

impl Config {
    /// Load from the process environment and the config file
    pub fn load() -> Self {
        Self::from_sources(FileConfig::load(), |name| std::env::var(name).ok())
    }

    /// Merge `file` with variables from `env` (environment wins).
    /// Empty variables count as unset.
    pub fn from_sources<F>(file: FileConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| env(name).filter(|v| !v.trim().is_empty());

        Self {
            access_key_id: var("AWS_ACCESS_KEY_ID"),
            secret_access_key: var("AWS_SECRET_ACCESS_KEY"),
            session_token: var("AWS_SESSION_TOKEN"),
            profile: var("AWS_PROFILE").unwrap_or_else(|| DEFAULT_PROFILE.to_string()),
            shared_credentials_file: var("AWS_SHARED_CREDENTIALS_FILE").map(PathBuf::from),
            region: var("AWS_REGION")
                .or(file.region)
                .unwrap_or_else(|| DEFAULT_REGION.to_string()),
            environment: var("ENVIRONMENT")
                .or(file.environment)
                .unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
            endpoint_url: var("AWS_ENDPOINT_URL").or(file.endpoint_url),
            bind: file.bind.unwrap_or_else(|| DEFAULT_BIND.to_string()),
        }
    }

    /// Inputs of the credential chain
    pub fn credential_sources(&self) -> CredentialSources {
        CredentialSources {
            access_key_id: self.access_key_id.clone(),
            secret_access_key: self.secret_access_key.clone(),
            session_token: self.session_token.clone(),
            profile: Some(self.profile.clone()),
            shared_credentials_file: self.shared_credentials_file.clone(),
        }
    }

    pub fn access_key_configured(&self) -> bool {
        self.access_key_id.is_some()
    }

    pub fn secret_key_configured(&self) -> bool {
        self.secret_access_key.is_some()
    }
}

// Keys never reach logs
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("access_key_configured", &self.access_key_configured())
            .field("secret_key_configured", &self.secret_key_configured())
            .field("profile", &self.profile)
            .field("region", &self.region)
            .field("environment", &self.environment)
            .field("endpoint_url", &self.endpoint_url)
            .field("bind", &self.bind)
            .finish()
    }
}
