//! Configuration loading
//!
//! Every field has a default, so an absent or partial file is fine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::classify::DEFAULT_VIRTUAL_INDICATORS;
use crate::types::ServiceFamily;

/// Environment variable naming a config file
pub const CONFIG_ENV_VAR: &str = "HOST_INVENTORY_CONFIG";

/// File name searched for in the working directory
pub const CONFIG_FILE_NAME: &str = "host-inventory.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

// ============================================================================
// Configuration Types
// ============================================================================

/// Top-level configuration (from host-inventory.toml)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub probe: ProbeConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub services: ServicePatterns,
    #[serde(default)]
    pub powershell: PowerShellConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Upper bound for one host's whole probe, in seconds
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
    /// Hosts probed at the same time within one category
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Drop repeated host names (case-insensitive, first one wins)
    #[serde(default)]
    pub dedupe_hosts: bool,
}

fn default_probe_timeout() -> u64 {
    120
}

fn default_concurrency() -> usize {
    8
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
            concurrency: default_concurrency(),
            dedupe_hosts: false,
        }
    }
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Case-insensitive substrings of the chassis model that mark a VM
    #[serde(default = "default_virtual_indicators")]
    pub virtual_indicators: Vec<String>,
}

fn default_virtual_indicators() -> Vec<String> {
    DEFAULT_VIRTUAL_INDICATORS
        .iter()
        .map(|s| s.to_string())
        .collect()
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            virtual_indicators: default_virtual_indicators(),
        }
    }
}

/// Service name patterns per family; `*` is the only wildcard
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServicePatterns {
    #[serde(default = "default_database_engine")]
    pub database_engine: String,
    #[serde(default = "default_integration_services")]
    pub integration_services: String,
    #[serde(default = "default_reporting_services")]
    pub reporting_services: String,
}

fn default_database_engine() -> String {
    "MSSQL*".to_string()
}

fn default_integration_services() -> String {
    "MsDtsServer*".to_string()
}

fn default_reporting_services() -> String {
    "ReportServer*".to_string()
}

impl Default for ServicePatterns {
    fn default() -> Self {
        Self {
            database_engine: default_database_engine(),
            integration_services: default_integration_services(),
            reporting_services: default_reporting_services(),
        }
    }
}

impl ServicePatterns {
    pub fn pattern(&self, family: ServiceFamily) -> &str {
        match family {
            ServiceFamily::DatabaseEngine => &self.database_engine,
            ServiceFamily::IntegrationServices => &self.integration_services,
            ServiceFamily::ReportingServices => &self.reporting_services,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PowerShellConfig {
    #[serde(default = "default_executable")]
    pub executable: String,
    /// Timeout for a single CIM query
    #[serde(default = "default_query_timeout")]
    pub query_timeout_secs: u64,
    /// Timeout for enumerating a directory or cloud directory
    #[serde(default = "default_source_timeout")]
    pub source_timeout_secs: u64,
}

fn default_executable() -> String {
    if cfg!(windows) {
        "powershell".to_string()
    } else {
        "pwsh".to_string()
    }
}

fn default_query_timeout() -> u64 {
    60
}

fn default_source_timeout() -> u64 {
    300
}

impl Default for PowerShellConfig {
    fn default() -> Self {
        Self {
            executable: default_executable(),
            query_timeout_secs: default_query_timeout(),
            source_timeout_secs: default_source_timeout(),
        }
    }
}

impl PowerShellConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs.max(1))
    }

    pub fn source_timeout(&self) -> Duration {
        Duration::from_secs(self.source_timeout_secs.max(1))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub directory: PathBuf,
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl Config {
    /// Load config, searching in order:
    ///
    /// 1. `explicit` (from `--config`)
    /// 2. `HOST_INVENTORY_CONFIG` env var
    /// 3. `./host-inventory.toml`
    /// 4. `$XDG_CONFIG_HOME/host-inventory/config.toml` (platform equivalent)
    /// 5. Defaults
    ///
    /// A file named by 1 or 2 must load. Discovered files (3, 4) that fail
    /// to parse are logged and skipped.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from_path(path);
        }

        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            return Self::load_from_path(Path::new(&env_path));
        }

        for candidate in Self::search_paths() {
            if !candidate.exists() {
                continue;
            }
            match Self::load_from_path(&candidate) {
                Ok(config) => return Ok(config),
                Err(e) => tracing::warn!("Ignoring config: {}", e),
            }
        }

        tracing::debug!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Load from a specific path
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("host-inventory").join("config.toml"));
        }
        paths
    }
}
