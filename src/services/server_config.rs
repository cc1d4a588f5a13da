use std::env;
use std::fs;
use std::net::{IpAddr, SocketAddr};

use serde::Deserialize;
use thiserror::Error;

pub const HOST_ENV: &str = "ROI_HOST";
pub const PORT_ENV: &str = "ROI_PORT";
pub const REPORTS_DIR_ENV: &str = "ROI_REPORTS_DIR";
pub const SCENARIOS_FILE_ENV: &str = "ROI_SCENARIOS_FILE";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: String,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub reports_dir: String,
    pub scenarios_file: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 5000,
            reports_dir: "reports".to_string(),
            scenarios_file: None,
        }
    }
}

/// Values given on the command line; they win over file and environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub reports_dir: Option<String>,
    pub scenarios_file: Option<String>,
}

impl ServerConfig {
    pub fn from_yaml_file(filepath: &str) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(filepath).map_err(|source| ConfigError::Read {
            path: filepath.to_string(),
            source,
        })?;
        Self::from_yaml_str(&contents).map_err(|source| ConfigError::Parse {
            path: filepath.to_string(),
            source,
        })
    }

    pub fn from_yaml_str(contents: &str) -> Result<Self, serde_yaml::Error> {
        if contents.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(contents)
    }

    /// Layers config file, then environment, then command line over the defaults.
    pub fn load(config_path: Option<&str>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match config_path {
            Some(path) => Self::from_yaml_file(path)?,
            None => Self::default(),
        };
        config.apply_env(|key| env::var(key).ok())?;
        config.apply_overrides(overrides);
        Ok(config)
    }

    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup(HOST_ENV) {
            self.host = host;
        }
        if let Some(port) = lookup(PORT_ENV) {
            self.port = port.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: PORT_ENV.to_string(),
                value: port,
            })?;
        }
        if let Some(reports_dir) = lookup(REPORTS_DIR_ENV) {
            self.reports_dir = reports_dir;
        }
        if let Some(scenarios_file) = lookup(SCENARIOS_FILE_ENV) {
            self.scenarios_file = Some(scenarios_file);
        }
        Ok(())
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(reports_dir) = overrides.reports_dir {
            self.reports_dir = reports_dir;
        }
        if overrides.scenarios_file.is_some() {
            self.scenarios_file = overrides.scenarios_file;
        }
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self.host.parse().map_err(|_| ConfigError::InvalidValue {
            key: "host".to_string(),
            value: self.host.clone(),
        })?;
        Ok(SocketAddr::new(ip, self.port))
    }
}
