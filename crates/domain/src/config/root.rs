use serde::{Deserialize, Serialize};
use std::net::SocketAddr;

use super::discovery::DiscoveryConfig;
use super::errors::ConfigError;
use super::logging::LoggingConfig;
use super::pipeline::PipelineConfig;
use super::responder::ResponderConfig;
use crate::peppol::PeppolEnvironment;

const LOCAL_CONFIG_PATH: &str = "pac-routing.toml";
const SYSTEM_CONFIG_PATH: &str = "/etc/pac-routing/config.toml";

/// Main configuration structure for PAC routing
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// Test DNS responder (SML double)
    #[serde(default)]
    pub responder: ResponderConfig,

    /// Participant discovery (SML + SMP)
    #[serde(default)]
    pub discovery: DiscoveryConfig,

    /// Message-bus stage
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from file or use defaults
    ///
    /// Priority order:
    /// 1. Explicitly provided path
    /// 2. pac-routing.toml in current directory
    /// 3. /etc/pac-routing/config.toml
    /// 4. Default configuration
    pub fn load(path: Option<&str>, cli_overrides: CliOverrides) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = path {
            Self::from_file(path)?
        } else if std::path::Path::new(LOCAL_CONFIG_PATH).exists() {
            Self::from_file(LOCAL_CONFIG_PATH)?
        } else if std::path::Path::new(SYSTEM_CONFIG_PATH).exists() {
            Self::from_file(SYSTEM_CONFIG_PATH)?
        } else {
            Self::default()
        };

        config.apply_cli_overrides(cli_overrides);
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileRead(path.to_string(), e.to_string()))?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Apply command-line overrides to configuration
    fn apply_cli_overrides(&mut self, overrides: CliOverrides) {
        if let Some(port) = overrides.dns_port {
            self.responder.port = port;
        }
        if let Some(bind) = overrides.bind_address {
            self.responder.bind_address = bind;
        }
        if let Some(environment) = overrides.environment {
            self.discovery.environment = environment;
        }
        if let Some(nameserver) = overrides.nameserver {
            self.discovery.nameserver = nameserver;
        }
        if let Some(url) = overrides.nats_url {
            self.pipeline.nats_url = url;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.responder.port == 0 {
            return Err(ConfigError::Validation(
                "Responder port cannot be 0".to_string(),
            ));
        }

        if self.discovery.nameserver.parse::<SocketAddr>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Invalid nameserver address '{}' (expected ip:port)",
                self.discovery.nameserver
            )));
        }

        if self.discovery.http_timeout_secs == 0 || self.discovery.dns_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "Discovery timeouts must be greater than 0".to_string(),
            ));
        }

        if self.pipeline.prefix.trim().is_empty() {
            return Err(ConfigError::Validation(
                "Pipeline prefix cannot be empty".to_string(),
            ));
        }

        for record in &self.responder.records {
            if record.name.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "Responder record with empty name".to_string(),
                ));
            }
        }

        Ok(())
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Parse(format!("Failed to serialize config: {}", e)))
    }

    /// Save configuration to file
    pub fn save(&self, path: &str) -> Result<(), ConfigError> {
        let toml_string = self.to_toml()?;
        std::fs::write(path, toml_string)
            .map_err(|e| ConfigError::FileWrite(path.to_string(), e.to_string()))?;
        Ok(())
    }
}

/// Command-line overrides for configuration
#[derive(Debug, Default)]
pub struct CliOverrides {
    pub dns_port: Option<u16>,
    pub bind_address: Option<String>,
    pub environment: Option<PeppolEnvironment>,
    pub nameserver: Option<String>,
    pub nats_url: Option<String>,
    pub log_level: Option<String>,
}
