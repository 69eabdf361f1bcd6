use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{AcaraError, Result};
use crate::filter::DEFAULT_RADIUS_KM;

/// Configuration source for tracking where values come from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfigSource {
    /// Default value
    Default,
    /// Loaded from config file
    File,
    /// Loaded from environment variable
    Environment,
}

impl ConfigSource {
    /// Returns the precedence level (higher = higher priority)
    pub fn precedence(&self) -> u8 {
        match self {
            ConfigSource::Default => 0,
            ConfigSource::File => 1,
            ConfigSource::Environment => 2,
        }
    }
}

/// A configuration value with its source
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigValue<T> {
    pub value: T,
    pub source: ConfigSource,
}

impl<T> ConfigValue<T> {
    pub fn new(value: T, source: ConfigSource) -> Self {
        Self { value, source }
    }

    /// Update the value if the new source has higher precedence
    pub fn update(&mut self, value: T, source: ConfigSource) {
        if source.precedence() > self.source.precedence() {
            self.value = value;
            self.source = source;
        }
    }
}

/// Layered configuration: defaults, then file, then environment.
#[derive(Debug, Clone)]
pub struct LayeredConfig {
    /// Path to the province boundary GeoJSON; None means the bundled
    /// boundary shipped with the API binary.
    pub boundary_path: ConfigValue<Option<PathBuf>>,
    /// Proximity filter cutoff in kilometers.
    pub proximity_radius_km: ConfigValue<f64>,
    /// Allow takedown of events that were never verified.
    pub direct_takedown: ConfigValue<bool>,
    /// HTTP listen port.
    pub port: ConfigValue<u16>,
}

impl LayeredConfig {
    /// Create a new configuration with default values
    pub fn with_defaults() -> Self {
        Self {
            boundary_path: ConfigValue::new(None, ConfigSource::Default),
            proximity_radius_km: ConfigValue::new(DEFAULT_RADIUS_KM, ConfigSource::Default),
            direct_takedown: ConfigValue::new(false, ConfigSource::Default),
            port: ConfigValue::new(3001, ConfigSource::Default),
        }
    }

    /// Load configuration from a TOML file
    pub fn load_from_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| AcaraError::ConfigInvalid {
            key: "file".to_string(),
            reason: format!("Failed to read config file: {}", e),
        })?;

        let file_config: FileConfig =
            toml::from_str(&content).map_err(|e| AcaraError::ConfigInvalid {
                key: "file".to_string(),
                reason: format!("Failed to parse TOML: {}", e),
            })?;

        if let Some(boundary_path) = file_config.boundary_path {
            self.boundary_path.update(Some(boundary_path), ConfigSource::File);
        }

        if let Some(radius) = file_config.proximity_radius_km {
            self.set_radius(radius, ConfigSource::File)?;
        }

        if let Some(direct_takedown) = file_config.direct_takedown {
            self.direct_takedown.update(direct_takedown, ConfigSource::File);
        }

        if let Some(port) = file_config.port {
            self.port.update(port, ConfigSource::File);
        }

        Ok(self)
    }

    /// Load configuration from environment variables
    pub fn load_from_env(mut self) -> Self {
        if let Ok(path) = env::var("ACARA_BOUNDARY") {
            self.boundary_path.update(Some(PathBuf::from(path)), ConfigSource::Environment);
        }

        if let Ok(radius_str) = env::var("ACARA_RADIUS_KM") {
            match radius_str.parse::<f64>() {
                Ok(radius) => {
                    if let Err(e) = self.set_radius(radius, ConfigSource::Environment) {
                        tracing::warn!("Ignoring ACARA_RADIUS_KM: {}", e);
                    }
                }
                Err(_) => tracing::warn!(
                    "Invalid ACARA_RADIUS_KM value '{}': expected a number of kilometers",
                    radius_str
                ),
            }
        }

        if let Ok(flag_str) = env::var("ACARA_DIRECT_TAKEDOWN") {
            match flag_str.parse::<bool>() {
                Ok(flag) => self.direct_takedown.update(flag, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ACARA_DIRECT_TAKEDOWN value '{}': expected true or false",
                    flag_str
                ),
            }
        }

        if let Ok(port_str) = env::var("ACARA_PORT") {
            match port_str.parse::<u16>() {
                Ok(port) => self.port.update(port, ConfigSource::Environment),
                Err(_) => tracing::warn!(
                    "Invalid ACARA_PORT value '{}': expected a port number",
                    port_str
                ),
            }
        }

        self
    }

    fn set_radius(&mut self, radius: f64, source: ConfigSource) -> Result<()> {
        if !radius.is_finite() || radius <= 0.0 {
            return Err(AcaraError::ConfigInvalid {
                key: "proximity_radius_km".to_string(),
                reason: format!("{} is not a positive distance", radius),
            });
        }
        self.proximity_radius_km.update(radius, source);
        Ok(())
    }
}

/// Shape of the optional TOML config file
#[derive(Debug, Deserialize)]
struct FileConfig {
    boundary_path: Option<PathBuf>,
    proximity_radius_km: Option<f64>,
    direct_takedown: Option<bool>,
    port: Option<u16>,
}
