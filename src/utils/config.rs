use crate::core::EllipsoidParameters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Simulator running behind the BlueBird service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Simulator {
    /// BlueSky, requires callsigns of at least three characters
    BlueSky,
    MachColl,
}

impl Simulator {
    /// Shortest callsign the simulator accepts
    pub fn min_id_length(&self) -> usize {
        match self {
            Simulator::BlueSky => 3,
            Simulator::MachColl => 1,
        }
    }
}

impl fmt::Display for Simulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Simulator::BlueSky => write!(f, "bluesky"),
            Simulator::MachColl => write!(f, "machcoll"),
        }
    }
}

/// Client configuration for the BlueBird service and the separation engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// BlueBird host name
    pub host: String,
    /// BlueBird port
    pub port: u16,
    /// API path prefix, e.g. `api`
    pub api_path: String,
    /// API version segment, e.g. `v2`
    pub api_version: String,
    /// Endpoint reporting aircraft positions
    pub endpoint_aircraft_position: String,
    /// Simulator behind BlueBird, drives the id policy
    pub simulator: Simulator,
    /// HTTP request timeout (seconds)
    pub timeout_secs: u64,
    /// Earth model for geodesic and spherical distances
    pub ellipsoid: EllipsoidParameters,
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Invalid parameter value
    #[error("Invalid configuration: {parameter} = {value} ({reason})")]
    InvalidParameter { parameter: String, value: String, reason: String },
    /// Configuration file I/O error
    #[error("{message}")]
    IoError { message: String },
    /// JSON serialization/deserialization error
    #[error("{message}")]
    SerializationError { message: String },
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5001,
            api_path: "api".to_string(),
            api_version: "v2".to_string(),
            endpoint_aircraft_position: "pos".to_string(),
            simulator: Simulator::BlueSky,
            timeout_secs: 30,
            ellipsoid: EllipsoidParameters::wgs84(),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and validate a JSON configuration file.
    ///
    /// Keys missing from the file keep their default values.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content = fs::read_to_string(&path).map_err(|e| ConfigError::IoError {
            message: format!("Failed to read config file '{}': {}", path_str, e),
        })?;

        let config: ClientConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to parse config file '{}': {}", path_str, e),
            })?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration as pretty-printed JSON
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let content =
            serde_json::to_string_pretty(self).map_err(|e| ConfigError::SerializationError {
                message: format!("Failed to serialize config: {}", e),
            })?;

        fs::write(&path, content).map_err(|e| ConfigError::IoError {
            message: format!("Failed to write config file '{}': {}", path_str, e),
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(invalid("host", &self.host, "must not be empty"));
        }
        if self.port == 0 {
            return Err(invalid("port", &self.port, "must be non-zero"));
        }
        if self.endpoint_aircraft_position.trim().is_empty() {
            return Err(invalid(
                "endpoint_aircraft_position",
                &self.endpoint_aircraft_position,
                "must not be empty",
            ));
        }
        if self.timeout_secs == 0 {
            return Err(invalid("timeout_secs", &self.timeout_secs, "must be positive"));
        }
        self.ellipsoid.validate().map_err(|e| invalid("ellipsoid", &e, "invalid earth model"))?;
        Ok(())
    }

    /// Root URL of the BlueBird API, e.g. `http://localhost:5001/api/v2`
    pub fn base_url(&self) -> String {
        let mut url = format!("http://{}:{}", self.host, self.port);
        for segment in [&self.api_path, &self.api_version] {
            let segment = segment.trim_matches('/');
            if !segment.is_empty() {
                url.push('/');
                url.push_str(segment);
            }
        }
        url
    }

    /// Full URL of an endpoint under the API root
    pub fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url(), endpoint.trim_start_matches('/'))
    }

    pub fn with_host(mut self, host: &str) -> Self {
        self.host = host.to_string();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_simulator(mut self, simulator: Simulator) -> Self {
        self.simulator = simulator;
        self
    }

    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    pub fn with_ellipsoid(mut self, ellipsoid: EllipsoidParameters) -> Self {
        self.ellipsoid = ellipsoid;
        self
    }
}

fn invalid(parameter: &str, value: &dyn fmt::Display, reason: &str) -> ConfigError {
    ConfigError::InvalidParameter {
        parameter: parameter.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
