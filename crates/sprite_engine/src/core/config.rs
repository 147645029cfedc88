//! # Unified Configuration System
//!
//! Consolidates the engine core's configuration structures and file loading
//! into a single module.
//!
//! ## Design Goals
//!
//! - **Centralized**: All configuration types in one place for easy discovery
//! - **Serializable**: Support for multiple config file formats (TOML, RON)
//! - **Type Safe**: Strong typing with validation and defaults

use serde::{Deserialize, Serialize};

/// Configuration trait
///
/// Implemented by any serde-capable config struct to gain file round-trip
/// support. Format is selected by file extension.
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(ConfigError::Io)?;

        if path.ends_with(".toml") {
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, Default::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}

/// Frame scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Simulation step size for the fixed-update loop, in seconds
    pub fixed_delta_time: f32,

    /// Upper bound on the frame delta fed into the fixed-step accumulator,
    /// in seconds. Bounds the catch-up work after a slow frame.
    pub max_delta_time: f32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            fixed_delta_time: 1.0 / 60.0,
            max_delta_time: 1.0 / 30.0,
        }
    }
}

/// Batch renderer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchRendererConfig {
    /// Maximum number of triangles accumulated into one draw call
    pub max_batch_triangles: usize,
}

impl Default for BatchRendererConfig {
    fn default() -> Self {
        Self {
            max_batch_triangles: 4096,
        }
    }
}

/// Top-level engine core configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Frame scheduler settings
    pub scheduler: SchedulerConfig,

    /// Batch renderer settings
    pub renderer: BatchRendererConfig,
}

impl Config for EngineConfig {}
