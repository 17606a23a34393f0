//! Configuration loaded from TOML.
//!
//! Every field has a default, so an empty file (or no file at all) yields a
//! working configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Resource manager settings
    pub resources: ResourceConfig,
    /// Viewer host settings
    pub viewer: ViewerConfig,
}

/// Resource manager settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceConfig {
    /// Delay applied to built-in destination loads, imitating network latency.
    /// `None` populates destinations immediately.
    pub simulated_latency_ms: Option<u64>,
    /// Directory that relative image URLs are resolved against.
    pub asset_root: PathBuf,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            simulated_latency_ms: None,
            asset_root: PathBuf::from("."),
        }
    }
}

/// Viewer host settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Vertical field of view in degrees
    pub field_of_view: f32,
    /// Far clip plane
    pub far: f32,
    /// Mesh shown before any model is loaded
    pub initial_mesh: String,
    /// Image applied to the model material at startup
    pub initial_texture: String,
    /// Number of frames a headless run simulates
    pub frames: u32,
    /// Simulated frame length in milliseconds
    pub frame_ms: u64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            field_of_view: 60.0,
            far: 100_000.0,
            initial_mesh: "kickjs://mesh/uvsphere/?radius=0.5".to_string(),
            initial_texture: "duckCM.jpg".to_string(),
            frames: 120,
            frame_ms: 16,
        }
    }
}

impl Config {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Self::parse(text, Path::new("<inline>"))
    }

    /// Load a configuration file.
    ///
    /// A missing file is not an error: defaults are used and a warning is logged.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("Config file {:?} not found, using defaults", path);
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)?;
        let config = Self::parse(&text, path)?;
        info!("Loaded config from {:?}", path);
        Ok(config)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        toml::from_str(text).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
