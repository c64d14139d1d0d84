use serde::{Deserialize, Serialize};
use std::path::Path;

use ghostmaze_common::WORLD_SCALE;

use crate::error::ConfigError;

/// Tunables of the render core. Every field has a default, so a config file
/// only needs the values it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Simulation tick rate, used to turn the accumulator into a tick fraction.
    pub ticks_per_second: f32,
    /// Level units to world units; must match the scale the mesh was built at.
    pub world_scale: f32,
    /// Camera height above the player, in world units.
    pub zoom: f32,
    pub fov_degrees: f32,
    pub z_near: f32,
    pub z_far: f32,
    /// Radians of camera rotation per pointer unit.
    pub pointer_sensitivity: f32,
    pub clear_color: [f32; 4],
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            ticks_per_second: 10.0,
            world_scale: WORLD_SCALE,
            zoom: 1.5,
            fov_degrees: 40.0,
            z_near: 0.1,
            z_far: 100.0,
            pointer_sensitivity: 0.01,
            clear_color: [0.0, 0.0, 0.0, 1.0],
        }
    }
}

impl RenderConfig {
    /// Load from a `.json`, `.yaml` or `.yml` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = std::fs::read_to_string(path)?;
        let config = match ext.as_str() {
            "json" => serde_json::from_str(&text)?,
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        tracing::debug!(path = %path.display(), ?config, "loaded render config");
        Ok(config)
    }
}
