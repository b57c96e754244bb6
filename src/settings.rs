//! Game settings and preferences
//!
//! Persisted separately from the best score, in a JSON file next to it.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::persistence::{PersistenceError, write_atomic};
use crate::sim::Viewport;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Headless runs ===
    /// Viewport used when there is no window to measure
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// Fixed session seed; random when unset
    pub seed: Option<u64>,
    /// Let the pig fly itself
    pub autopilot: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            viewport_width: 1280.0,
            viewport_height: 720.0,
            seed: None,
            autopilot: false,
        }
    }
}

impl Settings {
    /// Default settings file name
    pub const DEFAULT_FILE: &'static str = "popper_pig_settings.json";

    /// Configured viewport
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    /// Load settings from `path`, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(PersistenceError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Ignoring settings in {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Self, PersistenceError> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    /// Save settings to `path`
    pub fn save(&self, path: &Path) -> Result<(), PersistenceError> {
        let json = serde_json::to_vec_pretty(self)?;
        write_atomic(path, &json)?;
        log::info!("Settings saved");
        Ok(())
    }
}
