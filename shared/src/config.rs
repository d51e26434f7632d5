//! Session configuration loaded from RON files.
//!
//! Every section is `#[serde(default)]`, so a file only needs the values it
//! changes:
//!
//! ```ron
//! (
//!     seed: 7,
//!     preset: Some(Mobile),
//!     locomotion: (speed: 8.0),
//! )
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    physics::{FloaterConfig, LocomotionConfig},
    players::CameraConfig,
    session::CadenceConfig,
    water::{WaterConfig, WaterPreset},
};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] ron::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SessionConfig {
    /// Seeds the water noise and the floater scatter
    pub seed: u64,
    /// When set, replaces `water` with the preset's values
    pub preset: Option<WaterPreset>,
    pub water: WaterConfig,
    pub floaters: FloaterConfig,
    pub locomotion: LocomotionConfig,
    pub camera: CameraConfig,
    pub cadence: CadenceConfig,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            preset: None,
            water: WaterConfig::default(),
            floaters: FloaterConfig::default(),
            locomotion: LocomotionConfig::default(),
            camera: CameraConfig::default(),
            cadence: CadenceConfig::default(),
        }
    }
}

impl SessionConfig {
    /// Force a water preset, keeping the configured anchor.
    pub fn with_preset(mut self, preset: WaterPreset) -> Self {
        self.preset = Some(preset);
        self
    }

    /// Water settings after applying the preset and range checks.
    pub fn effective_water(&self) -> WaterConfig {
        let water = match self.preset {
            Some(preset) => WaterConfig {
                anchor: self.water.anchor,
                ..preset.to_config()
            },
            None => self.water.clone(),
        };
        water.sanitized()
    }

    pub fn from_ron(content: &str) -> Result<Self, ConfigError> {
        Ok(ron::de::from_str(content)?)
    }

    pub fn to_ron(&self) -> Result<String, ConfigError> {
        let pretty = ron::ser::PrettyConfig::new()
            .with_depth_limit(3)
            .with_separate_tuple_members(true);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }
}

pub fn load_session_config(path: &Path) -> Result<SessionConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = SessionConfig::from_ron(&content)?;
    log::info!("Loaded session config from {:?}", path);
    Ok(config)
}
