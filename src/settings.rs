use std::fmt;
use std::path::{Path, PathBuf};

use bevy::prelude::*;
use serde::Deserialize;

use crate::camera::{CameraFollowConfig, FollowSettings};
use crate::player::{Abilities, PlayerConfig};

/// Everything needed to spawn a player and its follow camera.
///
/// Every field has a default, so a settings file only lists what it changes.
#[derive(Resource, Clone, Debug, Deserialize)]
#[serde(default)]
pub struct PlatformerSettings {
    pub spawn_position: Vec3,
    /// Visible world height of the orthographic camera
    pub view_height: f32,
    /// Distance from the camera to the play plane
    pub camera_distance: f32,
    pub player: PlayerConfig,
    pub abilities: Abilities,
    pub camera: CameraFollowConfig,
    pub follow: FollowSettings,
}

impl Default for PlatformerSettings {
    fn default() -> Self {
        Self {
            spawn_position: Vec3::new(0.0, 2.0, 0.0),
            view_height: 20.0,
            camera_distance: 30.0,
            player: PlayerConfig::default(),
            abilities: Abilities::new(true, true),
            camera: CameraFollowConfig::default(),
            follow: FollowSettings::default(),
        }
    }
}

#[derive(Debug)]
pub enum SettingsError {
    Io(PathBuf, std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(path, err) => write!(f, "failed to read {}: {err}", path.display()),
            SettingsError::Parse(err) => write!(f, "failed to parse settings: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(_, err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(err: toml::de::Error) -> Self {
        SettingsError::Parse(err)
    }
}

impl PlatformerSettings {
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|err| SettingsError::Io(path.to_path_buf(), err))?;
        Self::from_toml_str(&contents)
    }
}

/// Inserts [`PlatformerSettings`], read from `path` when one is given.
///
/// A settings resource inserted before this plugin is left alone.
#[derive(Default)]
pub struct SettingsPlugin {
    pub path: Option<PathBuf>,
}

impl SettingsPlugin {
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }
}

impl Plugin for SettingsPlugin {
    fn build(&self, app: &mut App) {
        if app.world().contains_resource::<PlatformerSettings>() {
            return;
        }

        let settings = match &self.path {
            Some(path) => match PlatformerSettings::load(path) {
                Ok(settings) => {
                    info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(err) => {
                    warn!("{err}, using defaults");
                    PlatformerSettings::default()
                }
            },
            None => PlatformerSettings::default(),
        };

        app.insert_resource(settings);
    }
}
