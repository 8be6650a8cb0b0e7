//! Editor configuration
//!
//! Stored as RON. Every section falls back to its defaults, so a config file
//! only needs the values it changes.

use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};
use tracing::{info, warn};

use crate::camera::{CameraConfig, ProjectionConfig};
use crate::error::Result;
use crate::gizmo::GizmoConfig;
use crate::picking::DEFAULT_PICK_RADIUS;

/// Config file name inside the config directory
const CONFIG_FILE: &str = "editor.ron";
/// Directory under the platform config dir
const APP_DIR: &str = "rampage-editor";

/// Picking tuning
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickingConfig {
    /// Bounding sphere radius around every pickable object
    pub sphere_radius: f32,
}

impl Default for PickingConfig {
    fn default() -> Self {
        Self {
            sphere_radius: DEFAULT_PICK_RADIUS,
        }
    }
}

/// Top-level editor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    pub camera: CameraConfig,
    pub projection: ProjectionConfig,
    pub picking: PickingConfig,
    pub gizmo: GizmoConfig,
    /// Scene file used by save/reload
    pub scene_path: PathBuf,
    /// Brotli-compress saved scenes
    pub compress_scenes: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            camera: CameraConfig::default(),
            projection: ProjectionConfig::default(),
            picking: PickingConfig::default(),
            gizmo: GizmoConfig::default(),
            scene_path: PathBuf::from("scene.ron"),
            compress_scenes: false,
        }
    }
}

impl EditorConfig {
    /// `<config dir>/rampage-editor/editor.ron`, or `editor.ron` in the
    /// working directory when the platform has no config dir
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .unwrap_or_else(|| PathBuf::from(CONFIG_FILE))
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(ron::from_str(&text)?)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let config = ron::ser::PrettyConfig::new().indentor("  ".to_string());
        std::fs::write(path, ron::ser::to_string_pretty(self, config)?)?;
        Ok(())
    }

    /// Load the config, falling back to defaults if it is missing or invalid
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            info!(path = %path.display(), "no editor config, using defaults");
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => {
                info!(path = %path.display(), "loaded editor config");
                config
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "invalid editor config, using defaults");
                Self::default()
            }
        }
    }

    /// Like `load_or_default`, but on first run the defaults are written out
    /// so there is a file to edit
    pub fn load_or_create(path: &Path) -> Self {
        if path.exists() {
            return Self::load_or_default(path);
        }
        let config = Self::default();
        match config.save(path) {
            Ok(()) => info!(path = %path.display(), "wrote default editor config"),
            Err(e) => warn!(path = %path.display(), error = %e, "could not write default editor config"),
        }
        config
    }
}
