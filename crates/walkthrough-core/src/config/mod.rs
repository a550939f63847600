//! Viewer configuration
//!
//! Camera, outline and loading preferences a host can persist between
//! sessions. Bookmark defaults are not configurable; they come from
//! [`crate::defaults`].

mod manager;

pub use manager::{ConfigError, ConfigManager};

use serde::{Deserialize, Serialize};

use crate::camera::Projection;
use crate::defaults;

/// Camera preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraConfig {
    /// Initial projection
    pub projection: Projection,
    /// Perspective field of view in degrees
    pub perspective_fov: f32,
    pub perspective_near: f32,
    pub perspective_far: f32,
    pub ortho_scale: f32,
    pub ortho_near: f32,
    pub ortho_far: f32,
    /// Field of view used when framing a target
    pub view_fit_fov: f32,
    /// Flight duration in seconds for `view_fit` / `fly_to`
    pub view_fit_duration: f32,
    /// Degrees per second, 0 disables auto-orbit
    pub orbit_speed: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            projection: Projection::Perspective,
            perspective_fov: defaults::PERSPECTIVE_FOV,
            perspective_near: defaults::PERSPECTIVE_NEAR,
            perspective_far: defaults::PERSPECTIVE_FAR,
            ortho_scale: defaults::ORTHO_SCALE,
            ortho_near: defaults::ORTHO_NEAR,
            ortho_far: defaults::ORTHO_FAR,
            view_fit_fov: defaults::VIEW_FIT_FOV,
            view_fit_duration: defaults::VIEW_FIT_DURATION,
            orbit_speed: 0.0,
        }
    }
}

/// Outline preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct OutlineConfig {
    pub thickness: f32,
    pub color: [f32; 3],
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            thickness: defaults::OUTLINE_THICKNESS,
            color: defaults::OUTLINE_COLOR,
        }
    }
}

/// Loading preferences
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoadingConfig {
    /// Install the default light rig on a fresh viewer
    pub default_lights: bool,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self {
            default_lights: true,
        }
    }
}

/// Complete viewer configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ViewerConfig {
    /// Configuration format version
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub camera: CameraConfig,
    #[serde(default)]
    pub outline: OutlineConfig,
    #[serde(default)]
    pub loading: LoadingConfig,
}

impl ViewerConfig {
    /// Current configuration version
    pub const CURRENT_VERSION: u32 = 1;

    pub fn new() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            ..Default::default()
        }
    }
}
