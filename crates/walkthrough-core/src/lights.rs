//! Scene lights
//!
//! Three variants with disjoint attribute sets:
//! - ambient: color, intensity
//! - directional: dir, color, intensity, space
//! - point: pos, color, intensity, space

use serde::{Deserialize, Serialize};

use crate::defaults;
use crate::error::{ViewerError, ViewerResult};

/// Light variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightKind {
    Ambient,
    #[serde(rename = "dir")]
    Directional,
    Point,
}

impl LightKind {
    pub fn name(&self) -> &'static str {
        match self {
            LightKind::Ambient => "ambient",
            LightKind::Directional => "dir",
            LightKind::Point => "point",
        }
    }

    /// Whether `dir`/`pos` are interpreted in world or view space for this kind
    pub fn has_space(&self) -> bool {
        matches!(self, LightKind::Directional | LightKind::Point)
    }
}

/// Coordinate space a light's direction or position is expressed in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LightSpace {
    World,
    #[default]
    View,
}

/// A light in the scene
#[derive(Debug, Clone, PartialEq)]
pub struct Light {
    pub id: String,
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    /// Directional lights only
    pub dir: [f32; 3],
    /// Point lights only
    pub pos: [f32; 3],
    /// Directional and point lights only
    pub space: LightSpace,
}

impl Light {
    pub fn from_desc(id: impl Into<String>, desc: &LightDesc) -> Self {
        Self {
            id: id.into(),
            kind: desc.kind,
            color: desc.color,
            intensity: desc.intensity,
            dir: desc.dir,
            pos: desc.pos,
            space: desc.space,
        }
    }

    /// Description that recreates this light
    pub fn desc(&self) -> LightDesc {
        LightDesc {
            kind: self.kind,
            color: self.color,
            intensity: self.intensity,
            dir: self.dir,
            pos: self.pos,
            space: self.space,
        }
    }

    fn mismatch(&self, expected: &str) -> ViewerError {
        ViewerError::TypeMismatch {
            id: self.id.clone(),
            expected: expected.to_string(),
            found: format!("{} light", self.kind.name()),
        }
    }

    pub fn set_color(&mut self, color: [f32; 3]) {
        self.color = color;
    }

    pub fn set_intensity(&mut self, intensity: f32) {
        self.intensity = intensity.max(0.0);
    }

    /// Set direction (will be normalized); directional lights only
    pub fn set_dir(&mut self, dir: [f32; 3]) -> ViewerResult<()> {
        if self.kind != LightKind::Directional {
            return Err(self.mismatch("dir light"));
        }
        self.dir = glam::Vec3::from(dir).normalize_or_zero().to_array();
        Ok(())
    }

    /// Point lights only
    pub fn set_pos(&mut self, pos: [f32; 3]) -> ViewerResult<()> {
        if self.kind != LightKind::Point {
            return Err(self.mismatch("point light"));
        }
        self.pos = pos;
        Ok(())
    }

    /// Directional and point lights only
    pub fn set_space(&mut self, space: LightSpace) -> ViewerResult<()> {
        if !self.kind.has_space() {
            return Err(self.mismatch("dir or point light"));
        }
        self.space = space;
        Ok(())
    }
}

/// Builder for creating lights with fluent API
#[derive(Debug, Clone, PartialEq)]
pub struct LightDesc {
    pub kind: LightKind,
    pub color: [f32; 3],
    pub intensity: f32,
    pub dir: [f32; 3],
    pub pos: [f32; 3],
    pub space: LightSpace,
}

impl LightDesc {
    fn with_kind(kind: LightKind) -> Self {
        Self {
            kind,
            color: defaults::LIGHT_COLOR,
            intensity: defaults::LIGHT_INTENSITY,
            dir: defaults::LIGHT_DIR,
            pos: defaults::LIGHT_POS,
            space: defaults::LIGHT_SPACE,
        }
    }

    pub fn ambient() -> Self {
        Self::with_kind(LightKind::Ambient)
    }

    pub fn directional(dir: [f32; 3]) -> Self {
        Self::with_kind(LightKind::Directional).dir(dir)
    }

    pub fn point(pos: [f32; 3]) -> Self {
        Self::with_kind(LightKind::Point).pos(pos)
    }

    pub fn color(mut self, color: [f32; 3]) -> Self {
        self.color = color;
        self
    }

    pub fn intensity(mut self, intensity: f32) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn dir(mut self, dir: [f32; 3]) -> Self {
        self.dir = dir;
        self
    }

    pub fn pos(mut self, pos: [f32; 3]) -> Self {
        self.pos = pos;
        self
    }

    pub fn space(mut self, space: LightSpace) -> Self {
        self.space = space;
        self
    }
}

/// Lighting installed when a viewer starts empty or a bookmark carries no lights
pub fn default_lights() -> Vec<(&'static str, LightDesc)> {
    vec![
        (
            "default.light.ambient",
            LightDesc::ambient().color([0.45, 0.45, 0.5]).intensity(0.9),
        ),
        (
            "default.light.key",
            LightDesc::directional([0.8, -0.6, -0.8]).intensity(1.0),
        ),
        (
            "default.light.fill",
            LightDesc::directional([-0.8, -0.4, -0.4]).intensity(0.7),
        ),
        (
            "default.light.rim",
            LightDesc::directional([0.2, -0.8, 0.8])
                .color([0.6, 0.6, 0.6])
                .intensity(0.6),
        ),
    ]
}
