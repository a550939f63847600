//! Clip planes

use glam::Vec3;

use crate::defaults;

/// A world-space clipping plane.
///
/// Geometry on the side `dir` points toward is discarded for clippable objects.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPlane {
    pub id: String,
    pub pos: [f32; 3],
    pub dir: [f32; 3],
    pub active: bool,
}

impl ClipPlane {
    pub fn from_desc(id: impl Into<String>, desc: &ClipDesc) -> Self {
        Self {
            id: id.into(),
            pos: desc.pos,
            dir: Self::normalized_dir(desc.dir),
            active: desc.active,
        }
    }

    /// Unit plane normal; a zero or non-finite direction falls back to the default
    pub fn normalized_dir(dir: [f32; 3]) -> [f32; 3] {
        Vec3::from(dir)
            .normalize_or(Vec3::from(defaults::CLIP_DIR))
            .to_array()
    }

    /// Signed distance of a point from the plane, positive on the clipped side
    pub fn signed_distance(&self, point: Vec3) -> f32 {
        (point - Vec3::from(self.pos)).dot(Vec3::from(self.dir))
    }
}

/// Clip plane creation parameters
#[derive(Debug, Clone, PartialEq)]
pub struct ClipDesc {
    pub pos: [f32; 3],
    pub dir: [f32; 3],
    pub active: bool,
}

impl Default for ClipDesc {
    fn default() -> Self {
        Self {
            pos: [0.0; 3],
            dir: defaults::CLIP_DIR,
            active: defaults::CLIP_ACTIVE,
        }
    }
}

impl ClipDesc {
    pub fn new(pos: [f32; 3], dir: [f32; 3]) -> Self {
        Self {
            pos,
            dir,
            ..Default::default()
        }
    }

    pub fn active(mut self, active: bool) -> Self {
        self.active = active;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_distance() {
        let clip = ClipPlane::from_desc("c", &ClipDesc::new([0.0, 1.0, 0.0], [0.0, 2.0, 0.0]));
        assert_eq!(clip.dir, [0.0, 1.0, 0.0]);
        assert_eq!(clip.signed_distance(Vec3::new(5.0, 3.0, 0.0)), 2.0);
        assert!(clip.signed_distance(Vec3::ZERO) < 0.0);
    }

    #[test]
    fn test_zero_direction_falls_back_to_default() {
        let clip = ClipPlane::from_desc("c", &ClipDesc::new([0.0; 3], [0.0; 3]));
        assert_eq!(clip.dir, defaults::CLIP_DIR);
        assert_eq!(ClipPlane::normalized_dir([0.0; 3]), defaults::CLIP_DIR);
    }
}
