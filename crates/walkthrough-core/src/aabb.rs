//! Axis-aligned bounding boxes

use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Axis-aligned bounding box in world space.
///
/// Travels across the engine boundary as `[xmin, ymin, zmin, xmax, ymax, zmax]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 6]", into = "[f32; 6]")]
pub struct Aabb {
    pub min: Vec3,
    pub max: Vec3,
}

/// Scene box reported when nothing contributes any bounds
pub const DEFAULT_SCENE_AABB: Aabb = Aabb {
    min: Vec3::splat(-1.0),
    max: Vec3::splat(1.0),
};

impl Aabb {
    /// Inverted box that any union replaces
    pub const EMPTY: Aabb = Aabb {
        min: Vec3::splat(f32::INFINITY),
        max: Vec3::splat(f32::NEG_INFINITY),
    };

    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    pub fn from_array(a: [f32; 6]) -> Self {
        Self {
            min: Vec3::new(a[0], a[1], a[2]),
            max: Vec3::new(a[3], a[4], a[5]),
        }
    }

    pub fn to_array(&self) -> [f32; 6] {
        [
            self.min.x, self.min.y, self.min.z, self.max.x, self.max.y, self.max.z,
        ]
    }

    /// Degenerate box around a single point
    pub fn from_point(p: Vec3) -> Self {
        Self { min: p, max: p }
    }

    /// Bounds of a point cloud, `EMPTY` for no points
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a [f32; 3]>) -> Self {
        points
            .into_iter()
            .fold(Self::EMPTY, |acc, p| acc.include(Vec3::from(*p)))
    }

    /// Returns true if no point has been accumulated (min > max on any axis)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y || self.min.z > self.max.z
    }

    /// Grow to contain a point
    pub fn include(&self, p: Vec3) -> Self {
        Self {
            min: self.min.min(p),
            max: self.max.max(p),
        }
    }

    /// Component-wise min/max of two boxes
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Length of the box diagonal
    pub fn diagonal(&self) -> f32 {
        if self.is_empty() {
            0.0
        } else {
            self.size().length()
        }
    }

    /// Transform all eight corners and re-fit an axis-aligned box around them
    pub fn transformed(&self, m: &Mat4) -> Self {
        if self.is_empty() {
            return *self;
        }
        let mut out = Self::EMPTY;
        for i in 0..8 {
            let corner = Vec3::new(
                if i & 1 == 0 { self.min.x } else { self.max.x },
                if i & 2 == 0 { self.min.y } else { self.max.y },
                if i & 4 == 0 { self.min.z } else { self.max.z },
            );
            out = out.include(m.transform_point3(corner));
        }
        out
    }
}

impl Default for Aabb {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl From<[f32; 6]> for Aabb {
    fn from(a: [f32; 6]) -> Self {
        Self::from_array(a)
    }
}

impl From<Aabb> for [f32; 6] {
    fn from(b: Aabb) -> Self {
        b.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_union_is_component_wise() {
        let a = Aabb::from_array([0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
        let b = Aabb::from_array([-1.0, 0.5, 0.5, 0.5, 2.0, 0.75]);
        assert_eq!(a.union(&b).to_array(), [-1.0, 0.0, 0.0, 1.0, 2.0, 1.0]);
    }

    #[test]
    fn test_empty_union_identity() {
        let a = Aabb::from_array([1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert!(Aabb::EMPTY.is_empty());
        assert_eq!(Aabb::EMPTY.union(&a), a);
        assert_eq!(Aabb::EMPTY.diagonal(), 0.0);
    }

    #[test]
    fn test_transformed_rotation_refits() {
        let a = Aabb::from_array([0.0, 0.0, 0.0, 2.0, 1.0, 1.0]);
        let m = Mat4::from_rotation_z(std::f32::consts::FRAC_PI_2);
        let t = a.transformed(&m);
        assert!((t.min.x - -1.0).abs() < 1e-5);
        assert!((t.max.y - 2.0).abs() < 1e-5);
    }
}
