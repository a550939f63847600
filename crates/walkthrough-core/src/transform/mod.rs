//! Transform stacks for models and objects
//!
//! Each stack is a node in a [`TransformArena`]. A node applies, to a point
//! in the model's local frame (where geometry sits as loaded):
//!
//! ```text
//! T(anchor) * T(translate) * Rx * Ry * Rz * S(scale) * T(-anchor)
//! ```
//!
//! and then its parent's matrix, so an object node parented to its model node
//! picks up every later change to the model.
//!
//! `anchor = origin + pivot`: the pivot is kept relative to the scene center
//! (`origin`, in that same frame) captured when the stack was created.

mod stack;

pub use stack::*;

use glam::{EulerRot, Mat4, Quat, Vec3};
use slotmap::{SlotMap, new_key_type};

use crate::defaults;

new_key_type! {
    /// Handle to a node in the transform arena
    pub struct TransformKey;
}

/// One pivot-centered scale/rotate/translate layer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformNode {
    /// Entity center relative to `origin`, fixed at creation
    pub pivot: Vec3,
    /// Scene center at creation, in the model's local frame
    pub origin: Vec3,
    pub scale: Vec3,
    /// Euler XYZ in degrees
    pub rotate: Vec3,
    pub translate: Vec3,
    pub parent: Option<TransformKey>,
}

impl TransformNode {
    pub fn new(pivot: Vec3, parent: Option<TransformKey>) -> Self {
        Self {
            pivot,
            origin: Vec3::ZERO,
            scale: Vec3::from(defaults::SCALE),
            rotate: Vec3::from(defaults::ROTATE),
            translate: Vec3::from(defaults::TRANSLATE),
            parent,
        }
    }

    pub fn with_origin(mut self, origin: Vec3) -> Self {
        self.origin = origin;
        self
    }

    /// Point in the model's local frame the layer scales and rotates about
    pub fn anchor(&self) -> Vec3 {
        self.origin + self.pivot
    }

    /// Orientation from XYZ Euler degrees, composed X, then Y, then Z
    pub fn rotation(&self) -> Quat {
        euler_degrees_to_quat(self.rotate)
    }

    /// This layer alone, without the parent chain
    pub fn local_matrix(&self) -> Mat4 {
        let anchor = self.anchor();
        Mat4::from_translation(anchor + self.translate)
            * Mat4::from_quat(self.rotation())
            * Mat4::from_scale(self.scale)
            * Mat4::from_translation(-anchor)
    }
}

/// Quaternion for XYZ Euler angles in degrees
pub fn euler_degrees_to_quat(degrees: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::XYZ,
        degrees.x.to_radians(),
        degrees.y.to_radians(),
        degrees.z.to_radians(),
    )
}

/// Arena of transform nodes addressed by integer-backed handles.
///
/// Parent links are handles, never references, so removing a model node only
/// requires re-pointing the children that named it.
#[derive(Debug, Default)]
pub struct TransformArena {
    nodes: SlotMap<TransformKey, TransformNode>,
}

impl TransformArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: TransformNode) -> TransformKey {
        self.nodes.insert(node)
    }

    /// Remove a node; children that pointed at it lose their parent
    pub fn remove(&mut self, key: TransformKey) -> Option<TransformNode> {
        let node = self.nodes.remove(key)?;
        for child in self.nodes.values_mut() {
            if child.parent == Some(key) {
                child.parent = None;
            }
        }
        Some(node)
    }

    pub fn get(&self, key: TransformKey) -> Option<&TransformNode> {
        self.nodes.get(key)
    }

    pub fn get_mut(&mut self, key: TransformKey) -> Option<&mut TransformNode> {
        self.nodes.get_mut(key)
    }

    pub fn set_parent(&mut self, key: TransformKey, parent: Option<TransformKey>) {
        if let Some(node) = self.nodes.get_mut(key) {
            node.parent = parent;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }

    /// World matrix of a node: parents first, then this node.
    ///
    /// Evaluated on every call, so a parent change shows up immediately.
    pub fn world_matrix(&self, key: TransformKey) -> Mat4 {
        let mut chain = Vec::new();
        let mut current = Some(key);
        while let Some(k) = current {
            let Some(node) = self.nodes.get(k) else {
                break;
            };
            chain.push(node);
            current = node.parent;
            // Stacks are at most model -> object deep; anything longer is a cycle
            if chain.len() > 8 {
                break;
            }
        }

        chain
            .into_iter()
            .rev()
            .fold(Mat4::IDENTITY, |acc, node| acc * node.local_matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_node_is_identity() {
        let node = TransformNode::new(Vec3::new(3.0, -2.0, 1.0), None);
        assert!(node.local_matrix().abs_diff_eq(Mat4::IDENTITY, 1e-6));
    }

    #[test]
    fn test_scale_about_pivot_keeps_pivot_fixed() {
        let pivot = Vec3::new(1.0, 1.0, 1.0);
        let mut node = TransformNode::new(pivot, None);
        node.scale = Vec3::splat(3.0);

        let m = node.local_matrix();
        assert_relative_eq!(m.transform_point3(pivot).x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(m.transform_point3(Vec3::new(2.0, 1.0, 1.0)).x, 4.0, epsilon = 1e-6);
    }

    #[test]
    fn test_anchor_adds_origin() {
        let mut node =
            TransformNode::new(Vec3::new(1.0, 0.0, 0.0), None).with_origin(Vec3::new(2.0, 0.0, 0.0));
        node.rotate = Vec3::new(0.0, 0.0, 180.0);
        let fixed = node.local_matrix().transform_point3(Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(fixed.x, 3.0, epsilon = 1e-5);
        assert_relative_eq!(fixed.y, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn test_euler_x_then_y_then_z() {
        let q = euler_degrees_to_quat(Vec3::new(90.0, 0.0, 90.0));
        let expected = Quat::from_rotation_x(90f32.to_radians()) * Quat::from_rotation_z(90f32.to_radians());
        assert_relative_eq!(q.dot(expected).abs(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_parent_changes_are_live() {
        let mut arena = TransformArena::new();
        let parent = arena.insert(TransformNode::new(Vec3::ZERO, None));
        let child = arena.insert(TransformNode::new(Vec3::ZERO, Some(parent)));

        arena.get_mut(parent).unwrap().translate = Vec3::new(5.0, 0.0, 0.0);
        let p = arena.world_matrix(child).transform_point3(Vec3::ZERO);
        assert_relative_eq!(p.x, 5.0, epsilon = 1e-6);

        arena.remove(parent);
        assert_eq!(arena.get(child).unwrap().parent, None);
    }
}
