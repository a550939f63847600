//! Model and Object definitions

use glam::Vec3;

use super::{ModelKey, ObjectKey};
use crate::aabb::Aabb;
use crate::defaults;
use crate::engine::ParsedObject;
use crate::transform::TransformKey;

/// A loaded (or loading) model
#[derive(Debug, Clone)]
pub struct Model {
    pub id: String,
    /// Opaque locator handed to the engine
    pub src: String,
    /// Owned objects in registration order
    pub objects: Vec<ObjectKey>,
    /// Transform stack, created on first scale/rotate/translate
    pub transform: Option<TransformKey>,
    /// False until the engine reports the load finished
    pub loaded: bool,
}

impl Model {
    pub fn new(id: impl Into<String>, src: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            src: src.into(),
            objects: Vec::new(),
            transform: None,
            loaded: false,
        }
    }
}

/// Type, color and opacity an object had when its model finished loading.
///
/// Reloading the same source brings these back, so bookmarks record only
/// departures from them.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedAppearance {
    pub type_tag: String,
    pub color: [f32; 3],
    pub opacity: f32,
}

impl Default for LoadedAppearance {
    fn default() -> Self {
        Self {
            type_tag: defaults::OBJECT_TYPE.to_string(),
            color: defaults::OBJECT_COLOR,
            opacity: defaults::OBJECT_OPACITY,
        }
    }
}

/// An individually addressable piece of a model
#[derive(Debug, Clone)]
pub struct Object {
    pub id: String,
    /// Owning model, fixed at creation
    pub model: ModelKey,
    /// Registration sequence number, orders type buckets
    pub(crate) seq: u64,
    pub type_tag: String,
    pub visible: bool,
    pub opacity: f32,
    pub color: [f32; 3],
    pub clippable: bool,
    pub pickable: bool,
    pub outlined: bool,
    /// Geometry bounds before any stack is applied
    pub aabb: Aabb,
    /// Vertex positions, may be empty when the engine keeps geometry to itself
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices into `positions`
    pub indices: Vec<u32>,
    pub transform: Option<TransformKey>,
    pub loaded: LoadedAppearance,
}

impl Object {
    /// Create an object with every attribute at its default
    pub fn new(id: impl Into<String>, model: ModelKey, aabb: Aabb) -> Self {
        let loaded = LoadedAppearance::default();
        Self {
            id: id.into(),
            model,
            seq: 0,
            type_tag: loaded.type_tag.clone(),
            visible: defaults::OBJECT_VISIBLE,
            opacity: loaded.opacity,
            color: loaded.color,
            clippable: defaults::OBJECT_CLIPPABLE,
            pickable: defaults::OBJECT_PICKABLE,
            outlined: defaults::OBJECT_OUTLINED,
            aabb,
            positions: Vec::new(),
            indices: Vec::new(),
            transform: None,
            loaded,
        }
    }

    /// Create an object from what the loader parsed, keeping loader-provided
    /// appearance where present
    pub fn from_parsed(id: impl Into<String>, model: ModelKey, parsed: ParsedObject) -> Self {
        let aabb = if parsed.aabb.is_empty() {
            Aabb::from_points(&parsed.positions)
        } else {
            parsed.aabb
        };
        let mut object = Self::new(id, model, aabb);
        if let Some(tag) = parsed.type_tag {
            object.loaded.type_tag = tag;
        }
        if let Some(color) = parsed.color {
            object.loaded.color = color;
        }
        if let Some(opacity) = parsed.opacity {
            object.loaded.opacity = opacity.clamp(0.0, 1.0);
        }
        object.type_tag = object.loaded.type_tag.clone();
        object.color = object.loaded.color;
        object.opacity = object.loaded.opacity;
        object.positions = parsed.positions;
        object.indices = parsed.indices;
        object
    }

    /// Number of indexed triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Corners of a triangle in object space, if geometry is available
    pub fn triangle(&self, prim_index: usize) -> Option<[Vec3; 3]> {
        let base = prim_index.checked_mul(3)?;
        let idx = self.indices.get(base..base + 3)?;
        let mut out = [Vec3::ZERO; 3];
        for (slot, i) in out.iter_mut().zip(idx) {
            *slot = Vec3::from(*self.positions.get(*i as usize)?);
        }
        Some(out)
    }
}
