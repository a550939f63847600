//! Annotations pinned to object surfaces
//!
//! A pin sits on one triangle of an object, located by triangle index and
//! barycentric weights, so it follows the object through every transform.

use glam::Vec3;

use crate::defaults;
use crate::error::{ViewerError, ViewerResult};
use crate::registry::{AnnotationKey, ObjectKey};
use crate::scene::Scene;

/// A live annotation
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub id: String,
    pub object: ObjectKey,
    pub prim_index: u32,
    pub bary: [f32; 3],
    pub glyph: String,
    pub title: String,
    pub desc: String,
    pub pin_shown: bool,
    pub label_shown: bool,
    pub occludable: bool,
    pub eye: Option<[f32; 3]>,
    pub look: Option<[f32; 3]>,
    pub up: Option<[f32; 3]>,
}

/// Annotation creation parameters.
///
/// `object` and `prim_index` are required; everything else has a default.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnotationDesc {
    pub object: Option<String>,
    pub prim_index: Option<u32>,
    pub bary: [f32; 3],
    pub glyph: String,
    pub title: String,
    pub desc: String,
    pub pin_shown: bool,
    pub label_shown: bool,
    pub occludable: bool,
    pub eye: Option<[f32; 3]>,
    pub look: Option<[f32; 3]>,
    pub up: Option<[f32; 3]>,
}

impl Default for AnnotationDesc {
    fn default() -> Self {
        Self {
            object: None,
            prim_index: None,
            bary: defaults::ANNOTATION_BARY,
            glyph: defaults::ANNOTATION_GLYPH.to_string(),
            title: String::new(),
            desc: String::new(),
            pin_shown: defaults::ANNOTATION_PIN_SHOWN,
            label_shown: defaults::ANNOTATION_LABEL_SHOWN,
            occludable: defaults::ANNOTATION_OCCLUDABLE,
            eye: None,
            look: None,
            up: None,
        }
    }
}

impl AnnotationDesc {
    pub fn new(object: impl Into<String>, prim_index: u32) -> Self {
        Self {
            object: Some(object.into()),
            prim_index: Some(prim_index),
            ..Default::default()
        }
    }

    pub fn bary(mut self, bary: [f32; 3]) -> Self {
        self.bary = bary;
        self
    }

    pub fn glyph(mut self, glyph: impl Into<String>) -> Self {
        self.glyph = glyph.into();
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn desc(mut self, desc: impl Into<String>) -> Self {
        self.desc = desc.into();
        self
    }

    pub fn pin_shown(mut self, shown: bool) -> Self {
        self.pin_shown = shown;
        self
    }

    pub fn label_shown(mut self, shown: bool) -> Self {
        self.label_shown = shown;
        self
    }

    pub fn occludable(mut self, occludable: bool) -> Self {
        self.occludable = occludable;
        self
    }

    /// Camera viewpoint to fly to when the annotation is focused
    pub fn viewpoint(mut self, eye: [f32; 3], look: [f32; 3], up: [f32; 3]) -> Self {
        self.eye = Some(eye);
        self.look = Some(look);
        self.up = Some(up);
        self
    }
}

impl Scene {
    /// Validate a description and register the annotation
    pub fn create_annotation(
        &mut self,
        id: &str,
        desc: &AnnotationDesc,
    ) -> ViewerResult<AnnotationKey> {
        let object_id = desc.object.as_deref().ok_or_else(|| {
            ViewerError::InvalidConfig(format!("annotation '{}' has no target object", id))
        })?;
        let prim_index = desc.prim_index.ok_or_else(|| {
            ViewerError::InvalidConfig(format!("annotation '{}' has no triangle index", id))
        })?;
        let object_key = self.registry.object_key(object_id)?;
        self.check_prim_index(id, object_key, prim_index)?;

        let annotation = Annotation {
            id: id.to_string(),
            object: object_key,
            prim_index,
            bary: desc.bary,
            glyph: desc.glyph.clone(),
            title: desc.title.clone(),
            desc: desc.desc.clone(),
            pin_shown: desc.pin_shown,
            label_shown: desc.label_shown,
            occludable: desc.occludable,
            eye: desc.eye,
            look: desc.look,
            up: desc.up,
        };
        self.registry.register_annotation(annotation)
    }

    /// Move an annotation onto another object's triangle
    pub fn retarget_annotation(
        &mut self,
        key: AnnotationKey,
        object_id: &str,
        prim_index: u32,
        bary: [f32; 3],
    ) -> ViewerResult<()> {
        let object_key = self.registry.object_key(object_id)?;
        let id = self
            .registry
            .annotation(key)
            .map(|a| a.id.clone())
            .unwrap_or_default();
        self.check_prim_index(&id, object_key, prim_index)?;
        self.registry.retarget_annotation(key, object_key)?;
        if let Some(annotation) = self.registry.annotation_mut(key) {
            annotation.prim_index = prim_index;
            annotation.bary = bary;
        }
        Ok(())
    }

    fn check_prim_index(&self, id: &str, object: ObjectKey, prim_index: u32) -> ViewerResult<()> {
        if let Some(obj) = self.registry.object(object)
            && !obj.indices.is_empty()
            && prim_index as usize >= obj.triangle_count()
        {
            return Err(ViewerError::InvalidConfig(format!(
                "annotation '{}': triangle {} out of range for '{}' ({} triangles)",
                id,
                prim_index,
                obj.id,
                obj.triangle_count()
            )));
        }
        Ok(())
    }

    /// World position of an annotation pin.
    ///
    /// Interpolates the pinned triangle and applies the object's live world
    /// matrix; objects without geometry fall back to their box center.
    pub fn annotation_world_pos(&self, key: AnnotationKey) -> Option<Vec3> {
        let annotation = self.registry.annotation(key)?;
        let object = self.registry.object(annotation.object)?;
        let world = self.object_world_matrix(annotation.object);

        match object.triangle(annotation.prim_index as usize) {
            Some([a, b, c]) => {
                let [u, v, w] = annotation.bary;
                Some(world.transform_point3(a * u + b * v + c * w))
            }
            None if !object.aabb.is_empty() => Some(object.aabb.transformed(&world).center()),
            None => None,
        }
    }
}
