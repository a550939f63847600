//! Scale, rotate and translate by id

use glam::{Mat4, Vec3};

use super::Viewer;
use crate::engine::SceneEngine;
use crate::error::ViewerResult;
use crate::registry::EntityRef;
use crate::resolve::Target;
use crate::transform::StackField;

impl<E: SceneEngine> Viewer<E> {
    /// Write one stack component on every model or object a target names.
    ///
    /// Each entity gets the same value independently.
    fn set_stack_field(&mut self, target: Target, field: StackField, value: Vec3) -> usize {
        let mut count = 0;
        for entity in self.scene.transform_targets(&target) {
            match self.scene.set_stack_field(entity, field, value) {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!("Cannot set {:?}: {}", field, e),
            }
        }
        count
    }

    fn get_stack_field(&self, id: &str, field: StackField) -> ViewerResult<Vec3> {
        let entity = self.scene.registry.lookup(id)?;
        self.scene.get_stack_field(entity, field)
    }

    pub fn set_scale(&mut self, target: impl Into<Target>, scale: impl Into<Vec3>) -> usize {
        self.set_stack_field(target.into(), StackField::Scale, scale.into())
    }

    pub fn get_scale(&self, id: &str) -> ViewerResult<Vec3> {
        self.get_stack_field(id, StackField::Scale)
    }

    /// Euler XYZ, degrees
    pub fn set_rotate(&mut self, target: impl Into<Target>, degrees: impl Into<Vec3>) -> usize {
        self.set_stack_field(target.into(), StackField::Rotate, degrees.into())
    }

    pub fn get_rotate(&self, id: &str) -> ViewerResult<Vec3> {
        self.get_stack_field(id, StackField::Rotate)
    }

    pub fn set_translate(
        &mut self,
        target: impl Into<Target>,
        translate: impl Into<Vec3>,
    ) -> usize {
        self.set_stack_field(target.into(), StackField::Translate, translate.into())
    }

    pub fn get_translate(&self, id: &str) -> ViewerResult<Vec3> {
        self.get_stack_field(id, StackField::Translate)
    }

    /// Add to the current translation of each target
    pub fn add_translate(&mut self, target: impl Into<Target>, delta: impl Into<Vec3>) -> usize {
        let delta = delta.into();
        let mut count = 0;
        for entity in self.scene.transform_targets(&target.into()) {
            match self.scene.add_translate(entity, delta) {
                Ok(()) => count += 1,
                Err(e) => tracing::warn!("Cannot translate: {}", e),
            }
        }
        count
    }

    /// Effective world matrix of a model or object
    pub fn world_matrix(&self, id: &str) -> ViewerResult<Mat4> {
        match self.scene.registry.lookup(id)? {
            EntityRef::Model(key) => Ok(self.scene.model_world_matrix(key)),
            EntityRef::Object(key) => Ok(self.scene.object_world_matrix(key)),
            other => Err(crate::error::ViewerError::kind_mismatch(
                id,
                "model or object",
                other.kind(),
            )),
        }
    }
}
