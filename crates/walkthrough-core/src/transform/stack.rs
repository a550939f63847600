//! Lazy stack materialization and per-entity scale/rotate/translate access

use glam::Vec3;

use super::{TransformKey, TransformNode};
use crate::aabb::Aabb;
use crate::defaults;
use crate::error::{ViewerError, ViewerResult};
use crate::registry::EntityRef;
use crate::scene::Scene;

/// Which component of a stack an operation touches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackField {
    Scale,
    Rotate,
    Translate,
}

impl StackField {
    pub fn default_value(&self) -> Vec3 {
        Vec3::from(match self {
            StackField::Scale => defaults::SCALE,
            StackField::Rotate => defaults::ROTATE,
            StackField::Translate => defaults::TRANSLATE,
        })
    }

    fn read(&self, node: &TransformNode) -> Vec3 {
        match self {
            StackField::Scale => node.scale,
            StackField::Rotate => node.rotate,
            StackField::Translate => node.translate,
        }
    }

    fn write(&self, node: &mut TransformNode, value: Vec3) {
        match self {
            StackField::Scale => node.scale = value,
            StackField::Rotate => node.rotate = value,
            StackField::Translate => node.translate = value,
        }
    }
}

fn box_center(aabb: &Aabb) -> Vec3 {
    if aabb.is_empty() {
        Vec3::ZERO
    } else {
        aabb.center()
    }
}

impl Scene {
    fn stack_key(&self, entity: EntityRef) -> Option<TransformKey> {
        match entity {
            EntityRef::Model(k) => self.registry.model(k)?.transform,
            EntityRef::Object(k) => self.registry.object(k)?.transform,
            _ => None,
        }
    }

    fn require_transformable(&self, entity: EntityRef) -> ViewerResult<()> {
        match entity {
            EntityRef::Model(_) | EntityRef::Object(_) => Ok(()),
            other => {
                let id = self.registry.id_of(other).unwrap_or_default().to_string();
                Err(ViewerError::kind_mismatch(&id, "model or object", other.kind()))
            }
        }
    }

    /// The stack of a model or object, if one has been materialized
    pub fn stack(&self, entity: EntityRef) -> Option<&TransformNode> {
        self.stack_key(entity).and_then(|k| self.transforms.get(k))
    }

    /// Materialize the stack of a model or object if it does not exist yet.
    ///
    /// The pivot is the entity's center relative to the scene center, both
    /// taken now and never recomputed. Both points are in the model's local
    /// frame: a model pivots about its loaded geometry, an object about its
    /// own loaded box.
    pub fn ensure_stack(&mut self, entity: EntityRef) -> ViewerResult<TransformKey> {
        self.require_transformable(entity)?;
        if let Some(existing) = self.stack_key(entity) {
            return Ok(existing);
        }

        let scene_center = self.scene_center();
        match entity {
            EntityRef::Model(model_key) => {
                let center = box_center(&self.model_loaded_aabb(model_key));
                let pivot = center - scene_center;
                let key = self
                    .transforms
                    .insert(TransformNode::new(pivot, None).with_origin(scene_center));
                let model = self
                    .registry
                    .model_mut(model_key)
                    .ok_or_else(|| ViewerError::NotFound(format!("{:?}", model_key)))?;
                model.transform = Some(key);

                // Object stacks created before the model's now sit on top of it
                let members = model.objects.clone();
                for object_key in members {
                    if let Some(node) = self.registry.object(object_key).and_then(|o| o.transform) {
                        self.transforms.set_parent(node, Some(key));
                    }
                }
                tracing::debug!("Created model stack, pivot {:?}", pivot);
                Ok(key)
            }
            EntityRef::Object(object_key) => {
                let object = self
                    .registry
                    .object(object_key)
                    .ok_or_else(|| ViewerError::NotFound(format!("{:?}", object_key)))?;
                let (model_key, center) = (object.model, box_center(&object.aabb));

                let model_matrix = self.model_world_matrix(model_key);
                let origin = if model_matrix.determinant().abs() > f32::EPSILON {
                    model_matrix.inverse().transform_point3(scene_center)
                } else {
                    scene_center
                };
                let pivot = center - origin;
                let parent = self.registry.model(model_key).and_then(|m| m.transform);
                let key = self
                    .transforms
                    .insert(TransformNode::new(pivot, parent).with_origin(origin));
                if let Some(object) = self.registry.object_mut(object_key) {
                    object.transform = Some(key);
                }
                tracing::debug!("Created object stack, pivot {:?}", pivot);
                Ok(key)
            }
            _ => unreachable!("checked by require_transformable"),
        }
    }

    /// Read one component, returning the default when no stack exists
    pub fn get_stack_field(&self, entity: EntityRef, field: StackField) -> ViewerResult<Vec3> {
        self.require_transformable(entity)?;
        Ok(self
            .stack(entity)
            .map(|node| field.read(node))
            .unwrap_or_else(|| field.default_value()))
    }

    /// Write one component, materializing the stack first
    pub fn set_stack_field(
        &mut self,
        entity: EntityRef,
        field: StackField,
        value: Vec3,
    ) -> ViewerResult<()> {
        if !value.is_finite() {
            return Err(ViewerError::InvalidConfig(format!(
                "non-finite {:?} value {:?}",
                field, value
            )));
        }
        let key = self.ensure_stack(entity)?;
        if let Some(node) = self.transforms.get_mut(key) {
            field.write(node, value);
        }
        Ok(())
    }

    pub fn get_scale(&self, entity: EntityRef) -> ViewerResult<Vec3> {
        self.get_stack_field(entity, StackField::Scale)
    }

    pub fn set_scale(&mut self, entity: EntityRef, scale: Vec3) -> ViewerResult<()> {
        self.set_stack_field(entity, StackField::Scale, scale)
    }

    /// Euler XYZ degrees
    pub fn get_rotate(&self, entity: EntityRef) -> ViewerResult<Vec3> {
        self.get_stack_field(entity, StackField::Rotate)
    }

    pub fn set_rotate(&mut self, entity: EntityRef, degrees: Vec3) -> ViewerResult<()> {
        self.set_stack_field(entity, StackField::Rotate, degrees)
    }

    pub fn get_translate(&self, entity: EntityRef) -> ViewerResult<Vec3> {
        self.get_stack_field(entity, StackField::Translate)
    }

    pub fn set_translate(&mut self, entity: EntityRef, translate: Vec3) -> ViewerResult<()> {
        self.set_stack_field(entity, StackField::Translate, translate)
    }

    /// Relative translation increment
    pub fn add_translate(&mut self, entity: EntityRef, delta: Vec3) -> ViewerResult<()> {
        let current = self.get_translate(entity)?;
        self.set_translate(entity, current + delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aabb::Aabb;
    use crate::registry::{Model, Object};
    use approx::assert_relative_eq;

    fn scene_with_saw() -> Scene {
        let mut scene = Scene::new();
        let model = scene
            .registry
            .register_model(Model::new("saw", "saw.gltf"))
            .unwrap();
        scene
            .registry
            .register_object(Object::new(
                "saw#1",
                model,
                Aabb::from_array([0.0, 0.0, 0.0, 2.0, 2.0, 2.0]),
            ))
            .unwrap();
        scene
            .registry
            .register_object(Object::new(
                "saw#2",
                model,
                Aabb::from_array([4.0, 0.0, 0.0, 6.0, 2.0, 2.0]),
            ))
            .unwrap();
        scene
    }

    fn entity(scene: &Scene, id: &str) -> EntityRef {
        scene.registry.lookup(id).unwrap()
    }

    #[test]
    fn test_getters_do_not_materialize() {
        let scene = scene_with_saw();
        let saw = entity(&scene, "saw");
        assert_eq!(scene.get_scale(saw).unwrap(), Vec3::ONE);
        assert_eq!(scene.get_translate(saw).unwrap(), Vec3::ZERO);
        assert!(scene.stack(saw).is_none());
        assert!(scene.transforms.is_empty());
    }

    #[test]
    fn test_pivot_frozen_at_creation() {
        let mut scene = scene_with_saw();
        let obj = entity(&scene, "saw#1");
        scene.set_translate(obj, Vec3::new(10.0, 0.0, 0.0)).unwrap();
        let pivot = scene.stack(obj).unwrap().pivot;

        // Scene box is [0..6, 0..2, 0..2], center (3,1,1); object center (1,1,1)
        assert_relative_eq!(pivot.x, -2.0, epsilon = 1e-6);

        scene.set_scale(obj, Vec3::splat(2.0)).unwrap();
        assert_eq!(scene.stack(obj).unwrap().pivot, pivot);
        assert_eq!(scene.stack(obj).unwrap().anchor(), Vec3::ONE);
    }

    #[test]
    fn test_model_scale_composes_with_object_scale() {
        let mut scene = scene_with_saw();
        let model = entity(&scene, "saw");
        let obj = entity(&scene, "saw#1");
        scene.set_scale(model, Vec3::splat(2.0)).unwrap();
        scene.set_scale(obj, Vec3::splat(0.5)).unwrap();

        let EntityRef::Object(key) = obj else { unreachable!() };
        let (scale, _, _) = scene.object_world_matrix(key).to_scale_rotation_translation();
        assert_relative_eq!(scale.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(scale.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(scale.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn test_object_stack_created_first_is_reparented() {
        let mut scene = scene_with_saw();
        let model = entity(&scene, "saw");
        let obj = entity(&scene, "saw#1");
        scene.set_rotate(obj, Vec3::new(0.0, 0.0, 0.0)).unwrap();
        scene.set_translate(model, Vec3::new(0.0, 3.0, 0.0)).unwrap();

        let EntityRef::Object(key) = obj else { unreachable!() };
        let moved = scene.object_world_aabb(key);
        assert_relative_eq!(moved.min.y, 3.0, epsilon = 1e-5);
    }

    #[test]
    fn test_object_turns_in_place_under_moved_model() {
        let mut scene = scene_with_saw();
        let model = entity(&scene, "saw");
        let obj = entity(&scene, "saw#1");
        let EntityRef::Object(key) = obj else { unreachable!() };

        scene.set_translate(model, Vec3::new(0.0, 5.0, 0.0)).unwrap();
        scene.set_scale(model, Vec3::splat(2.0)).unwrap();
        let before = scene.object_world_aabb(key).center();

        scene.set_rotate(obj, Vec3::new(0.0, 0.0, 90.0)).unwrap();
        let after = scene.object_world_aabb(key).center();
        assert!(after.abs_diff_eq(before, 1e-4), "{before} -> {after}");
        assert!(before.abs_diff_eq(Vec3::new(-1.0, 6.0, 1.0), 1e-4));
    }

    #[test]
    fn test_model_pivot_ignores_object_stacks() {
        let mut scene = scene_with_saw();
        let model = entity(&scene, "saw");
        let obj = entity(&scene, "saw#1");
        scene.set_translate(obj, Vec3::new(-10.0, 0.0, 0.0)).unwrap();
        scene.set_scale(model, Vec3::splat(2.0)).unwrap();

        let node = scene.stack(model).unwrap();
        assert_eq!(node.anchor(), Vec3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_object_change_leaves_siblings_alone() {
        let mut scene = scene_with_saw();
        let obj = entity(&scene, "saw#1");
        scene.add_translate(obj, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        scene.add_translate(obj, Vec3::new(0.0, 0.0, 1.0)).unwrap();
        assert_eq!(scene.get_translate(obj).unwrap(), Vec3::new(0.0, 0.0, 2.0));

        let EntityRef::Object(sibling) = entity(&scene, "saw#2") else { unreachable!() };
        assert_eq!(
            scene.object_world_aabb(sibling).to_array(),
            [4.0, 0.0, 0.0, 6.0, 2.0, 2.0]
        );
    }

    #[test]
    fn test_rejects_non_transformable() {
        let mut scene = scene_with_saw();
        scene
            .registry
            .register_clip(crate::clips::ClipPlane::from_desc(
                "clip",
                &crate::clips::ClipDesc::default(),
            ))
            .unwrap();
        let clip = entity(&scene, "clip");
        assert!(matches!(
            scene.set_scale(clip, Vec3::ONE),
            Err(ViewerError::TypeMismatch { .. })
        ));
    }
}
