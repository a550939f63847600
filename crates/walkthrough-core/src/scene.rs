//! Scene state: the registry plus the transform arena.
//!
//! The scene is the single source of truth for entity state; the engine only
//! ever sees it through flattened views handed out by the viewer.

use glam::{Mat4, Vec3};

use crate::aabb::{Aabb, DEFAULT_SCENE_AABB};
use crate::error::ViewerResult;
use crate::registry::{Destroyed, EntityRef, ModelKey, ObjectKey, Registry};
use crate::transform::TransformArena;

#[derive(Debug, Default)]
pub struct Scene {
    pub(crate) registry: Registry,
    pub(crate) transforms: TransformArena,
}

impl Scene {
    /// Creates a new empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry {
        &mut self.registry
    }

    pub fn transforms(&self) -> &TransformArena {
        &self.transforms
    }

    /// Effective matrix of an object: its own stack composed with its model's.
    ///
    /// Objects without a stack of their own still follow the model stack.
    pub fn object_world_matrix(&self, key: ObjectKey) -> Mat4 {
        let Some(object) = self.registry.object(key) else {
            return Mat4::IDENTITY;
        };
        match object.transform {
            Some(node) => self.transforms.world_matrix(node),
            None => self.model_world_matrix(object.model),
        }
    }

    pub fn model_world_matrix(&self, key: ModelKey) -> Mat4 {
        self.registry
            .model(key)
            .and_then(|m| m.transform)
            .map(|node| self.transforms.world_matrix(node))
            .unwrap_or(Mat4::IDENTITY)
    }

    /// World-space box of one object
    pub fn object_world_aabb(&self, key: ObjectKey) -> Aabb {
        match self.registry.object(key) {
            Some(object) => object.aabb.transformed(&self.object_world_matrix(key)),
            None => Aabb::EMPTY,
        }
    }

    /// Union of a model's object boxes, `EMPTY` for a model with no objects
    pub fn model_world_aabb(&self, key: ModelKey) -> Aabb {
        let Some(model) = self.registry.model(key) else {
            return Aabb::EMPTY;
        };
        model
            .objects
            .iter()
            .fold(Aabb::EMPTY, |acc, o| acc.union(&self.object_world_aabb(*o)))
    }

    /// Union of a model's object boxes as loaded, ignoring every stack
    pub fn model_loaded_aabb(&self, key: ModelKey) -> Aabb {
        let Some(model) = self.registry.model(key) else {
            return Aabb::EMPTY;
        };
        model
            .objects
            .iter()
            .filter_map(|o| self.registry.object(*o))
            .fold(Aabb::EMPTY, |acc, o| acc.union(&o.aabb))
    }

    /// Computes the bounding box of every object, if there are any.
    pub fn compute_bounds(&self) -> Option<Aabb> {
        let bounds = self
            .registry
            .objects()
            .fold(Aabb::EMPTY, |acc, (key, _)| acc.union(&self.object_world_aabb(key)));
        (!bounds.is_empty()).then_some(bounds)
    }

    /// Full-scene box, with a unit box standing in for an empty scene
    pub fn scene_aabb(&self) -> Aabb {
        self.compute_bounds().unwrap_or(DEFAULT_SCENE_AABB)
    }

    pub fn scene_center(&self) -> Vec3 {
        self.scene_aabb().center()
    }

    /// World box of any entity; lights, clips and pins contribute points
    pub fn entity_world_aabb(&self, entity: EntityRef) -> Aabb {
        match entity {
            EntityRef::Object(k) => self.object_world_aabb(k),
            EntityRef::Model(k) => self.model_world_aabb(k),
            EntityRef::Clip(k) => self
                .registry
                .clip(k)
                .map(|c| Aabb::from_point(Vec3::from(c.pos)))
                .unwrap_or(Aabb::EMPTY),
            EntityRef::Annotation(k) => self
                .annotation_world_pos(k)
                .map(Aabb::from_point)
                .unwrap_or(Aabb::EMPTY),
            EntityRef::Light(k) => self
                .registry
                .light(k)
                .filter(|l| l.kind == crate::lights::LightKind::Point)
                .map(|l| Aabb::from_point(Vec3::from(l.pos)))
                .unwrap_or(Aabb::EMPTY),
        }
    }

    /// Destroy an entity and free the transform nodes it owned
    pub fn destroy(&mut self, id: &str) -> ViewerResult<Destroyed> {
        let report = self.registry.destroy(id)?;
        for node in &report.transforms {
            self.transforms.remove(*node);
        }
        tracing::debug!(
            "Destroyed '{}' ({} objects, {} annotations)",
            id,
            report.objects.len(),
            report.annotations.len()
        );
        Ok(report)
    }

    /// Remove every model, clip and light (annotations go with their objects)
    pub fn clear(&mut self) -> Destroyed {
        let mut ids: Vec<String> = Vec::new();
        ids.extend(self.registry.models().map(|(_, m)| m.id.clone()));
        ids.extend(self.registry.clips().map(|(_, c)| c.id.clone()));
        ids.extend(self.registry.lights().map(|(_, l)| l.id.clone()));

        let mut report = Destroyed::default();
        for id in ids {
            if let Ok(destroyed) = self.destroy(&id) {
                report.merge(destroyed);
            }
        }
        report
    }
}
