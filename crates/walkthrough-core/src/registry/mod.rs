//! Entity registry
//!
//! Models, objects, lights, clip planes and annotations share one flat string
//! namespace. Each id maps to an [`EntityRef`]: the entity kind plus a
//! generational key into that kind's arena. Derived indexes (objects by type
//! tag, annotations by object) are maintained alongside.

mod arena;
mod entities;
mod graph;

pub use arena::OrderedArena;
pub use entities::*;
pub use graph::Destroyed;

use std::collections::{BTreeMap, HashMap};

use slotmap::new_key_type;

use crate::annotations::Annotation;
use crate::clips::ClipPlane;
use crate::error::{ViewerError, ViewerResult};
use crate::lights::Light;

new_key_type! {
    pub struct ModelKey;
    pub struct ObjectKey;
    pub struct LightKey;
    pub struct ClipKey;
    pub struct AnnotationKey;
}

/// Kinds of addressable entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Model,
    Object,
    Light,
    Clip,
    Annotation,
}

impl EntityKind {
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Model => "model",
            EntityKind::Object => "object",
            EntityKind::Light => "light",
            EntityKind::Clip => "clip",
            EntityKind::Annotation => "annotation",
        }
    }
}

/// Handle to a registered entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityRef {
    Model(ModelKey),
    Object(ObjectKey),
    Light(LightKey),
    Clip(ClipKey),
    Annotation(AnnotationKey),
}

impl EntityRef {
    pub fn kind(&self) -> EntityKind {
        match self {
            EntityRef::Model(_) => EntityKind::Model,
            EntityRef::Object(_) => EntityKind::Object,
            EntityRef::Light(_) => EntityKind::Light,
            EntityRef::Clip(_) => EntityKind::Clip,
            EntityRef::Annotation(_) => EntityKind::Annotation,
        }
    }
}

/// Id-keyed store of every live entity
#[derive(Debug, Default)]
pub struct Registry {
    ids: HashMap<String, EntityRef>,
    pub(crate) models: OrderedArena<ModelKey, Model>,
    pub(crate) objects: OrderedArena<ObjectKey, Object>,
    pub(crate) lights: OrderedArena<LightKey, Light>,
    pub(crate) clips: OrderedArena<ClipKey, ClipPlane>,
    pub(crate) annotations: OrderedArena<AnnotationKey, Annotation>,
    /// type tag -> (registration seq -> object)
    types: HashMap<String, BTreeMap<u64, ObjectKey>>,
    annotations_by_object: HashMap<ObjectKey, Vec<AnnotationKey>>,
    next_seq: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up an id of any kind
    pub fn lookup(&self, id: &str) -> ViewerResult<EntityRef> {
        self.ids
            .get(id)
            .copied()
            .ok_or_else(|| ViewerError::NotFound(id.to_string()))
    }

    pub fn get(&self, id: &str) -> Option<EntityRef> {
        self.ids.get(id).copied()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains_key(id)
    }

    pub fn kind(&self, id: &str) -> Option<EntityKind> {
        self.get(id).map(|e| e.kind())
    }

    /// The id an entity was registered under
    pub fn id_of(&self, entity: EntityRef) -> Option<&str> {
        match entity {
            EntityRef::Model(k) => self.models.get(k).map(|m| m.id.as_str()),
            EntityRef::Object(k) => self.objects.get(k).map(|o| o.id.as_str()),
            EntityRef::Light(k) => self.lights.get(k).map(|l| l.id.as_str()),
            EntityRef::Clip(k) => self.clips.get(k).map(|c| c.id.as_str()),
            EntityRef::Annotation(k) => self.annotations.get(k).map(|a| a.id.as_str()),
        }
    }

    pub fn model(&self, key: ModelKey) -> Option<&Model> {
        self.models.get(key)
    }

    pub fn model_mut(&mut self, key: ModelKey) -> Option<&mut Model> {
        self.models.get_mut(key)
    }

    pub fn object(&self, key: ObjectKey) -> Option<&Object> {
        self.objects.get(key)
    }

    pub fn object_mut(&mut self, key: ObjectKey) -> Option<&mut Object> {
        self.objects.get_mut(key)
    }

    pub fn light(&self, key: LightKey) -> Option<&Light> {
        self.lights.get(key)
    }

    pub fn light_mut(&mut self, key: LightKey) -> Option<&mut Light> {
        self.lights.get_mut(key)
    }

    pub fn clip(&self, key: ClipKey) -> Option<&ClipPlane> {
        self.clips.get(key)
    }

    pub fn clip_mut(&mut self, key: ClipKey) -> Option<&mut ClipPlane> {
        self.clips.get_mut(key)
    }

    pub fn annotation(&self, key: AnnotationKey) -> Option<&Annotation> {
        self.annotations.get(key)
    }

    pub fn annotation_mut(&mut self, key: AnnotationKey) -> Option<&mut Annotation> {
        self.annotations.get_mut(key)
    }

    /// Resolve an id that must name a model
    pub fn model_key(&self, id: &str) -> ViewerResult<ModelKey> {
        match self.lookup(id)? {
            EntityRef::Model(k) => Ok(k),
            other => Err(ViewerError::kind_mismatch(id, "model", other.kind())),
        }
    }

    /// Resolve an id that must name an object
    pub fn object_key(&self, id: &str) -> ViewerResult<ObjectKey> {
        match self.lookup(id)? {
            EntityRef::Object(k) => Ok(k),
            other => Err(ViewerError::kind_mismatch(id, "object", other.kind())),
        }
    }

    pub fn light_key(&self, id: &str) -> ViewerResult<LightKey> {
        match self.lookup(id)? {
            EntityRef::Light(k) => Ok(k),
            other => Err(ViewerError::kind_mismatch(id, "light", other.kind())),
        }
    }

    pub fn clip_key(&self, id: &str) -> ViewerResult<ClipKey> {
        match self.lookup(id)? {
            EntityRef::Clip(k) => Ok(k),
            other => Err(ViewerError::kind_mismatch(id, "clip", other.kind())),
        }
    }

    pub fn annotation_key(&self, id: &str) -> ViewerResult<AnnotationKey> {
        match self.lookup(id)? {
            EntityRef::Annotation(k) => Ok(k),
            other => Err(ViewerError::kind_mismatch(id, "annotation", other.kind())),
        }
    }

    pub fn models(&self) -> impl Iterator<Item = (ModelKey, &Model)> {
        self.models.iter()
    }

    pub fn objects(&self) -> impl Iterator<Item = (ObjectKey, &Object)> {
        self.objects.iter()
    }

    pub fn lights(&self) -> impl Iterator<Item = (LightKey, &Light)> {
        self.lights.iter()
    }

    pub fn clips(&self) -> impl Iterator<Item = (ClipKey, &ClipPlane)> {
        self.clips.iter()
    }

    pub fn annotations(&self) -> impl Iterator<Item = (AnnotationKey, &Annotation)> {
        self.annotations.iter()
    }

    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    /// Objects carrying a type tag, in registration order
    pub fn objects_of_type(&self, tag: &str) -> Option<impl Iterator<Item = ObjectKey> + '_> {
        self.types.get(tag).map(|bucket| bucket.values().copied())
    }

    /// Type tags currently in use, sorted
    pub fn types(&self) -> Vec<&str> {
        let mut tags: Vec<&str> = self.types.keys().map(String::as_str).collect();
        tags.sort_unstable();
        tags
    }

    /// Annotations pinned to an object
    pub fn annotations_of(&self, object: ObjectKey) -> &[AnnotationKey] {
        self.annotations_by_object
            .get(&object)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Move an object to another type bucket, returning whether it moved.
    ///
    /// An unchanged tag is a no-op; empty buckets are dropped.
    pub fn set_type(&mut self, key: ObjectKey, tag: &str) -> ViewerResult<bool> {
        let object = self
            .objects
            .get_mut(key)
            .ok_or_else(|| ViewerError::NotFound(format!("{:?}", key)))?;
        if object.type_tag == tag {
            return Ok(false);
        }
        let seq = object.seq;
        let old = std::mem::replace(&mut object.type_tag, tag.to_string());
        self.unindex_type(&old, seq);
        self.types
            .entry(tag.to_string())
            .or_default()
            .insert(seq, key);
        Ok(true)
    }

    fn unindex_type(&mut self, tag: &str, seq: u64) {
        if let Some(bucket) = self.types.get_mut(tag) {
            bucket.remove(&seq);
            if bucket.is_empty() {
                self.types.remove(tag);
            }
        }
    }

    /// Repoint an annotation at another object, keeping the index in step
    pub fn retarget_annotation(&mut self, key: AnnotationKey, object: ObjectKey) -> ViewerResult<()> {
        if !self.objects.contains_key(object) {
            return Err(ViewerError::NotFound(format!("{:?}", object)));
        }
        let annotation = self
            .annotations
            .get_mut(key)
            .ok_or_else(|| ViewerError::NotFound(format!("{:?}", key)))?;
        let previous = std::mem::replace(&mut annotation.object, object);
        if let Some(list) = self.annotations_by_object.get_mut(&previous) {
            list.retain(|a| *a != key);
            if list.is_empty() {
                self.annotations_by_object.remove(&previous);
            }
        }
        self.annotations_by_object.entry(object).or_default().push(key);
        Ok(())
    }
}
