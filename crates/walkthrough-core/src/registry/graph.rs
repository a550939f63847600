//! Registry graph operations (register, destroy with cascade)

use super::{
    AnnotationKey, ClipKey, EntityRef, LightKey, Model, ModelKey, Object, ObjectKey, Registry,
};
use crate::annotations::Annotation;
use crate::clips::ClipPlane;
use crate::error::{ViewerError, ViewerResult};
use crate::lights::Light;
use crate::transform::TransformKey;

/// Everything a `destroy` call removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Destroyed {
    pub models: Vec<String>,
    pub objects: Vec<String>,
    pub annotations: Vec<String>,
    pub lights: Vec<String>,
    pub clips: Vec<String>,
    /// Transform nodes that belonged to removed entities; the caller frees them
    pub transforms: Vec<TransformKey>,
}

impl Destroyed {
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
            && self.objects.is_empty()
            && self.annotations.is_empty()
            && self.lights.is_empty()
            && self.clips.is_empty()
    }

    pub fn merge(&mut self, other: Destroyed) {
        self.models.extend(other.models);
        self.objects.extend(other.objects);
        self.annotations.extend(other.annotations);
        self.lights.extend(other.lights);
        self.clips.extend(other.clips);
        self.transforms.extend(other.transforms);
    }
}

impl Registry {
    fn claim(&self, id: &str) -> ViewerResult<()> {
        if self.ids.contains_key(id) {
            return Err(ViewerError::DuplicateId(id.to_string()));
        }
        Ok(())
    }

    /// Register a model (without objects)
    pub fn register_model(&mut self, model: Model) -> ViewerResult<ModelKey> {
        self.claim(&model.id)?;
        let id = model.id.clone();
        let key = self.models.insert(model);
        self.ids.insert(id, EntityRef::Model(key));
        Ok(key)
    }

    /// Register an object under the model recorded in `object.model`
    pub fn register_object(&mut self, mut object: Object) -> ViewerResult<ObjectKey> {
        self.claim(&object.id)?;
        if !self.models.contains_key(object.model) {
            return Err(ViewerError::NotFound(format!(
                "owning model of object '{}'",
                object.id
            )));
        }

        object.seq = self.next_seq;
        self.next_seq += 1;

        let id = object.id.clone();
        let tag = object.type_tag.clone();
        let seq = object.seq;
        let model = object.model;
        let key = self.objects.insert(object);

        self.ids.insert(id, EntityRef::Object(key));
        self.types.entry(tag).or_default().insert(seq, key);
        if let Some(model) = self.models.get_mut(model) {
            model.objects.push(key);
        }
        Ok(key)
    }

    pub fn register_light(&mut self, light: Light) -> ViewerResult<LightKey> {
        self.claim(&light.id)?;
        let id = light.id.clone();
        let key = self.lights.insert(light);
        self.ids.insert(id, EntityRef::Light(key));
        Ok(key)
    }

    pub fn register_clip(&mut self, clip: ClipPlane) -> ViewerResult<ClipKey> {
        self.claim(&clip.id)?;
        let id = clip.id.clone();
        let key = self.clips.insert(clip);
        self.ids.insert(id, EntityRef::Clip(key));
        Ok(key)
    }

    pub fn register_annotation(&mut self, annotation: Annotation) -> ViewerResult<AnnotationKey> {
        self.claim(&annotation.id)?;
        if !self.objects.contains_key(annotation.object) {
            return Err(ViewerError::InvalidConfig(format!(
                "annotation '{}' targets a missing object",
                annotation.id
            )));
        }
        let id = annotation.id.clone();
        let object = annotation.object;
        let key = self.annotations.insert(annotation);
        self.ids.insert(id, EntityRef::Annotation(key));
        self.annotations_by_object.entry(object).or_default().push(key);
        Ok(key)
    }

    /// Remove an entity and every index entry that refers to it.
    ///
    /// Models take their objects with them; objects take the annotations
    /// pinned to them.
    pub fn destroy(&mut self, id: &str) -> ViewerResult<Destroyed> {
        let entity = self.lookup(id)?;
        let mut report = Destroyed::default();
        match entity {
            EntityRef::Model(key) => self.destroy_model(key, &mut report),
            EntityRef::Object(key) => self.destroy_object(key, &mut report),
            EntityRef::Light(key) => {
                if let Some(light) = self.lights.remove(key) {
                    self.ids.remove(&light.id);
                    report.lights.push(light.id);
                }
            }
            EntityRef::Clip(key) => {
                if let Some(clip) = self.clips.remove(key) {
                    self.ids.remove(&clip.id);
                    report.clips.push(clip.id);
                }
            }
            EntityRef::Annotation(key) => self.destroy_annotation(key, &mut report),
        }
        Ok(report)
    }

    fn destroy_model(&mut self, key: ModelKey, report: &mut Destroyed) {
        // Objects first, so their index entries go before the model's
        let members = self
            .models
            .get(key)
            .map(|m| m.objects.clone())
            .unwrap_or_default();
        for object in members {
            self.destroy_object(object, report);
        }

        if let Some(model) = self.models.remove(key) {
            self.ids.remove(&model.id);
            report.transforms.extend(model.transform);
            report.models.push(model.id);
        }
    }

    fn destroy_object(&mut self, key: ObjectKey, report: &mut Destroyed) {
        let pinned = self.annotations_by_object.remove(&key).unwrap_or_default();
        for annotation in pinned {
            self.destroy_annotation(annotation, report);
        }

        let Some(object) = self.objects.remove(key) else {
            return;
        };
        self.ids.remove(&object.id);
        self.unindex_type(&object.type_tag, object.seq);
        if let Some(model) = self.models.get_mut(object.model) {
            model.objects.retain(|o| *o != key);
        }
        report.transforms.extend(object.transform);
        report.objects.push(object.id);
    }

    fn destroy_annotation(&mut self, key: AnnotationKey, report: &mut Destroyed) {
        let Some(annotation) = self.annotations.remove(key) else {
            return;
        };
        self.ids.remove(&annotation.id);
        if let Some(list) = self.annotations_by_object.get_mut(&annotation.object) {
            list.retain(|a| *a != key);
            if list.is_empty() {
                self.annotations_by_object.remove(&annotation.object);
            }
        }
        report.annotations.push(annotation.id);
    }
}
