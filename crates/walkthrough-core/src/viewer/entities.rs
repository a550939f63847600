//! Lights, clip planes and annotations

use glam::Vec3;

use super::Viewer;
use crate::annotations::{Annotation, AnnotationDesc};
use crate::clips::{ClipDesc, ClipPlane};
use crate::engine::SceneEngine;
use crate::error::{ViewerError, ViewerResult};
use crate::lights::{Light, LightDesc, LightSpace, default_lights};
use crate::registry::Destroyed;

fn new_id(id: Option<&str>) -> String {
    id.map(str::to_string)
        .unwrap_or_else(|| uuid::Uuid::new_v4().to_string())
}

impl<E: SceneEngine> Viewer<E> {
    // Lights

    /// Create a light, generating an id when none is given
    pub fn create_light(&mut self, id: Option<&str>, desc: &LightDesc) -> ViewerResult<String> {
        let id = new_id(id);
        self.scene
            .registry
            .register_light(Light::from_desc(id.clone(), desc))?;
        self.light_list.mark_dirty();
        Ok(id)
    }

    /// Install the default light rig, skipping ids already taken
    pub fn install_default_lights(&mut self) {
        for (id, desc) in default_lights() {
            if self.scene.registry.contains(id) {
                continue;
            }
            if let Err(e) = self.create_light(Some(id), &desc) {
                tracing::warn!("Cannot install default light: {}", e);
            }
        }
    }

    /// Destroy every light
    pub fn clear_lights(&mut self) {
        let ids: Vec<String> = self
            .scene
            .registry
            .lights()
            .map(|(_, l)| l.id.clone())
            .collect();
        for id in ids {
            if let Err(e) = self.scene.destroy(&id) {
                tracing::warn!("Cannot destroy light '{}': {}", id, e);
            }
        }
        self.light_list.mark_dirty();
    }

    fn update_light(
        &mut self,
        id: &str,
        update: impl FnOnce(&mut Light) -> ViewerResult<()>,
    ) -> ViewerResult<()> {
        let key = self.scene.registry.light_key(id)?;
        let light = self
            .scene
            .registry
            .light_mut(key)
            .ok_or_else(|| ViewerError::NotFound(id.to_string()))?;
        update(light)?;
        self.light_list.mark_dirty();
        Ok(())
    }

    pub fn get_light(&self, id: &str) -> ViewerResult<&Light> {
        let key = self.scene.registry.light_key(id)?;
        self.scene
            .registry
            .light(key)
            .ok_or_else(|| ViewerError::NotFound(id.to_string()))
    }

    pub fn get_lights(&self) -> Vec<String> {
        self.scene
            .registry
            .lights()
            .map(|(_, l)| l.id.clone())
            .collect()
    }

    pub fn set_light_color(&mut self, id: &str, color: [f32; 3]) -> ViewerResult<()> {
        self.update_light(id, |l| {
            l.set_color(color);
            Ok(())
        })
    }

    pub fn set_light_intensity(&mut self, id: &str, intensity: f32) -> ViewerResult<()> {
        self.update_light(id, |l| {
            l.set_intensity(intensity);
            Ok(())
        })
    }

    /// Directional lights only
    pub fn set_light_dir(&mut self, id: &str, dir: [f32; 3]) -> ViewerResult<()> {
        self.update_light(id, |l| l.set_dir(dir))
    }

    /// Point lights only
    pub fn set_light_pos(&mut self, id: &str, pos: [f32; 3]) -> ViewerResult<()> {
        self.update_light(id, |l| l.set_pos(pos))
    }

    pub fn set_light_space(&mut self, id: &str, space: LightSpace) -> ViewerResult<()> {
        self.update_light(id, |l| l.set_space(space))
    }

    pub fn destroy_light(&mut self, id: &str) -> ViewerResult<()> {
        self.scene.registry.light_key(id)?;
        self.scene.destroy(id)?;
        self.light_list.mark_dirty();
        Ok(())
    }

    // Clip planes

    pub fn create_clip(&mut self, id: Option<&str>, desc: &ClipDesc) -> ViewerResult<String> {
        let id = new_id(id);
        self.scene
            .registry
            .register_clip(ClipPlane::from_desc(id.clone(), desc))?;
        self.clip_list.mark_dirty();
        Ok(id)
    }

    fn update_clip(&mut self, id: &str, update: impl FnOnce(&mut ClipPlane)) -> ViewerResult<()> {
        let key = self.scene.registry.clip_key(id)?;
        if let Some(clip) = self.scene.registry.clip_mut(key) {
            update(clip);
        }
        self.clip_list.mark_dirty();
        Ok(())
    }

    pub fn get_clip(&self, id: &str) -> ViewerResult<&ClipPlane> {
        let key = self.scene.registry.clip_key(id)?;
        self.scene
            .registry
            .clip(key)
            .ok_or_else(|| ViewerError::NotFound(id.to_string()))
    }

    pub fn get_clips(&self) -> Vec<String> {
        self.scene
            .registry
            .clips()
            .map(|(_, c)| c.id.clone())
            .collect()
    }

    pub fn set_clip_pos(&mut self, id: &str, pos: [f32; 3]) -> ViewerResult<()> {
        self.update_clip(id, |c| c.pos = pos)
    }

    /// Direction is normalized
    pub fn set_clip_dir(&mut self, id: &str, dir: [f32; 3]) -> ViewerResult<()> {
        let dir = ClipPlane::normalized_dir(dir);
        self.update_clip(id, |c| c.dir = dir)
    }

    pub fn set_clip_active(&mut self, id: &str, active: bool) -> ViewerResult<()> {
        self.update_clip(id, |c| c.active = active)
    }

    pub fn destroy_clip(&mut self, id: &str) -> ViewerResult<()> {
        self.scene.registry.clip_key(id)?;
        self.scene.destroy(id)?;
        self.clip_list.mark_dirty();
        Ok(())
    }

    // Annotations

    pub fn create_annotation(
        &mut self,
        id: Option<&str>,
        desc: &AnnotationDesc,
    ) -> ViewerResult<String> {
        let id = new_id(id);
        self.scene.create_annotation(&id, desc)?;
        Ok(id)
    }

    fn update_annotation(
        &mut self,
        id: &str,
        update: impl FnOnce(&mut Annotation),
    ) -> ViewerResult<()> {
        let key = self.scene.registry.annotation_key(id)?;
        if let Some(annotation) = self.scene.registry.annotation_mut(key) {
            update(annotation);
        }
        Ok(())
    }

    pub fn get_annotation(&self, id: &str) -> ViewerResult<&Annotation> {
        let key = self.scene.registry.annotation_key(id)?;
        self.scene
            .registry
            .annotation(key)
            .ok_or_else(|| ViewerError::NotFound(id.to_string()))
    }

    /// Annotation ids, optionally only those pinned to one object
    pub fn get_annotations(&self, object: Option<&str>) -> ViewerResult<Vec<String>> {
        let registry = &self.scene.registry;
        match object {
            None => Ok(registry.annotations().map(|(_, a)| a.id.clone()).collect()),
            Some(id) => {
                let key = registry.object_key(id)?;
                Ok(registry
                    .annotations_of(key)
                    .iter()
                    .filter_map(|a| registry.annotation(*a).map(|a| a.id.clone()))
                    .collect())
            }
        }
    }

    pub fn set_annotation_title(&mut self, id: &str, title: &str) -> ViewerResult<()> {
        self.update_annotation(id, |a| a.title = title.to_string())
    }

    pub fn set_annotation_desc(&mut self, id: &str, desc: &str) -> ViewerResult<()> {
        self.update_annotation(id, |a| a.desc = desc.to_string())
    }

    pub fn set_annotation_glyph(&mut self, id: &str, glyph: &str) -> ViewerResult<()> {
        self.update_annotation(id, |a| a.glyph = glyph.to_string())
    }

    pub fn set_annotation_pin_shown(&mut self, id: &str, shown: bool) -> ViewerResult<()> {
        self.update_annotation(id, |a| a.pin_shown = shown)
    }

    pub fn set_annotation_label_shown(&mut self, id: &str, shown: bool) -> ViewerResult<()> {
        self.update_annotation(id, |a| a.label_shown = shown)
    }

    pub fn set_annotation_occludable(&mut self, id: &str, occludable: bool) -> ViewerResult<()> {
        self.update_annotation(id, |a| a.occludable = occludable)
    }

    /// Camera pose `fly_to_annotation` uses
    pub fn set_annotation_viewpoint(
        &mut self,
        id: &str,
        eye: [f32; 3],
        look: [f32; 3],
        up: [f32; 3],
    ) -> ViewerResult<()> {
        self.update_annotation(id, |a| {
            a.eye = Some(eye);
            a.look = Some(look);
            a.up = Some(up);
        })
    }

    /// Pin an annotation to another object's triangle
    pub fn set_annotation_target(
        &mut self,
        id: &str,
        object: &str,
        prim_index: u32,
        bary: [f32; 3],
    ) -> ViewerResult<()> {
        let key = self.scene.registry.annotation_key(id)?;
        self.scene.retarget_annotation(key, object, prim_index, bary)
    }

    /// Current world position of the pin, following its object's transforms
    pub fn annotation_world_pos(&self, id: &str) -> ViewerResult<Option<Vec3>> {
        let key = self.scene.registry.annotation_key(id)?;
        Ok(self.scene.annotation_world_pos(key))
    }

    pub fn destroy_annotation(&mut self, id: &str) -> ViewerResult<Destroyed> {
        self.scene.registry.annotation_key(id)?;
        self.scene.destroy(id)
    }
}
