//! The id-addressed viewer facade.
//!
//! [`Viewer`] ties the scene state to a [`SceneEngine`]. Every public
//! operation takes string ids (or a [`Target`]); per-frame work happens in
//! [`Viewer::tick`]:
//!
//! 1. drain finished model loads
//! 2. advance a running bookmark restore
//! 3. advance the camera flight or auto-orbit
//! 4. flush dirty clip and light lists to the engine

mod camera;
mod entities;
mod loading;
mod objects;
mod transforms;

use std::collections::HashMap;

use glam::Vec3;
use serde_json::{Value, json};

use crate::aabb::Aabb;
use crate::bookmark::RestoreJob;
use crate::camera::{Camera, CameraFlight, Projection};
use crate::clips::ClipPlane;
use crate::config::ViewerConfig;
use crate::dirty::RebuildList;
use crate::display::OutlineSettings;
use crate::engine::{LoadTicket, PickHit, SceneEngine};
use crate::error::ViewerResult;
use crate::events::{EventBus, SubscriptionId};
use crate::lights::Light;
use crate::registry::{Destroyed, EntityRef};
use crate::resolve::Target;
use crate::scene::Scene;

/// Called once a model load settles, with the model id or the failure
pub type LoadCallback<E> = Box<dyn FnOnce(&mut Viewer<E>, ViewerResult<String>)>;

/// Called once a bookmark restore has been fully applied
pub type RestoreCallback<E> = Box<dyn FnOnce(&mut Viewer<E>)>;

/// A load issued to the engine and not yet completed
pub(crate) struct PendingLoad<E: SceneEngine> {
    pub(crate) ticket: LoadTicket,
    pub(crate) on_loaded: Option<LoadCallback<E>>,
}

/// Event names fired by the viewer
pub mod event {
    pub const LOADED_MODEL: &str = "loadedModel";
    pub const LOAD_FAILED: &str = "loadFailed";
    pub const UNLOADED_MODEL: &str = "unloadedModel";
    pub const PICKED: &str = "picked";
    pub const BOOKMARK_RESTORED: &str = "bookmarkRestored";
}

pub struct Viewer<E: SceneEngine> {
    pub(crate) scene: Scene,
    pub(crate) engine: E,
    pub(crate) camera: Camera,
    pub(crate) outline: OutlineSettings,
    pub(crate) events: EventBus,
    pub(crate) clip_list: RebuildList<ClipPlane>,
    pub(crate) light_list: RebuildList<Light>,
    /// Loads issued to the engine and not yet completed, by model id
    pub(crate) pending_loads: HashMap<String, PendingLoad<E>>,
    pub(crate) next_ticket: u64,
    pub(crate) restore: Option<RestoreJob<E>>,
    pub(crate) flight: Option<CameraFlight>,
    /// Auto-orbit speed in degrees per second
    pub(crate) orbit_speed: f32,
    pub(crate) view_fit_fov: f32,
    pub(crate) view_fit_duration: f32,
}

impl<E: SceneEngine> Viewer<E> {
    pub fn new(engine: E) -> Self {
        Self::with_config(engine, &ViewerConfig::new())
    }

    pub fn with_config(engine: E, config: &ViewerConfig) -> Self {
        let mut camera = Camera::new();
        camera.projection = config.camera.projection;
        camera.perspective.fov = config.camera.perspective_fov;
        camera.perspective.near = config.camera.perspective_near;
        camera.perspective.far = config.camera.perspective_far;
        camera.ortho.scale = config.camera.ortho_scale;
        camera.ortho.near = config.camera.ortho_near;
        camera.ortho.far = config.camera.ortho_far;

        let mut viewer = Self {
            scene: Scene::new(),
            engine,
            camera,
            outline: OutlineSettings::new(config.outline.thickness, config.outline.color),
            events: EventBus::new(),
            clip_list: RebuildList::new(),
            light_list: RebuildList::new(),
            pending_loads: HashMap::new(),
            next_ticket: 0,
            restore: None,
            flight: None,
            orbit_speed: config.camera.orbit_speed,
            view_fit_fov: config.camera.view_fit_fov,
            view_fit_duration: config.camera.view_fit_duration,
        };
        if config.loading.default_lights {
            viewer.install_default_lights();
        }
        viewer
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn outline(&self) -> &OutlineSettings {
        &self.outline
    }

    pub fn projection(&self) -> Projection {
        self.camera.projection
    }

    /// Subscribe to a viewer event
    pub fn on(
        &mut self,
        event: impl Into<String>,
        callback: impl FnMut(&Value) + 'static,
    ) -> SubscriptionId {
        self.events.on(event, callback)
    }

    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.off(id)
    }

    /// Publish an event to its subscribers, returning how many were called
    pub fn fire(&mut self, event: &str, value: &Value) -> usize {
        self.events.fire(event, value)
    }

    /// Advance one frame
    pub fn tick(&mut self, dt: f32) {
        self.drain_loads();
        self.advance_restore();
        self.advance_camera(dt);
        self.flush_rebuilds();
    }

    fn flush_rebuilds(&mut self) {
        let registry = &self.scene.registry;
        if let Some(clips) = self.clip_list.flush(|| {
            registry
                .clips()
                .filter(|(_, c)| c.active)
                .map(|(_, c)| c.clone())
                .collect()
        }) {
            tracing::debug!("Flushing {} active clip planes", clips.len());
            self.engine.apply_clips(clips);
        }
        if let Some(lights) = self
            .light_list
            .flush(|| registry.lights().map(|(_, l)| l.clone()).collect())
        {
            tracing::debug!("Flushing {} lights", lights.len());
            self.engine.apply_lights(lights);
        }
    }

    /// Expand a target to entity ids (objects, plus any lights, clips or
    /// annotations named directly)
    pub fn resolve(&self, target: impl Into<Target>) -> ViewerResult<Vec<String>> {
        let entities = self.scene.resolve(&target.into())?;
        Ok(self.ids_of(&entities))
    }

    pub(crate) fn ids_of(&self, entities: &[EntityRef]) -> Vec<String> {
        entities
            .iter()
            .filter_map(|e| self.scene.registry.id_of(*e).map(str::to_string))
            .collect()
    }

    /// World box of a target; ids and literal boxes may be mixed
    pub fn get_aabb(&self, target: impl Into<Target>) -> Aabb {
        self.scene.resolve_aabb(&target.into())
    }

    pub fn get_center(&self, target: impl Into<Target>) -> Vec3 {
        self.get_aabb(target).center()
    }

    pub fn get_scene_aabb(&self) -> Aabb {
        self.scene.scene_aabb()
    }

    /// Pick at a canvas position.
    ///
    /// Hits on hidden or unpickable objects are dropped, as are hits on a
    /// clippable object behind an active clip plane.
    pub fn pick(&mut self, canvas_pos: [f32; 2]) -> Option<PickHit> {
        let hit = self.engine.pick(canvas_pos)?;
        if let Ok(key) = self.scene.registry.object_key(&hit.id)
            && let Some(object) = self.scene.registry.object(key)
        {
            let clipped = object.clippable
                && hit.world_pos.is_some_and(|p| {
                    self.scene
                        .registry
                        .clips()
                        .any(|(_, c)| c.active && c.signed_distance(Vec3::from(p)) > 0.0)
                });
            if !object.visible || !object.pickable || clipped {
                tracing::debug!("Ignoring pick on '{}'", hit.id);
                return None;
            }
        }
        let value = serde_json::to_value(&hit).unwrap_or(Value::Null);
        self.events.fire(event::PICKED, &value);
        Some(hit)
    }

    /// Destroy any entity by id. Models are unloaded from the engine.
    pub fn destroy(&mut self, id: &str) -> ViewerResult<Destroyed> {
        if let EntityRef::Model(_) = self.scene.registry.lookup(id)? {
            return self.unload_model(id);
        }
        let report = self.scene.destroy(id)?;
        self.after_destroy(&report);
        Ok(report)
    }

    /// Mark rebuild lists touched by a destroy
    pub(crate) fn after_destroy(&mut self, report: &Destroyed) {
        if !report.clips.is_empty() {
            self.clip_list.mark_dirty();
        }
        if !report.lights.is_empty() {
            self.light_list.mark_dirty();
        }
    }

    /// Remove every model, annotation, clip and light
    pub fn clear(&mut self) {
        let models: Vec<String> = self
            .scene
            .registry
            .models()
            .map(|(_, m)| m.id.clone())
            .collect();
        for id in &models {
            self.engine.unload(id);
        }
        self.pending_loads.clear();

        let report = self.scene.clear();
        self.clip_list.mark_dirty();
        self.light_list.mark_dirty();
        tracing::info!(
            "Cleared {} models, {} clips, {} lights",
            report.models.len(),
            report.clips.len(),
            report.lights.len()
        );
        for id in report.models {
            self.events.fire(event::UNLOADED_MODEL, &json!({ "id": id }));
        }
    }
}
