//! Boundary to the rendering engine.
//!
//! The engine parses model files, draws, and answers picks. The viewer only
//! needs the narrow surface in [`SceneEngine`]: start a load, hear back later
//! on the same thread, and receive flattened clip and light lists once per tick.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;
use crate::clips::ClipPlane;
use crate::lights::Light;

/// One object as parsed from a model file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedObject {
    /// Path of the object inside its model; the object id is `<model>#<local_id>`
    pub local_id: String,
    pub type_tag: Option<String>,
    /// Geometry bounds; computed from `positions` when empty
    pub aabb: Aabb,
    pub color: Option<[f32; 3]>,
    pub opacity: Option<f32>,
    pub positions: Vec<[f32; 3]>,
    pub indices: Vec<u32>,
}

impl ParsedObject {
    pub fn new(local_id: impl Into<String>, aabb: Aabb) -> Self {
        Self {
            local_id: local_id.into(),
            aabb,
            ..Default::default()
        }
    }

    pub fn with_type(mut self, tag: impl Into<String>) -> Self {
        self.type_tag = Some(tag.into());
        self
    }

    pub fn with_color(mut self, color: [f32; 3]) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    pub fn with_geometry(mut self, positions: Vec<[f32; 3]>, indices: Vec<u32>) -> Self {
        self.positions = positions;
        self.indices = indices;
        self
    }
}

/// A parsed model file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedModel {
    pub objects: Vec<ParsedObject>,
}

impl ParsedModel {
    pub fn new(objects: Vec<ParsedObject>) -> Self {
        Self { objects }
    }
}

/// Identifies one call to [`SceneEngine::begin_load`].
///
/// A model id can be unloaded and loaded again while the first load is still
/// in flight; the ticket tells the two completions apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LoadTicket(pub u64);

/// Completion signal for a load started with [`SceneEngine::begin_load`]
#[derive(Debug, Clone, PartialEq)]
pub struct LoadCompletion {
    /// Ticket passed to the matching `begin_load`
    pub ticket: LoadTicket,
    pub model_id: String,
    pub result: Result<ParsedModel, String>,
}

/// Result of a ray/point pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickHit {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub world_pos: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub normal: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prim_index: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bary: Option<[f32; 3]>,
}

/// What the viewer needs from a rendering engine
pub trait SceneEngine {
    /// Start loading `src` for `model_id`. Must return immediately, and the
    /// completion must carry `ticket` back.
    fn begin_load(&mut self, ticket: LoadTicket, model_id: &str, src: &str);

    /// Completions that arrived since the last call
    fn poll_loads(&mut self) -> Vec<LoadCompletion>;

    /// Drop everything belonging to a model
    fn unload(&mut self, _model_id: &str) {}

    /// Active clip planes, flattened once per tick when anything changed
    fn apply_clips(&mut self, _clips: &[ClipPlane]) {}

    /// All lights, flattened once per tick when anything changed
    fn apply_lights(&mut self, _lights: &[Light]) {}

    /// Pick the surface under a canvas position
    fn pick(&self, _canvas_pos: [f32; 2]) -> Option<PickHit> {
        None
    }
}

/// In-memory engine for headless hosts.
///
/// Sources are registered up front; a load completes on the next poll, and
/// unknown sources fail. Everything handed back by the viewer is recorded.
#[derive(Debug, Default)]
pub struct MemoryEngine {
    library: HashMap<String, ParsedModel>,
    pending: Vec<(LoadTicket, String, String)>,
    issued: Vec<String>,
    max_in_flight: usize,
    unloaded: Vec<String>,
    clips: Vec<ClipPlane>,
    lights: Vec<Light>,
    clip_flushes: usize,
    light_flushes: usize,
    next_pick: Option<PickHit>,
}

impl MemoryEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `src` loadable
    pub fn with_source(mut self, src: impl Into<String>, model: ParsedModel) -> Self {
        self.add_source(src, model);
        self
    }

    pub fn add_source(&mut self, src: impl Into<String>, model: ParsedModel) {
        self.library.insert(src.into(), model);
    }

    /// Model ids in the order loads were started
    pub fn issued(&self) -> &[String] {
        &self.issued
    }

    /// Largest number of loads that were outstanding at once
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight
    }

    pub fn in_flight(&self) -> usize {
        self.pending.len()
    }

    pub fn unloaded(&self) -> &[String] {
        &self.unloaded
    }

    pub fn clips(&self) -> &[ClipPlane] {
        &self.clips
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn clip_flushes(&self) -> usize {
        self.clip_flushes
    }

    pub fn light_flushes(&self) -> usize {
        self.light_flushes
    }

    /// Hit returned by the next `pick`
    pub fn set_pick(&mut self, hit: Option<PickHit>) {
        self.next_pick = hit;
    }
}

impl SceneEngine for MemoryEngine {
    fn begin_load(&mut self, ticket: LoadTicket, model_id: &str, src: &str) {
        self.issued.push(model_id.to_string());
        self.pending
            .push((ticket, model_id.to_string(), src.to_string()));
        self.max_in_flight = self.max_in_flight.max(self.pending.len());
    }

    fn poll_loads(&mut self) -> Vec<LoadCompletion> {
        std::mem::take(&mut self.pending)
            .into_iter()
            .map(|(ticket, model_id, src)| {
                let result = self
                    .library
                    .get(&src)
                    .cloned()
                    .ok_or_else(|| format!("unknown source '{}'", src));
                LoadCompletion {
                    ticket,
                    model_id,
                    result,
                }
            })
            .collect()
    }

    fn unload(&mut self, model_id: &str) {
        self.unloaded.push(model_id.to_string());
    }

    fn apply_clips(&mut self, clips: &[ClipPlane]) {
        self.clips = clips.to_vec();
        self.clip_flushes += 1;
    }

    fn apply_lights(&mut self, lights: &[Light]) {
        self.lights = lights.to_vec();
        self.light_flushes += 1;
    }

    fn pick(&self, _canvas_pos: [f32; 2]) -> Option<PickHit> {
        self.next_pick.clone()
    }
}
