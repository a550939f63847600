//! Walkthrough Viewer Core
//!
//! ID-addressed facade over a 3D scene engine for interactive model
//! walkthroughs:
//! - Registry: one flat string namespace for models, objects, lights, clips and annotations
//! - Resolution: expands ids, type tags and model ids into concrete targets
//! - Transforms: lazily created, pivot-centered stacks layered model -> object
//! - Bookmarks: diff-against-defaults snapshots of the whole viewer state
//!
//! # Example
//!
//! ```ignore
//! use walkthrough_core::{MemoryEngine, Viewer};
//!
//! let mut viewer = Viewer::new(MemoryEngine::new());
//! viewer.load_model("saw", "models/saw.gltf")?;
//! viewer.tick(0.0);
//! viewer.hide(["saw#blade"]);
//! viewer.set_scale("saw", [2.0, 2.0, 2.0]);
//! let json = viewer.get_bookmark_json()?;
//! ```

pub mod aabb;
pub mod annotations;
pub mod bookmark;
pub mod camera;
pub mod clips;
pub mod config;
pub mod defaults;
pub mod dirty;
pub mod display;
pub mod engine;
pub mod error;
pub mod events;
pub mod lights;
pub mod logging;
pub mod registry;
pub mod resolve;
pub mod scene;
pub mod transform;
pub mod viewer;

pub use aabb::Aabb;
pub use annotations::{Annotation, AnnotationDesc};
pub use bookmark::{AnnotationEntry, Bookmark, ClipEntry, LightEntry, ModelEntry, ObjectEntry};
pub use camera::{Camera, CameraFlight, CameraPose, Projection};
pub use clips::{ClipDesc, ClipPlane};
pub use config::{ConfigError, ConfigManager, ViewerConfig};
pub use engine::{
    LoadCompletion, LoadTicket, MemoryEngine, ParsedModel, ParsedObject, PickHit, SceneEngine,
};
pub use error::{ViewerError, ViewerResult};
pub use events::{EventBus, SubscriptionId};
pub use lights::{Light, LightDesc, LightKind, LightSpace};
pub use registry::{Destroyed, EntityKind, EntityRef, Registry};
pub use resolve::{Target, TargetItem};
pub use scene::Scene;
pub use viewer::{LoadCallback, RestoreCallback, Viewer};
