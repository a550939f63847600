//! Default values shared by the live components and the bookmark codec.
//!
//! Capture omits any field equal to its default here and restore falls back
//! to the same value, so this table is the only place a default may live.

/// Type tag carried by objects that were never classified
pub const OBJECT_TYPE: &str = "DEFAULT";
pub const OBJECT_VISIBLE: bool = true;
pub const OBJECT_OPACITY: f32 = 1.0;
pub const OBJECT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const OBJECT_CLIPPABLE: bool = true;
pub const OBJECT_PICKABLE: bool = true;
pub const OBJECT_OUTLINED: bool = false;

pub const SCALE: [f32; 3] = [1.0, 1.0, 1.0];
/// Euler XYZ, degrees
pub const ROTATE: [f32; 3] = [0.0, 0.0, 0.0];
pub const TRANSLATE: [f32; 3] = [0.0, 0.0, 0.0];

pub const CLIP_ACTIVE: bool = true;
pub const CLIP_DIR: [f32; 3] = [0.0, 0.0, -1.0];

pub const ANNOTATION_PIN_SHOWN: bool = true;
pub const ANNOTATION_LABEL_SHOWN: bool = true;
pub const ANNOTATION_OCCLUDABLE: bool = true;
pub const ANNOTATION_GLYPH: &str = "";
/// Triangle centroid
pub const ANNOTATION_BARY: [f32; 3] = [1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0];

pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const LIGHT_INTENSITY: f32 = 1.0;
pub const LIGHT_DIR: [f32; 3] = [0.0, -0.5, -1.0];
pub const LIGHT_POS: [f32; 3] = [0.0, 0.0, 0.0];
pub const LIGHT_SPACE: crate::lights::LightSpace = crate::lights::LightSpace::View;

pub const CAMERA_EYE: [f32; 3] = [0.0, 0.0, 10.0];
pub const CAMERA_LOOK: [f32; 3] = [0.0, 0.0, 0.0];
pub const CAMERA_UP: [f32; 3] = [0.0, 1.0, 0.0];
pub const CAMERA_GIMBAL_LOCK: bool = true;

pub const PERSPECTIVE_FOV: f32 = 60.0;
pub const PERSPECTIVE_NEAR: f32 = 0.1;
pub const PERSPECTIVE_FAR: f32 = 10000.0;
pub const ORTHO_SCALE: f32 = 1.0;
pub const ORTHO_NEAR: f32 = 0.1;
pub const ORTHO_FAR: f32 = 10000.0;

pub const OUTLINE_THICKNESS: f32 = 15.0;
pub const OUTLINE_COLOR: [f32; 3] = [1.0, 1.0, 0.0];

/// Field of view used when fitting targets into view
pub const VIEW_FIT_FOV: f32 = 45.0;
/// Seconds a camera flight takes
pub const VIEW_FIT_DURATION: f32 = 0.5;
