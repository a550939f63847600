//! Snapshot of the live viewer state

use glam::Vec3;

use super::{
    AnnotationEntry, Bookmark, ClipEntry, LightEntry, ModelEntry, ObjectEntry, differs,
};
use crate::defaults;
use crate::engine::SceneEngine;
use crate::error::ViewerResult;
use crate::lights::LightKind;
use crate::registry::EntityRef;
use crate::transform::TransformNode;
use crate::viewer::Viewer;

/// Non-default stack components as (scale, rotate, translate)
type StackDiff = (Option<[f32; 3]>, Option<[f32; 3]>, Option<[f32; 3]>);

fn stack_diff(node: Option<&TransformNode>) -> StackDiff {
    let Some(node) = node else {
        return (None, None, None);
    };
    let diff = |v: Vec3, default: [f32; 3]| differs(v.to_array(), default);
    (
        diff(node.scale, defaults::SCALE),
        diff(node.rotate, defaults::ROTATE),
        diff(node.translate, defaults::TRANSLATE),
    )
}

impl<E: SceneEngine> Viewer<E> {
    /// Capture everything that differs from the defaults.
    ///
    /// Object type, color and opacity are compared against what the loader
    /// supplied, since restoring reloads the model and brings those back.
    pub fn get_bookmark(&self) -> Bookmark {
        let scene = &self.scene;
        let registry = &scene.registry;

        let models = registry
            .models()
            .map(|(key, model)| {
                let (scale, rotate, translate) = stack_diff(scene.stack(EntityRef::Model(key)));
                ModelEntry {
                    id: model.id.clone(),
                    src: model.src.clone(),
                    scale,
                    rotate,
                    translate,
                }
            })
            .collect();

        let objects = registry
            .objects()
            .map(|(key, object)| {
                let (scale, rotate, translate) = stack_diff(scene.stack(EntityRef::Object(key)));
                ObjectEntry {
                    id: object.id.clone(),
                    type_tag: differs(object.type_tag.as_str(), object.loaded.type_tag.as_str())
                        .map(str::to_string),
                    visible: differs(object.visible, defaults::OBJECT_VISIBLE),
                    opacity: differs(object.opacity, object.loaded.opacity),
                    color: differs(object.color, object.loaded.color),
                    clippable: differs(object.clippable, defaults::OBJECT_CLIPPABLE),
                    pickable: differs(object.pickable, defaults::OBJECT_PICKABLE),
                    outlined: differs(object.outlined, defaults::OBJECT_OUTLINED),
                    scale,
                    rotate,
                    translate,
                }
            })
            .filter(|entry| !entry.is_empty())
            .collect();

        let annotations = registry
            .annotations()
            .filter_map(|(_, a)| {
                let object = registry.object(a.object)?;
                Some(AnnotationEntry {
                    id: a.id.clone(),
                    object: object.id.clone(),
                    prim_index: a.prim_index,
                    bary: differs(a.bary, defaults::ANNOTATION_BARY),
                    glyph: differs(a.glyph.as_str(), defaults::ANNOTATION_GLYPH)
                        .map(str::to_string),
                    title: (!a.title.is_empty()).then(|| a.title.clone()),
                    desc: (!a.desc.is_empty()).then(|| a.desc.clone()),
                    pin_shown: differs(a.pin_shown, defaults::ANNOTATION_PIN_SHOWN),
                    label_shown: differs(a.label_shown, defaults::ANNOTATION_LABEL_SHOWN),
                    occludable: differs(a.occludable, defaults::ANNOTATION_OCCLUDABLE),
                    eye: a.eye,
                    look: a.look,
                    up: a.up,
                })
            })
            .collect();

        let clips = registry
            .clips()
            .map(|(_, c)| ClipEntry {
                id: c.id.clone(),
                pos: c.pos,
                dir: differs(c.dir, defaults::CLIP_DIR),
                active: differs(c.active, defaults::CLIP_ACTIVE),
            })
            .collect();

        let lights = registry
            .lights()
            .map(|(_, l)| {
                let has_space = l.kind.has_space();
                LightEntry {
                    id: l.id.clone(),
                    kind: l.kind,
                    color: differs(l.color, defaults::LIGHT_COLOR),
                    intensity: differs(l.intensity, defaults::LIGHT_INTENSITY),
                    dir: (l.kind == LightKind::Directional)
                        .then_some(l.dir)
                        .and_then(|d| differs(d, defaults::LIGHT_DIR)),
                    pos: (l.kind == LightKind::Point)
                        .then_some(l.pos)
                        .and_then(|p| differs(p, defaults::LIGHT_POS)),
                    space: has_space
                        .then_some(l.space)
                        .and_then(|s| differs(s, defaults::LIGHT_SPACE)),
                }
            })
            .collect();

        let camera = &self.camera;
        Bookmark {
            models,
            objects,
            annotations,
            clips,
            lights,
            eye: differs(camera.eye.to_array(), defaults::CAMERA_EYE),
            look: differs(camera.look.to_array(), defaults::CAMERA_LOOK),
            up: differs(camera.up.to_array(), defaults::CAMERA_UP),
            gimbal_lock: differs(camera.gimbal_lock, defaults::CAMERA_GIMBAL_LOCK),
            projection: differs(camera.projection, crate::camera::Projection::default()),
            perspective_fov: differs(camera.perspective.fov, defaults::PERSPECTIVE_FOV),
            perspective_near: differs(camera.perspective.near, defaults::PERSPECTIVE_NEAR),
            perspective_far: differs(camera.perspective.far, defaults::PERSPECTIVE_FAR),
            ortho_scale: differs(camera.ortho.scale, defaults::ORTHO_SCALE),
            ortho_near: differs(camera.ortho.near, defaults::ORTHO_NEAR),
            ortho_far: differs(camera.ortho.far, defaults::ORTHO_FAR),
            outline_thickness: differs(self.outline.thickness, defaults::OUTLINE_THICKNESS),
            outline_color: differs(self.outline.color, defaults::OUTLINE_COLOR),
        }
    }

    pub fn get_bookmark_json(&self) -> ViewerResult<String> {
        self.get_bookmark().to_json()
    }
}
