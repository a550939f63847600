//! Bookmark documents: diff-against-defaults snapshots of the viewer.
//!
//! Every optional field is omitted when it equals its value in
//! [`crate::defaults`]; restore falls back to the same table.

mod capture;
mod restore;

pub(crate) use restore::RestoreJob;

use serde::{Deserialize, Serialize};

use crate::camera::Projection;
use crate::lights::{LightKind, LightSpace};

/// `Some(value)` unless it equals the default
pub(crate) fn differs<T: PartialEq>(value: T, default: T) -> Option<T> {
    (value != default).then_some(value)
}

/// Serialized viewer state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Bookmark {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub models: Vec<ModelEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub objects: Vec<ObjectEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<AnnotationEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub clips: Vec<ClipEntry>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub lights: Vec<LightEntry>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub eye: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub look: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up: Option<[f32; 3]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gimbal_lock: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub projection: Option<Projection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective_fov: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective_near: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub perspective_far: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ortho_scale: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ortho_near: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ortho_far: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_thickness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outline_color: Option<[f32; 3]>,
}

impl Bookmark {
    pub fn from_json(json: &str) -> crate::error::ViewerResult<Self> {
        serde_json::from_str(json).map_err(|e| crate::error::ViewerError::Bookmark(e.to_string()))
    }

    pub fn to_json(&self) -> crate::error::ViewerResult<String> {
        serde_json::to_string(self).map_err(|e| crate::error::ViewerError::Bookmark(e.to_string()))
    }
}

/// A model and its own transform stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    pub id: String,
    pub src: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<[f32; 3]>,
}

/// Object overrides; only present when something differs from the defaults.
///
/// `type`, `color` and `opacity` are relative to what the model's loader
/// supplied for the object.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectEntry {
    pub id: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub type_tag: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clippable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pickable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outlined: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rotate: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translate: Option<[f32; 3]>,
}

impl ObjectEntry {
    /// True when the entry carries no override
    pub fn is_empty(&self) -> bool {
        self.type_tag.is_none()
            && self.visible.is_none()
            && self.opacity.is_none()
            && self.color.is_none()
            && self.clippable.is_none()
            && self.pickable.is_none()
            && self.outlined.is_none()
            && self.scale.is_none()
            && self.rotate.is_none()
            && self.translate.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationEntry {
    pub id: String,
    pub object: String,
    pub prim_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bary: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desc: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pin_shown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_shown: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occludable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub eye: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub look: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up: Option<[f32; 3]>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClipEntry {
    pub id: String,
    pub pos: [f32; 3],
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightEntry {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: LightKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intensity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pos: Option<[f32; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space: Option<LightSpace>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_bookmark_serializes_to_empty_object() {
        assert_eq!(Bookmark::default().to_json().unwrap(), "{}");
    }

    #[test]
    fn test_field_names() {
        let doc = Bookmark {
            objects: vec![ObjectEntry {
                id: "saw#1".into(),
                type_tag: Some("Blade".into()),
                visible: Some(false),
                ..Default::default()
            }],
            gimbal_lock: Some(false),
            projection: Some(Projection::Ortho),
            ..Default::default()
        };
        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(
            value,
            json!({
                "objects": [{ "id": "saw#1", "type": "Blade", "visible": false }],
                "gimbalLock": false,
                "projection": "ortho"
            })
        );
    }

    #[test]
    fn test_malformed_json_is_rejected() {
        assert!(matches!(
            Bookmark::from_json("{\"models\": 3}"),
            Err(crate::error::ViewerError::Bookmark(_))
        ));
    }

    #[test]
    fn test_light_entry_kind() {
        let entry: LightEntry =
            serde_json::from_str(r#"{"id":"sun","type":"dir","dir":[0,-1,0]}"#).unwrap();
        assert_eq!(entry.kind, LightKind::Directional);
        assert_eq!(entry.dir, Some([0.0, -1.0, 0.0]));
        assert_eq!(entry.space, None);
    }
}
