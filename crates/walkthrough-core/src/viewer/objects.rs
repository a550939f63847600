//! Object attributes, type tags and listings

use super::Viewer;
use crate::engine::SceneEngine;
use crate::error::{ViewerError, ViewerResult};
use crate::registry::{EntityRef, Object};
use crate::resolve::Target;

impl<E: SceneEngine> Viewer<E> {
    /// Apply `update` to every object a target resolves to; other kinds are
    /// warned and skipped. Returns how many objects were touched.
    fn update_objects(
        &mut self,
        target: Target,
        attribute: &str,
        mut update: impl FnMut(&mut Object),
    ) -> usize {
        let mut count = 0;
        for entity in self.scene.resolve_lenient(&target) {
            match entity {
                EntityRef::Object(key) => {
                    if let Some(object) = self.scene.registry.object_mut(key) {
                        update(object);
                        count += 1;
                    }
                }
                other => {
                    let id = self.scene.registry.id_of(other).unwrap_or_default();
                    tracing::warn!(
                        "Cannot set {} on '{}': {}",
                        attribute,
                        id,
                        ViewerError::kind_mismatch(id, "object", other.kind())
                    );
                }
            }
        }
        count
    }

    fn object_by_id(&self, id: &str) -> ViewerResult<&Object> {
        let key = self.scene.registry.object_key(id)?;
        self.scene
            .registry
            .object(key)
            .ok_or_else(|| ViewerError::NotFound(id.to_string()))
    }

    /// Show or hide targets.
    ///
    /// Clips are activated or deactivated; annotations have both their pin
    /// and label toggled. Lights cannot be hidden.
    pub fn set_visible(&mut self, target: impl Into<Target>, visible: bool) -> usize {
        let mut count = 0;
        for entity in self.scene.resolve_lenient(&target.into()) {
            match entity {
                EntityRef::Object(key) => {
                    if let Some(object) = self.scene.registry.object_mut(key) {
                        object.visible = visible;
                        count += 1;
                    }
                }
                EntityRef::Clip(key) => {
                    if let Some(clip) = self.scene.registry.clip_mut(key) {
                        clip.active = visible;
                        self.clip_list.mark_dirty();
                        count += 1;
                    }
                }
                EntityRef::Annotation(key) => {
                    if let Some(annotation) = self.scene.registry.annotation_mut(key) {
                        annotation.pin_shown = visible;
                        annotation.label_shown = visible;
                        count += 1;
                    }
                }
                other => {
                    let id = self.scene.registry.id_of(other).unwrap_or_default();
                    tracing::warn!(
                        "Cannot change visibility: {}",
                        ViewerError::kind_mismatch(id, "object, clip or annotation", other.kind())
                    );
                }
            }
        }
        count
    }

    pub fn show(&mut self, target: impl Into<Target>) -> usize {
        self.set_visible(target, true)
    }

    pub fn hide(&mut self, target: impl Into<Target>) -> usize {
        self.set_visible(target, false)
    }

    /// Opacity is clamped to `[0, 1]`
    pub fn set_opacity(&mut self, target: impl Into<Target>, opacity: f32) -> usize {
        let opacity = opacity.clamp(0.0, 1.0);
        self.update_objects(target.into(), "opacity", |o| o.opacity = opacity)
    }

    /// Color of objects, or of lights named directly
    pub fn set_color(&mut self, target: impl Into<Target>, color: [f32; 3]) -> usize {
        let mut count = 0;
        for entity in self.scene.resolve_lenient(&target.into()) {
            match entity {
                EntityRef::Object(key) => {
                    if let Some(object) = self.scene.registry.object_mut(key) {
                        object.color = color;
                        count += 1;
                    }
                }
                EntityRef::Light(key) => {
                    if let Some(light) = self.scene.registry.light_mut(key) {
                        light.set_color(color);
                        self.light_list.mark_dirty();
                        count += 1;
                    }
                }
                other => {
                    let id = self.scene.registry.id_of(other).unwrap_or_default();
                    tracing::warn!(
                        "Cannot set color: {}",
                        ViewerError::kind_mismatch(id, "object or light", other.kind())
                    );
                }
            }
        }
        count
    }

    pub fn set_clippable(&mut self, target: impl Into<Target>, clippable: bool) -> usize {
        self.update_objects(target.into(), "clippable", |o| o.clippable = clippable)
    }

    pub fn set_pickable(&mut self, target: impl Into<Target>, pickable: bool) -> usize {
        self.update_objects(target.into(), "pickable", |o| o.pickable = pickable)
    }

    pub fn set_outlined(&mut self, target: impl Into<Target>, outlined: bool) -> usize {
        self.update_objects(target.into(), "outlined", |o| o.outlined = outlined)
    }

    /// Visibility of one entity; a model is visible if any of its objects is
    pub fn is_visible(&self, id: &str) -> ViewerResult<bool> {
        let registry = &self.scene.registry;
        match registry.lookup(id)? {
            EntityRef::Object(key) => Ok(registry.object(key).is_some_and(|o| o.visible)),
            EntityRef::Model(key) => Ok(registry.model(key).is_some_and(|m| {
                m.objects
                    .iter()
                    .any(|o| registry.object(*o).is_some_and(|o| o.visible))
            })),
            EntityRef::Clip(key) => Ok(registry.clip(key).is_some_and(|c| c.active)),
            EntityRef::Annotation(key) => {
                Ok(registry.annotation(key).is_some_and(|a| a.pin_shown))
            }
            EntityRef::Light(_) => Err(ViewerError::kind_mismatch(
                id,
                "object, model, clip or annotation",
                crate::registry::EntityKind::Light,
            )),
        }
    }

    pub fn get_opacity(&self, id: &str) -> ViewerResult<f32> {
        self.object_by_id(id).map(|o| o.opacity)
    }

    /// Color of an object or a light
    pub fn get_color(&self, id: &str) -> ViewerResult<[f32; 3]> {
        match self.scene.registry.lookup(id)? {
            EntityRef::Light(key) => self
                .scene
                .registry
                .light(key)
                .map(|l| l.color)
                .ok_or_else(|| ViewerError::NotFound(id.to_string())),
            _ => self.object_by_id(id).map(|o| o.color),
        }
    }

    pub fn is_clippable(&self, id: &str) -> ViewerResult<bool> {
        self.object_by_id(id).map(|o| o.clippable)
    }

    pub fn is_pickable(&self, id: &str) -> ViewerResult<bool> {
        self.object_by_id(id).map(|o| o.pickable)
    }

    pub fn is_outlined(&self, id: &str) -> ViewerResult<bool> {
        self.object_by_id(id).map(|o| o.outlined)
    }

    /// Retag every object a target resolves to, counting those whose tag changed
    pub fn set_type(&mut self, target: impl Into<Target>, tag: &str) -> usize {
        let mut count = 0;
        for entity in self.scene.resolve_lenient(&target.into()) {
            let EntityRef::Object(key) = entity else {
                continue;
            };
            match self.scene.registry.set_type(key, tag) {
                Ok(true) => count += 1,
                Ok(false) => {}
                Err(e) => tracing::warn!("Cannot set type: {}", e),
            }
        }
        count
    }

    pub fn get_type(&self, id: &str) -> ViewerResult<String> {
        self.object_by_id(id).map(|o| o.type_tag.clone())
    }

    /// Type tags in use, sorted
    pub fn get_types(&self) -> Vec<String> {
        self.scene
            .registry
            .types()
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    /// Model ids in registration order
    pub fn get_models(&self) -> Vec<String> {
        self.scene
            .registry
            .models()
            .map(|(_, m)| m.id.clone())
            .collect()
    }

    /// Object ids of one model, or of the whole scene
    pub fn get_objects(&self, model: Option<&str>) -> ViewerResult<Vec<String>> {
        let registry = &self.scene.registry;
        match model {
            None => Ok(registry.objects().map(|(_, o)| o.id.clone()).collect()),
            Some(id) => {
                let key = registry.model_key(id)?;
                Ok(registry
                    .model(key)
                    .map(|m| {
                        m.objects
                            .iter()
                            .filter_map(|o| registry.object(*o).map(|o| o.id.clone()))
                            .collect()
                    })
                    .unwrap_or_default())
            }
        }
    }

    /// Source locator a model was loaded from
    pub fn get_src(&self, model: &str) -> ViewerResult<String> {
        let key = self.scene.registry.model_key(model)?;
        self.scene
            .registry
            .model(key)
            .map(|m| m.src.clone())
            .ok_or_else(|| ViewerError::NotFound(model.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use crate::aabb::Aabb;
    use crate::clips::ClipDesc;
    use crate::engine::{MemoryEngine, ParsedModel, ParsedObject};
    use crate::error::ViewerError;
    use crate::viewer::Viewer;

    fn viewer() -> Viewer<MemoryEngine> {
        let engine = MemoryEngine::new().with_source(
            "saw.gltf",
            ParsedModel::new(vec![
                ParsedObject::new("1", Aabb::from_array([0.0, 0.0, 0.0, 1.0, 1.0, 1.0])),
                ParsedObject::new("2", Aabb::from_array([2.0, 0.0, 0.0, 3.0, 1.0, 1.0]))
                    .with_color([0.5, 0.5, 0.5]),
            ]),
        );
        let mut viewer = Viewer::new(engine);
        viewer.load_model("saw", "saw.gltf").unwrap();
        viewer.tick(0.0);
        viewer
    }

    #[test]
    fn test_hide_one_object() {
        let mut viewer = viewer();
        assert_eq!(viewer.hide(["saw#1"]), 1);
        assert_eq!(viewer.resolve("saw").unwrap(), vec!["saw#1", "saw#2"]);
        assert_eq!(viewer.is_visible("saw#1"), Ok(false));
        assert_eq!(viewer.is_visible("saw#2"), Ok(true));
        assert_eq!(viewer.is_visible("saw"), Ok(true));

        viewer.hide("saw");
        assert_eq!(viewer.is_visible("saw"), Ok(false));
    }

    #[test]
    fn test_hide_clip_deactivates_it() {
        let mut viewer = viewer();
        viewer.create_clip(Some("section"), &ClipDesc::default()).unwrap();
        viewer.hide("section");
        assert_eq!(viewer.is_visible("section"), Ok(false));
        viewer.tick(0.0);
        assert!(viewer.engine().clips().is_empty());
    }

    #[test]
    fn test_opacity_is_clamped() {
        let mut viewer = viewer();
        viewer.set_opacity("saw", 3.0);
        assert_eq!(viewer.get_opacity("saw#1"), Ok(1.0));
        viewer.set_opacity("saw#2", -1.0);
        assert_eq!(viewer.get_opacity("saw#2"), Ok(0.0));
    }

    #[test]
    fn test_loader_color_kept() {
        let viewer = viewer();
        assert_eq!(viewer.get_color("saw#2"), Ok([0.5, 0.5, 0.5]));
    }

    #[test]
    fn test_attribute_getters_reject_models() {
        let viewer = viewer();
        assert!(matches!(
            viewer.get_opacity("saw"),
            Err(ViewerError::TypeMismatch { .. })
        ));
        assert_eq!(
            viewer.is_pickable("nope"),
            Err(ViewerError::NotFound("nope".into()))
        );
    }

    #[test]
    fn test_set_type_moves_between_groups() {
        let mut viewer = viewer();
        assert_eq!(viewer.set_type("saw#1", "Blade"), 1);
        assert_eq!(viewer.resolve("Blade").unwrap(), vec!["saw#1"]);
        assert_eq!(viewer.resolve("DEFAULT").unwrap(), vec!["saw#2"]);

        viewer.set_type("saw#1", "Handle");
        assert!(viewer.resolve("Blade").is_err());
        // Same tag again is not a change
        assert_eq!(viewer.set_type(["saw#1", "saw#2"], "Handle"), 1);
        assert_eq!(viewer.get_type("saw#1"), Ok("Handle".to_string()));
        assert_eq!(viewer.get_types(), vec!["Handle"]);
    }

    #[test]
    fn test_listings() {
        let viewer = viewer();
        assert_eq!(viewer.get_models(), vec!["saw"]);
        assert_eq!(
            viewer.get_objects(Some("saw")).unwrap(),
            vec!["saw#1", "saw#2"]
        );
        assert_eq!(viewer.get_src("saw"), Ok("saw.gltf".to_string()));
    }
}
