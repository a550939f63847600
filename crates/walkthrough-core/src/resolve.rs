//! Resolution of user-supplied ids into concrete entities.
//!
//! Each id is tried against, in order:
//!
//! 1. an object id (itself)
//! 2. a type tag (every object carrying it, registration order)
//! 3. a model id (every object it owns, registration order)
//! 4. a light, clip or annotation id (itself, unexpanded)
//!
//! Callers rely on this precedence, e.g. a type tag shadows a model of the
//! same name.

use std::collections::HashSet;

use crate::aabb::Aabb;
use crate::error::{ViewerError, ViewerResult};
use crate::registry::EntityRef;
use crate::scene::Scene;

/// One element of a target list
#[derive(Debug, Clone, PartialEq)]
pub enum TargetItem {
    Id(String),
    /// Literal box, only meaningful to bounding-box queries
    Aabb(Aabb),
}

/// What an operation applies to
#[derive(Debug, Clone, PartialEq)]
pub enum Target {
    /// Every object
    All,
    One(TargetItem),
    Many(Vec<TargetItem>),
}

impl Target {
    /// Ids named by the target, ignoring literal boxes
    pub fn ids(&self) -> Vec<&str> {
        let items: &[TargetItem] = match self {
            Target::All => &[],
            Target::One(item) => std::slice::from_ref(item),
            Target::Many(items) => items,
        };
        items
            .iter()
            .filter_map(|item| match item {
                TargetItem::Id(id) => Some(id.as_str()),
                TargetItem::Aabb(_) => None,
            })
            .collect()
    }
}

impl From<&str> for TargetItem {
    fn from(id: &str) -> Self {
        TargetItem::Id(id.to_string())
    }
}

impl From<String> for TargetItem {
    fn from(id: String) -> Self {
        TargetItem::Id(id)
    }
}

impl From<&String> for TargetItem {
    fn from(id: &String) -> Self {
        TargetItem::Id(id.clone())
    }
}

impl From<Aabb> for TargetItem {
    fn from(aabb: Aabb) -> Self {
        TargetItem::Aabb(aabb)
    }
}

impl From<[f32; 6]> for TargetItem {
    fn from(aabb: [f32; 6]) -> Self {
        TargetItem::Aabb(Aabb::from_array(aabb))
    }
}

impl From<&str> for Target {
    fn from(id: &str) -> Self {
        Target::One(id.into())
    }
}

impl From<String> for Target {
    fn from(id: String) -> Self {
        Target::One(id.into())
    }
}

impl From<&String> for Target {
    fn from(id: &String) -> Self {
        Target::One(id.into())
    }
}

impl From<Aabb> for Target {
    fn from(aabb: Aabb) -> Self {
        Target::One(aabb.into())
    }
}

impl From<[f32; 6]> for Target {
    fn from(aabb: [f32; 6]) -> Self {
        Target::One(aabb.into())
    }
}

impl From<Vec<TargetItem>> for Target {
    fn from(items: Vec<TargetItem>) -> Self {
        Target::Many(items)
    }
}

impl From<Vec<&str>> for Target {
    fn from(ids: Vec<&str>) -> Self {
        Target::Many(ids.into_iter().map(TargetItem::from).collect())
    }
}

impl From<Vec<String>> for Target {
    fn from(ids: Vec<String>) -> Self {
        Target::Many(ids.into_iter().map(TargetItem::from).collect())
    }
}

impl From<&[&str]> for Target {
    fn from(ids: &[&str]) -> Self {
        Target::Many(ids.iter().copied().map(TargetItem::from).collect())
    }
}

impl From<&[String]> for Target {
    fn from(ids: &[String]) -> Self {
        Target::Many(ids.iter().map(TargetItem::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Target {
    fn from(ids: [&str; N]) -> Self {
        Target::Many(ids.into_iter().map(TargetItem::from).collect())
    }
}

impl Scene {
    /// Expand one id following the precedence rule
    pub fn resolve_id(&self, id: &str) -> ViewerResult<Vec<EntityRef>> {
        let entity = self.registry.get(id);

        if let Some(EntityRef::Object(key)) = entity {
            return Ok(vec![EntityRef::Object(key)]);
        }
        if let Some(members) = self.registry.objects_of_type(id) {
            return Ok(members.map(EntityRef::Object).collect());
        }
        match entity {
            Some(EntityRef::Model(key)) => Ok(self
                .registry
                .model(key)
                .map(|m| m.objects.iter().copied().map(EntityRef::Object).collect())
                .unwrap_or_default()),
            Some(other) => Ok(vec![other]),
            None => Err(ViewerError::NotFound(id.to_string())),
        }
    }

    /// Expand a target into a de-duplicated list, first occurrence wins.
    ///
    /// A single unknown id is an error; unknown entries of a list are logged
    /// and skipped.
    pub fn resolve(&self, target: &Target) -> ViewerResult<Vec<EntityRef>> {
        match target {
            Target::All => Ok(self
                .registry
                .objects()
                .map(|(key, _)| EntityRef::Object(key))
                .collect()),
            Target::One(TargetItem::Id(id)) => self.resolve_id(id),
            Target::One(TargetItem::Aabb(_)) => Ok(Vec::new()),
            Target::Many(items) => {
                let mut seen = HashSet::new();
                let mut out = Vec::new();
                for item in items {
                    let TargetItem::Id(id) = item else {
                        continue;
                    };
                    match self.resolve_id(id) {
                        Ok(entities) => {
                            out.extend(entities.into_iter().filter(|e| seen.insert(*e)));
                        }
                        Err(e) => tracing::warn!("Skipping target entry: {}", e),
                    }
                }
                Ok(out)
            }
        }
    }

    /// Resolve a target, logging and returning nothing on failure
    pub(crate) fn resolve_lenient(&self, target: &Target) -> Vec<EntityRef> {
        self.resolve(target).unwrap_or_else(|e| {
            tracing::warn!("Unresolved target: {}", e);
            Vec::new()
        })
    }

    /// Entities a transform operation addresses.
    ///
    /// Model and object ids address their own stacks directly (a model id is
    /// not expanded to its objects); type tags expand to their objects.
    pub fn transform_targets(&self, target: &Target) -> Vec<EntityRef> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut push = |e: EntityRef, out: &mut Vec<EntityRef>| {
            if seen.insert(e) {
                out.push(e);
            }
        };

        if let Target::All = target {
            for (key, _) in self.registry.models() {
                push(EntityRef::Model(key), &mut out);
            }
            return out;
        }

        for id in target.ids() {
            let entity = self.registry.get(id);
            if let Some(e @ EntityRef::Object(_)) = entity {
                push(e, &mut out);
            } else if let Some(members) = self.registry.objects_of_type(id) {
                for key in members {
                    push(EntityRef::Object(key), &mut out);
                }
            } else if let Some(e @ EntityRef::Model(_)) = entity {
                push(e, &mut out);
            } else {
                tracing::warn!("Skipping '{}': not a model, object or type", id);
            }
        }
        out
    }

    /// Union of every box the target resolves to, plus inline literal boxes.
    ///
    /// Never fails: with nothing to contribute, the full scene box is returned.
    pub fn resolve_aabb(&self, target: &Target) -> Aabb {
        let items: &[TargetItem] = match target {
            Target::All => return self.scene_aabb(),
            Target::One(item) => std::slice::from_ref(item),
            Target::Many(items) => items,
        };

        let mut bounds = Aabb::EMPTY;
        for item in items {
            match item {
                TargetItem::Aabb(aabb) => bounds = bounds.union(aabb),
                TargetItem::Id(id) => match self.resolve_id(id) {
                    Ok(entities) => {
                        for entity in entities {
                            bounds = bounds.union(&self.entity_world_aabb(entity));
                        }
                    }
                    Err(e) => tracing::warn!("Skipping bounds entry: {}", e),
                },
            }
        }

        if bounds.is_empty() {
            self.scene_aabb()
        } else {
            bounds
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{Model, Object};

    fn scene() -> Scene {
        let mut scene = Scene::new();
        let saw = scene.registry.register_model(Model::new("saw", "saw.gltf")).unwrap();
        let drill = scene
            .registry
            .register_model(Model::new("drill", "drill.gltf"))
            .unwrap();
        for (id, model, x) in [("saw#1", saw, 0.0), ("drill#1", drill, 5.0), ("saw#2", saw, 10.0)] {
            scene
                .registry
                .register_object(Object::new(
                    id,
                    model,
                    Aabb::from_array([x, 0.0, 0.0, x + 1.0, 1.0, 1.0]),
                ))
                .unwrap();
        }
        scene
    }

    fn ids(scene: &Scene, entities: &[EntityRef]) -> Vec<String> {
        entities
            .iter()
            .map(|e| scene.registry.id_of(*e).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_model_expands_in_registration_order() {
        let scene = scene();
        let resolved = scene.resolve(&"saw".into()).unwrap();
        assert_eq!(ids(&scene, &resolved), vec!["saw#1", "saw#2"]);
    }

    #[test]
    fn test_list_deduplicates_and_skips_unknown() {
        let scene = scene();
        let resolved = scene
            .resolve(&["saw#2", "nope", "saw", "drill#1"].into())
            .unwrap();
        assert_eq!(ids(&scene, &resolved), vec!["saw#2", "saw#1", "drill#1"]);
    }

    #[test]
    fn test_single_unknown_is_not_found() {
        let scene = scene();
        assert_eq!(
            scene.resolve(&"nope".into()),
            Err(ViewerError::NotFound("nope".into()))
        );
    }

    #[test]
    fn test_type_tag_shadows_model_id() {
        let mut scene = scene();
        let key = scene.registry.object_key("drill#1").unwrap();
        scene.registry.set_type(key, "saw").unwrap();

        let resolved = scene.resolve(&"saw".into()).unwrap();
        assert_eq!(ids(&scene, &resolved), vec!["drill#1"]);
    }

    #[test]
    fn test_resolve_aabb_mixed_input() {
        let scene = scene();
        let target: Target = vec![
            TargetItem::from("saw#1"),
            TargetItem::from([-5.0, -5.0, -5.0, -4.0, -4.0, -4.0]),
        ]
        .into();
        assert_eq!(
            scene.resolve_aabb(&target).to_array(),
            [-5.0, -5.0, -5.0, 1.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_resolve_aabb_falls_back_to_scene() {
        let scene = scene();
        let empty: Target = Vec::<&str>::new().into();
        assert_eq!(
            scene.resolve_aabb(&empty).to_array(),
            [0.0, 0.0, 0.0, 11.0, 1.0, 1.0]
        );
        assert_eq!(scene.resolve_aabb(&"nope".into()), scene.scene_aabb());
    }

    #[test]
    fn test_transform_targets_do_not_expand_models() {
        let scene = scene();
        let targets = scene.transform_targets(&["saw", "saw#1", "DEFAULT"].into());
        assert_eq!(
            ids(&scene, &targets),
            vec!["saw", "saw#1", "drill#1", "saw#2"]
        );
    }
}
