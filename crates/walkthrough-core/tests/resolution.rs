mod common;

use approx::assert_relative_eq;
use walkthrough_core::{Aabb, Target, TargetItem, ViewerError};

#[test]
fn test_saw_hide_scenario() {
    let mut viewer = common::loaded_viewer();
    viewer.hide(["saw#1"]);

    assert_eq!(viewer.resolve("saw").unwrap(), vec!["saw#1", "saw#2"]);
    assert_eq!(viewer.is_visible("saw#1"), Ok(false));
    assert_eq!(viewer.is_visible("saw#2"), Ok(true));
}

#[test]
fn test_all_objects_in_registration_order() {
    let viewer = common::loaded_viewer();
    assert_eq!(
        viewer.resolve(Target::All).unwrap(),
        vec!["saw#1", "saw#2", "drill#body"]
    );
}

#[test]
fn test_set_type_regroups() {
    let mut viewer = common::loaded_viewer();
    assert_eq!(viewer.resolve("Blade").unwrap(), vec!["saw#2"]);

    viewer.set_type("drill#body", "Blade");
    assert_eq!(viewer.resolve("Blade").unwrap(), vec!["saw#2", "drill#body"]);

    viewer.set_type("saw#2", "Motor");
    assert_eq!(viewer.resolve("Blade").unwrap(), vec!["drill#body"]);
    assert_eq!(viewer.resolve("Motor").unwrap(), vec!["saw#2"]);
}

#[test]
fn test_list_input_is_tolerant_and_deduplicated() {
    let mut viewer = common::loaded_viewer();
    let ids = viewer
        .resolve(["drill", "missing", "saw#2", "saw"])
        .unwrap();
    assert_eq!(ids, vec!["drill#body", "saw#2", "saw#1"]);

    // Batch ops skip the unresolved entry and still apply the rest
    assert_eq!(viewer.set_opacity(["missing", "saw"], 0.25), 2);
    assert_eq!(viewer.get_opacity("saw#1"), Ok(0.25));
}

#[test]
fn test_destroyed_model_is_gone() {
    let mut viewer = common::loaded_viewer();
    let report = viewer.destroy("saw").unwrap();
    assert_eq!(report.objects, vec!["saw#1", "saw#2"]);

    assert_eq!(viewer.resolve("saw"), Err(ViewerError::NotFound("saw".into())));
    assert!(viewer.resolve("Blade").is_err());
    assert_eq!(viewer.resolve("DEFAULT").unwrap(), vec!["drill#body"]);
    assert_eq!(viewer.engine().unloaded(), &["saw".to_string()]);
}

#[test]
fn test_resolve_aabb_empty_is_scene_box() {
    let viewer = common::loaded_viewer();
    let scene = viewer.get_scene_aabb();
    assert_eq!(viewer.get_aabb(Vec::<&str>::new()), scene);
    assert_eq!(viewer.get_aabb(["missing"]), scene);
    assert_eq!(scene.to_array(), [-4.0, 0.0, 0.0, 3.0, 1.0, 1.0]);
}

#[test]
fn test_resolve_aabb_mixes_ids_and_boxes() {
    let viewer = common::loaded_viewer();
    let target = Target::Many(vec![
        TargetItem::from("saw#1"),
        TargetItem::from(Aabb::from_array([0.0, 0.0, 0.0, 0.5, 5.0, 0.5])),
    ]);
    assert_eq!(
        viewer.get_aabb(target).to_array(),
        [0.0, 0.0, 0.0, 1.0, 5.0, 1.0]
    );
    let center = viewer.get_center("drill#body");
    assert_relative_eq!(center.x, -3.5, epsilon = 1e-6);
}

#[test]
fn test_default_scene_box_when_empty() {
    let viewer = common::bare_viewer();
    assert_eq!(
        viewer.get_aabb(Target::All).to_array(),
        [-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]
    );
}
