mod common;

use approx::assert_relative_eq;
use glam::Vec3;

#[test]
fn test_set_scale_idempotent() {
    let mut viewer = common::loaded_viewer();
    viewer.set_scale("saw", [1.0, 1.0, 1.0]);
    let once = viewer.get_aabb("saw");
    viewer.set_scale("saw", [1.0, 1.0, 1.0]);
    assert_eq!(viewer.get_aabb("saw"), once);
    assert_eq!(once.to_array(), [0.0, 0.0, 0.0, 3.0, 1.0, 1.0]);
}

#[test]
fn test_model_and_object_scale_compose() {
    let mut viewer = common::loaded_viewer();
    viewer.set_scale("saw", [2.0, 2.0, 2.0]);
    viewer.set_scale("saw#1", [0.5, 0.5, 0.5]);

    let (scale, _, _) = viewer
        .world_matrix("saw#1")
        .unwrap()
        .to_scale_rotation_translation();
    assert_relative_eq!(scale.x, 1.0, epsilon = 1e-5);
    assert_relative_eq!(scale.y, 1.0, epsilon = 1e-5);
    assert_relative_eq!(scale.z, 1.0, epsilon = 1e-5);

    // The sibling only gets the model's scale
    let (sibling, _, _) = viewer
        .world_matrix("saw#2")
        .unwrap()
        .to_scale_rotation_translation();
    assert_relative_eq!(sibling.x, 2.0, epsilon = 1e-5);
}

#[test]
fn test_object_change_does_not_move_model_or_sibling() {
    let mut viewer = common::loaded_viewer();
    let before = viewer.get_aabb("saw#2");
    viewer.set_translate("saw#1", [0.0, 10.0, 0.0]);

    assert_eq!(viewer.get_aabb("saw#2"), before);
    assert_eq!(viewer.get_translate("saw").unwrap(), Vec3::ZERO);
    assert_relative_eq!(viewer.get_aabb("saw#1").min.y, 10.0, epsilon = 1e-5);
}

#[test]
fn test_model_change_is_live_for_objects() {
    let mut viewer = common::loaded_viewer();
    viewer.set_rotate("saw#1", [0.0, 0.0, 0.0]);
    viewer.set_translate("saw", [5.0, 0.0, 0.0]);
    assert_relative_eq!(viewer.get_aabb("saw#1").min.x, 5.0, epsilon = 1e-5);

    viewer.set_translate("saw", [0.0, 0.0, 0.0]);
    assert_relative_eq!(viewer.get_aabb("saw#1").min.x, 0.0, epsilon = 1e-5);
}

#[test]
fn test_rotation_about_frozen_pivot() {
    let mut viewer = common::loaded_viewer();
    let center = viewer.get_center("saw#2");
    viewer.set_rotate("saw#2", [0.0, 0.0, 90.0]);
    let rotated = viewer.get_center("saw#2");
    assert_relative_eq!(rotated.x, center.x, epsilon = 1e-4);
    assert_relative_eq!(rotated.y, center.y, epsilon = 1e-4);

    // Growing the scene does not move the pivot already taken
    viewer.set_translate("drill", [-50.0, 0.0, 0.0]);
    let again = viewer.get_center("saw#2");
    assert_relative_eq!(again.x, center.x, epsilon = 1e-4);
}

#[test]
fn test_type_tag_targets_its_objects() {
    let mut viewer = common::loaded_viewer();
    assert_eq!(viewer.add_translate("Blade", [0.0, 0.0, 1.0]), 1);
    assert_eq!(viewer.get_translate("saw#2").unwrap(), Vec3::new(0.0, 0.0, 1.0));
    assert_eq!(viewer.get_translate("saw#1").unwrap(), Vec3::ZERO);
}

#[test]
fn test_transform_on_clip_is_skipped() {
    let mut viewer = common::loaded_viewer();
    viewer
        .create_clip(Some("section"), &walkthrough_core::ClipDesc::default())
        .unwrap();
    assert_eq!(viewer.set_scale(["section", "saw"], [2.0, 2.0, 2.0]), 1);
}

#[test]
fn test_object_rotates_in_place_after_model_moved() {
    let mut viewer = common::loaded_viewer();
    viewer.set_translate("saw", [0.0, 5.0, 0.0]);
    let center = viewer.get_center("saw#1");
    assert_relative_eq!(center.y, 5.5, epsilon = 1e-5);

    viewer.set_rotate("saw#1", [0.0, 0.0, 180.0]);
    let turned = viewer.get_center("saw#1");
    assert_relative_eq!(turned.x, center.x, epsilon = 1e-4);
    assert_relative_eq!(turned.y, center.y, epsilon = 1e-4);
    assert_relative_eq!(turned.z, center.z, epsilon = 1e-4);
}
