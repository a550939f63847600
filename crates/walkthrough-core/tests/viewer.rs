mod common;

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use walkthrough_core::{AnnotationDesc, ClipDesc, LightDesc, LightSpace, ViewerError};

#[test]
fn test_load_events() {
    let mut viewer = common::bare_viewer();
    let log = Rc::new(RefCell::new(Vec::new()));
    for event in ["loadedModel", "loadFailed", "unloadedModel"] {
        let sink = log.clone();
        viewer.on(event, move |value: &Value| {
            sink.borrow_mut()
                .push(format!("{}:{}", event, value["id"].as_str().unwrap_or_default()))
        });
    }

    viewer.load_model("saw", "saw.gltf").unwrap();
    viewer.load_model("ghost", "ghost.gltf").unwrap();
    viewer.tick(0.0);
    viewer.unload_model("saw").unwrap();

    assert_eq!(
        *log.borrow(),
        vec!["loadedModel:saw", "loadFailed:ghost", "unloadedModel:saw"]
    );
}

#[test]
fn test_off_stops_delivery() {
    let mut viewer = common::bare_viewer();
    let count = Rc::new(RefCell::new(0));
    let sink = count.clone();
    let id = viewer.on("loadedModel", move |_| *sink.borrow_mut() += 1);
    assert!(viewer.off(id));

    viewer.load_model("saw", "saw.gltf").unwrap();
    viewer.tick(0.0);
    assert_eq!(*count.borrow(), 0);
}

#[test]
fn test_one_flush_per_tick() {
    let mut viewer = common::loaded_viewer();
    let lights_before = viewer.engine().light_flushes();

    let sun = viewer
        .create_light(None, &LightDesc::directional([0.0, -1.0, 0.0]))
        .unwrap();
    viewer.set_light_intensity(&sun, 2.0).unwrap();
    viewer.set_light_space(&sun, LightSpace::World).unwrap();
    viewer.set_color(sun.as_str(), [1.0, 0.9, 0.8]);
    for i in 0..5 {
        viewer
            .create_clip(Some(&format!("c{}", i)), &ClipDesc::default())
            .unwrap();
    }
    viewer.tick(0.016);

    assert_eq!(viewer.engine().light_flushes(), lights_before + 1);
    assert_eq!(viewer.engine().clip_flushes(), 1);
    assert_eq!(viewer.engine().clips().len(), 5);
    assert_eq!(viewer.engine().lights().len(), 5);

    viewer.tick(0.016);
    assert_eq!(viewer.engine().light_flushes(), lights_before + 1);
}

#[test]
fn test_annotations_cascade_with_their_object() {
    let mut viewer = common::loaded_viewer();
    viewer
        .create_annotation(Some("a1"), &AnnotationDesc::new("saw#1", 0))
        .unwrap();
    viewer
        .create_annotation(Some("a2"), &AnnotationDesc::new("drill#body", 1))
        .unwrap();

    let report = viewer.unload_model("saw").unwrap();
    assert_eq!(report.annotations, vec!["a1"]);
    assert_eq!(viewer.get_annotations(None).unwrap(), vec!["a2"]);
    assert!(viewer.resolve("a1").is_err());
}

#[test]
fn test_show_hide_reaches_annotations() {
    let mut viewer = common::loaded_viewer();
    viewer
        .create_annotation(Some("note"), &AnnotationDesc::new("saw#2", 0))
        .unwrap();
    assert_eq!(viewer.hide(["note", "saw#1"]), 2);
    let note = viewer.get_annotation("note").unwrap();
    assert!(!note.pin_shown && !note.label_shown);
    assert_eq!(viewer.is_visible("note"), Ok(false));
}

#[test]
fn test_retarget_annotation() {
    let mut viewer = common::loaded_viewer();
    viewer
        .create_annotation(Some("note"), &AnnotationDesc::new("saw#1", 0))
        .unwrap();
    viewer
        .set_annotation_target("note", "drill#body", 1, [1.0, 0.0, 0.0])
        .unwrap();
    assert!(viewer.get_annotations(Some("saw#1")).unwrap().is_empty());
    assert_eq!(viewer.get_annotations(Some("drill#body")).unwrap(), vec!["note"]);

    // Second drill triangle is (1, 3, 2); weight all on its first corner
    let pos = viewer.annotation_world_pos("note").unwrap().unwrap();
    assert_eq!(pos.to_array(), [-3.0, 0.0, 0.0]);
}

#[test]
fn test_shared_namespace() {
    let mut viewer = common::loaded_viewer();
    assert_eq!(
        viewer.create_clip(Some("saw#1"), &ClipDesc::default()),
        Err(ViewerError::DuplicateId("saw#1".into()))
    );
    assert!(viewer.load_model("note", "saw.gltf").is_ok());
    assert!(matches!(
        viewer.create_light(Some("note"), &LightDesc::ambient()),
        Err(ViewerError::DuplicateId(_))
    ));
}
