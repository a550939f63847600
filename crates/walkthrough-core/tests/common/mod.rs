#![allow(dead_code)]

use walkthrough_core::{
    Aabb, MemoryEngine, ParsedModel, ParsedObject, Viewer, ViewerConfig,
};

/// Two-object saw plus a one-object drill, each with a triangle for pins
pub fn engine() -> MemoryEngine {
    let quad = |x: f32| {
        (
            vec![[x, 0.0, 0.0], [x + 1.0, 0.0, 0.0], [x, 1.0, 0.0], [x + 1.0, 1.0, 1.0]],
            vec![0, 1, 2, 1, 3, 2],
        )
    };
    let (p1, i1) = quad(0.0);
    let (p2, i2) = quad(2.0);
    let (p3, i3) = quad(-4.0);

    MemoryEngine::new()
        .with_source(
            "saw.gltf",
            ParsedModel::new(vec![
                ParsedObject::new("1", Aabb::EMPTY).with_geometry(p1, i1),
                ParsedObject::new("2", Aabb::EMPTY)
                    .with_geometry(p2, i2)
                    .with_type("Blade"),
            ]),
        )
        .with_source(
            "drill.gltf",
            ParsedModel::new(vec![ParsedObject::new("body", Aabb::EMPTY).with_geometry(p3, i3)]),
        )
}

/// Viewer without the default light rig
pub fn bare_viewer() -> Viewer<MemoryEngine> {
    let mut config = ViewerConfig::new();
    config.loading.default_lights = false;
    Viewer::with_config(engine(), &config)
}

/// Viewer with saw and drill loaded
pub fn loaded_viewer() -> Viewer<MemoryEngine> {
    let mut viewer = Viewer::new(engine());
    viewer.load_model("saw", "saw.gltf").unwrap();
    viewer.load_model("drill", "drill.gltf").unwrap();
    viewer.tick(0.0);
    viewer
}

/// Tick until no restore or load is pending, bounded
pub fn settle(viewer: &mut Viewer<MemoryEngine>) {
    for _ in 0..32 {
        if !viewer.is_restoring() && viewer.loads_in_flight() == 0 {
            return;
        }
        viewer.tick(0.0);
    }
    panic!("viewer did not settle");
}
