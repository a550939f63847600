//! Camera framing, flights, auto-orbit, projection and outline settings

use glam::Vec3;

use super::Viewer;
use crate::camera::{CameraFlight, CameraPose, Projection};
use crate::engine::SceneEngine;
use crate::error::{ViewerError, ViewerResult};
use crate::resolve::Target;

impl<E: SceneEngine> Viewer<E> {
    pub fn set_eye(&mut self, eye: impl Into<Vec3>) {
        self.flight = None;
        self.camera.eye = eye.into();
    }

    pub fn set_look(&mut self, look: impl Into<Vec3>) {
        self.flight = None;
        self.camera.look = look.into();
    }

    pub fn set_up(&mut self, up: impl Into<Vec3>) {
        self.flight = None;
        self.camera.up = up.into();
    }

    pub fn get_eye(&self) -> Vec3 {
        self.camera.eye
    }

    pub fn get_look(&self) -> Vec3 {
        self.camera.look
    }

    pub fn get_up(&self) -> Vec3 {
        self.camera.up
    }

    pub fn set_gimbal_lock(&mut self, locked: bool) {
        self.camera.gimbal_lock = locked;
    }

    pub fn set_projection(&mut self, projection: Projection) {
        self.camera.projection = projection;
    }

    pub fn set_perspective(&mut self, fov: f32, near: f32, far: f32) {
        self.camera.perspective.fov = fov;
        self.camera.perspective.near = near;
        self.camera.perspective.far = far;
    }

    pub fn set_ortho(&mut self, scale: f32, near: f32, far: f32) {
        self.camera.ortho.scale = scale;
        self.camera.ortho.near = near;
        self.camera.ortho.far = far;
    }

    pub fn set_outline_thickness(&mut self, thickness: f32) {
        self.outline.set_thickness(thickness);
    }

    pub fn set_outline_color(&mut self, color: [f32; 3]) {
        self.outline.set_color(color);
    }

    /// Orbit speed in degrees per second; 0 stops orbiting
    pub fn set_auto_orbit(&mut self, degrees_per_second: f32) {
        self.orbit_speed = degrees_per_second;
    }

    /// Whether a camera flight is under way
    pub fn is_flying(&self) -> bool {
        self.flight.is_some()
    }

    /// Move the camera to a pose, over the configured duration if `fly`
    pub fn fly_to(
        &mut self,
        eye: impl Into<Vec3>,
        look: impl Into<Vec3>,
        up: impl Into<Vec3>,
        fly: bool,
    ) {
        let pose = CameraPose {
            eye: eye.into(),
            look: look.into(),
            up: up.into(),
        };
        self.move_camera(pose, fly);
    }

    fn move_camera(&mut self, pose: CameraPose, fly: bool) {
        if fly && self.view_fit_duration > 0.0 {
            self.flight = Some(CameraFlight::new(
                self.camera.pose(),
                pose,
                self.view_fit_duration,
            ));
        } else {
            self.flight = None;
            self.camera.set_pose(pose);
        }
    }

    /// Frame a target, keeping the current view direction
    pub fn view_fit(&mut self, target: impl Into<Target>, fly: bool) {
        let aabb = self.scene.resolve_aabb(&target.into());
        let pose = self.camera.fit_pose(&aabb, self.view_fit_fov);
        if self.camera.projection == Projection::Ortho {
            self.camera.ortho.scale = aabb.diagonal().max(f32::EPSILON);
        }
        self.move_camera(pose, fly);
    }

    /// Fly to an annotation's stored viewpoint, or frame its object
    pub fn fly_to_annotation(&mut self, id: &str, fly: bool) -> ViewerResult<()> {
        let annotation = self.get_annotation(id)?;
        if let (Some(eye), Some(look), Some(up)) = (annotation.eye, annotation.look, annotation.up)
        {
            self.fly_to(eye, look, up, fly);
            return Ok(());
        }
        let object = self
            .scene
            .registry
            .object(annotation.object)
            .map(|o| o.id.clone())
            .ok_or_else(|| ViewerError::NotFound(id.to_string()))?;
        self.view_fit(object, fly);
        Ok(())
    }

    pub(crate) fn advance_camera(&mut self, dt: f32) {
        if let Some(flight) = self.flight.as_mut() {
            let pose = flight.advance(dt);
            let done = flight.is_done();
            self.camera.set_pose(pose);
            if done {
                self.flight = None;
            }
            return;
        }
        if self.orbit_speed != 0.0 && dt > 0.0 {
            self.camera.rotate_eye_y(self.orbit_speed * dt);
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec3;

    use crate::aabb::Aabb;
    use crate::annotations::AnnotationDesc;
    use crate::camera::Projection;
    use crate::engine::{MemoryEngine, ParsedModel, ParsedObject};
    use crate::viewer::Viewer;

    fn viewer() -> Viewer<MemoryEngine> {
        let engine = MemoryEngine::new().with_source(
            "cube.gltf",
            ParsedModel::new(vec![ParsedObject::new(
                "body",
                Aabb::from_array([9.0, -1.0, -1.0, 11.0, 1.0, 1.0]),
            )]),
        );
        let mut viewer = Viewer::new(engine);
        viewer.load_model("cube", "cube.gltf").unwrap();
        viewer.tick(0.0);
        viewer
    }

    #[test]
    fn test_view_fit_centers_target() {
        let mut viewer = viewer();
        viewer.view_fit("cube", false);
        assert_eq!(viewer.get_look(), Vec3::new(10.0, 0.0, 0.0));
        let distance = (viewer.get_eye() - viewer.get_look()).length();
        let expected = 3f32.sqrt() / (22.5f32).to_radians().tan();
        assert_relative_eq!(distance, expected, epsilon = 1e-3);
    }

    #[test]
    fn test_ortho_fit_sets_scale() {
        let mut viewer = viewer();
        viewer.set_projection(Projection::Ortho);
        viewer.view_fit("cube", false);
        assert_relative_eq!(viewer.camera().ortho.scale, 12f32.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_flight_completes_over_ticks() {
        let mut viewer = viewer();
        viewer.view_fit("cube", true);
        assert!(viewer.is_flying());
        assert_eq!(viewer.get_look(), Vec3::ZERO);

        viewer.tick(0.25);
        assert!(viewer.is_flying());
        viewer.tick(0.5);
        assert!(!viewer.is_flying());
        assert_eq!(viewer.get_look(), Vec3::new(10.0, 0.0, 0.0));
    }

    #[test]
    fn test_auto_orbit_turns_eye() {
        let mut viewer = viewer();
        viewer.set_auto_orbit(90.0);
        viewer.tick(1.0);
        assert_relative_eq!(viewer.get_eye().x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(viewer.get_eye().z, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_fly_to_annotation_viewpoint() {
        let mut viewer = viewer();
        viewer
            .create_annotation(
                Some("note"),
                &AnnotationDesc::new("cube#body", 0).viewpoint(
                    [1.0, 2.0, 3.0],
                    [0.0, 0.0, 0.0],
                    [0.0, 1.0, 0.0],
                ),
            )
            .unwrap();
        viewer.fly_to_annotation("note", false).unwrap();
        assert_eq!(viewer.get_eye(), Vec3::new(1.0, 2.0, 3.0));
    }
}
