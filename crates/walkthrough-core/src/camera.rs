//! Camera pose, projection, orbiting and flights

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::aabb::Aabb;
use crate::defaults;

/// Projection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Projection {
    #[default]
    Perspective,
    Ortho,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveSettings {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for PerspectiveSettings {
    fn default() -> Self {
        Self {
            fov: defaults::PERSPECTIVE_FOV,
            near: defaults::PERSPECTIVE_NEAR,
            far: defaults::PERSPECTIVE_FAR,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OrthoSettings {
    /// Height of the view volume in world units
    pub scale: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for OrthoSettings {
    fn default() -> Self {
        Self {
            scale: defaults::ORTHO_SCALE,
            near: defaults::ORTHO_NEAR,
            far: defaults::ORTHO_FAR,
        }
    }
}

/// Eye, look and up
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
}

/// Viewing camera
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub eye: Vec3,
    pub look: Vec3,
    pub up: Vec3,
    /// Orbit about world up instead of the camera's own up
    pub gimbal_lock: bool,
    pub projection: Projection,
    pub perspective: PerspectiveSettings,
    pub ortho: OrthoSettings,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: Vec3::from(defaults::CAMERA_EYE),
            look: Vec3::from(defaults::CAMERA_LOOK),
            up: Vec3::from(defaults::CAMERA_UP),
            gimbal_lock: defaults::CAMERA_GIMBAL_LOCK,
            projection: Projection::default(),
            perspective: PerspectiveSettings::default(),
            ortho: OrthoSettings::default(),
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pose(&self) -> CameraPose {
        CameraPose {
            eye: self.eye,
            look: self.look,
            up: self.up,
        }
    }

    pub fn set_pose(&mut self, pose: CameraPose) {
        self.eye = pose.eye;
        self.look = pose.look;
        self.up = pose.up;
    }

    /// Unit vector from eye toward look
    pub fn forward(&self) -> Vec3 {
        (self.look - self.eye).normalize_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).normalize_or(Vec3::X)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.look, self.up)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        match self.projection {
            Projection::Perspective => Mat4::perspective_rh(
                self.perspective.fov.to_radians(),
                aspect,
                self.perspective.near,
                self.perspective.far,
            ),
            Projection::Ortho => {
                let half_h = self.ortho.scale * 0.5;
                let half_w = half_h * aspect;
                Mat4::orthographic_rh(
                    -half_w,
                    half_w,
                    -half_h,
                    half_h,
                    self.ortho.near,
                    self.ortho.far,
                )
            }
        }
    }

    /// Orbit the eye around `look` about the vertical axis
    pub fn rotate_eye_y(&mut self, degrees: f32) {
        let axis = if self.gimbal_lock { Vec3::Y } else { self.up };
        let rot = Quat::from_axis_angle(axis.normalize_or(Vec3::Y), degrees.to_radians());
        self.eye = self.look + rot * (self.eye - self.look);
        if !self.gimbal_lock {
            self.up = rot * self.up;
        }
    }

    /// Orbit the eye around `look` about the camera's right axis
    pub fn rotate_eye_x(&mut self, degrees: f32) {
        let rot = Quat::from_axis_angle(self.right(), degrees.to_radians());
        self.eye = self.look + rot * (self.eye - self.look);
        if !self.gimbal_lock {
            self.up = rot * self.up;
        }
    }

    /// Move eye and look together, `delta` in camera space (right, up, forward)
    pub fn pan(&mut self, delta: Vec3) {
        let offset = self.right() * delta.x + self.up.normalize_or(Vec3::Y) * delta.y
            + self.forward() * delta.z;
        self.eye += offset;
        self.look += offset;
    }

    /// Move the eye toward (positive) or away from `look`, never past it
    pub fn zoom(&mut self, delta: f32) {
        const MIN_DISTANCE: f32 = 0.01;
        let offset = self.eye - self.look;
        let distance = (offset.length() - delta).max(MIN_DISTANCE);
        self.eye = self.look + offset.normalize_or(Vec3::Z) * distance;
    }

    /// Pose that frames a box, keeping the current view direction
    pub fn fit_pose(&self, aabb: &Aabb, fit_fov_degrees: f32) -> CameraPose {
        let center = aabb.center();
        let radius = (aabb.diagonal() * 0.5).max(f32::EPSILON);
        let half_fov = (fit_fov_degrees.to_radians() * 0.5).max(1e-3);
        let distance = radius / half_fov.tan();
        CameraPose {
            eye: center - self.forward() * distance,
            look: center,
            up: self.up,
        }
    }
}

/// Interpolated move between two poses
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFlight {
    from: CameraPose,
    to: CameraPose,
    duration: f32,
    elapsed: f32,
}

impl CameraFlight {
    pub fn new(from: CameraPose, to: CameraPose, duration: f32) -> Self {
        Self {
            from,
            to,
            duration: duration.max(0.0),
            elapsed: 0.0,
        }
    }

    pub fn target(&self) -> CameraPose {
        self.to
    }

    pub fn is_done(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance by `dt` seconds and return the pose to apply
    pub fn advance(&mut self, dt: f32) -> CameraPose {
        self.elapsed += dt.max(0.0);
        if self.duration <= 0.0 || self.is_done() {
            return self.to;
        }
        let t = self.elapsed / self.duration;
        // Ease in/out
        let t = t * t * (3.0 - 2.0 * t);
        CameraPose {
            eye: self.from.eye.lerp(self.to.eye, t),
            look: self.from.look.lerp(self.to.look, t),
            up: self.from.up.lerp(self.to.up, t).normalize_or(self.to.up),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_orbit_keeps_distance() {
        let mut camera = Camera::new();
        camera.rotate_eye_y(90.0);
        assert_relative_eq!(camera.eye.x, 10.0, epsilon = 1e-4);
        assert_relative_eq!(camera.eye.z, 0.0, epsilon = 1e-4);
        assert_relative_eq!((camera.eye - camera.look).length(), 10.0, epsilon = 1e-4);
    }

    #[test]
    fn test_zoom_never_crosses_look() {
        let mut camera = Camera::new();
        camera.zoom(50.0);
        assert!(camera.eye.z > 0.0);
    }

    #[test]
    fn test_fit_pose_frames_box() {
        let camera = Camera::new();
        let aabb = Aabb::from_array([-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]);
        let pose = camera.fit_pose(&aabb, 90.0);
        assert_eq!(pose.look, Vec3::ZERO);
        // radius sqrt(3), tan(45deg) = 1
        assert_relative_eq!(pose.eye.z, 3f32.sqrt(), epsilon = 1e-4);
    }

    #[test]
    fn test_flight_reaches_target() {
        let camera = Camera::new();
        let mut to = camera.pose();
        to.eye = Vec3::new(0.0, 0.0, 20.0);
        let mut flight = CameraFlight::new(camera.pose(), to, 1.0);

        let mid = flight.advance(0.5);
        assert_relative_eq!(mid.eye.z, 15.0, epsilon = 1e-4);
        assert!(!flight.is_done());
        assert_eq!(flight.advance(0.6), to);
        assert!(flight.is_done());
    }
}
