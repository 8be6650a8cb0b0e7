//! Orbit camera for the 3D viewport
//!
//! Circles a focus point: yaw/pitch (degrees) pick the viewing direction,
//! distance how far back the eye sits.

use serde::{Serialize, Deserialize};
use crate::math::{Mat4, Vec3, mat4_look_at, mat4_perspective};

/// Starting pose and mouse response of the orbit camera
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    /// Degrees per pixel of orbit drag
    pub orbit_sensitivity: f32,
    /// World units per pixel of pan drag
    pub pan_speed: f32,
    /// World units per scroll notch
    pub zoom_speed: f32,
    pub min_distance: f32,
    /// Pitch is clamped to +/- this many degrees (kept below 90)
    pub pitch_limit: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            distance: 5.0,
            yaw: 0.0,
            pitch: 20.0,
            orbit_sensitivity: 0.25,
            pan_speed: 0.01,
            zoom_speed: 0.5,
            min_distance: 1.0,
            pitch_limit: 89.0,
        }
    }
}

/// Perspective projection parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectionConfig {
    /// Vertical field of view in degrees
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            fov_y: 45.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

/// Camera state for the editor viewport
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pub focus: Vec3,
    pub settings: CameraConfig,
    pub projection: ProjectionConfig,
}

impl OrbitCamera {
    pub fn new(settings: CameraConfig, projection: ProjectionConfig) -> Self {
        let mut cam = Self {
            yaw: settings.yaw,
            pitch: 0.0,
            distance: settings.distance.max(settings.min_distance),
            focus: Vec3::ZERO,
            settings,
            projection,
        };
        cam.pitch = settings.pitch.clamp(-cam.pitch_limit(), cam.pitch_limit());
        cam
    }

    fn pitch_limit(&self) -> f32 {
        self.settings.pitch_limit.clamp(0.0, 89.9)
    }

    /// Unit vector from the eye toward the focus point
    pub fn direction(&self) -> Vec3 {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let (sp, cp) = self.pitch.to_radians().sin_cos();
        Vec3::new(cp * sy, sp, cp * cy)
    }

    /// Eye position in world space
    pub fn position(&self) -> Vec3 {
        self.focus - self.direction() * self.distance
    }

    pub fn view_matrix(&self) -> Mat4 {
        mat4_look_at(self.position(), self.focus, Vec3::UP)
    }

    /// Projection for a viewport aspect ratio. None if the aspect is unusable.
    pub fn projection_matrix(&self, aspect: f32) -> Option<Mat4> {
        if !(aspect.is_finite() && aspect > 0.0) {
            return None;
        }
        let p = &self.projection;
        Some(mat4_perspective(p.fov_y, aspect, p.near, p.far))
    }

    /// Rotate around the focus point by a mouse delta in pixels
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.settings.orbit_sensitivity;
        self.pitch = (self.pitch - dy * self.settings.orbit_sensitivity)
            .clamp(-self.pitch_limit(), self.pitch_limit());
    }

    /// Slide the focus point along the camera's horizontal right and world up
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let (sy, cy) = self.yaw.to_radians().sin_cos();
        let right = Vec3::new(cy, 0.0, -sy);
        self.focus += (-right * dx + Vec3::UP * dy) * self.settings.pan_speed;
    }

    /// Move toward (positive scroll) or away from the focus point
    pub fn zoom(&mut self, scroll: f32) {
        self.distance = (self.distance - scroll * self.settings.zoom_speed)
            .max(self.settings.min_distance);
    }

    /// Re-center on a point, keeping angle and distance
    pub fn focus_on(&mut self, point: Vec3) {
        self.focus = point;
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CameraConfig::default(), ProjectionConfig::default())
    }
}
