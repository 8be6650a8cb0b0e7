//! Ray casting utilities for picking and gizmo hover
//!
//! Screen positions are unprojected through the inverse projection and view
//! matrices, so rays line up with whatever the renderer draws using the same
//! matrices.

use crate::math::{Mat4, Vec3, mat4_inverse, mat4_transform_point, mat4_transform_vec4};

/// A 3D ray with origin and direction
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,  // Normalized
}

impl Ray {
    /// Create a new ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize()
        }
    }

    /// Get point at distance t along ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Convert a viewport pixel (origin top-left) into a world-space ray.
///
/// The pixel is mapped to NDC with Y flipped, placed on the near plane
/// (`z = -1, w = 1`), unprojected to eye space, turned into a direction
/// (`z = -1, w = 0`) and rotated into world space. The origin is the camera
/// position recovered from the inverse view matrix.
///
/// Returns None for a viewport without positive finite extent, a
/// non-invertible matrix, or a degenerate direction.
pub fn screen_to_world_ray(
    screen: (f32, f32),
    viewport: (f32, f32),
    view: &Mat4,
    projection: &Mat4,
) -> Option<Ray> {
    let (width, height) = viewport;
    if !(width > 0.0 && height > 0.0 && width.is_finite() && height.is_finite()) {
        return None;
    }
    if !(screen.0.is_finite() && screen.1.is_finite()) {
        return None;
    }

    let ndc_x = 2.0 * screen.0 / width - 1.0;
    let ndc_y = 1.0 - 2.0 * screen.1 / height;

    let inv_projection = mat4_inverse(projection)?;
    let inv_view = mat4_inverse(view)?;

    let eye = mat4_transform_vec4(&inv_projection, [ndc_x, ndc_y, -1.0, 1.0]);
    let world = mat4_transform_vec4(&inv_view, [eye[0], eye[1], -1.0, 0.0]);

    let direction = Vec3::new(world[0], world[1], world[2]);
    if !direction.is_finite() || direction.len() < 1e-8 {
        return None;
    }

    let origin = mat4_transform_point(&inv_view, Vec3::ZERO);
    Some(Ray::new(origin, direction))
}

/// Minimum distance between the forward half of a ray and a segment.
pub fn ray_segment_distance(ray: &Ray, start: Vec3, end: Vec3) -> f32 {
    let seg = end - start;
    let w = ray.origin - start;
    let d = ray.direction;

    let a = d.dot(d);
    let b = d.dot(seg);
    let c = seg.dot(seg);
    let dw = d.dot(w);
    let e = seg.dot(w);

    if a < 1e-12 {
        // No direction: distance from the origin point to the segment
        let s = if c < 1e-12 { 0.0 } else { (-e / c).clamp(0.0, 1.0) };
        return (ray.origin - (start + seg * s)).len();
    }
    if c < 1e-12 {
        let t = (-dw / a).max(0.0);
        return (ray.at(t) - start).len();
    }

    // Closest parameters of the infinite lines, then clamp to ray/segment
    let denom = a * c - b * b;
    let s = if denom > 1e-12 { ((a * e - b * dw) / denom).clamp(0.0, 1.0) } else { 0.0 };
    let t = ((b * s - dw) / a).max(0.0);
    let s = ((e + b * t) / c).clamp(0.0, 1.0);

    (ray.at(t) - (start + seg * s)).len()
}
