//! Bounding-sphere object picking
//!
//! Every object with a mesh is treated as a sphere of fixed radius around its
//! position. Scale and mesh extent are ignored, so large or overlapping
//! objects can be picked through each other.

use crate::math::Vec3;
use crate::scene::{ObjectId, SceneObject};
use super::Ray;

/// Bounding sphere radius used for every pickable object
pub const DEFAULT_PICK_RADIUS: f32 = 1.0;

/// Smallest positive root of the ray-sphere quadratic.
///
/// Solves `a*t^2 + b*t + c = 0` with `a = d.d`, `b = 2*oc.d`,
/// `c = oc.oc - r^2`. A tangent ray (discriminant 0) is a miss.
pub fn ray_sphere_intersect(ray: &Ray, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let a = ray.direction.dot(ray.direction);
    if a < 1e-12 {
        return None;
    }
    let b = 2.0 * oc.dot(ray.direction);
    let c = oc.dot(oc) - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant.is_nan() || discriminant <= 0.0 {
        return None;
    }

    let sqrt_d = discriminant.sqrt();
    let t1 = (-b - sqrt_d) / (2.0 * a);
    let t2 = (-b + sqrt_d) / (2.0 * a);

    if t1 > 0.0 {
        Some(t1)
    } else if t2 > 0.0 {
        // Origin inside the sphere
        Some(t2)
    } else {
        None
    }
}

/// Find the object whose bounding sphere the ray reaches first.
///
/// Objects without a mesh are skipped. On equal distance the object
/// enumerated first wins. None means nothing was hit and the caller should
/// clear its selection.
pub fn pick_object<'a, I>(ray: &Ray, objects: I, radius: f32) -> Option<ObjectId>
where
    I: IntoIterator<Item = (ObjectId, &'a SceneObject)>,
{
    let mut closest: Option<(ObjectId, f32)> = None;

    for (id, object) in objects {
        if !object.has_mesh() {
            continue;
        }
        let Some(t) = ray_sphere_intersect(ray, object.transform.position, radius) else {
            continue;
        };
        if closest.map_or(true, |(_, best)| t < best) {
            closest = Some((id, t));
        }
    }

    closest.map(|(id, _)| id)
}
