//! Object picking
//!
//! - `ray` - Ray type, screen-to-world unprojection, ray/segment distance
//! - `picker` - bounding-sphere hit tests against scene objects

mod picker;
mod ray;

pub use picker::{pick_object, DEFAULT_PICK_RADIUS};
pub use ray::{Ray, screen_to_world_ray, ray_segment_distance};
