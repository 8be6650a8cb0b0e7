//! Scene model
//!
//! - `object` - Transform, SceneObject, AssetRef
//! - `arena` - SceneArena owning all objects, ObjectId handles, selection
//! - `io` - RON persistence with validation

mod arena;
mod object;
pub mod io;

pub use arena::{ObjectId, SceneArena};
pub use object::{SceneObject, Transform};
pub use io::{load_scene, save_scene};

use crate::math::Vec3;

/// Starter scene shown when no scene file exists
pub fn default_scene() -> SceneArena {
    let mut scene = SceneArena::new();
    scene.insert(
        SceneObject::new("Cube")
            .with_mesh("cube")
            .with_material("checker"),
    );
    scene.insert(
        SceneObject::new("Crate")
            .with_mesh("cube")
            .with_material("wood")
            .with_position(Vec3::new(3.0, 0.0, 0.0)),
    );
    scene.insert(
        SceneObject::new("Pillar")
            .with_mesh("cube")
            .with_position(Vec3::new(-3.0, 1.0, -2.0))
            .with_scale(Vec3::new(0.5, 2.0, 0.5)),
    );
    // No mesh: visible in the hierarchy, never picked
    scene.insert(SceneObject::new("SpawnPoint").with_position(Vec3::new(0.0, 0.0, 4.0)));
    scene
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_scene() {
        let scene = default_scene();
        assert_eq!(scene.len(), 4);
        assert_eq!(scene.iter().filter(|(_, o)| o.has_mesh()).count(), 3);
        assert!(scene.find_by_name("Cube").is_some());
        assert_eq!(scene.selected(), None);
    }
}
