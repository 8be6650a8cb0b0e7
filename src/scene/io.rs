//! Scene loading and saving
//!
//! Scenes are stored as RON. Files may optionally be brotli-compressed:
//! - Reading: auto-detects the format by checking for a valid RON start
//! - Writing: plain pretty RON, or brotli when `compress` is set

use std::io::Cursor;
use std::path::Path;

use serde::{Serialize, Deserialize};
use tracing::info;

use super::{SceneArena, SceneObject, Transform};
use crate::error::{EditorError, Result};

/// Validation limits to keep malformed files out of the editor
pub mod limits {
    /// Maximum number of objects in a scene
    pub const MAX_OBJECTS: usize = 4096;
    /// Maximum length of object and asset names
    pub const MAX_STRING_LEN: usize = 256;
    /// Maximum absolute transform component
    pub const MAX_COORD: f32 = 1_000_000.0;
}

/// On-disk scene layout. Handles are not persisted; loading builds a fresh arena.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SceneFile {
    pub objects: Vec<SceneObject>,
}

impl SceneFile {
    pub fn from_arena(scene: &SceneArena) -> Self {
        Self {
            objects: scene.iter().map(|(_, obj)| obj.clone()).collect(),
        }
    }

    pub fn into_arena(self) -> SceneArena {
        self.objects.into_iter().collect()
    }
}

fn is_valid_float(f: f32) -> bool {
    f.is_finite() && f.abs() <= limits::MAX_COORD
}

fn validate_transform(t: &Transform, context: &str) -> std::result::Result<(), String> {
    let parts = [("position", t.position), ("rotation", t.rotation), ("scale", t.scale)];
    for (label, v) in parts {
        for (axis, value) in ["x", "y", "z"].iter().zip(v.to_array()) {
            if !is_valid_float(value) {
                return Err(format!("{}: invalid {}.{} = {}", context, label, axis, value));
            }
        }
    }
    if t.scale.to_array().iter().any(|s| *s == 0.0) {
        return Err(format!("{}: zero scale component", context));
    }
    Ok(())
}

fn validate_object(obj: &SceneObject, index: usize) -> std::result::Result<(), String> {
    let context = format!("object[{}]", index);
    if obj.name.len() > limits::MAX_STRING_LEN {
        return Err(format!("{}: name too long ({} > {})", context, obj.name.len(), limits::MAX_STRING_LEN));
    }
    for asset in obj.mesh.iter().chain(obj.material.iter()) {
        if asset.name().len() > limits::MAX_STRING_LEN {
            return Err(format!("{}: asset name too long ({} > {})",
                context, asset.name().len(), limits::MAX_STRING_LEN));
        }
    }
    validate_transform(&obj.transform, &context)
}

/// Check a parsed scene against `limits`
pub fn validate_scene(file: &SceneFile) -> Result<()> {
    if file.objects.len() > limits::MAX_OBJECTS {
        return Err(EditorError::Validation(format!(
            "too many objects ({} > {})", file.objects.len(), limits::MAX_OBJECTS
        )));
    }
    for (i, obj) in file.objects.iter().enumerate() {
        validate_object(obj, i).map_err(EditorError::Validation)?;
    }
    Ok(())
}

/// Serialize a scene to pretty RON
pub fn serialize_scene(scene: &SceneArena) -> Result<String> {
    let config = ron::ser::PrettyConfig::new()
        .depth_limit(4)
        .indentor("  ".to_string());
    Ok(ron::ser::to_string_pretty(&SceneFile::from_arena(scene), config)?)
}

/// Save a scene to disk, optionally brotli-compressed
pub fn save_scene(scene: &SceneArena, path: &Path, compress: bool) -> Result<()> {
    let ron_data = serialize_scene(scene)?;

    let bytes = if compress {
        let mut compressed = Vec::new();
        brotli::BrotliCompress(
            &mut Cursor::new(ron_data.as_bytes()),
            &mut compressed,
            &brotli::enc::BrotliEncoderParams {
                quality: 6,
                lgwin: 22,
                ..Default::default()
            },
        )
        .map_err(|e| EditorError::Compression(e.to_string()))?;
        compressed
    } else {
        ron_data.into_bytes()
    };

    std::fs::write(path, bytes)?;
    info!(path = %path.display(), objects = scene.len(), compress, "saved scene");
    Ok(())
}

/// Load a scene from disk (plain or compressed RON)
pub fn load_scene(path: &Path) -> Result<SceneArena> {
    let data = std::fs::read(path)?;
    let scene = load_scene_from_bytes(&data)?;
    info!(path = %path.display(), objects = scene.len(), "loaded scene");
    Ok(scene)
}

/// Parse and validate a scene from bytes (plain or compressed RON)
pub fn load_scene_from_bytes(data: &[u8]) -> Result<SceneArena> {
    // RON starts with '(' or whitespace; anything else is treated as brotli
    let is_ron = data
        .first()
        .map(|&b| b == b'(' || b.is_ascii_whitespace())
        .unwrap_or(false);

    let ron_str = if is_ron {
        String::from_utf8_lossy(data).to_string()
    } else {
        let mut decompressed = Vec::new();
        brotli::BrotliDecompress(&mut Cursor::new(data), &mut decompressed)
            .map_err(|e| EditorError::Compression(e.to_string()))?;
        String::from_utf8_lossy(&decompressed).to_string()
    };

    let file: SceneFile = ron::from_str(&ron_str)?;
    validate_scene(&file)?;
    Ok(file.into_arena())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;
    use crate::scene::default_scene;

    #[test]
    fn test_save_and_load_plain() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron");
        let scene = default_scene();

        save_scene(&scene, &path, false).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("Cube"));

        let loaded = load_scene(&path).unwrap();
        assert_eq!(loaded.len(), scene.len());
        assert_eq!(loaded.selected(), None);
        let names: Vec<_> = loaded.iter().map(|(_, o)| o.name.clone()).collect();
        let expected: Vec<_> = scene.iter().map(|(_, o)| o.name.clone()).collect();
        assert_eq!(names, expected);
    }

    #[test]
    fn test_save_and_load_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.ron.br");
        let mut scene = SceneArena::new();
        scene.insert(SceneObject::new("Moved").with_mesh("cube").with_position(Vec3::new(1.5, -2.0, 3.25)));

        save_scene(&scene, &path, true).unwrap();
        let raw = std::fs::read(&path).unwrap();
        assert_ne!(raw.first(), Some(&b'('));

        let loaded = load_scene(&path).unwrap();
        let (_, obj) = loaded.iter().next().unwrap();
        assert_eq!(obj.transform.position, Vec3::new(1.5, -2.0, 3.25));
        assert_eq!(obj.mesh.as_ref().map(|m| m.name()), Some("cube"));
    }

    #[test]
    fn test_missing_mesh_field_defaults_to_none() {
        let text = "(objects: [(name: \"Empty\", transform: (position: (x: 0.0, y: 0.0, z: 0.0), \
                    rotation: (x: 0.0, y: 0.0, z: 0.0), scale: (x: 1.0, y: 1.0, z: 1.0)))])";
        let scene = load_scene_from_bytes(text.as_bytes()).unwrap();
        let (_, obj) = scene.iter().next().unwrap();
        assert!(obj.mesh.is_none());
        assert!(obj.material.is_none());
    }

    #[test]
    fn test_rejects_out_of_range_position() {
        let mut scene = SceneArena::new();
        scene.insert(SceneObject::new("Far").with_position(Vec3::new(0.0, 2.0e7, 0.0)));
        let text = serialize_scene(&scene).unwrap();
        let err = load_scene_from_bytes(text.as_bytes()).unwrap_err();
        assert!(matches!(err, EditorError::Validation(_)), "got {:?}", err);
    }

    #[test]
    fn test_rejects_zero_scale() {
        let mut scene = SceneArena::new();
        scene.insert(SceneObject::new("Flat").with_scale(Vec3::new(1.0, 0.0, 1.0)));
        let text = serialize_scene(&scene).unwrap();
        assert!(matches!(load_scene_from_bytes(text.as_bytes()), Err(EditorError::Validation(_))));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(load_scene_from_bytes(b"(objects: [oops"), Err(EditorError::Parse(_))));
        assert!(load_scene_from_bytes(&[0xff, 0x00, 0x13, 0x37]).is_err());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_scene(&dir.path().join("nope.ron")).unwrap_err();
        assert!(matches!(err, EditorError::Io(_)));
    }
}
