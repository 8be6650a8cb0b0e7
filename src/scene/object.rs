//! Scene objects and their transforms

use serde::{Serialize, Deserialize};
use crate::math::{Mat4, Vec3, mat4_from_trs};

/// Position, rotation (euler degrees) and scale of an object
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Transform {
    /// Model matrix `T * Rx * Ry * Rz * S`
    pub fn model_matrix(&self) -> Mat4 {
        mat4_from_trs(self.position, self.rotation, self.scale)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

/// Name of an externally owned asset (mesh or material)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetRef(pub String);

impl AssetRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

/// An object placed in the scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    pub transform: Transform,
    /// Objects without a mesh are never picked
    #[serde(default)]
    pub mesh: Option<AssetRef>,
    #[serde(default)]
    pub material: Option<AssetRef>,
}

impl SceneObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            material: None,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }

    pub fn with_mesh(mut self, mesh: impl Into<String>) -> Self {
        self.mesh = Some(AssetRef::new(mesh));
        self
    }

    pub fn with_material(mut self, material: impl Into<String>) -> Self {
        self.material = Some(AssetRef::new(material));
        self
    }

    pub fn has_mesh(&self) -> bool {
        self.mesh.is_some()
    }
}
