use std::sync::Arc;

use glam::{EulerRot, Mat4, Quat, Vec3};
use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::geometry::Geometry;

/// Standard surface parameters shared by every mesh of the scene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    pub color: Color,
    pub roughness: f32,
    pub metalness: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            roughness: 1.0,
            metalness: 0.0,
        }
    }
}

/// Shared-ownership handle to a [`Material`].
///
/// Cloning the handle does not copy the material: every clone aliases the same
/// instance, so a write through one handle is seen by all of them on their
/// next read.
#[derive(Debug, Default)]
pub struct SharedMaterial {
    inner: Arc<RwLock<Material>>,
}

impl Clone for SharedMaterial {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl SharedMaterial {
    pub fn new(material: Material) -> Self {
        Self {
            inner: Arc::new(RwLock::new(material)),
        }
    }

    pub fn read(&self) -> RwLockReadGuard<'_, Material> {
        self.inner.read()
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, Material> {
        self.inner.write()
    }

    /// Copy of the current parameters.
    pub fn get(&self) -> Material {
        *self.inner.read()
    }

    pub fn is_same(&self, other: &SharedMaterial) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Position, XYZ Euler rotation in radians, and scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
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

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        let rotation = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, rotation, self.position)
    }
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub geometry: Geometry,
    pub material: SharedMaterial,
    pub transform: Transform,
    /// Whether the render loop drives this mesh's rotation.
    pub spins: bool,
}

impl Mesh {
    pub fn new(name: &str, geometry: Geometry, material: &SharedMaterial) -> Self {
        Self {
            name: name.to_string(),
            geometry,
            material: material.clone(),
            transform: Transform::default(),
            spins: true,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.transform.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Vec3) -> Self {
        self.transform.rotation = rotation;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.spins = false;
        self
    }
}
