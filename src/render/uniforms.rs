use bytemuck::{Pod, Zeroable};
use glam::{Mat3, Vec3};

use crate::camera::PerspectiveCamera;
use crate::scene::{HelperLine, Light, LightKind, Material, Mesh, Scene};

/// Lights beyond this count are not shaded.
pub const MAX_LIGHTS: usize = 8;

pub const KIND_AMBIENT: u32 = 0;
pub const KIND_DIRECTIONAL: u32 = 1;
pub const KIND_HEMISPHERE: u32 = 2;
pub const KIND_POINT: u32 = 3;
pub const KIND_SPOT: u32 = 4;
pub const KIND_RECT_AREA: u32 = 5;

/// One light as the shader sees it. Colors are linear.
///
/// - `color`: rgb, intensity
/// - `position`: xyz, kind
/// - `direction`: unit vector towards which the light shines, distance cutoff
/// - `params`: decay, cos(angle), cos(angle * (1 - penumbra)), unused;
///   for rect-area lights width, height, unused, unused
/// - `extra`: hemisphere ground color, or the rect-area width axis
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GpuLight {
    pub color: [f32; 4],
    pub position: [f32; 4],
    pub direction: [f32; 4],
    pub params: [f32; 4],
    pub extra: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct GlobalUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// x holds the number of filled entries in `lights`.
    pub light_count: [u32; 4],
    pub lights: [GpuLight; MAX_LIGHTS],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ObjectConstants {
    pub model: [[f32; 4]; 4],
    pub normal: [[f32; 4]; 3],
    pub color: [f32; 4],
    /// roughness, metalness, unused, unused
    pub material: [f32; 4],
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct LineVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

pub fn pack_globals(scene: &Scene, camera: &PerspectiveCamera) -> GlobalUniform {
    let mut lights = [GpuLight::zeroed(); MAX_LIGHTS];
    let mut count = 0;
    for (slot, light) in lights.iter_mut().zip(scene.lights()) {
        *slot = pack_light(light);
        count += 1;
    }
    GlobalUniform {
        view_proj: camera.view_projection().to_cols_array_2d(),
        camera_position: camera.position.extend(1.0).into(),
        light_count: [count, 0, 0, 0],
        lights,
    }
}

pub fn pack_light(light: &Light) -> GpuLight {
    let color = light.color.to_linear().extend(light.intensity).into();
    let direction = light.direction();
    let (kind, distance, params, extra) = match light.kind {
        LightKind::Ambient => (KIND_AMBIENT, 0.0, [0.0; 4], [0.0; 4]),
        LightKind::Directional { .. } => (KIND_DIRECTIONAL, 0.0, [0.0; 4], [0.0; 4]),
        LightKind::Hemisphere { ground_color } => (
            KIND_HEMISPHERE,
            0.0,
            [0.0; 4],
            ground_color.to_linear().extend(0.0).into(),
        ),
        LightKind::Point { distance, decay } => {
            (KIND_POINT, distance, [decay, 0.0, 0.0, 0.0], [0.0; 4])
        }
        LightKind::Spot {
            distance,
            angle,
            penumbra,
            decay,
            ..
        } => {
            let outer = angle.cos();
            let inner = (angle * (1.0 - penumbra)).cos();
            (KIND_SPOT, distance, [decay, outer, inner, 0.0], [0.0; 4])
        }
        LightKind::RectArea { width, height, .. } => {
            let right = direction.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
            (
                KIND_RECT_AREA,
                0.0,
                [width, height, 0.0, 0.0],
                right.extend(0.0).into(),
            )
        }
    };
    // Hemisphere lights shine "down" from the sky; the shader wants the up axis.
    let direction = match light.kind {
        LightKind::Hemisphere { .. } => light.position.try_normalize().unwrap_or(Vec3::Y),
        _ => direction,
    };
    GpuLight {
        color,
        position: light.position.extend(kind as f32).into(),
        direction: direction.extend(distance).into(),
        params,
        extra,
    }
}

pub fn pack_object(mesh: &Mesh, material: &Material) -> ObjectConstants {
    let model = mesh.transform.matrix();
    let normal = Mat3::from_mat4(model).inverse().transpose();
    ObjectConstants {
        model: model.to_cols_array_2d(),
        normal: mat3_to_3x4(normal),
        color: material.color.to_linear().extend(1.0).into(),
        material: [material.roughness, material.metalness, 0.0, 0.0],
    }
}

pub fn pack_lines(lines: &[HelperLine]) -> Vec<LineVertex> {
    lines
        .iter()
        .flat_map(|line| {
            let color = line.color.to_linear().to_array();
            [
                LineVertex {
                    position: line.start.to_array(),
                    color,
                },
                LineVertex {
                    position: line.end.to_array(),
                    color,
                },
            ]
        })
        .collect()
}

fn mat3_to_3x4(matrix: Mat3) -> [[f32; 4]; 3] {
    let cols = matrix.to_cols_array();
    [
        [cols[0], cols[1], cols[2], 0.0],
        [cols[3], cols[4], cols[5], 0.0],
        [cols[6], cols[7], cols[8], 0.0],
    ]
}
