use std::f32::consts::{PI, TAU};

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Shape and dimensions of a primitive mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    Box {
        width: f32,
        height: f32,
        depth: f32,
    },
    Torus {
        radius: f32,
        tube: f32,
        radial_segments: u32,
        tubular_segments: u32,
    },
    Plane {
        width: f32,
        height: f32,
    },
}

impl Geometry {
    pub fn tessellate(&self) -> MeshData {
        match *self {
            Geometry::Sphere {
                radius,
                width_segments,
                height_segments,
            } => sphere(radius, width_segments.max(3), height_segments.max(2)),
            Geometry::Box {
                width,
                height,
                depth,
            } => cuboid(Vec3::new(width, height, depth)),
            Geometry::Torus {
                radius,
                tube,
                radial_segments,
                tubular_segments,
            } => torus(radius, tube, radial_segments.max(3), tubular_segments.max(3)),
            Geometry::Plane { width, height } => plane(width, height),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Geometry::Sphere { .. } => "sphere",
            Geometry::Box { .. } => "box",
            Geometry::Torus { .. } => "torus",
            Geometry::Plane { .. } => "plane",
        }
    }
}

/// GPU ready triangle list.
///
/// Vertices are laid out as `position.xyz` followed by `normal.xyz`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MeshData {
    pub vertices: Vec<f32>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub const STRIDE: usize = 6;

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / Self::STRIDE
    }

    pub fn position(&self, index: usize) -> Vec3 {
        let base = index * Self::STRIDE;
        Vec3::from_slice(&self.vertices[base..base + 3])
    }

    pub fn normal(&self, index: usize) -> Vec3 {
        let base = index * Self::STRIDE + 3;
        Vec3::from_slice(&self.vertices[base..base + 3])
    }

    fn push_vertex(&mut self, position: Vec3, normal: Vec3) {
        self.vertices.extend_from_slice(&position.to_array());
        self.vertices.extend_from_slice(&normal.to_array());
    }
}

fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let position = Vec3::new(
                -radius * (u * TAU).cos() * (v * PI).sin(),
                radius * (v * PI).cos(),
                radius * (u * TAU).sin() * (v * PI).sin(),
            );
            mesh.push_vertex(position, position.normalize_or_zero());
        }
    }

    let row = width_segments + 1;
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row + ix + 1;
            let b = iy * row + ix;
            let c = (iy + 1) * row + ix;
            let d = (iy + 1) * row + ix + 1;
            // The pole rows would otherwise produce zero-area triangles.
            if iy != 0 {
                mesh.indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                mesh.indices.extend_from_slice(&[b, c, d]);
            }
        }
    }
    mesh
}

fn cuboid(size: Vec3) -> MeshData {
    // (normal, u, v) with u x v == normal so every face winds counter-clockwise.
    const FACES: [(Vec3, Vec3, Vec3); 6] = [
        (Vec3::X, Vec3::NEG_Z, Vec3::Y),
        (Vec3::NEG_X, Vec3::Z, Vec3::Y),
        (Vec3::Y, Vec3::X, Vec3::NEG_Z),
        (Vec3::NEG_Y, Vec3::X, Vec3::Z),
        (Vec3::Z, Vec3::X, Vec3::Y),
        (Vec3::NEG_Z, Vec3::NEG_X, Vec3::Y),
    ];
    const CORNERS: [(f32, f32); 4] = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];

    let half = size * 0.5;
    let mut mesh = MeshData::default();
    for (normal, u, v) in FACES {
        let base = mesh.vertex_count() as u32;
        for (su, sv) in CORNERS {
            mesh.push_vertex((normal + u * su + v * sv) * half, normal);
        }
        mesh.indices
            .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    mesh
}

fn torus(radius: f32, tube: f32, radial_segments: u32, tubular_segments: u32) -> MeshData {
    let mut mesh = MeshData::default();
    for j in 0..=radial_segments {
        let v = j as f32 / radial_segments as f32 * TAU;
        for i in 0..=tubular_segments {
            let u = i as f32 / tubular_segments as f32 * TAU;
            let ring = radius + tube * v.cos();
            let position = Vec3::new(ring * u.cos(), ring * u.sin(), tube * v.sin());
            let center = Vec3::new(radius * u.cos(), radius * u.sin(), 0.0);
            mesh.push_vertex(position, (position - center).normalize_or_zero());
        }
    }

    let row = tubular_segments + 1;
    for j in 1..=radial_segments {
        for i in 1..=tubular_segments {
            let a = row * j + i - 1;
            let b = row * (j - 1) + i - 1;
            let c = row * (j - 1) + i;
            let d = row * j + i;
            mesh.indices.extend_from_slice(&[a, b, d, b, c, d]);
        }
    }
    mesh
}

/// Unit-segment plane in the XY plane facing +Z.
fn plane(width: f32, height: f32) -> MeshData {
    let mut mesh = MeshData::default();
    let (hw, hh) = (width * 0.5, height * 0.5);
    for (x, y) in [(-hw, hh), (hw, hh), (-hw, -hh), (hw, -hh)] {
        mesh.push_vertex(Vec3::new(x, y, 0.0), Vec3::Z);
    }
    mesh.indices.extend_from_slice(&[0, 2, 1, 2, 3, 1]);
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all_shapes() -> Vec<Geometry> {
        vec![
            Geometry::Sphere {
                radius: 0.5,
                width_segments: 32,
                height_segments: 32,
            },
            Geometry::Box {
                width: 0.75,
                height: 0.75,
                depth: 0.75,
            },
            Geometry::Torus {
                radius: 0.3,
                tube: 0.2,
                radial_segments: 32,
                tubular_segments: 64,
            },
            Geometry::Plane {
                width: 5.0,
                height: 5.0,
            },
        ]
    }

    #[test]
    fn indices_reference_existing_vertices() {
        for shape in all_shapes() {
            let mesh = shape.tessellate();
            assert_eq!(mesh.indices.len() % 3, 0, "{}", shape.kind());
            let count = mesh.vertex_count() as u32;
            assert!(mesh.indices.iter().all(|&i| i < count), "{}", shape.kind());
        }
    }

    #[test]
    fn normals_are_unit_length() {
        for shape in all_shapes() {
            let mesh = shape.tessellate();
            for i in 0..mesh.vertex_count() {
                let length = mesh.normal(i).length();
                assert!((length - 1.0).abs() < 1e-4, "{} vertex {i}", shape.kind());
            }
        }
    }

    #[test]
    fn triangles_wind_towards_their_normals() {
        for shape in all_shapes() {
            let mesh = shape.tessellate();
            for tri in mesh.indices.chunks_exact(3) {
                let [a, b, c] = [tri[0], tri[1], tri[2]].map(|i| i as usize);
                let face = (mesh.position(b) - mesh.position(a))
                    .cross(mesh.position(c) - mesh.position(a));
                if face.length_squared() < 1e-12 {
                    continue;
                }
                let normal = mesh.normal(a) + mesh.normal(b) + mesh.normal(c);
                assert!(face.dot(normal) > 0.0, "{} triangle {tri:?}", shape.kind());
            }
        }
    }

    #[test]
    fn sphere_grid_matches_segment_counts() {
        let mesh = sphere(1.0, 8, 4);
        assert_eq!(mesh.vertex_count(), 9 * 5);
        // Two triangles per quad minus one per quad in each pole row.
        assert_eq!(mesh.indices.len() / 3, 8 * 4 * 2 - 8 * 2);
        assert!((mesh.position(0).y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn box_spans_its_dimensions() {
        let mesh = cuboid(Vec3::new(2.0, 4.0, 6.0));
        assert_eq!(mesh.vertex_count(), 24);
        assert_eq!(mesh.indices.len(), 36);
        let max = (0..mesh.vertex_count())
            .map(|i| mesh.position(i))
            .fold(Vec3::splat(f32::MIN), Vec3::max);
        assert_eq!(max, Vec3::new(1.0, 2.0, 3.0));
    }
}
