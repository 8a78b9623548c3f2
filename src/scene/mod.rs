//! Scene graph of the light stage: lights, their debug helpers and the meshes
//! sharing one standard material.

mod helper;
mod light;
mod mesh;

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec3;

pub use helper::{HelperKind, HelperLine, LightHelper};
pub use light::{Light, LightId, LightKind};
pub use mesh::{Material, Mesh, SharedMaterial, Transform};

use crate::color::Color;
use crate::geometry::Geometry;

/// Rotation speed of spinning meshes around Y, in radians per second.
pub const SPIN_Y: f32 = 0.1;
/// Rotation speed of spinning meshes around X, in radians per second.
pub const SPIN_X: f32 = 0.15;

/// Entity names used by [`Scene::showcase`].
pub mod names {
    pub const AMBIENT: &str = "ambient";
    pub const DIRECTIONAL: &str = "directional";
    pub const HEMISPHERE: &str = "hemisphere";
    pub const POINT: &str = "point";
    pub const RECT_AREA: &str = "rect_area";
    pub const SPOT: &str = "spot";

    pub const SPHERE: &str = "sphere";
    pub const CUBE: &str = "cube";
    pub const TORUS: &str = "torus";
    pub const PLANE: &str = "plane";
}

#[derive(Debug)]
pub struct Scene {
    lights: Vec<Light>,
    helpers: Vec<LightHelper>,
    meshes: Vec<Mesh>,
    material: SharedMaterial,
    pub background: Color,
}

impl Scene {
    /// Creates an empty scene whose meshes will share `material`.
    pub fn new(material: Material) -> Self {
        Self {
            lights: Vec::new(),
            helpers: Vec::new(),
            meshes: Vec::new(),
            material: SharedMaterial::new(material),
            background: Color::BLACK,
        }
    }

    /// The lighting showcase: six lights, four primitives, one material.
    pub fn showcase() -> Self {
        let mut scene = Self::new(Material {
            roughness: 0.4,
            ..Material::default()
        });

        scene.add_light(Light::ambient(names::AMBIENT, Color::from_hex(0xffffff), 1.0));
        scene.add_light(Light::directional(
            names::DIRECTIONAL,
            Color::from_hex(0xffffff),
            1.0,
        ));
        scene.add_light(Light::hemisphere(
            names::HEMISPHERE,
            Color::from_hex(0xff0000),
            Color::from_hex(0x0000ff),
            1.0,
        ));
        scene.add_light(Light::point(
            names::POINT,
            Color::from_hex(0x0ff900),
            1.5,
            0.0,
            2.0,
        ));
        scene.add_light(
            Light::rect_area(names::RECT_AREA, Color::from_hex(0x4e00ff), 6.0, 1.0, 1.0)
                .at(Vec3::new(-1.5, 0.0, 1.5))
                .looking_at(Vec3::ZERO),
        );
        scene.add_light(
            Light::spot(
                names::SPOT,
                Color::from_hex(0x78ff00),
                4.5,
                10.0,
                PI * 0.1,
                0.25,
                1.0,
            )
            .at(Vec3::new(0.0, 2.0, 3.0))
            .looking_at(Vec3::ZERO),
        );

        let helpers: Vec<_> = scene
            .lights
            .iter()
            .enumerate()
            .filter_map(|(index, light)| LightHelper::for_light(LightId(index), light))
            .collect();
        for helper in helpers {
            scene.add_helper(helper);
        }

        let material = scene.material.clone();
        scene.add_mesh(
            Mesh::new(
                names::SPHERE,
                Geometry::Sphere {
                    radius: 0.5,
                    width_segments: 32,
                    height_segments: 32,
                },
                &material,
            )
            .at(Vec3::new(-1.5, 0.0, 0.0)),
        );
        scene.add_mesh(Mesh::new(
            names::CUBE,
            Geometry::Box {
                width: 0.75,
                height: 0.75,
                depth: 0.75,
            },
            &material,
        ));
        scene.add_mesh(
            Mesh::new(
                names::TORUS,
                Geometry::Torus {
                    radius: 0.3,
                    tube: 0.2,
                    radial_segments: 32,
                    tubular_segments: 64,
                },
                &material,
            )
            .at(Vec3::new(1.5, 0.0, 0.0)),
        );
        scene.add_mesh(
            Mesh::new(
                names::PLANE,
                Geometry::Plane {
                    width: 5.0,
                    height: 5.0,
                },
                &material,
            )
            .at(Vec3::new(0.0, -0.65, 0.0))
            .rotated(Vec3::new(-FRAC_PI_2, 0.0, 0.0))
            .fixed(),
        );

        scene
    }

    pub fn add_light(&mut self, light: Light) -> LightId {
        self.lights.push(light);
        LightId(self.lights.len() - 1)
    }

    pub fn add_helper(&mut self, helper: LightHelper) -> usize {
        self.helpers.push(helper);
        self.helpers.len() - 1
    }

    pub fn add_mesh(&mut self, mesh: Mesh) -> usize {
        self.meshes.push(mesh);
        self.meshes.len() - 1
    }

    pub fn lights(&self) -> &[Light] {
        &self.lights
    }

    pub fn light(&self, id: LightId) -> Option<&Light> {
        self.lights.get(id.0)
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut Light> {
        self.lights.get_mut(id.0)
    }

    pub fn light_id(&self, name: &str) -> Option<LightId> {
        self.lights
            .iter()
            .position(|light| light.name == name)
            .map(LightId)
    }

    pub fn light_by_name(&self, name: &str) -> Option<&Light> {
        self.lights.iter().find(|light| light.name == name)
    }

    pub fn helpers(&self) -> &[LightHelper] {
        &self.helpers
    }

    pub fn helper_mut(&mut self, index: usize) -> Option<&mut LightHelper> {
        self.helpers.get_mut(index)
    }

    pub fn helper_for(&self, light: LightId) -> Option<usize> {
        self.helpers.iter().position(|helper| helper.light == light)
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn mesh(&self, name: &str) -> Option<&Mesh> {
        self.meshes.iter().find(|mesh| mesh.name == name)
    }

    pub fn mesh_mut(&mut self, name: &str) -> Option<&mut Mesh> {
        self.meshes.iter_mut().find(|mesh| mesh.name == name)
    }

    /// Handle to the material every mesh of this scene was built with.
    pub fn material(&self) -> &SharedMaterial {
        &self.material
    }

    /// Sets the rotation of every spinning mesh from the elapsed time.
    ///
    /// The result depends on `elapsed` alone, so repeated calls with the same
    /// time are idempotent. Fixed meshes keep their rotation.
    pub fn spin(&mut self, elapsed: f32) {
        for mesh in self.meshes.iter_mut().filter(|mesh| mesh.spins) {
            mesh.transform.rotation.y = SPIN_Y * elapsed;
            mesh.transform.rotation.x = SPIN_X * elapsed;
        }
    }

    /// Outlines of every visible helper.
    pub fn helper_lines(&self) -> Vec<HelperLine> {
        let mut lines = Vec::new();
        for helper in &self.helpers {
            if let Some(light) = self.light(helper.light) {
                helper.append_lines(light, &mut lines);
            }
        }
        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn showcase_is_deterministic() {
        let a = Scene::showcase();
        let b = Scene::showcase();
        assert_eq!(a.lights(), b.lights());
        assert_eq!(a.helpers(), b.helpers());
        assert_eq!(a.meshes().len(), 4);
        assert_eq!(a.lights().len(), 6);
    }

    #[test]
    fn every_mesh_shares_the_scene_material() {
        let scene = Scene::showcase();
        for mesh in scene.meshes() {
            assert!(mesh.material.is_same(scene.material()), "{}", mesh.name);
        }
        assert_eq!(scene.material().read().roughness, 0.4);
    }

    #[test]
    fn roughness_edit_reaches_every_mesh() {
        let scene = Scene::showcase();
        let sphere = scene.mesh(names::SPHERE).unwrap().material.clone();
        let cube = scene.mesh(names::CUBE).unwrap().material.clone();
        sphere.write().roughness = 0.9;
        assert_eq!(cube.read().roughness, 0.9);
        assert_eq!(scene.material().get().roughness, 0.9);
    }

    #[test]
    fn helpers_start_hidden() {
        let scene = Scene::showcase();
        assert_eq!(scene.helpers().len(), 5);
        assert!(scene.helpers().iter().all(|helper| !helper.visible));
        assert!(scene.helper_lines().is_empty());
    }

    #[test]
    fn helpers_follow_their_light_kind() {
        let scene = Scene::showcase();
        for helper in scene.helpers() {
            let light = scene.light(helper.light).unwrap();
            assert_eq!(Some(helper.kind), HelperKind::for_light(light), "{}", light.name);
            assert_eq!(scene.helper_for(helper.light), scene.helpers().iter().position(|h| h == helper));
        }
        let spot = scene.light_id(names::SPOT).unwrap();
        let spot_helper = &scene.helpers()[scene.helper_for(spot).unwrap()];
        assert_eq!(spot_helper.size, 1.0);
        let point = scene.light_id(names::POINT).unwrap();
        assert_eq!(scene.helpers()[scene.helper_for(point).unwrap()].size, 0.2);
    }

    #[test]
    fn spin_skips_the_plane() {
        let mut scene = Scene::showcase();
        let plane_before = scene.mesh(names::PLANE).unwrap().transform;
        scene.spin(4.0);
        for name in [names::SPHERE, names::CUBE, names::TORUS] {
            let rotation = scene.mesh(name).unwrap().transform.rotation;
            assert_relative_eq!(rotation.y, 0.4, epsilon = 1e-6);
            assert_relative_eq!(rotation.x, 0.6, epsilon = 1e-6);
        }
        assert_eq!(scene.mesh(names::PLANE).unwrap().transform, plane_before);
    }

    #[test]
    fn lookups_by_name() {
        let scene = Scene::showcase();
        let id = scene.light_id(names::SPOT).unwrap();
        assert_eq!(scene.light(id).unwrap().type_name(), "spot");
        assert!(scene.helper_for(id).is_some());
        assert!(scene.helper_for(scene.light_id(names::AMBIENT).unwrap()).is_none());
        assert!(scene.light_by_name("missing").is_none());
    }
}
