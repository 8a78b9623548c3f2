use glam::{Mat4, Vec3};
use serde::{Deserialize, Serialize};

/// Perspective camera looking at `target`.
///
/// The projection matrix is cached and only rebuilt by
/// [`update_projection_matrix`](Self::update_projection_matrix), so changing
/// `fov`, `aspect`, `near` or `far` has no effect until it is called.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub target: Vec3,
    #[serde(skip)]
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn update_projection_matrix(&mut self) {
        // wgpu clip space has depth in 0..1, hence the non-GL variant.
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect.max(1e-4), self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        let forward = self.target - self.position;
        let up = if forward.cross(Vec3::Y).length_squared() > f32::EPSILON {
            Vec3::Y
        } else {
            Vec3::Z
        };
        Mat4::look_at_rh(self.position, self.target, up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection * self.view()
    }
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(75.0, 1.0, 0.1, 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn projection_waits_for_explicit_update() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let before = camera.projection();
        camera.aspect = 2.0;
        assert_eq!(camera.projection(), before);
        camera.update_projection_matrix();
        assert_relative_eq!(
            camera.projection().x_axis.x * 2.0,
            before.x_axis.x,
            epsilon = 1e-6
        );
    }

    #[test]
    fn target_projects_to_screen_center() {
        let mut camera = PerspectiveCamera::default().at(Vec3::new(1.0, 1.0, 2.0));
        camera.look_at(Vec3::ZERO);
        let clip = camera.view_projection().project_point3(Vec3::ZERO);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(clip.y, 0.0, epsilon = 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }

    #[test]
    fn looking_straight_down_has_a_valid_view() {
        let mut camera = PerspectiveCamera::default().at(Vec3::new(0.0, 5.0, 0.0));
        camera.look_at(Vec3::ZERO);
        assert!(camera.view().is_finite());
    }
}
