use std::f32::consts::PI;

use glam::Vec3;

use crate::camera::PerspectiveCamera;

const POLAR_EPSILON: f32 = 1e-6;

/// Orbit controller that keeps the camera on a sphere around `target`.
///
/// Input methods only accumulate pending motion; nothing moves until
/// [`update`](Self::update) runs. With damping enabled each update applies
/// `damping_factor` of the pending rotation and pan and keeps the rest for
/// later frames, so motion eases out instead of stopping dead.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    delta_theta: f32,
    delta_phi: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 1.0,
            zoom_speed: 1.0,
            pan_speed: 1.0,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            delta_theta: 0.0,
            delta_phi: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new(target: Vec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Orbits around the vertical axis. Positive angles move the camera to the
    /// left as seen from behind it.
    pub fn rotate_left(&mut self, angle: f32) {
        self.delta_theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta_phi -= angle;
    }

    /// Moves towards the target by `factor` (> 1 gets closer).
    pub fn dolly_in(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale /= factor;
        }
    }

    pub fn dolly_out(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Screen-space pan by a pointer delta in logical pixels.
    pub fn pan(&mut self, dx: f32, dy: f32, camera: &PerspectiveCamera, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let forward = camera.target - camera.position;
        let distance = forward.length() * (camera.fov.to_radians() * 0.5).tan();
        let Some(forward) = forward.try_normalize() else {
            return;
        };
        let right = forward.cross(Vec3::Y).try_normalize().unwrap_or(Vec3::X);
        let up = right.cross(forward);
        let scale = 2.0 * distance * self.pan_speed / viewport_height;
        self.pan_offset += (-right * dx + up * dy) * scale;
    }

    /// Whether a previous input still has motion left to apply.
    pub fn is_moving(&self) -> bool {
        self.delta_theta.abs() > POLAR_EPSILON
            || self.delta_phi.abs() > POLAR_EPSILON
            || self.pan_offset.length_squared() > POLAR_EPSILON * POLAR_EPSILON
            || (self.scale - 1.0).abs() > POLAR_EPSILON
    }

    /// Applies pending motion to `camera`. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI * 0.5)
        };

        let damping = if self.enable_damping {
            self.damping_factor.clamp(0.0, 1.0)
        } else {
            1.0
        };
        theta += self.delta_theta * damping;
        phi += self.delta_phi * damping;

        let min_phi = self.min_polar_angle.max(POLAR_EPSILON);
        let max_phi = self.max_polar_angle.min(PI - POLAR_EPSILON);
        phi = phi.clamp(min_phi, max_phi.max(min_phi));

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset * damping;

        let offset = Vec3::new(
            radius * phi.sin() * theta.sin(),
            radius * phi.cos(),
            radius * phi.sin() * theta.cos(),
        );
        let previous = camera.position;
        camera.position = self.target + offset;
        camera.look_at(self.target);

        if self.enable_damping {
            let keep = 1.0 - damping;
            self.delta_theta *= keep;
            self.delta_phi *= keep;
            self.pan_offset *= keep;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous.distance_squared(camera.position) > f32::EPSILON
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::default().at(Vec3::new(1.0, 1.0, 2.0));
        camera.look_at(Vec3::ZERO);
        camera
    }

    fn azimuth(camera: &PerspectiveCamera) -> f32 {
        camera.position.x.atan2(camera.position.z)
    }

    #[test]
    fn idle_update_keeps_camera_in_place() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        controls.enable_damping = true;
        let before = camera.position;
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.x, before.x, epsilon = 1e-5);
        assert_relative_eq!(camera.position.y, before.y, epsilon = 1e-5);
        assert_relative_eq!(camera.position.z, before.z, epsilon = 1e-5);
        assert!(!controls.is_moving());
    }

    #[test]
    fn undamped_rotation_applies_at_once() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        let start = azimuth(&camera);
        controls.rotate_left(0.5);
        assert!(controls.update(&mut camera));
        assert_relative_eq!(azimuth(&camera), start - 0.5, epsilon = 1e-5);
        assert!(!controls.is_moving());
    }

    #[test]
    fn damped_rotation_eases_towards_full_delta() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        controls.enable_damping = true;
        let start = azimuth(&camera);
        controls.rotate_left(0.5);

        controls.update(&mut camera);
        assert_relative_eq!(azimuth(&camera), start - 0.5 * 0.05, epsilon = 1e-5);
        assert!(controls.is_moving());

        for _ in 0..500 {
            controls.update(&mut camera);
        }
        assert_relative_eq!(azimuth(&camera), start - 0.5, epsilon = 1e-3);
        assert!(!controls.is_moving());
    }

    #[test]
    fn orbit_preserves_distance() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        let distance = camera.position.length();
        controls.rotate_left(1.0);
        controls.rotate_up(0.3);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.length(), distance, epsilon = 1e-5);
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn polar_angle_never_passes_the_pole() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        controls.rotate_up(10.0);
        controls.update(&mut camera);
        assert!(camera.position.y > 0.0);
        assert!(camera.position.x.is_finite() && camera.position.z.is_finite());
    }

    #[test]
    fn dolly_respects_distance_limits() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        controls.min_distance = 1.0;
        controls.dolly_in(100.0);
        controls.update(&mut camera);
        assert_relative_eq!(camera.position.length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn pan_moves_target_and_camera_together() {
        let mut camera = camera();
        let mut controls = OrbitControls::default();
        let offset = camera.position - controls.target;
        controls.pan(40.0, 0.0, &camera, 720.0);
        controls.update(&mut camera);
        assert_ne!(controls.target, Vec3::ZERO);
        assert_relative_eq!(controls.target.y, 0.0, epsilon = 1e-5);
        let moved = camera.position - controls.target;
        assert_relative_eq!(moved.length(), offset.length(), epsilon = 1e-4);
    }
}
