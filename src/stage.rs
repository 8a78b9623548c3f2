//! The running showcase: scene, camera, controls, clock and viewport, plus
//! the per-frame iteration and resize handling that drive them.

use std::fmt;

use anyhow::Result;
use glam::{Vec2, Vec3};
use log::{debug, info};
use serde::Serialize;

use crate::camera::PerspectiveCamera;
use crate::clock::Clock;
use crate::config::StageConfig;
use crate::controls::OrbitControls;
use crate::input::{self, MouseButton, PointerState};
use crate::scene::{Light, Material, Scene};
use crate::tweaks::TweakPanel;
use crate::viewport::Viewport;

pub const CAMERA_FOV: f32 = 75.0;
pub const CAMERA_NEAR: f32 = 0.1;
pub const CAMERA_FAR: f32 = 100.0;
pub const CAMERA_POSITION: Vec3 = Vec3::new(1.0, 1.0, 2.0);

/// Something that puts a frame on screen.
pub trait Presenter {
    /// Logical size of the drawing surface.
    fn set_size(&mut self, width: u32, height: u32);
    fn set_pixel_ratio(&mut self, ratio: f64);
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) -> Result<()>;
}

pub struct Stage {
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    panel: TweakPanel,
    pointer: PointerState,
    clock: Clock,
    viewport: Viewport,
    frames: u64,
}

impl Stage {
    pub fn new(config: &StageConfig, viewport: Viewport, clock: Clock) -> Self {
        let viewport = viewport.with_max_pixel_ratio(config.max_pixel_ratio);
        let scene = Scene::showcase();
        let panel = TweakPanel::for_scene(&scene);

        let mut camera = PerspectiveCamera::new(CAMERA_FOV, viewport.aspect(), CAMERA_NEAR, CAMERA_FAR)
            .at(CAMERA_POSITION);
        camera.look_at(Vec3::ZERO);

        let mut controls = OrbitControls::new(Vec3::ZERO);
        controls.enable_damping = config.enable_damping;
        controls.damping_factor = config.damping_factor;

        info!(
            "Stage ready: {} lights, {} meshes, {}x{} @ {:.2}",
            scene.lights().len(),
            scene.meshes().len(),
            viewport.width,
            viewport.height,
            viewport.pixel_ratio()
        );

        Self {
            scene,
            camera,
            controls,
            panel,
            pointer: PointerState::new(),
            clock,
            viewport,
            frames: 0,
        }
    }

    /// Pushes the current size and pixel ratio to a freshly created presenter.
    pub fn attach<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        presenter.set_size(self.viewport.width, self.viewport.height);
        presenter.set_pixel_ratio(self.viewport.pixel_ratio());
    }

    /// One iteration of the render loop. Controls are updated before the
    /// frame is drawn so the frame shows this iteration's camera.
    pub fn tick<P: Presenter + ?Sized>(&mut self, presenter: &mut P) -> Result<f32> {
        let elapsed = self.clock.elapsed_time();
        self.scene.spin(elapsed);
        self.controls.update(&mut self.camera);
        presenter.render(&self.scene, &self.camera)?;
        self.frames += 1;
        Ok(elapsed)
    }

    /// Applies a new logical size and device pixel ratio. Returns false, and
    /// changes nothing, for a zero-area size.
    pub fn resize<P: Presenter + ?Sized>(
        &mut self,
        width: u32,
        height: u32,
        device_pixel_ratio: f64,
        presenter: &mut P,
    ) -> bool {
        if !self.viewport.update(width, height, device_pixel_ratio) {
            debug!("Ignoring resize to {width}x{height}");
            return false;
        }
        self.camera.aspect = self.viewport.aspect();
        self.camera.update_projection_matrix();
        presenter.set_size(width, height);
        presenter.set_pixel_ratio(self.viewport.pixel_ratio());
        debug!(
            "Resized to {width}x{height} @ {:.2} (device {device_pixel_ratio:.2})",
            self.viewport.pixel_ratio()
        );
        true
    }

    pub fn pointer_moved(&mut self, position: Vec2) {
        if let Some(drag) = self.pointer.move_to(position) {
            input::apply_drag(
                drag,
                &mut self.controls,
                &self.camera,
                self.viewport.height as f32,
            );
        }
    }

    pub fn pointer_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            self.pointer.press(button);
        } else {
            self.pointer.release(button);
        }
    }

    pub fn pointer_left(&mut self) {
        self.pointer.release_all();
    }

    pub fn wheel(&mut self, notches: f32) {
        input::apply_wheel(notches, &mut self.controls);
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn scene_mut(&mut self) -> &mut Scene {
        &mut self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn panel(&self) -> &TweakPanel {
        &self.panel
    }

    /// Panel and scene together, for drawing the panel while its edits land
    /// on the scene.
    pub fn panel_and_scene(&mut self) -> (&TweakPanel, &mut Scene) {
        (&self.panel, &mut self.scene)
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> f32 {
        self.clock.last_elapsed()
    }

    pub fn snapshot(&self) -> StageSnapshot {
        StageSnapshot {
            elapsed: self.elapsed(),
            frames: self.frames,
            viewport: self.viewport,
            camera: CameraSnapshot {
                position: self.camera.position,
                target: self.camera.target,
                fov: self.camera.fov,
                aspect: self.camera.aspect,
            },
            lights: self.scene.lights().to_vec(),
            meshes: self
                .scene
                .meshes()
                .iter()
                .map(|mesh| MeshSnapshot {
                    name: mesh.name.clone(),
                    geometry: mesh.geometry.kind(),
                    position: mesh.transform.position,
                    rotation: mesh.transform.rotation,
                    spins: mesh.spins,
                })
                .collect(),
            material: self.scene.material().get(),
        }
    }
}

impl fmt::Debug for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stage")
            .field("camera", &self.camera)
            .field("viewport", &self.viewport)
            .field("frames", &self.frames)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub target: Vec3,
    pub fov: f32,
    pub aspect: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct MeshSnapshot {
    pub name: String,
    pub geometry: &'static str,
    pub position: Vec3,
    pub rotation: Vec3,
    pub spins: bool,
}

/// Entity state of a stage at one point in time.
#[derive(Debug, Clone, Serialize)]
pub struct StageSnapshot {
    pub elapsed: f32,
    pub frames: u64,
    pub viewport: Viewport,
    pub camera: CameraSnapshot,
    pub lights: Vec<Light>,
    pub meshes: Vec<MeshSnapshot>,
    pub material: Material,
}

impl fmt::Display for StageSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Stage at t={:.2}s after {} frame(s), {}x{}",
            self.elapsed, self.frames, self.viewport.width, self.viewport.height
        )?;
        writeln!(
            f,
            "Camera pos={} target={} fov={:.1} aspect={:.2}",
            vec(self.camera.position),
            vec(self.camera.target),
            self.camera.fov,
            self.camera.aspect
        )?;
        writeln!(f, "Lights:")?;
        for light in &self.lights {
            writeln!(
                f,
                " - {} ({}) color=#{:06x} intensity={:.2} pos={}",
                light.name,
                light.type_name(),
                light.color.to_hex(),
                light.intensity,
                vec(light.position)
            )?;
        }
        writeln!(f, "Meshes:")?;
        for mesh in &self.meshes {
            writeln!(
                f,
                " - {} ({}) pos={} rot={}",
                mesh.name,
                mesh.geometry,
                vec(mesh.position),
                vec(mesh.rotation)
            )?;
        }
        write!(
            f,
            "Material color=#{:06x} roughness={:.2} metalness={:.2}",
            self.material.color.to_hex(),
            self.material.roughness,
            self.material.metalness
        )
    }
}

fn vec(v: Vec3) -> String {
    format!("({:.2}, {:.2}, {:.2})", v.x, v.y, v.z)
}

/// Presenter without a surface. Records what it was asked to do.
#[derive(Debug, Default)]
pub struct HeadlessPresenter {
    pub size: (u32, u32),
    pub pixel_ratio: f64,
    pub frames: u64,
    /// Camera position seen by each rendered frame.
    pub camera_positions: Vec<Vec3>,
}

impl HeadlessPresenter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Presenter for HeadlessPresenter {
    fn set_size(&mut self, width: u32, height: u32) {
        self.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.pixel_ratio = ratio;
    }

    fn render(&mut self, _scene: &Scene, camera: &PerspectiveCamera) -> Result<()> {
        self.frames += 1;
        self.camera_positions.push(camera.position);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualTime;
    use crate::scene::names;
    use approx::assert_relative_eq;

    fn stage(time: &ManualTime) -> Stage {
        Stage::new(
            &StageConfig::default(),
            Viewport::new(1280, 720, 1.0),
            Clock::with_source(time.clone()),
        )
    }

    #[test]
    fn camera_starts_at_showcase_position() {
        let stage = stage(&ManualTime::new());
        assert_eq!(stage.camera().position, CAMERA_POSITION);
        assert_eq!(stage.camera().fov, 75.0);
        assert_relative_eq!(stage.camera().aspect, 1280.0 / 720.0);
        assert!(stage.controls().enable_damping);
    }

    #[test]
    fn tick_spins_meshes_from_elapsed_time() {
        let time = ManualTime::new();
        let mut stage = stage(&time);
        let mut presenter = HeadlessPresenter::new();
        time.set(2.0);
        assert_eq!(stage.tick(&mut presenter).unwrap(), 2.0);
        let torus = stage.scene().mesh(names::TORUS).unwrap();
        assert_relative_eq!(torus.transform.rotation.y, 0.2, epsilon = 1e-6);
        assert_relative_eq!(torus.transform.rotation.x, 0.3, epsilon = 1e-6);
        assert_eq!(presenter.frames, 1);
        assert_eq!(stage.frames(), 1);
    }

    #[test]
    fn attach_pushes_capped_pixel_ratio() {
        let stage = Stage::new(
            &StageConfig::default(),
            Viewport::new(800, 600, 3.0),
            Clock::with_source(ManualTime::new()),
        );
        let mut presenter = HeadlessPresenter::new();
        stage.attach(&mut presenter);
        assert_eq!(presenter.size, (800, 600));
        assert_eq!(presenter.pixel_ratio, 2.0);
    }

    #[test]
    fn summary_lists_every_entity() {
        let stage = stage(&ManualTime::new());
        let text = stage.snapshot().to_string();
        for name in [names::AMBIENT, names::SPOT, names::CUBE, names::PLANE] {
            assert!(text.contains(&format!(" - {name} (")), "{text}");
        }
        assert!(text.contains("roughness=0.40"));
    }
}
