//! Interactive lighting showcase.
//!
//! Six light types shine on a sphere, a cube, a torus and a floor plane that
//! share a single material. A damped orbit camera looks at the origin and a
//! tweak panel edits light and material fields while the scene renders.
//! The scene model, controls and panel bindings are plain data and can be
//! driven headless; rendering lives behind the [`stage::Presenter`] seam.

pub mod app;
pub mod camera;
pub mod clock;
pub mod color;
pub mod config;
pub mod controls;
pub mod error;
pub mod geometry;
pub mod input;
pub mod render;
pub mod scene;
pub mod stage;
pub mod tweaks;
pub mod viewport;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use camera::PerspectiveCamera;
pub use clock::{Clock, ManualTime, TimeSource};
pub use color::Color;
pub use config::StageConfig;
pub use controls::OrbitControls;
pub use error::StageError;
pub use geometry::{Geometry, MeshData};
pub use render::Renderer;
pub use scene::{Light, LightKind, Material, Mesh, Scene, SharedMaterial};
pub use stage::{HeadlessPresenter, Presenter, Stage, StageSnapshot};
pub use tweaks::{Control, Field, Folder, TweakPanel, Value};
pub use viewport::Viewport;
