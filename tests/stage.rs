use approx::assert_relative_eq;
use glam::{Vec2, Vec3};

use light_stage::input::MouseButton;
use light_stage::scene::names;
use light_stage::stage::CAMERA_POSITION;
use light_stage::{
    Clock, Color, Field, HeadlessPresenter, ManualTime, PerspectiveCamera, Stage, StageConfig,
    Value, Viewport,
};

fn stage_with(config: StageConfig, viewport: Viewport) -> (Stage, ManualTime, HeadlessPresenter) {
    let time = ManualTime::new();
    let stage = Stage::new(&config, viewport, Clock::with_source(time.clone()));
    let mut presenter = HeadlessPresenter::new();
    stage.attach(&mut presenter);
    (stage, time, presenter)
}

fn default_stage() -> (Stage, ManualTime, HeadlessPresenter) {
    stage_with(StageConfig::default(), Viewport::new(1280, 720, 1.0))
}

#[test]
fn meshes_spin_with_elapsed_time_except_the_plane() {
    let (mut stage, time, mut presenter) = default_stage();
    time.set(10.0);
    let elapsed = stage.tick(&mut presenter).expect("tick");
    assert_relative_eq!(elapsed, 10.0);

    for name in [names::SPHERE, names::CUBE, names::TORUS] {
        let rotation = stage.scene().mesh(name).expect("mesh").transform.rotation;
        assert_relative_eq!(rotation.x, 1.5, epsilon = 1e-5);
        assert_relative_eq!(rotation.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(rotation.z, 0.0);
    }
    let plane = stage.scene().mesh(names::PLANE).expect("plane");
    assert_relative_eq!(plane.transform.rotation.x, -std::f32::consts::FRAC_PI_2);
    assert_relative_eq!(plane.transform.rotation.y, 0.0);
}

#[test]
fn resize_updates_aspect_and_caps_pixel_ratio() {
    let (mut stage, _time, mut presenter) = default_stage();
    assert!(stage.resize(1920, 1080, 3.0, &mut presenter));

    assert_relative_eq!(stage.camera().aspect, 1920.0 / 1080.0);
    assert_eq!(presenter.size, (1920, 1080));
    assert_relative_eq!(presenter.pixel_ratio, 2.0);

    let mut expected = PerspectiveCamera::new(75.0, 1920.0 / 1080.0, 0.1, 100.0);
    expected.update_projection_matrix();
    assert!(stage
        .camera()
        .projection()
        .abs_diff_eq(expected.projection(), 1e-6));

    // Low-density screens keep their own ratio.
    assert!(stage.resize(1920, 1080, 1.25, &mut presenter));
    assert_relative_eq!(presenter.pixel_ratio, 1.25);
}

#[test]
fn repeated_resize_leaves_the_same_state() {
    let (mut stage, _time, mut presenter) = default_stage();
    stage.resize(1024, 768, 2.0, &mut presenter);
    let first = (*stage.viewport(), stage.camera().aspect, presenter.size);
    stage.resize(1024, 768, 2.0, &mut presenter);
    assert_eq!(first, (*stage.viewport(), stage.camera().aspect, presenter.size));
}

#[test]
fn zero_height_resize_is_ignored() {
    let (mut stage, _time, mut presenter) = default_stage();
    let aspect = stage.camera().aspect;
    assert!(!stage.resize(800, 0, 1.0, &mut presenter));
    assert_relative_eq!(stage.camera().aspect, aspect);
    assert!(stage.camera().aspect.is_finite());
    assert_eq!(presenter.size, (1280, 720));
}

#[test]
fn each_frame_renders_the_camera_updated_that_frame() {
    let (mut stage, _time, mut presenter) = default_stage();
    stage.controls_mut().rotate_left(0.5);
    stage.tick(&mut presenter).expect("tick");

    assert_eq!(presenter.frames, 1);
    let rendered = presenter.camera_positions[0];
    assert_eq!(rendered, stage.camera().position);
    assert!(rendered.distance(CAMERA_POSITION) > 1e-3);
}

#[test]
fn drag_rotation_eases_out_over_later_frames() {
    let (mut stage, _time, mut presenter) = default_stage();
    stage.pointer_button(MouseButton::LEFT, true);
    stage.pointer_moved(Vec2::new(100.0, 100.0));
    stage.pointer_moved(Vec2::new(200.0, 100.0));
    stage.pointer_button(MouseButton::LEFT, false);

    for _ in 0..3 {
        stage.tick(&mut presenter).expect("tick");
    }
    let positions = &presenter.camera_positions;
    assert!(positions[0].distance(CAMERA_POSITION) > 1e-4);
    assert!(positions[1].distance(positions[0]) > 1e-5);
    assert!(positions[2].distance(positions[1]) > 1e-5);

    // Orbiting keeps the distance to the target.
    let radius = CAMERA_POSITION.length();
    for position in positions {
        assert_relative_eq!(position.length(), radius, epsilon = 1e-4);
    }
}

#[test]
fn camera_stays_still_without_damping_or_input() {
    let config = StageConfig {
        enable_damping: false,
        ..StageConfig::default()
    };
    let (mut stage, _time, mut presenter) = stage_with(config, Viewport::new(640, 480, 1.0));
    stage.tick(&mut presenter).expect("tick");
    stage.tick(&mut presenter).expect("tick");
    for position in &presenter.camera_positions {
        assert!(position.abs_diff_eq(CAMERA_POSITION, 1e-5));
    }
}

#[test]
fn wheel_dollies_toward_the_target() {
    let (mut stage, _time, mut presenter) = default_stage();
    stage.wheel(3.0);
    for _ in 0..60 {
        stage.tick(&mut presenter).expect("tick");
    }
    assert!(stage.camera().position.length() < CAMERA_POSITION.length());
}

#[test]
fn panel_edits_touch_only_their_own_light() {
    let (mut stage, _time, _presenter) = default_stage();
    let before: Vec<_> = stage.scene().lights().to_vec();
    let point = stage.scene().light_id(names::POINT).expect("point light");

    let (panel, scene) = stage.panel_and_scene();
    let control = panel
        .control_for(Field::Intensity(point))
        .expect("intensity slider");
    assert!(control.apply(scene, Value::Number(2.5)));

    let after = stage.scene().lights();
    for (index, (old, new)) in before.iter().zip(after).enumerate() {
        if index == point.index() {
            assert_relative_eq!(new.intensity, 2.5);
            assert_eq!(new.color, old.color);
            assert_eq!(new.position, old.position);
        } else {
            assert_eq!(old, new);
        }
    }
}

#[test]
fn panel_moves_positional_lights() {
    let (mut stage, _time, _presenter) = default_stage();
    let spot = stage.scene().light_id(names::SPOT).expect("spot light");
    let (panel, scene) = stage.panel_and_scene();
    let control = panel
        .control_for(Field::Position(spot, light_stage::tweaks::Axis::X))
        .expect("move x");
    // Out of range values clamp to the slider bounds.
    assert!(control.apply(scene, Value::Number(9.0)));
    let light = stage.scene().light(spot).expect("spot");
    assert_eq!(light.position, Vec3::new(5.0, 2.0, 3.0));
}

#[test]
fn material_edits_reach_every_mesh() {
    let (mut stage, _time, _presenter) = default_stage();
    let (panel, scene) = stage.panel_and_scene();
    panel
        .control_for(Field::Roughness)
        .expect("roughness slider")
        .apply(scene, Value::Number(0.8));
    panel
        .control_for(Field::MaterialColor)
        .expect("material color")
        .apply(scene, Value::Color(Color::from_hex(0x336699)));

    for mesh in stage.scene().meshes() {
        let material = mesh.material.get();
        assert_relative_eq!(material.roughness, 0.8);
        assert_eq!(material.color.to_hex(), 0x336699);
    }
    assert_relative_eq!(stage.snapshot().material.roughness, 0.8);
}

#[test]
fn helpers_start_hidden_and_toggle_on() {
    let (mut stage, _time, _presenter) = default_stage();
    assert_eq!(stage.scene().helpers().len(), 5);
    assert!(stage.scene().helpers().iter().all(|helper| !helper.visible));
    assert!(stage.scene().helper_lines().is_empty());

    let (panel, scene) = stage.panel_and_scene();
    panel
        .control_for(Field::HelperVisible(0))
        .expect("helper toggle")
        .apply(scene, Value::Flag(true));
    assert!(stage.scene().helpers()[0].visible);
    assert!(!stage.scene().helper_lines().is_empty());
}

#[test]
fn snapshot_counts_frames_and_reports_camera() {
    let (mut stage, time, mut presenter) = default_stage();
    for frame in 1..=4 {
        time.set(f64::from(frame) * 0.25);
        stage.tick(&mut presenter).expect("tick");
    }
    let snapshot = stage.snapshot();
    assert_eq!(snapshot.frames, 4);
    assert_relative_eq!(snapshot.elapsed, 1.0);
    assert_eq!(snapshot.camera.target, Vec3::ZERO);
    assert_relative_eq!(snapshot.camera.aspect, 1280.0 / 720.0);
    assert_eq!(snapshot.lights.len(), 6);
    assert_eq!(snapshot.meshes.len(), 4);
}
