use std::collections::HashSet;
use std::f32::consts::TAU;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::camera::PerspectiveCamera;
use crate::controls::OrbitControls;

/// Dolly factor applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 0.95;

/// Identifier for a mouse button (left button is zero).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MouseButton(u8);

impl MouseButton {
    pub const LEFT: Self = Self(0);
    pub const MIDDLE: Self = Self(1);
    pub const RIGHT: Self = Self(2);

    pub fn new(index: u8) -> Self {
        Self(index)
    }

    pub fn index(self) -> u8 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragAction {
    Rotate,
    Pan,
}

/// Pointer motion while a button is held, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub action: DragAction,
    pub delta: Vec2,
}

/// Buttons held and last known cursor position over the drawing surface.
#[derive(Debug, Default)]
pub struct PointerState {
    buttons: HashSet<MouseButton>,
    position: Option<Vec2>,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, button: MouseButton) {
        self.buttons.insert(button);
    }

    pub fn release(&mut self, button: MouseButton) {
        self.buttons.remove(&button);
    }

    /// Forgets held buttons, e.g. when the cursor leaves the window.
    pub fn release_all(&mut self) {
        self.buttons.clear();
        self.position = None;
    }

    pub fn is_down(&self, button: MouseButton) -> bool {
        self.buttons.contains(&button)
    }

    /// Records a cursor move. Returns the drag it amounts to, if a button is
    /// held and a previous position is known.
    pub fn move_to(&mut self, position: Vec2) -> Option<Drag> {
        let previous = self.position.replace(position)?;
        let action = self.action()?;
        let delta = position - previous;
        (delta != Vec2::ZERO).then_some(Drag { action, delta })
    }

    fn action(&self) -> Option<DragAction> {
        if self.is_down(MouseButton::LEFT) {
            Some(DragAction::Rotate)
        } else if self.is_down(MouseButton::RIGHT) || self.is_down(MouseButton::MIDDLE) {
            Some(DragAction::Pan)
        } else {
            None
        }
    }
}

/// Feeds a drag into the controls. A horizontal drag across the full viewport
/// height turns the camera once around the target.
pub fn apply_drag(
    drag: Drag,
    controls: &mut OrbitControls,
    camera: &PerspectiveCamera,
    viewport_height: f32,
) {
    if viewport_height <= 0.0 {
        return;
    }
    match drag.action {
        DragAction::Rotate => {
            let scale = TAU * controls.rotate_speed / viewport_height;
            controls.rotate_left(drag.delta.x * scale);
            controls.rotate_up(drag.delta.y * scale);
        }
        DragAction::Pan => controls.pan(drag.delta.x, drag.delta.y, camera, viewport_height),
    }
}

/// Feeds wheel notches into the controls; positive notches zoom in.
pub fn apply_wheel(notches: f32, controls: &mut OrbitControls) {
    if notches == 0.0 {
        return;
    }
    let factor = WHEEL_ZOOM_STEP.powf(notches.abs() * controls.zoom_speed).recip();
    if notches > 0.0 {
        controls.dolly_in(factor);
    } else {
        controls.dolly_out(factor);
    }
}
