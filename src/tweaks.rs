//! Tweak panel model: folders of controls bound to scene fields.
//!
//! The panel itself holds no values. Every control names a [`Field`] and reads
//! or writes it on the scene it is given, so edits land directly on the entity
//! and the next frame renders them.

use std::f32::consts::FRAC_PI_2;

use serde::Serialize;

use crate::color::Color;
use crate::scene::{Light, LightId, LightKind, Scene};

const STEP: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn label(self) -> &'static str {
        match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        }
    }

    fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Editable scene field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Field {
    Intensity(LightId),
    Color(LightId),
    GroundColor(LightId),
    Position(LightId, Axis),
    Distance(LightId),
    Decay(LightId),
    Angle(LightId),
    Penumbra(LightId),
    Width(LightId),
    Height(LightId),
    HelperVisible(usize),
    Roughness,
    Metalness,
    MaterialColor,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Value {
    Number(f32),
    Color(Color),
    Flag(bool),
}

impl Field {
    /// Current value, or `None` if the field does not exist on this scene.
    pub fn read(&self, scene: &Scene) -> Option<Value> {
        if let Some(id) = self.light() {
            let light = scene.light(id)?;
            return Some(match (*self, light.kind) {
                (Field::Intensity(_), _) => Value::Number(light.intensity),
                (Field::Color(_), _) => Value::Color(light.color),
                (Field::Position(_, axis), _) => Value::Number(light.position[axis.index()]),
                (Field::GroundColor(_), LightKind::Hemisphere { ground_color }) => {
                    Value::Color(ground_color)
                }
                (Field::Distance(_), LightKind::Point { distance, .. })
                | (Field::Distance(_), LightKind::Spot { distance, .. }) => Value::Number(distance),
                (Field::Decay(_), LightKind::Point { decay, .. })
                | (Field::Decay(_), LightKind::Spot { decay, .. }) => Value::Number(decay),
                (Field::Angle(_), LightKind::Spot { angle, .. }) => Value::Number(angle),
                (Field::Penumbra(_), LightKind::Spot { penumbra, .. }) => Value::Number(penumbra),
                (Field::Width(_), LightKind::RectArea { width, .. }) => Value::Number(width),
                (Field::Height(_), LightKind::RectArea { height, .. }) => Value::Number(height),
                _ => return None,
            });
        }

        match *self {
            Field::HelperVisible(index) => scene
                .helpers()
                .get(index)
                .map(|helper| Value::Flag(helper.visible)),
            Field::Roughness => Some(Value::Number(scene.material().read().roughness)),
            Field::Metalness => Some(Value::Number(scene.material().read().metalness)),
            Field::MaterialColor => Some(Value::Color(scene.material().read().color)),
            _ => None,
        }
    }

    /// Stores `value` into the field. Returns false when the field does not
    /// exist on this scene or the value has the wrong type; nothing else is
    /// touched in either case.
    pub fn write(&self, scene: &mut Scene, value: Value) -> bool {
        match (*self, value) {
            (Field::HelperVisible(index), Value::Flag(on)) => {
                let Some(helper) = scene.helper_mut(index) else {
                    return false;
                };
                helper.visible = on;
                return true;
            }
            (Field::Roughness, Value::Number(number)) => {
                scene.material().write().roughness = number;
                return true;
            }
            (Field::Metalness, Value::Number(number)) => {
                scene.material().write().metalness = number;
                return true;
            }
            (Field::MaterialColor, Value::Color(color)) => {
                scene.material().write().color = color;
                return true;
            }
            _ => {}
        }

        let Some(id) = self.light() else {
            return false;
        };
        let Some(light) = scene.light_mut(id) else {
            return false;
        };
        match (*self, value, &mut light.kind) {
            (Field::Intensity(_), Value::Number(number), _) => light.intensity = number,
            (Field::Color(_), Value::Color(color), _) => light.color = color,
            (Field::Position(_, axis), Value::Number(number), _) => {
                light.position[axis.index()] = number
            }
            (
                Field::GroundColor(_),
                Value::Color(color),
                LightKind::Hemisphere { ground_color },
            ) => *ground_color = color,
            (Field::Distance(_), Value::Number(number), LightKind::Point { distance, .. })
            | (Field::Distance(_), Value::Number(number), LightKind::Spot { distance, .. }) => {
                *distance = number
            }
            (Field::Decay(_), Value::Number(number), LightKind::Point { decay, .. })
            | (Field::Decay(_), Value::Number(number), LightKind::Spot { decay, .. }) => {
                *decay = number
            }
            (Field::Angle(_), Value::Number(number), LightKind::Spot { angle, .. }) => {
                *angle = number
            }
            (Field::Penumbra(_), Value::Number(number), LightKind::Spot { penumbra, .. }) => {
                *penumbra = number
            }
            (Field::Width(_), Value::Number(number), LightKind::RectArea { width, .. }) => {
                *width = number
            }
            (Field::Height(_), Value::Number(number), LightKind::RectArea { height, .. }) => {
                *height = number
            }
            _ => return false,
        }
        true
    }

    fn light(&self) -> Option<LightId> {
        match *self {
            Field::Intensity(id)
            | Field::Color(id)
            | Field::GroundColor(id)
            | Field::Position(id, _)
            | Field::Distance(id)
            | Field::Decay(id)
            | Field::Angle(id)
            | Field::Penumbra(id)
            | Field::Width(id)
            | Field::Height(id) => Some(id),
            Field::HelperVisible(_) | Field::Roughness | Field::Metalness | Field::MaterialColor => {
                None
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Control {
    Slider {
        label: String,
        field: Field,
        min: f32,
        max: f32,
        step: f32,
    },
    Color {
        label: String,
        field: Field,
    },
    Toggle {
        label: String,
        field: Field,
    },
}

impl Control {
    pub fn slider(label: &str, field: Field, min: f32, max: f32, step: f32) -> Self {
        Control::Slider {
            label: label.to_string(),
            field,
            min,
            max,
            step,
        }
    }

    pub fn color(label: &str, field: Field) -> Self {
        Control::Color {
            label: label.to_string(),
            field,
        }
    }

    pub fn toggle(label: &str, field: Field) -> Self {
        Control::Toggle {
            label: label.to_string(),
            field,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Control::Slider { label, .. }
            | Control::Color { label, .. }
            | Control::Toggle { label, .. } => label,
        }
    }

    pub fn field(&self) -> Field {
        match self {
            Control::Slider { field, .. }
            | Control::Color { field, .. }
            | Control::Toggle { field, .. } => *field,
        }
    }

    /// Writes an edit through this control. Sliders snap to their step and
    /// clamp to their range first.
    pub fn apply(&self, scene: &mut Scene, value: Value) -> bool {
        let value = match (self, value) {
            (
                Control::Slider {
                    min, max, step, ..
                },
                Value::Number(number),
            ) => Value::Number(snap(number, *min, *max, *step)),
            (Control::Slider { .. }, _) => return false,
            (Control::Color { .. }, Value::Color(_)) | (Control::Toggle { .. }, Value::Flag(_)) => {
                value
            }
            _ => return false,
        };
        self.field().write(scene, value)
    }
}

fn snap(value: f32, min: f32, max: f32, step: f32) -> f32 {
    let snapped = if step > 0.0 {
        (value / step).round() * step
    } else {
        value
    };
    snapped.clamp(min, max)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Folder {
    pub title: String,
    pub open: bool,
    pub controls: Vec<Control>,
    pub folders: Vec<Folder>,
}

impl Folder {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            open: true,
            controls: Vec::new(),
            folders: Vec::new(),
        }
    }

    pub fn closed(mut self) -> Self {
        self.open = false;
        self
    }

    pub fn add(&mut self, control: Control) -> &mut Self {
        self.controls.push(control);
        self
    }

    pub fn add_folder(&mut self, folder: Folder) -> &mut Self {
        self.folders.push(folder);
        self
    }

    fn collect<'a>(&'a self, out: &mut Vec<&'a Control>) {
        out.extend(self.controls.iter());
        for folder in &self.folders {
            folder.collect(out);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TweakPanel {
    pub title: String,
    pub folders: Vec<Folder>,
}

impl TweakPanel {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            folders: Vec::new(),
        }
    }

    /// One closed folder per light, in scene order, then the shared material.
    pub fn for_scene(scene: &Scene) -> Self {
        let mut panel = Self::new("Tweaks");
        for (index, light) in scene.lights().iter().enumerate() {
            let id = LightId(index);
            let mut folder = Folder::new(&light_folder_title(light)).closed();

            let ceiling = match light.kind {
                LightKind::RectArea { .. } | LightKind::Spot { .. } => 10.0,
                _ => 3.0,
            };
            folder.add(Control::slider("intensity", Field::Intensity(id), 0.0, ceiling, STEP));

            match light.kind {
                LightKind::Hemisphere { .. } => {
                    folder
                        .add(Control::color("Sky Color", Field::Color(id)))
                        .add(Control::color("Ground Color", Field::GroundColor(id)));
                }
                _ => {
                    folder.add(Control::color("Color Picker", Field::Color(id)));
                }
            }

            match light.kind {
                LightKind::Point { .. } => {
                    folder
                        .add(Control::slider("distance", Field::Distance(id), 0.0, 20.0, STEP))
                        .add(Control::slider("decay", Field::Decay(id), 0.0, 4.0, STEP));
                }
                LightKind::Spot { .. } => {
                    folder
                        .add(Control::slider("distance", Field::Distance(id), 0.0, 20.0, STEP))
                        .add(Control::slider("angle", Field::Angle(id), 0.0, FRAC_PI_2, STEP))
                        .add(Control::slider("penumbra", Field::Penumbra(id), 0.0, 1.0, STEP))
                        .add(Control::slider("decay", Field::Decay(id), 0.0, 4.0, STEP));
                }
                LightKind::RectArea { .. } => {
                    folder
                        .add(Control::slider("width", Field::Width(id), 0.0, 5.0, STEP))
                        .add(Control::slider("height", Field::Height(id), 0.0, 5.0, STEP));
                }
                _ => {}
            }

            if let Some(helper) = scene.helper_for(id) {
                folder.add(Control::toggle("Helper", Field::HelperVisible(helper)));
            }

            if light.is_positional() {
                let mut moves = Folder::new("Move");
                for axis in Axis::ALL {
                    moves.add(Control::slider(
                        axis.label(),
                        Field::Position(id, axis),
                        -5.0,
                        5.0,
                        STEP,
                    ));
                }
                folder.add_folder(moves);
            }

            panel.folders.push(folder);
        }

        let mut material = Folder::new("Material");
        material
            .add(Control::slider("roughness", Field::Roughness, 0.0, 1.0, STEP))
            .add(Control::slider("metalness", Field::Metalness, 0.0, 1.0, STEP))
            .add(Control::color("color", Field::MaterialColor));
        panel.folders.push(material);

        panel
    }

    /// Every control, depth first.
    pub fn controls(&self) -> Vec<&Control> {
        let mut out = Vec::new();
        for folder in &self.folders {
            folder.collect(&mut out);
        }
        out
    }

    pub fn folder(&self, title: &str) -> Option<&Folder> {
        self.folders.iter().find(|folder| folder.title == title)
    }

    /// First control bound to `field`.
    pub fn control_for(&self, field: Field) -> Option<&Control> {
        self.controls()
            .into_iter()
            .find(|control| control.field() == field)
    }
}

/// Folder title for a light. Lights named after their type get the plain
/// title; others are suffixed with their name.
fn light_folder_title(light: &Light) -> String {
    let base = match light.kind {
        LightKind::Ambient => "Ambient Light",
        LightKind::Directional { .. } => "Directional Light",
        LightKind::Hemisphere { .. } => "Hemisphere Light",
        LightKind::Point { .. } => "Point Light",
        LightKind::RectArea { .. } => "RectArea Light",
        LightKind::Spot { .. } => "Spot Light",
    };
    if light.name == light.type_name() {
        base.to_string()
    } else {
        format!("{base} ({})", light.name)
    }
}
