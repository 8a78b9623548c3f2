use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::color::Color;

/// Index of a light inside its [`Scene`](super::Scene).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LightId(pub(crate) usize);

impl LightId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Light source with the attributes shared by every variant.
///
/// `position` is ignored by ambient and hemisphere shading but kept on every
/// light so helpers and the panel can treat them uniformly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub name: String,
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub kind: LightKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightKind {
    Ambient,
    Directional {
        target: Vec3,
    },
    Hemisphere {
        ground_color: Color,
    },
    Point {
        /// Cut-off range; zero means unbounded.
        distance: f32,
        decay: f32,
    },
    RectArea {
        width: f32,
        height: f32,
        target: Vec3,
    },
    Spot {
        target: Vec3,
        distance: f32,
        /// Cone half-angle in radians.
        angle: f32,
        penumbra: f32,
        decay: f32,
    },
}

impl Light {
    fn with_kind(name: &str, color: Color, intensity: f32, kind: LightKind) -> Self {
        Self {
            name: name.to_string(),
            color,
            intensity: intensity.max(0.0),
            position: Vec3::ZERO,
            kind,
        }
    }

    pub fn ambient(name: &str, color: Color, intensity: f32) -> Self {
        Self::with_kind(name, color, intensity, LightKind::Ambient)
    }

    /// Directional light shining from `(0, 1, 0)` towards the origin.
    pub fn directional(name: &str, color: Color, intensity: f32) -> Self {
        Self::with_kind(
            name,
            color,
            intensity,
            LightKind::Directional { target: Vec3::ZERO },
        )
        .at(Vec3::Y)
    }

    pub fn hemisphere(name: &str, sky: Color, ground: Color, intensity: f32) -> Self {
        Self::with_kind(
            name,
            sky,
            intensity,
            LightKind::Hemisphere {
                ground_color: ground,
            },
        )
        .at(Vec3::Y)
    }

    pub fn point(name: &str, color: Color, intensity: f32, distance: f32, decay: f32) -> Self {
        Self::with_kind(name, color, intensity, LightKind::Point { distance, decay })
    }

    pub fn rect_area(name: &str, color: Color, intensity: f32, width: f32, height: f32) -> Self {
        Self::with_kind(
            name,
            color,
            intensity,
            LightKind::RectArea {
                width,
                height,
                target: Vec3::ZERO,
            },
        )
    }

    pub fn spot(
        name: &str,
        color: Color,
        intensity: f32,
        distance: f32,
        angle: f32,
        penumbra: f32,
        decay: f32,
    ) -> Self {
        Self::with_kind(
            name,
            color,
            intensity,
            LightKind::Spot {
                target: Vec3::ZERO,
                distance,
                angle,
                penumbra,
                decay,
            },
        )
        .at(Vec3::Y)
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Points a directional, rect-area or spot light at `point`. No-op for
    /// the other variants.
    pub fn looking_at(mut self, point: Vec3) -> Self {
        if let Some(target) = self.target_mut() {
            *target = point;
        }
        self
    }

    pub fn type_name(&self) -> &'static str {
        match self.kind {
            LightKind::Ambient => "ambient",
            LightKind::Directional { .. } => "directional",
            LightKind::Hemisphere { .. } => "hemisphere",
            LightKind::Point { .. } => "point",
            LightKind::RectArea { .. } => "rect_area",
            LightKind::Spot { .. } => "spot",
        }
    }

    pub fn is_positional(&self) -> bool {
        !matches!(self.kind, LightKind::Ambient | LightKind::Hemisphere { .. })
    }

    pub fn target(&self) -> Option<Vec3> {
        match self.kind {
            LightKind::Directional { target }
            | LightKind::RectArea { target, .. }
            | LightKind::Spot { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn target_mut(&mut self) -> Option<&mut Vec3> {
        match &mut self.kind {
            LightKind::Directional { target }
            | LightKind::RectArea { target, .. }
            | LightKind::Spot { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Unit vector from the light towards its target, straight down when the
    /// light sits on its target or has none.
    pub fn direction(&self) -> Vec3 {
        let Some(target) = self.target() else {
            return Vec3::NEG_Y;
        };
        let towards = target - self.position;
        if towards.length_squared() > f32::EPSILON {
            towards.normalize()
        } else {
            Vec3::NEG_Y
        }
    }

    pub fn ground_color(&self) -> Option<Color> {
        match self.kind {
            LightKind::Hemisphere { ground_color } => Some(ground_color),
            _ => None,
        }
    }
}
