use std::f32::consts::TAU;

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::light::{Light, LightId, LightKind};
use crate::color::Color;

const CONE_SEGMENTS: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HelperKind {
    Hemisphere,
    Directional,
    Point,
    Spot,
    RectArea,
}

impl HelperKind {
    pub fn for_light(light: &Light) -> Option<Self> {
        Some(match light.kind {
            LightKind::Ambient => return None,
            LightKind::Directional { .. } => Self::Directional,
            LightKind::Hemisphere { .. } => Self::Hemisphere,
            LightKind::Point { .. } => Self::Point,
            LightKind::RectArea { .. } => Self::RectArea,
            LightKind::Spot { .. } => Self::Spot,
        })
    }

    /// Outline scale used when none is given: small markers for point-like
    /// helpers, full size for cones and rectangles.
    pub fn default_size(self) -> f32 {
        match self {
            Self::Spot | Self::RectArea => 1.0,
            Self::Hemisphere | Self::Directional | Self::Point => 0.2,
        }
    }
}

/// Debug overlay outlining where a light sits and where it points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightHelper {
    pub light: LightId,
    pub kind: HelperKind,
    pub size: f32,
    pub visible: bool,
}

/// Colored line segment in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HelperLine {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Color,
}

impl LightHelper {
    pub fn new(light: LightId, kind: HelperKind, size: f32) -> Self {
        Self {
            light,
            kind,
            size,
            visible: false,
        }
    }

    /// Hidden helper of the matching kind and default size. Ambient lights
    /// get none.
    pub fn for_light(id: LightId, light: &Light) -> Option<Self> {
        let kind = HelperKind::for_light(light)?;
        Some(Self::new(id, kind, kind.default_size()))
    }

    /// Appends this helper's outline to `out`. Hidden helpers add nothing.
    pub fn append_lines(&self, light: &Light, out: &mut Vec<HelperLine>) {
        if !self.visible {
            return;
        }
        match (self.kind, light.kind) {
            (HelperKind::Point, _) => octahedron(light.position, self.size, |_| light.color, out),
            (HelperKind::Hemisphere, LightKind::Hemisphere { ground_color }) => {
                octahedron(
                    light.position,
                    self.size,
                    |upper| if upper { light.color } else { ground_color },
                    out,
                );
            }
            (HelperKind::Directional, _) => {
                let (right, up) = basis(light.direction());
                rectangle(light.position, right * self.size, up * self.size, light.color, out);
                if let Some(target) = light.target() {
                    out.push(HelperLine {
                        start: light.position,
                        end: target,
                        color: light.color,
                    });
                }
            }
            (HelperKind::RectArea, LightKind::RectArea { width, height, .. }) => {
                let (right, up) = basis(light.direction());
                rectangle(
                    light.position,
                    right * (width * 0.5 * self.size),
                    up * (height * 0.5 * self.size),
                    light.color,
                    out,
                );
            }
            (HelperKind::Spot, LightKind::Spot { distance, angle, .. }) => {
                spot_cone(light, distance, angle, self.size, out);
            }
            _ => {}
        }
    }
}

/// Two perpendicular unit vectors spanning the plane facing `direction`.
fn basis(direction: Vec3) -> (Vec3, Vec3) {
    let hint = if direction.dot(Vec3::Y).abs() > 0.999 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    let right = direction.cross(hint).normalize();
    let up = right.cross(direction);
    (right, up)
}

fn octahedron(
    center: Vec3,
    size: f32,
    color_of: impl Fn(bool) -> Color,
    out: &mut Vec<HelperLine>,
) {
    let ring = [Vec3::X, Vec3::Z, Vec3::NEG_X, Vec3::NEG_Z].map(|axis| center + axis * size);
    let top = center + Vec3::Y * size;
    let bottom = center - Vec3::Y * size;
    for (i, &corner) in ring.iter().enumerate() {
        let next = ring[(i + 1) % ring.len()];
        out.push(HelperLine {
            start: corner,
            end: next,
            color: color_of(false),
        });
        out.push(HelperLine {
            start: top,
            end: corner,
            color: color_of(true),
        });
        out.push(HelperLine {
            start: bottom,
            end: corner,
            color: color_of(false),
        });
    }
}

fn rectangle(center: Vec3, half_right: Vec3, half_up: Vec3, color: Color, out: &mut Vec<HelperLine>) {
    let corners = [
        center - half_right + half_up,
        center + half_right + half_up,
        center + half_right - half_up,
        center - half_right - half_up,
    ];
    for (i, &start) in corners.iter().enumerate() {
        out.push(HelperLine {
            start,
            end: corners[(i + 1) % corners.len()],
            color,
        });
    }
}

/// Cone of the spot's reach, `size` times its distance (one unit when
/// unbounded).
fn spot_cone(light: &Light, distance: f32, angle: f32, size: f32, out: &mut Vec<HelperLine>) {
    let direction = light.direction();
    let length = (if distance > 0.0 { distance } else { 1.0 }) * size;
    let radius = length * angle.tan();
    let (right, up) = basis(direction);
    let base = light.position + direction * length;
    let rim = |i: usize| {
        let theta = i as f32 / CONE_SEGMENTS as f32 * TAU;
        base + (right * theta.cos() + up * theta.sin()) * radius
    };

    for i in 0..CONE_SEGMENTS {
        out.push(HelperLine {
            start: rim(i),
            end: rim(i + 1),
            color: light.color,
        });
    }
    for quarter in 0..4 {
        out.push(HelperLine {
            start: light.position,
            end: rim(quarter * CONE_SEGMENTS / 4),
            color: light.color,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines_for(light: &Light, visible: bool) -> Vec<HelperLine> {
        let mut helper = LightHelper::for_light(LightId(0), light).unwrap();
        helper.visible = visible;
        sized_lines(helper, light)
    }

    fn sized_lines(helper: LightHelper, light: &Light) -> Vec<HelperLine> {
        let mut out = Vec::new();
        helper.append_lines(light, &mut out);
        out
    }

    #[test]
    fn new_helpers_are_hidden() {
        let helper = LightHelper::new(LightId(3), HelperKind::Spot, 1.0);
        assert!(!helper.visible);
    }

    #[test]
    fn hidden_helper_draws_nothing() {
        let light = Light::point("bulb", Color::WHITE, 1.0, 0.0, 2.0);
        assert!(lines_for(&light, false).is_empty());
        assert_eq!(lines_for(&light, true).len(), 12);
    }

    #[test]
    fn ambient_light_has_no_helper() {
        let light = Light::ambient("ambient", Color::WHITE, 1.0);
        assert_eq!(HelperKind::for_light(&light), None);
    }

    #[test]
    fn hemisphere_helper_uses_both_colors() {
        let sky = Color::from_hex(0xff0000);
        let ground = Color::from_hex(0x0000ff);
        let light = Light::hemisphere("hemi", sky, ground, 1.0);
        let lines = lines_for(&light, true);
        assert!(lines.iter().any(|line| line.color == sky));
        assert!(lines.iter().any(|line| line.color == ground));
    }

    #[test]
    fn directional_helper_reaches_target() {
        let light = Light::directional("sun", Color::WHITE, 1.0).at(Vec3::new(2.0, 2.0, 0.0));
        let lines = lines_for(&light, true);
        assert_eq!(lines.len(), 5);
        assert!(lines.iter().any(|line| line.end == Vec3::ZERO));
    }

    #[test]
    fn spot_cone_opens_along_direction() {
        let light = Light::spot("spot", Color::WHITE, 1.0, 10.0, 0.3, 0.25, 1.0)
            .at(Vec3::new(0.0, 2.0, 3.0));
        let lines = lines_for(&light, true);
        assert_eq!(lines.len(), CONE_SEGMENTS + 4);
        let expected_radius = 10.0 * 0.3f32.tan();
        let base = light.position + light.direction() * 10.0;
        for line in &lines[..CONE_SEGMENTS] {
            assert!(((line.start - base).length() - expected_radius).abs() < 1e-3);
        }
    }

    #[test]
    fn rect_area_outline_matches_size() {
        let light = Light::rect_area("panel", Color::WHITE, 6.0, 2.0, 1.0)
            .at(Vec3::new(-1.5, 0.0, 1.5));
        let lines = lines_for(&light, true);
        assert_eq!(lines.len(), 4);
        let perimeter: f32 = lines.iter().map(|l| (l.end - l.start).length()).sum();
        assert!((perimeter - 6.0).abs() < 1e-4);
    }

    #[test]
    fn size_scales_cone_and_rectangle_outlines() {
        let spot = Light::spot("spot", Color::WHITE, 1.0, 10.0, 0.3, 0.25, 1.0)
            .at(Vec3::new(0.0, 2.0, 3.0));
        let mut helper = LightHelper::new(LightId(0), HelperKind::Spot, 0.5);
        helper.visible = true;
        let base = spot.position + spot.direction() * 5.0;
        let lines = sized_lines(helper, &spot);
        for line in &lines[..CONE_SEGMENTS] {
            assert!(((line.start - base).length() - 5.0 * 0.3f32.tan()).abs() < 1e-3);
        }

        let panel = Light::rect_area("panel", Color::WHITE, 6.0, 2.0, 1.0)
            .at(Vec3::new(-1.5, 0.0, 1.5));
        let mut helper = LightHelper::new(LightId(0), HelperKind::RectArea, 0.5);
        helper.visible = true;
        let perimeter: f32 = sized_lines(helper, &panel)
            .iter()
            .map(|l| (l.end - l.start).length())
            .sum();
        assert!((perimeter - 3.0).abs() < 1e-4);
    }

    #[test]
    fn default_sizes_follow_the_kind() {
        let bulb = Light::point("bulb", Color::WHITE, 1.0, 0.0, 2.0);
        assert_eq!(LightHelper::for_light(LightId(2), &bulb).unwrap().size, 0.2);
        let panel = Light::rect_area("panel", Color::WHITE, 6.0, 2.0, 1.0);
        let helper = LightHelper::for_light(LightId(4), &panel).unwrap();
        assert_eq!((helper.kind, helper.size), (HelperKind::RectArea, 1.0));
        let ambient = Light::ambient("ambient", Color::WHITE, 1.0);
        assert!(LightHelper::for_light(LightId(0), &ambient).is_none());
    }
}
