use serde::{Deserialize, Serialize};

/// Upper bound applied to the device pixel ratio when sizing the drawing buffer.
pub const DEFAULT_MAX_PIXEL_RATIO: f64 = 2.0;

/// Logical size of the drawing area plus the host's device pixel ratio.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
    pub device_pixel_ratio: f64,
    pub max_pixel_ratio: f64,
}

impl Viewport {
    pub fn new(width: u32, height: u32, device_pixel_ratio: f64) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            device_pixel_ratio,
            max_pixel_ratio: DEFAULT_MAX_PIXEL_RATIO,
        }
    }

    pub fn with_max_pixel_ratio(mut self, max: f64) -> Self {
        self.max_pixel_ratio = max;
        self
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Device pixel ratio clamped to `max_pixel_ratio`.
    pub fn pixel_ratio(&self) -> f64 {
        let ratio = if self.device_pixel_ratio > 0.0 {
            self.device_pixel_ratio
        } else {
            1.0
        };
        ratio.min(self.max_pixel_ratio)
    }

    /// Stores a new size. Zero-area sizes are rejected and leave the viewport
    /// untouched; returns whether the size was accepted.
    pub fn update(&mut self, width: u32, height: u32, device_pixel_ratio: f64) -> bool {
        if width == 0 || height == 0 {
            return false;
        }
        self.width = width;
        self.height = height;
        self.device_pixel_ratio = device_pixel_ratio;
        true
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 720, 1.0)
    }
}

pub fn physical_size(width: u32, height: u32, pixel_ratio: f64) -> (u32, u32) {
    let scale = |value: u32| ((value as f64 * pixel_ratio).round() as u32).max(1);
    (scale(width), scale(height))
}

/// Pixel size of a window's surface and the pixels per logical point it is
/// drawn at.
///
/// A canvas backbuffer may differ from its CSS size, so the web draws at the
/// capped ratio. Native swapchains must match the window's physical size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceExtent {
    pub width: u32,
    pub height: u32,
    pub pixels_per_point: f64,
}

impl SurfaceExtent {
    pub fn capped(logical: (u32, u32), pixel_ratio: f64) -> Self {
        let (width, height) = physical_size(logical.0, logical.1, pixel_ratio);
        Self {
            width,
            height,
            pixels_per_point: pixel_ratio,
        }
    }

    pub fn window(physical: (u32, u32), scale_factor: f64) -> Self {
        Self {
            width: physical.0.max(1),
            height: physical.1.max(1),
            pixels_per_point: scale_factor,
        }
    }

    /// Picks the capped canvas extent on the web and the window's own extent
    /// elsewhere.
    pub fn for_target(
        logical: (u32, u32),
        pixel_ratio: f64,
        physical: (u32, u32),
        scale_factor: f64,
    ) -> Self {
        if cfg!(target_arch = "wasm32") {
            Self::capped(logical, pixel_ratio)
        } else {
            Self::window(physical, scale_factor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(Viewport::new(800, 600, 3.0).pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(800, 600, 1.5).pixel_ratio(), 1.5);
        assert_eq!(Viewport::new(800, 600, 0.0).pixel_ratio(), 1.0);
    }

    #[test]
    fn capped_extent_uses_the_capped_ratio() {
        let viewport = Viewport::new(640, 480, 3.0);
        let extent = SurfaceExtent::capped((640, 480), viewport.pixel_ratio());
        assert_eq!((extent.width, extent.height), (1280, 960));
        assert_eq!(extent.pixels_per_point, 2.0);
    }

    #[test]
    fn window_extent_matches_the_physical_window() {
        let extent = SurfaceExtent::window((1920, 1080), 3.0);
        assert_eq!((extent.width, extent.height), (1920, 1080));
        assert_eq!(extent.pixels_per_point, 3.0);
        assert_eq!(SurfaceExtent::window((0, 0), 1.0).width, 1);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn native_surfaces_ignore_the_ratio_cap() {
        let extent = SurfaceExtent::for_target((640, 360), 2.0, (1920, 1080), 3.0);
        assert_eq!(extent, SurfaceExtent::window((1920, 1080), 3.0));
    }

    #[test]
    fn zero_height_update_is_rejected() {
        let mut viewport = Viewport::new(800, 600, 1.0);
        assert!(!viewport.update(800, 0, 1.0));
        assert_eq!((viewport.width, viewport.height), (800, 600));
        assert!(viewport.update(1024, 512, 2.0));
        assert_eq!(viewport.aspect(), 2.0);
    }
}
