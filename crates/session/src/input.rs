//! Raw input decoding for the render surface.

use camera::NormPos;

/// One wheel detent in raw platform units.
const WHEEL_DETENT: f64 = 120.0;

/// Render-surface bounding box in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceRect {
    pub width: f64,
    pub height: f64,
}

impl SurfaceRect {
    pub fn new(width: f64, height: f64) -> Self {
        // Zero-sized surfaces show up transiently during layout.
        Self {
            width: width.max(1.0),
            height: height.max(1.0),
        }
    }

    /// Map surface pixel coordinates into [0,1]² with the vertical axis
    /// flipped, so up-drags produce positive y deltas.
    pub fn normalize(&self, x_px: f64, y_px: f64) -> NormPos {
        NormPos::new(x_px / self.width, 1.0 - y_px / self.height)
    }
}

/// Quantize raw wheel units into discrete ticks: ±1 per detent, 0 inside the
/// dead zone.
pub fn quantize_wheel(raw: f64) -> i32 {
    if raw >= WHEEL_DETENT {
        1
    } else if raw <= -WHEEL_DETENT {
        -1
    } else {
        0
    }
}

/// Key event metadata as delivered by the surface, before the pointer
/// position is attached.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyInput {
    pub key_code: u32,
    pub which: u32,
    pub char_code: u32,
    pub ch: String,
    pub shift_key: bool,
    pub ctrl_key: bool,
    pub alt_key: bool,
    pub meta_key: bool,
}

#[cfg(test)]
mod tests {
    use super::{quantize_wheel, SurfaceRect};

    #[test]
    fn normalization_flips_vertical_axis() {
        let rect = SurfaceRect::new(800.0, 500.0);
        let top_left = rect.normalize(0.0, 0.0);
        assert_eq!((top_left.x, top_left.y), (0.0, 1.0));

        let bottom_right = rect.normalize(800.0, 500.0);
        assert_eq!((bottom_right.x, bottom_right.y), (1.0, 0.0));

        let center = rect.normalize(400.0, 250.0);
        assert_eq!((center.x, center.y), (0.5, 0.5));
    }

    #[test]
    fn degenerate_rect_is_clamped() {
        let rect = SurfaceRect::new(0.0, -3.0);
        assert_eq!(rect.width, 1.0);
        assert_eq!(rect.height, 1.0);
    }

    #[test]
    fn wheel_quantizes_to_signed_ticks() {
        assert_eq!(quantize_wheel(120.0), 1);
        assert_eq!(quantize_wheel(360.0), 1);
        assert_eq!(quantize_wheel(-120.0), -1);
        assert_eq!(quantize_wheel(119.0), 0);
        assert_eq!(quantize_wheel(-60.0), 0);
        assert_eq!(quantize_wheel(0.0), 0);
    }
}
