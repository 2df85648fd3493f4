use super::Vec2;

/// Viewport size in logical pixels.
///
/// Renderers treat this as the coordinate basis for converting logical-pixel
/// positions to NDC in shaders. It is uploaded per frame, so a resized window
/// simply reissues the constant.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    #[inline]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn is_valid(self) -> bool {
        self.width > 0.0 && self.height > 0.0 && self.width.is_finite() && self.height.is_finite()
    }

    /// CPU mirror of the vertex-shader transform.
    ///
    /// Maps a logical-pixel position to NDC: the viewport center goes to the
    /// NDC origin, and the Y axis flips (+Y down in pixels, +Y up in NDC).
    #[inline]
    pub fn to_ndc(self, p: Vec2) -> Vec2 {
        let half_w = self.width * 0.5;
        let half_h = self.height * 0.5;
        Vec2::new((p.x - half_w) / half_w, (p.y - half_h) / -half_h)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_ndc_origin() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(Vec2::new(400.0, 300.0)), Vec2::new(0.0, 0.0));
    }

    #[test]
    fn top_left_maps_to_upper_left_ndc() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(Vec2::zero()), Vec2::new(-1.0, 1.0));
    }

    #[test]
    fn bottom_right_maps_to_lower_right_ndc() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_ndc(Vec2::new(800.0, 600.0)), Vec2::new(1.0, -1.0));
    }

    #[test]
    fn transform_is_linear_between_fixed_points() {
        let vp = Viewport::new(800.0, 600.0);
        // Quarter of the way across in pixels is quarter of the way in NDC.
        let ndc = vp.to_ndc(Vec2::new(200.0, 150.0));
        assert_eq!(ndc, Vec2::new(-0.5, 0.5));
    }
}
