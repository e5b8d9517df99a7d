use super::Vec2;

/// Drawable surface size in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1.0, 1.0)
    }
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

    /// Width over height; `1.0` for degenerate sizes.
    #[inline]
    pub fn ratio(self) -> f32 {
        if self.is_valid() { self.width / self.height } else { 1.0 }
    }

    /// Converts a top-left-origin, +Y-down pixel position into centered
    /// screen space (+Y up).
    #[inline]
    pub fn to_centered(self, x: f32, y: f32) -> Vec2 {
        Vec2::new(x - self.width * 0.5, self.height * 0.5 - y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_maps_to_origin() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_centered(400.0, 300.0), Vec2::zero());
    }

    #[test]
    fn top_left_is_up_and_left() {
        let vp = Viewport::new(800.0, 600.0);
        assert_eq!(vp.to_centered(0.0, 0.0), Vec2::new(-400.0, 300.0));
    }

    #[test]
    fn degenerate_ratio_is_one() {
        assert_eq!(Viewport::new(0.0, 10.0).ratio(), 1.0);
    }
}
