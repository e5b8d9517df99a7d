use crate::input::PointerKind;

/// Hit-testing tolerances, in physical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HitConfig {
    /// Multiplier from projected units to pixels (the window scale factor).
    pub pixel_scale: f32,
    /// Slop added to every region for mouse and pen input.
    pub mouse_tolerance: f32,
    /// Slop added to every region for touch input.
    pub touch_tolerance: f32,
}

impl Default for HitConfig {
    fn default() -> Self {
        Self {
            pixel_scale: 1.0,
            mouse_tolerance: 4.0,
            touch_tolerance: 16.0,
        }
    }
}

impl HitConfig {
    #[inline]
    pub fn tolerance(&self, kind: PointerKind) -> f32 {
        match kind {
            PointerKind::Touch => self.touch_tolerance,
            PointerKind::Mouse | PointerKind::Pen => self.mouse_tolerance,
        }
    }
}
