use std::fmt;

use crate::device::SurfaceErrorAction;

/// Why a frame was not submitted.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PaintError {
    /// The device is gone. The frame is abandoned; the caller must create a
    /// new `Gpu` and recompile every drawable.
    DeviceLost,
    /// The surface could not provide a texture. Carries the action already
    /// taken by the device layer.
    Surface(SurfaceErrorAction),
}

impl PaintError {
    /// Whether the caller should stop rendering altogether.
    pub fn is_fatal(self) -> bool {
        matches!(
            self,
            PaintError::DeviceLost | PaintError::Surface(SurfaceErrorAction::Fatal)
        )
    }
}

impl fmt::Display for PaintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaintError::DeviceLost => write!(f, "graphics device lost"),
            PaintError::Surface(action) => write!(f, "surface unavailable ({action:?})"),
        }
    }
}

impl std::error::Error for PaintError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fatality() {
        assert!(PaintError::DeviceLost.is_fatal());
        assert!(PaintError::Surface(SurfaceErrorAction::Fatal).is_fatal());
        assert!(!PaintError::Surface(SurfaceErrorAction::SkipFrame).is_fatal());
        assert!(!PaintError::Surface(SurfaceErrorAction::Reconfigured).is_fatal());
    }
}
