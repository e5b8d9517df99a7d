/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

/// Device that produced a pointer event.
///
/// Touch input gets a wider hit tolerance than mouse or pen.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Default)]
pub enum PointerKind {
    #[default]
    Mouse,
    Pen,
    Touch,
}

/// Pointer lifecycle phase.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PointerPhase {
    /// Button pressed or finger down.
    Down,
    /// Pointer moved (with or without a button held).
    Move,
    /// Button released or finger lifted.
    Up,
    /// Press and release without significant travel. Emitted after `Up`.
    Click,
}

/// Pointer event in physical pixels, top-left origin, +Y down.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub kind: PointerKind,
    pub button: MouseButton,
    pub x: f32,
    pub y: f32,
}

impl PointerEvent {
    #[inline]
    pub fn new(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            kind: PointerKind::Mouse,
            button: MouseButton::Left,
            x,
            y,
        }
    }

    #[inline]
    pub fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

impl MouseWheelDelta {
    /// Vertical travel normalized to lines (pixel deltas use 40px per line).
    pub fn lines_y(self) -> f32 {
        match self {
            MouseWheelDelta::Line { y, .. } => y,
            MouseWheelDelta::Pixel { y, .. } => y / 40.0,
        }
    }
}

/// Platform-agnostic input events emitted by the runtime.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Pointer(PointerEvent),
    MouseWheel(MouseWheelDelta),
    /// Pointer left the window surface.
    PointerLeft,
    /// Window focus change.
    Focused(bool),
}
