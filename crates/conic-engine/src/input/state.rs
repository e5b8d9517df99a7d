use super::types::{InputEvent, MouseButton, PointerEvent, PointerKind, PointerPhase};

/// Maximum travel, in pixels, between press and release for a click.
const CLICK_SLOP: f32 = 4.0;

/// Current pointer state for a single window.
///
/// Platform layers report button transitions without coordinates; this keeps
/// the last known position so button events can be completed, and remembers
/// the press origin to decide whether a release is also a click.
#[derive(Debug, Default)]
pub struct InputState {
    /// Whether the window is focused.
    pub focused: bool,

    /// Pointer position in physical pixels.
    pub pointer_pos: Option<(f32, f32)>,

    /// Device kind of the most recent pointer event.
    pub pointer_kind: PointerKind,

    /// Button currently held and where it went down.
    pressed: Option<(MouseButton, f32, f32)>,
}

impl InputState {
    /// Applies an event and returns the events to route, in order.
    ///
    /// A release that stays within [`CLICK_SLOP`] of its press is followed by a
    /// synthesized `Click`.
    pub fn apply_event(&mut self, ev: InputEvent) -> Vec<InputEvent> {
        match &ev {
            InputEvent::Focused(f) => {
                self.focused = *f;
                if !*f {
                    // Drop the held button so a release outside the window
                    // does not leave it stuck.
                    self.pressed = None;
                }
            }

            InputEvent::PointerLeft => {
                self.pointer_pos = None;
            }

            InputEvent::Pointer(p) => {
                self.pointer_pos = Some((p.x, p.y));
                self.pointer_kind = p.kind;

                match p.phase {
                    PointerPhase::Down => {
                        self.pressed = Some((p.button, p.x, p.y));
                    }
                    PointerPhase::Up => {
                        let origin = self.pressed.take();
                        if let Some((button, x0, y0)) = origin {
                            let travel = (p.x - x0).hypot(p.y - y0);
                            if button == p.button && travel <= CLICK_SLOP {
                                let click = PointerEvent {
                                    phase: PointerPhase::Click,
                                    ..*p
                                };
                                return vec![ev.clone(), InputEvent::Pointer(click)];
                            }
                        }
                    }
                    PointerPhase::Move | PointerPhase::Click => {}
                }
            }

            InputEvent::MouseWheel(_) => {}
        }

        vec![ev]
    }

    /// Whether a button is currently held.
    pub fn is_pressed(&self) -> bool {
        self.pressed.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pointer(phase: PointerPhase, x: f32, y: f32) -> InputEvent {
        InputEvent::Pointer(PointerEvent::new(phase, x, y))
    }

    #[test]
    fn short_press_synthesizes_click() {
        let mut state = InputState::default();
        state.apply_event(pointer(PointerPhase::Down, 10.0, 10.0));
        let out = state.apply_event(pointer(PointerPhase::Up, 11.0, 12.0));
        assert_eq!(out.len(), 2);
        assert!(matches!(
            out[1],
            InputEvent::Pointer(PointerEvent { phase: PointerPhase::Click, .. })
        ));
        assert!(!state.is_pressed());
    }

    #[test]
    fn drag_release_is_not_a_click() {
        let mut state = InputState::default();
        state.apply_event(pointer(PointerPhase::Down, 10.0, 10.0));
        state.apply_event(pointer(PointerPhase::Move, 60.0, 10.0));
        let out = state.apply_event(pointer(PointerPhase::Up, 60.0, 10.0));
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn focus_loss_clears_held_button() {
        let mut state = InputState::default();
        state.apply_event(pointer(PointerPhase::Down, 0.0, 0.0));
        state.apply_event(InputEvent::Focused(false));
        assert!(!state.is_pressed());
        assert_eq!(state.apply_event(pointer(PointerPhase::Up, 0.0, 0.0)).len(), 1);
    }
}
