use ::winit::event::{
    ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, Touch, TouchPhase, WindowEvent,
};

use crate::input::{
    InputEvent, InputState, MouseButton, MouseWheelDelta, PointerEvent, PointerKind, PointerPhase,
};

/// Translates a winit `WindowEvent` into an engine `InputEvent`.
///
/// Positions stay in physical pixels. Returns `None` for events not
/// represented by the input subsystem.
pub fn translate_window_event(state: &InputState, event: &WindowEvent) -> Option<InputEvent> {
    match event {
        WindowEvent::Focused(f) => Some(InputEvent::Focused(*f)),

        WindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WindowEvent::CursorMoved { position, .. } => Some(InputEvent::Pointer(PointerEvent::new(
            PointerPhase::Move,
            position.x as f32,
            position.y as f32,
        ))),

        WindowEvent::MouseInput {
            state: st, button, ..
        } => {
            let phase = match st {
                ElementState::Pressed => PointerPhase::Down,
                ElementState::Released => PointerPhase::Up,
            };

            // winit does not report a position with button events.
            let (x, y) = state.pointer_pos?;

            Some(InputEvent::Pointer(PointerEvent {
                button: map_mouse_button(*button),
                ..PointerEvent::new(phase, x, y)
            }))
        }

        WindowEvent::Touch(Touch {
            phase, location, ..
        }) => {
            let phase = match phase {
                TouchPhase::Started => PointerPhase::Down,
                TouchPhase::Moved => PointerPhase::Move,
                TouchPhase::Ended | TouchPhase::Cancelled => PointerPhase::Up,
            };
            Some(InputEvent::Pointer(
                PointerEvent::new(phase, location.x as f32, location.y as f32)
                    .with_kind(PointerKind::Touch),
            ))
        }

        WindowEvent::MouseWheel { delta, .. } => {
            let delta = match delta {
                MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x: *x, y: *y },
                MouseScrollDelta::PixelDelta(p) => MouseWheelDelta::Pixel {
                    x: p.x as f32,
                    y: p.y as f32,
                },
            };
            Some(InputEvent::MouseWheel(delta))
        }

        _ => None,
    }
}

fn map_mouse_button(b: WinitMouseButton) -> MouseButton {
    match b {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Right => MouseButton::Right,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Back => MouseButton::Back,
        WinitMouseButton::Forward => MouseButton::Forward,
        WinitMouseButton::Other(v) => MouseButton::Other(v),
    }
}

#[cfg(test)]
mod tests {
    use ::winit::dpi::PhysicalPosition;
    use ::winit::event::DeviceId;

    use super::*;

    #[test]
    fn button_events_use_tracked_position() {
        let mut state = InputState::default();
        let press = WindowEvent::MouseInput {
            device_id: DeviceId::dummy(),
            state: ElementState::Pressed,
            button: WinitMouseButton::Left,
        };
        assert_eq!(translate_window_event(&state, &press), None);

        state.pointer_pos = Some((12.0, 34.0));
        assert_eq!(
            translate_window_event(&state, &press),
            Some(InputEvent::Pointer(PointerEvent::new(PointerPhase::Down, 12.0, 34.0)))
        );
    }

    #[test]
    fn touches_map_to_pointer_phases() {
        let touch = |phase| {
            WindowEvent::Touch(Touch {
                device_id: DeviceId::dummy(),
                phase,
                location: PhysicalPosition::new(5.0, 6.0),
                force: None,
                id: 0,
            })
        };
        let state = InputState::default();
        let cancelled = touch(TouchPhase::Cancelled);
        let Some(InputEvent::Pointer(p)) = translate_window_event(&state, &cancelled) else {
            panic!("expected pointer event");
        };
        assert_eq!(p.phase, PointerPhase::Up);
        assert_eq!(p.kind, PointerKind::Touch);
        assert_eq!((p.x, p.y), (5.0, 6.0));
    }
}
