use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use winit::event::{
    DeviceEvent as WinitDeviceEvent, DeviceId, ElementState, Ime, MouseButton as WinitMouseButton,
    MouseScrollDelta, StartCause as WinitStartCause, TouchPhase as WinitTouchPhase,
    WindowEvent as WinitWindowEvent,
};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};

use crate::event::{DeviceEvent, StartCause, Theme, WindowEvent};
use crate::input::{
    InputEvent, InputState, Key, KeyInput, KeyState, Modifiers, MouseButton, MouseButtonState,
    MouseWheelDelta, PointerButton, Touch, TouchPhase,
};

/// Translates a winit window event.
///
/// `state` is updated with the translated input so later events can carry the current
/// modifiers and pointer position. Returns `None` for events that have no counterpart
/// (including `RedrawRequested`, which the runtime routes through the redraw signal).
pub fn translate_window_event(
    state: &mut InputState,
    event: &WinitWindowEvent,
) -> Option<WindowEvent> {
    let translated = match event {
        WinitWindowEvent::CloseRequested => WindowEvent::CloseRequested,
        WinitWindowEvent::Destroyed => WindowEvent::Destroyed,
        WinitWindowEvent::Resized(size) => WindowEvent::Resized(*size),
        WinitWindowEvent::Moved(pos) => WindowEvent::Moved(*pos),
        WinitWindowEvent::Focused(focused) => {
            if !focused {
                state.release_all();
            }
            WindowEvent::Focused(*focused)
        }
        WinitWindowEvent::Occluded(occluded) => WindowEvent::Occluded(*occluded),
        WinitWindowEvent::ScaleFactorChanged { scale_factor, .. } => {
            WindowEvent::ScaleFactorChanged {
                scale_factor: *scale_factor,
            }
        }
        WinitWindowEvent::ThemeChanged(theme) => WindowEvent::ThemeChanged(match theme {
            winit::window::Theme::Light => Theme::Light,
            winit::window::Theme::Dark => Theme::Dark,
        }),
        WinitWindowEvent::DroppedFile(path) => WindowEvent::DroppedFile(path.clone()),
        WinitWindowEvent::HoveredFile(path) => WindowEvent::HoveredFile(path.clone()),
        WinitWindowEvent::HoveredFileCancelled => WindowEvent::HoveredFileCancelled,
        WinitWindowEvent::CursorEntered { .. } => WindowEvent::CursorEntered,

        other => WindowEvent::Input(translate_input(state, other)?),
    };

    if let WindowEvent::Input(input) = &translated {
        state.apply(input);
    }
    Some(translated)
}

fn translate_input(state: &InputState, event: &WinitWindowEvent) -> Option<InputEvent> {
    match event {
        WinitWindowEvent::ModifiersChanged(m) => {
            Some(InputEvent::ModifiersChanged(map_modifiers(m.state())))
        }

        WinitWindowEvent::CursorMoved { position, .. } => Some(InputEvent::PointerMoved {
            position: *position,
        }),

        WinitWindowEvent::CursorLeft { .. } => Some(InputEvent::PointerLeft),

        WinitWindowEvent::MouseInput { state: st, button, .. } => {
            Some(InputEvent::PointerButton(PointerButton {
                button: map_mouse_button(*button),
                state: match st {
                    ElementState::Pressed => MouseButtonState::Pressed,
                    ElementState::Released => MouseButtonState::Released,
                },
                position: state.pointer_pos,
                modifiers: state.modifiers,
            }))
        }

        WinitWindowEvent::MouseWheel { delta, phase, .. } => Some(InputEvent::MouseWheel {
            delta: map_scroll_delta(*delta),
            phase: map_touch_phase(*phase),
            modifiers: state.modifiers,
        }),

        WinitWindowEvent::KeyboardInput { event, .. } => {
            let (key, code) = map_key(event.physical_key);
            Some(InputEvent::Key(KeyInput {
                key,
                code,
                state: map_element_state(event.state),
                repeat: event.repeat,
                modifiers: state.modifiers,
                text: event.text.as_ref().map(|t| t.to_string()),
            }))
        }

        WinitWindowEvent::Ime(Ime::Commit(text)) if !text.is_empty() => {
            Some(InputEvent::Text(text.clone()))
        }

        WinitWindowEvent::Touch(touch) => Some(InputEvent::Touch(Touch {
            id: touch.id,
            phase: map_touch_phase(touch.phase),
            position: touch.location,
        })),

        _ => None,
    }
}

/// Translates a raw device event.
pub fn translate_device_event(event: &WinitDeviceEvent) -> Option<DeviceEvent> {
    let translated = match event {
        WinitDeviceEvent::Added => DeviceEvent::Added,
        WinitDeviceEvent::Removed => DeviceEvent::Removed,
        WinitDeviceEvent::MouseMotion { delta: (dx, dy) } => DeviceEvent::MouseMotion {
            dx: *dx,
            dy: *dy,
        },
        WinitDeviceEvent::MouseWheel { delta } => DeviceEvent::MouseWheel(map_scroll_delta(*delta)),
        WinitDeviceEvent::Motion { axis, value } => DeviceEvent::Motion {
            axis: *axis,
            value: *value,
        },
        WinitDeviceEvent::Button { button, state } => DeviceEvent::Button {
            button: *button,
            state: match state {
                ElementState::Pressed => MouseButtonState::Pressed,
                ElementState::Released => MouseButtonState::Released,
            },
        },
        WinitDeviceEvent::Key(raw) => DeviceEvent::Key {
            code: map_key(raw.physical_key).1,
            state: map_element_state(raw.state),
        },
    };
    Some(translated)
}

pub fn translate_start_cause(cause: WinitStartCause) -> StartCause {
    match cause {
        WinitStartCause::Init => StartCause::Init,
        WinitStartCause::Poll => StartCause::Poll,
        WinitStartCause::ResumeTimeReached { .. } => StartCause::ResumeTimeReached,
        WinitStartCause::WaitCancelled { .. } => StartCause::WaitCancelled,
    }
}

/// Stable numeric id for a winit device within this process.
pub fn device_id_hash(id: DeviceId) -> u64 {
    let mut hasher = DefaultHasher::new();
    id.hash(&mut hasher);
    hasher.finish()
}

fn map_element_state(state: ElementState) -> KeyState {
    match state {
        ElementState::Pressed => KeyState::Pressed,
        ElementState::Released => KeyState::Released,
    }
}

fn map_scroll_delta(delta: MouseScrollDelta) -> MouseWheelDelta {
    match delta {
        MouseScrollDelta::LineDelta(x, y) => MouseWheelDelta::Line { x, y },
        MouseScrollDelta::PixelDelta(p) => MouseWheelDelta::Pixel { x: p.x, y: p.y },
    }
}

fn map_touch_phase(phase: WinitTouchPhase) -> TouchPhase {
    match phase {
        WinitTouchPhase::Started => TouchPhase::Started,
        WinitTouchPhase::Moved => TouchPhase::Moved,
        WinitTouchPhase::Ended => TouchPhase::Ended,
        WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

fn map_modifiers(m: ModifiersState) -> Modifiers {
    Modifiers {
        shift: m.shift_key(),
        ctrl: m.control_key(),
        alt: m.alt_key(),
        meta: m.super_key(),
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

fn map_key(pk: PhysicalKey) -> (Key, u32) {
    let PhysicalKey::Code(code) = pk else {
        return (Key::Unknown(0), 0);
    };

    let key = match code {
        KeyCode::Escape => Key::Escape,
        KeyCode::Enter | KeyCode::NumpadEnter => Key::Enter,
        KeyCode::Tab => Key::Tab,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Space => Key::Space,

        KeyCode::Insert => Key::Insert,
        KeyCode::Delete => Key::Delete,
        KeyCode::Home => Key::Home,
        KeyCode::End => Key::End,
        KeyCode::PageUp => Key::PageUp,
        KeyCode::PageDown => Key::PageDown,

        KeyCode::ArrowUp => Key::ArrowUp,
        KeyCode::ArrowDown => Key::ArrowDown,
        KeyCode::ArrowLeft => Key::ArrowLeft,
        KeyCode::ArrowRight => Key::ArrowRight,

        KeyCode::ShiftLeft | KeyCode::ShiftRight => Key::Shift,
        KeyCode::ControlLeft | KeyCode::ControlRight => Key::Control,
        KeyCode::AltLeft | KeyCode::AltRight => Key::Alt,
        KeyCode::SuperLeft | KeyCode::SuperRight => Key::Meta,

        KeyCode::KeyA => Key::A,
        KeyCode::KeyB => Key::B,
        KeyCode::KeyC => Key::C,
        KeyCode::KeyD => Key::D,
        KeyCode::KeyE => Key::E,
        KeyCode::KeyF => Key::F,
        KeyCode::KeyG => Key::G,
        KeyCode::KeyH => Key::H,
        KeyCode::KeyI => Key::I,
        KeyCode::KeyJ => Key::J,
        KeyCode::KeyK => Key::K,
        KeyCode::KeyL => Key::L,
        KeyCode::KeyM => Key::M,
        KeyCode::KeyN => Key::N,
        KeyCode::KeyO => Key::O,
        KeyCode::KeyP => Key::P,
        KeyCode::KeyQ => Key::Q,
        KeyCode::KeyR => Key::R,
        KeyCode::KeyS => Key::S,
        KeyCode::KeyT => Key::T,
        KeyCode::KeyU => Key::U,
        KeyCode::KeyV => Key::V,
        KeyCode::KeyW => Key::W,
        KeyCode::KeyX => Key::X,
        KeyCode::KeyY => Key::Y,
        KeyCode::KeyZ => Key::Z,

        KeyCode::Digit0 => Key::Digit0,
        KeyCode::Digit1 => Key::Digit1,
        KeyCode::Digit2 => Key::Digit2,
        KeyCode::Digit3 => Key::Digit3,
        KeyCode::Digit4 => Key::Digit4,
        KeyCode::Digit5 => Key::Digit5,
        KeyCode::Digit6 => Key::Digit6,
        KeyCode::Digit7 => Key::Digit7,
        KeyCode::Digit8 => Key::Digit8,
        KeyCode::Digit9 => Key::Digit9,

        KeyCode::F1 => Key::F1,
        KeyCode::F2 => Key::F2,
        KeyCode::F3 => Key::F3,
        KeyCode::F4 => Key::F4,
        KeyCode::F5 => Key::F5,
        KeyCode::F6 => Key::F6,
        KeyCode::F7 => Key::F7,
        KeyCode::F8 => Key::F8,
        KeyCode::F9 => Key::F9,
        KeyCode::F10 => Key::F10,
        KeyCode::F11 => Key::F11,
        KeyCode::F12 => Key::F12,

        other => Key::Unknown(other as u32),
    };

    (key, code as u32)
}
