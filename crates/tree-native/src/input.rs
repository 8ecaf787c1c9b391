use tree_core::SimulatedHand;
use winit::dpi::PhysicalSize;
use winit::event::{ElementState, KeyEvent, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

// Spread change per wheel notch / per scrolled pixel
pub const SPREAD_PER_LINE: f32 = 0.02;
pub const SPREAD_PER_PIXEL: f32 = 0.0005;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputAction {
    None,
    Exit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyCommand {
    ToggleHand,
    Exit,
    Ignore,
}

/// Pointer position in window pixels -> normalised [0, 1] display coordinates.
/// A zero-sized window is treated as 1x1.
pub fn pointer_uv(x: f64, y: f64, size: PhysicalSize<u32>) -> (f32, f32) {
    let w = size.width.max(1) as f32;
    let h = size.height.max(1) as f32;
    (x as f32 / w, y as f32 / h)
}

/// Spread change for one wheel event; scrolling up opens the hand.
pub fn wheel_spread_delta(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => y * SPREAD_PER_LINE,
        MouseScrollDelta::PixelDelta(p) => p.y as f32 * SPREAD_PER_PIXEL,
    }
}

pub fn key_command(key: &Key) -> KeyCommand {
    match key {
        Key::Named(NamedKey::Escape) => KeyCommand::Exit,
        Key::Character(c) if c.as_str().eq_ignore_ascii_case("h") => KeyCommand::ToggleHand,
        _ => KeyCommand::Ignore,
    }
}

/// Feed pointer and keyboard input into the simulated hand.
///
/// - move: palm position (the hand appears where the pointer is)
/// - hold left button: clench into a fist
/// - wheel: open or close the hand gradually
/// - `h`: hide/show the hand, `Esc`: quit
pub fn apply_window_event(
    hand: &mut SimulatedHand,
    event: &WindowEvent,
    size: PhysicalSize<u32>,
) -> InputAction {
    match event {
        WindowEvent::CursorMoved { position, .. } => {
            let (u, v) = pointer_uv(position.x, position.y, size);
            hand.set_pointer(u, v);
        }
        WindowEvent::CursorLeft { .. } => hand.set_in_view(false),
        WindowEvent::MouseInput {
            state,
            button: MouseButton::Left,
            ..
        } => hand.set_clenched(*state == ElementState::Pressed),
        WindowEvent::MouseWheel { delta, .. } => hand.adjust_spread(wheel_spread_delta(delta)),
        WindowEvent::KeyboardInput {
            event:
                KeyEvent {
                    logical_key,
                    state: ElementState::Pressed,
                    repeat: false,
                    ..
                },
            ..
        } => match key_command(logical_key) {
            KeyCommand::Exit => return InputAction::Exit,
            KeyCommand::ToggleHand => {
                hand.toggle_hidden();
                log::info!(
                    "[input] simulated hand {}",
                    if hand.is_hidden() { "hidden" } else { "shown" }
                );
            }
            KeyCommand::Ignore => {}
        },
        _ => {}
    }
    InputAction::None
}
