// Host-side tests for the pointer -> simulated hand mapping.
// The native front-end is a binary, so we include its pure input module directly.

#![allow(dead_code)]
mod input {
    include!("../src/input.rs");
}

use input::*;
use tree_core::{landmarks, SimulatedHand, SIM_FIST_SPREAD, SIM_OPEN_SPREAD};
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{DeviceId, ElementState, MouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{Key, NamedKey};

fn window() -> PhysicalSize<u32> {
    PhysicalSize::new(800, 600)
}

fn device() -> DeviceId {
    // SAFETY: only used to build synthetic events, never passed to the platform
    unsafe { DeviceId::dummy() }
}

fn cursor_at(x: f64, y: f64) -> WindowEvent {
    WindowEvent::CursorMoved {
        device_id: device(),
        position: PhysicalPosition::new(x, y),
    }
}

fn left_button(state: ElementState) -> WindowEvent {
    WindowEvent::MouseInput {
        device_id: device(),
        state,
        button: MouseButton::Left,
    }
}

#[test]
fn pointer_is_normalised_by_window_size() {
    assert_eq!(pointer_uv(400.0, 150.0, window()), (0.5, 0.25));
    assert_eq!(pointer_uv(0.0, 600.0, window()), (0.0, 1.0));
}

#[test]
fn zero_sized_window_does_not_divide_by_zero() {
    let (u, v) = pointer_uv(3.0, 2.0, PhysicalSize::new(0, 0));
    assert!(u.is_finite() && v.is_finite());
    assert_eq!((u, v), (3.0, 2.0));
}

#[test]
fn wheel_notches_and_pixels_change_spread() {
    let notch = wheel_spread_delta(&MouseScrollDelta::LineDelta(0.0, 1.0));
    assert!((notch - 0.02).abs() < 1e-6);
    let down = wheel_spread_delta(&MouseScrollDelta::LineDelta(0.0, -3.0));
    assert!((down + 0.06).abs() < 1e-6);
    // 40 px of trackpad scroll is one notch
    let pixels = wheel_spread_delta(&MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 40.0)));
    assert!((pixels - notch).abs() < 1e-6);
    let sideways = wheel_spread_delta(&MouseScrollDelta::LineDelta(5.0, 0.0));
    assert_eq!(sideways, 0.0);
}

#[test]
fn keys_map_to_commands() {
    assert_eq!(key_command(&Key::Named(NamedKey::Escape)), KeyCommand::Exit);
    assert_eq!(key_command(&Key::Character("h".into())), KeyCommand::ToggleHand);
    assert_eq!(key_command(&Key::Character("H".into())), KeyCommand::ToggleHand);
    assert_eq!(key_command(&Key::Character("j".into())), KeyCommand::Ignore);
    assert_eq!(key_command(&Key::Named(NamedKey::Enter)), KeyCommand::Ignore);
}

#[test]
fn cursor_places_the_mirrored_palm() {
    let mut hand = SimulatedHand::default();
    assert!(!hand.is_present());
    let action = apply_window_event(&mut hand, &cursor_at(200.0, 300.0), window());
    assert_eq!(action, InputAction::None);
    assert!(hand.is_present());
    let pose = hand.pose().unwrap();
    let palm = pose.landmark(landmarks::MIDDLE_FINGER_MCP).unwrap();
    assert!((palm.x - 0.75).abs() < 1e-6, "display u=0.25 mirrors to 0.75");

    apply_window_event(&mut hand, &WindowEvent::CursorLeft { device_id: device() }, window());
    assert!(hand.pose().is_none());
}

#[test]
fn holding_the_left_button_clenches() {
    let mut hand = SimulatedHand::default();
    apply_window_event(&mut hand, &cursor_at(400.0, 300.0), window());
    apply_window_event(&mut hand, &left_button(ElementState::Pressed), window());
    assert_eq!(hand.effective_spread(), SIM_FIST_SPREAD);
    apply_window_event(&mut hand, &left_button(ElementState::Released), window());
    assert_eq!(hand.effective_spread(), SIM_OPEN_SPREAD);
}

#[test]
fn wheel_event_adjusts_the_hand() {
    let mut hand = SimulatedHand::default();
    let wheel = WindowEvent::MouseWheel {
        device_id: device(),
        delta: MouseScrollDelta::LineDelta(0.0, -5.0),
        phase: winit::event::TouchPhase::Moved,
    };
    apply_window_event(&mut hand, &wheel, window());
    assert!((hand.effective_spread() - (SIM_OPEN_SPREAD - 0.1)).abs() < 1e-6);
}

#[test]
fn hide_survives_pointer_motion() {
    let mut hand = SimulatedHand::default();
    apply_window_event(&mut hand, &cursor_at(100.0, 100.0), window());
    hand.toggle_hidden();
    apply_window_event(&mut hand, &cursor_at(120.0, 90.0), window());
    assert!(hand.is_hidden());
    assert!(hand.pose().is_none());
}
