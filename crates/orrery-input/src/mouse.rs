//! Mouse tracker: held buttons, drag deltas and scroll clicks.
//!
//! [`MouseState`] follows the cursor continuously. While any button is
//! held, each `CursorMoved` yields a [`Drag`] with the pixel delta since the
//! previous event. Wheel input is accumulated and handed out as whole clicks.

use glam::Vec2;
use orrery_scene::ButtonMask;
use winit::event::{ElementState, MouseButton, MouseScrollDelta};

/// Pixel-precision scroll normalization: ~40 pixels ≈ 1 line.
const PIXELS_PER_LINE: f64 = 40.0;

/// Cursor movement with buttons held.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Drag {
    pub buttons: ButtonMask,
    pub dx: f32,
    pub dy: f32,
}

fn button_mask(button: MouseButton) -> Option<ButtonMask> {
    match button {
        MouseButton::Left => Some(ButtonMask::LEFT),
        MouseButton::Middle => Some(ButtonMask::MIDDLE),
        MouseButton::Right => Some(ButtonMask::RIGHT),
        _ => None,
    }
}

#[derive(Debug, Clone, Default)]
pub struct MouseState {
    position: Vec2,
    last: Vec2,
    buttons: ButtonMask,
    scroll: f32,
}

impl MouseState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a `CursorMoved` event. Returns the drag if any button is held.
    pub fn on_cursor_moved(&mut self, x: f64, y: f64) -> Option<Drag> {
        self.position = Vec2::new(x as f32, y as f32);
        let delta = self.position - self.last;
        self.last = self.position;

        (!self.buttons.is_empty()).then_some(Drag {
            buttons: self.buttons,
            dx: delta.x,
            dy: delta.y,
        })
    }

    /// Process a `MouseInput` event. Returns the button's mask, or `None`
    /// for buttons the viewer does not use.
    pub fn on_button(&mut self, button: MouseButton, state: ElementState) -> Option<ButtonMask> {
        let Some(mask) = button_mask(button) else {
            tracing::warn!("Unknown mouse button: {button:?}");
            return None;
        };
        match state {
            ElementState::Pressed => {
                self.buttons.insert(mask);
                self.last = self.position;
            }
            ElementState::Released => self.buttons.remove(mask),
        }
        tracing::debug!("Mouse {button:?} {state:?}, buttons = {}", self.buttons.bits());
        Some(mask)
    }

    /// Process a `MouseWheel` event. Returns the number of whole clicks
    /// completed (positive = away from the user).
    pub fn on_scroll(&mut self, delta: MouseScrollDelta) -> i32 {
        self.scroll += match delta {
            MouseScrollDelta::LineDelta(_x, y) => y,
            MouseScrollDelta::PixelDelta(pos) => (pos.y / PIXELS_PER_LINE) as f32,
        };
        let clicks = self.scroll.trunc();
        self.scroll -= clicks;
        clicks as i32
    }

    /// Forget held buttons, e.g. after a view reset or focus loss.
    pub fn clear_buttons(&mut self) {
        self.buttons = ButtonMask::NONE;
    }

    #[must_use]
    pub fn buttons(&self) -> ButtonMask {
        self.buttons
    }

    /// Current cursor position in physical pixels.
    #[must_use]
    pub fn position(&self) -> Vec2 {
        self.position
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn test_motion_without_buttons_is_not_a_drag() {
        let mut mouse = MouseState::new();
        assert_eq!(mouse.on_cursor_moved(10.0, 20.0), None);
        assert_eq!(mouse.position(), Vec2::new(10.0, 20.0));
    }

    #[test]
    fn test_left_drag_reports_delta() {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(100.0, 100.0);
        assert_eq!(
            mouse.on_button(MouseButton::Left, ElementState::Pressed),
            Some(ButtonMask::LEFT)
        );
        let drag = mouse.on_cursor_moved(110.0, 95.0).unwrap();
        assert_eq!(drag.buttons, ButtonMask::LEFT);
        assert_eq!((drag.dx, drag.dy), (10.0, -5.0));

        let drag = mouse.on_cursor_moved(111.0, 95.0).unwrap();
        assert_eq!((drag.dx, drag.dy), (1.0, 0.0));
    }

    #[test]
    fn test_release_ends_drag() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Middle, ElementState::Pressed);
        mouse.on_cursor_moved(5.0, 5.0);
        mouse.on_button(MouseButton::Middle, ElementState::Released);
        assert!(mouse.buttons().is_empty());
        assert_eq!(mouse.on_cursor_moved(50.0, 50.0), None);
    }

    #[test]
    fn test_buttons_combine() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        mouse.on_button(MouseButton::Middle, ElementState::Pressed);
        assert_eq!(mouse.buttons().bits(), 6);
        mouse.on_button(MouseButton::Left, ElementState::Released);
        assert_eq!(mouse.buttons(), ButtonMask::MIDDLE);
    }

    #[test]
    fn test_unknown_button_ignored() {
        let mut mouse = MouseState::new();
        assert_eq!(mouse.on_button(MouseButton::Back, ElementState::Pressed), None);
        assert!(mouse.buttons().is_empty());
    }

    #[test]
    fn test_scroll_lines_and_pixels() {
        let mut mouse = MouseState::new();
        assert_eq!(mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 2.0)), 2);
        assert_eq!(mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, -1.0)), -1);
        let half = MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, 20.0));
        assert_eq!(mouse.on_scroll(half), 0);
        assert_eq!(mouse.on_scroll(half), 1);
    }

    #[test]
    fn test_clear_buttons() {
        let mut mouse = MouseState::new();
        mouse.on_button(MouseButton::Right, ElementState::Pressed);
        mouse.clear_buttons();
        assert!(mouse.buttons().is_empty());
    }
}
