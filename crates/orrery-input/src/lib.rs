//! Translation of winit mouse and keyboard events into viewer input.

pub mod keyboard;
pub mod mouse;

pub use keyboard::{BACKSPACE, KeyboardState, RawKeyEvent};
pub use mouse::{Drag, MouseState};
