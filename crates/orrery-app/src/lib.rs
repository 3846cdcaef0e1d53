//! Orrery viewer application.
//!
//! Window creation, event handling and the redraw loop, plus the platform
//! directories the viewer reads its config and textures from.

pub mod controls;
pub mod platform;
pub mod window;
