//! Scene model for the orrery viewer.
//!
//! Everything here is plain data and pure functions: the animation clock,
//! the body table, camera and toggle state, the input action table, the
//! context menu and the per-frame composer. Drawing is delegated to a
//! [`RenderBackend`] implementation so the whole frame can be checked
//! without a GPU.

pub mod action;
pub mod body;
pub mod camera;
pub mod clock;
pub mod frame;
pub mod math;
pub mod menu;
pub mod toggles;
pub mod viewport;

#[cfg(test)]
mod recording;

pub use action::{Action, ActionTable, BindingError, ESCAPE, Flow, MenuId, ViewerState};
pub use body::{Body, BodyParams, BodyRecord, BodyResources, BodyTable, OrbitalTransform};
pub use camera::{ButtonMask, CameraState, CameraTuning, ScrollDirection};
pub use clock::{AnimationClock, MS_PER_CYCLE, phase};
pub use frame::{
    DEPTH_CUE, Fog, FrameSetup, LineStyle, Material, RenderBackend, Scene, TextureBinding,
    compose_frame,
};
pub use menu::{ContextMenu, MenuItem, MenuNavigator, MenuOutcome};
pub use toggles::{AxisColor, ColorSelect, LightType, LightingMode, Projection, ToggleState};
pub use viewport::{Viewport, square_viewport};
