//! Display options switched from the menu and keyboard.

use glam::Mat4;
use serde::{Deserialize, Serialize};

use crate::body::Body;
use crate::math::hsv_to_rgb;

/// Color of the coordinate axes, in menu order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AxisColor {
    Red,
    Yellow,
    Green,
    Cyan,
    Blue,
    Magenta,
}

impl AxisColor {
    pub const ALL: [AxisColor; 6] = [
        AxisColor::Red,
        AxisColor::Yellow,
        AxisColor::Green,
        AxisColor::Cyan,
        AxisColor::Blue,
        AxisColor::Magenta,
    ];

    pub fn name(self) -> &'static str {
        match self {
            AxisColor::Red => "Red",
            AxisColor::Yellow => "Yellow",
            AxisColor::Green => "Green",
            AxisColor::Cyan => "Cyan",
            AxisColor::Blue => "Blue",
            AxisColor::Magenta => "Magenta",
        }
    }

    /// Fully saturated hue at 60° steps.
    pub fn rgb(self) -> [f32; 3] {
        hsv_to_rgb([60.0 * self as u8 as f32, 1.0, 1.0])
    }
}

/// Half extent of the orthographic view volume.
const ORTHO_HALF: f32 = 2.0;
const PERSPECTIVE_FOV_DEG: f32 = 70.0;
const NEAR: f32 = 0.1;
const FAR: f32 = 1000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Projection {
    Orthographic,
    Perspective,
}

impl Projection {
    /// Projection matrix for a square viewport.
    ///
    /// Reverse-Z: near maps to depth 1 and far to depth 0, matching a
    /// depth buffer cleared to 0 and tested with `GreaterEqual`.
    pub fn matrix(self) -> Mat4 {
        match self {
            Projection::Orthographic => Mat4::orthographic_rh(
                -ORTHO_HALF,
                ORTHO_HALF,
                -ORTHO_HALF,
                ORTHO_HALF,
                FAR,
                NEAR,
            ),
            Projection::Perspective => {
                Mat4::perspective_rh(PERSPECTIVE_FOV_DEG.to_radians(), 1.0, FAR, NEAR)
            }
        }
    }
}

/// Lit bodies are shaded by the sun; unlit ones show their raw texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightingMode {
    Lit,
    Unlit,
}

/// Color picked with `w r g b y`. Stored for display in diagnostics only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorSelect {
    White,
    Red,
    Green,
    Blue,
    Yellow,
}

/// Light kind picked with `p`. Stored only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LightType {
    Point,
}

/// Every display switch the frame composer reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToggleState {
    pub axes_visible: bool,
    pub axis_color: AxisColor,
    pub projection: Projection,
    pub depth_cue: bool,
    pub debug: bool,
    pub texturing: bool,
    pub lighting: LightingMode,
    pub color_select: Option<ColorSelect>,
    pub texture_target: Option<Body>,
    pub light_type: Option<LightType>,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            axes_visible: true,
            axis_color: AxisColor::Yellow,
            projection: Projection::Perspective,
            depth_cue: false,
            debug: false,
            texturing: true,
            lighting: LightingMode::Lit,
            color_select: None,
            texture_target: None,
            light_type: None,
        }
    }
}

impl ToggleState {
    /// Restore the menu-controlled options (axes, axis color, projection,
    /// depth cue, debug). Texturing, lighting and the stored key selections
    /// are kept.
    pub fn reset_display(&mut self) {
        let defaults = ToggleState::default();
        self.axes_visible = defaults.axes_visible;
        self.axis_color = defaults.axis_color;
        self.projection = defaults.projection;
        self.depth_cue = defaults.depth_cue;
        self.debug = defaults.debug;
    }

    pub fn toggle_lighting(&mut self) {
        self.lighting = match self.lighting {
            LightingMode::Lit => LightingMode::Unlit,
            LightingMode::Unlit => LightingMode::Lit,
        };
    }
}
