//! Mouse-driven view rotation and scale.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use glam::{Mat4, Vec3};

/// Fixed eye position of the view transform.
pub const EYE: Vec3 = Vec3::new(2.0, 2.0, 4.0);
/// Point the eye looks at.
pub const TARGET: Vec3 = Vec3::ZERO;
pub const UP: Vec3 = Vec3::Y;

/// Set of held mouse buttons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ButtonMask(u8);

impl ButtonMask {
    pub const NONE: ButtonMask = ButtonMask(0);
    pub const RIGHT: ButtonMask = ButtonMask(1);
    pub const MIDDLE: ButtonMask = ButtonMask(2);
    pub const LEFT: ButtonMask = ButtonMask(4);

    #[inline]
    pub fn contains(self, other: ButtonMask) -> bool {
        self.0 & other.0 == other.0 && other.0 != 0
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn insert(&mut self, other: ButtonMask) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: ButtonMask) {
        self.0 &= !other.0;
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl BitOr for ButtonMask {
    type Output = ButtonMask;
    fn bitor(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 | rhs.0)
    }
}

impl BitOrAssign for ButtonMask {
    fn bitor_assign(&mut self, rhs: ButtonMask) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for ButtonMask {
    type Output = ButtonMask;
    fn bitand(self, rhs: ButtonMask) -> ButtonMask {
        ButtonMask(self.0 & rhs.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollDirection {
    Up,
    Down,
}

/// Gains that turn pixels and wheel clicks into view changes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTuning {
    pub angle_factor: f32,
    pub scale_factor: f32,
    pub min_scale: f32,
    pub scroll_click_factor: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            angle_factor: 1.0,
            scale_factor: 0.005,
            min_scale: 0.05,
            scroll_click_factor: 5.0,
        }
    }
}

/// The scale floor must be positive and finite; anything else falls back to
/// the default floor.
fn valid_min_scale(min_scale: f32) -> f32 {
    if min_scale.is_finite() && min_scale > 0.0 {
        min_scale
    } else {
        let fallback = CameraTuning::default().min_scale;
        log::warn!("camera min_scale must be positive, got {min_scale}, using {fallback}");
        fallback
    }
}

/// Accumulated view rotation (degrees) and uniform scale.
///
/// `scale` never drops below `tuning.min_scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraState {
    rot_x: f32,
    rot_y: f32,
    scale: f32,
    tuning: CameraTuning,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::new(CameraTuning::default())
    }
}

impl CameraState {
    pub fn new(tuning: CameraTuning) -> Self {
        let tuning = CameraTuning {
            min_scale: valid_min_scale(tuning.min_scale),
            ..tuning
        };
        let mut camera = Self {
            rot_x: 0.0,
            rot_y: 0.0,
            scale: 1.0,
            tuning,
        };
        camera.clamp_scale();
        camera
    }

    pub fn tuning(&self) -> &CameraTuning {
        &self.tuning
    }

    /// Apply a mouse drag of `(dx, dy)` pixels with `buttons` held.
    ///
    /// LEFT rotates, MIDDLE scales; both apply when both are held.
    pub fn apply_drag(&mut self, buttons: ButtonMask, dx: f32, dy: f32) {
        if buttons.contains(ButtonMask::LEFT) {
            self.rot_x += self.tuning.angle_factor * dy;
            self.rot_y += self.tuning.angle_factor * dx;
        }
        if buttons.contains(ButtonMask::MIDDLE) {
            self.scale += self.tuning.scale_factor * (dx - dy);
            self.clamp_scale();
        }
    }

    /// One wheel click.
    pub fn apply_scroll(&mut self, direction: ScrollDirection) {
        let step = self.tuning.scale_factor * self.tuning.scroll_click_factor;
        match direction {
            ScrollDirection::Up => self.scale += step,
            ScrollDirection::Down => self.scale -= step,
        }
        self.clamp_scale();
    }

    pub fn reset(&mut self) {
        self.rot_x = 0.0;
        self.rot_y = 0.0;
        self.scale = 1.0;
        self.clamp_scale();
    }

    /// `(rot_x, rot_y, scale)`.
    pub fn view_parameters(&self) -> (f32, f32, f32) {
        (self.rot_x, self.rot_y, self.scale)
    }

    /// Look from [`EYE`] at the origin, then apply the accumulated rotation
    /// (Y then X) and uniform scale to the scene.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(EYE, TARGET, UP)
            * Mat4::from_rotation_y(self.rot_y.to_radians())
            * Mat4::from_rotation_x(self.rot_x.to_radians())
            * Mat4::from_scale(Vec3::splat(self.scale))
    }

    fn clamp_scale(&mut self) {
        if self.scale.is_nan() || self.scale < self.tuning.min_scale {
            self.scale = self.tuning.min_scale;
        }
    }
}
