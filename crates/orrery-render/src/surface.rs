//! Window surface dimensions, normalized across platforms.
//!
//! Wayland can report a zero-size window before the compositor assigns one,
//! and scale factor changes resize the physical surface without a logical
//! resize. [`SurfaceWrapper`] tracks physical pixels, clamps to 1×1 and
//! derives the square scene viewport.

use orrery_scene::{Viewport, square_viewport};

pub const MIN_SURFACE_DIMENSION: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PhysicalSize {
    pub width: u32,
    pub height: u32,
}

/// Produced when the physical surface size actually changes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SurfaceResizeEvent {
    pub physical: PhysicalSize,
    pub scale_factor: f64,
    pub viewport: Viewport,
}

#[derive(Debug, Clone)]
pub struct SurfaceWrapper {
    physical_width: u32,
    physical_height: u32,
    scale_factor: f64,
    /// Set once a non-zero size has been seen.
    configured: bool,
}

impl SurfaceWrapper {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            physical_width: physical_width.max(MIN_SURFACE_DIMENSION),
            physical_height: physical_height.max(MIN_SURFACE_DIMENSION),
            scale_factor,
            configured: physical_width > 0 && physical_height > 0,
        }
    }

    /// Returns an event only when the clamped size differs from the current one.
    pub fn handle_resize(
        &mut self,
        physical_width: u32,
        physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        let width = physical_width.max(MIN_SURFACE_DIMENSION);
        let height = physical_height.max(MIN_SURFACE_DIMENSION);
        if physical_width > 0 && physical_height > 0 {
            self.configured = true;
        }

        if width == self.physical_width && height == self.physical_height {
            return None;
        }
        self.physical_width = width;
        self.physical_height = height;

        Some(SurfaceResizeEvent {
            physical: self.physical_size(),
            scale_factor: self.scale_factor,
            viewport: self.viewport(),
        })
    }

    pub fn handle_scale_factor_changed(
        &mut self,
        new_scale_factor: f64,
        new_physical_width: u32,
        new_physical_height: u32,
    ) -> Option<SurfaceResizeEvent> {
        self.scale_factor = new_scale_factor;
        self.handle_resize(new_physical_width, new_physical_height)
    }

    pub fn physical_size(&self) -> PhysicalSize {
        PhysicalSize {
            width: self.physical_width,
            height: self.physical_height,
        }
    }

    pub fn scale_factor(&self) -> f64 {
        self.scale_factor
    }

    /// Largest centered square of the surface.
    pub fn viewport(&self) -> Viewport {
        square_viewport(self.physical_width, self.physical_height)
    }

    pub fn is_configured(&self) -> bool {
        self.configured
    }
}
