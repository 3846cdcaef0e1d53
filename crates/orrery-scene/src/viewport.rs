/// A square drawing region inside the window, in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub x: u32,
    pub y: u32,
    pub side: u32,
}

/// The largest square that fits in `width` × `height`, centered.
pub fn square_viewport(width: u32, height: u32) -> Viewport {
    let side = width.min(height);
    Viewport {
        x: (width - side) / 2,
        y: (height - side) / 2,
        side,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_window() {
        assert_eq!(square_viewport(800, 600), Viewport { x: 100, y: 0, side: 600 });
    }

    #[test]
    fn test_portrait_window() {
        assert_eq!(square_viewport(600, 800), Viewport { x: 0, y: 100, side: 600 });
    }

    #[test]
    fn test_square_window() {
        assert_eq!(square_viewport(500, 500), Viewport { x: 0, y: 0, side: 500 });
    }

    #[test]
    fn test_degenerate_window() {
        assert_eq!(square_viewport(0, 300), Viewport { x: 0, y: 150, side: 0 });
    }
}
