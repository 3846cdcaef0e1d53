//! Small vector and color helpers.

use glam::Vec3;

/// Cross product `a × b`.
#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    a.cross(b)
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f32 {
    a.dot(b)
}

/// Normalise `v`, returning the unit vector and the original length.
///
/// A zero vector is returned unchanged with length 0 rather than producing NaNs.
pub fn unit(v: Vec3) -> (Vec3, f32) {
    (v.normalize_or_zero(), v.length())
}

/// Convert `[hue (degrees), saturation, value]` to `[r, g, b]`.
///
/// Hue wraps into [0, 360). Saturation and value are clamped to [0, 1].
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [f32; 3] {
    let h = (hsv[0] / 60.0).rem_euclid(6.0);
    let s = hsv[1].clamp(0.0, 1.0);
    let v = hsv[2].clamp(0.0, 1.0);

    if s == 0.0 {
        return [v, v, v];
    }

    // rem_euclid can round up to exactly 6.0 for tiny negative hues
    let sector = (h.floor() as u32).min(5);
    let f = h - sector as f32;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));

    match sector {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}
