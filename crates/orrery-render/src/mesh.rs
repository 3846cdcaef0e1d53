//! Procedural geometry: latitude/longitude spheres, orbit rings and the
//! labelled coordinate axes.

use std::f32::consts::{FRAC_PI_2, PI, TAU};

use glam::Vec3;
use orrery_scene::math::unit;

use crate::buffer::{LineVertex, MeshVertex};

/// CPU-side sphere ready for upload.
#[derive(Debug, Clone)]
pub struct SphereMesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

/// Largest tessellation accepted along either direction.
pub const MAX_SPHERE_DIVISIONS: u32 = 1024;

/// Generate a UV sphere centered at the origin.
///
/// `slices` runs around the Y axis, `stacks` from pole to pole. The texture
/// seam is duplicated so `u` runs cleanly from 0 to 1; `v` is 0 at the north
/// pole, matching image row order. Counts are clamped to at least 3 slices
/// and 2 stacks and at most [`MAX_SPHERE_DIVISIONS`] of each.
pub fn generate_uv_sphere(radius: f32, slices: u32, stacks: u32) -> SphereMesh {
    let slices = slices.clamp(3, MAX_SPHERE_DIVISIONS);
    let stacks = stacks.clamp(2, MAX_SPHERE_DIVISIONS);
    let columns = slices + 1;

    let mut vertices = Vec::with_capacity((columns * (stacks + 1)) as usize);
    for i in 0..=stacks {
        let t = i as f32 / stacks as f32;
        let lat = FRAC_PI_2 - t * PI;
        for j in 0..=slices {
            let s = j as f32 / slices as f32;
            let lng = s * TAU - PI;
            let dir = Vec3::new(lat.cos() * lng.sin(), lat.sin(), lat.cos() * lng.cos());
            let (normal, _) = unit(dir);
            vertices.push(MeshVertex {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [s, t],
            });
        }
    }

    let mut indices = Vec::with_capacity((slices * stacks * 6) as usize);
    for i in 0..stacks {
        for j in 0..slices {
            let a = i * columns + j;
            let b = a + columns;
            // counter-clockwise seen from outside
            if i != 0 {
                indices.extend_from_slice(&[a, b, a + 1]);
            }
            if i != stacks - 1 {
                indices.extend_from_slice(&[a + 1, b, b + 1]);
            }
        }
    }

    SphereMesh { vertices, indices }
}

/// Closed circle in the XZ plane as a line list.
pub fn ring_outline(radius: f32, segments: u32) -> Vec<LineVertex> {
    let segments = segments.max(3);
    let point = |k: u32| {
        let a = TAU * k as f32 / segments as f32;
        LineVertex {
            position: [radius * a.cos(), 0.0, radius * a.sin()],
        }
    };
    (0..segments)
        .flat_map(|k| [point(k), point(k + 1)])
        .collect()
}

/// Height of the axis labels, as a fraction of the axis length.
const LABEL_HEIGHT: f32 = 0.10;
/// Where the labels start along their axis, as a fraction of the axis length.
const LABEL_OFFSET: f32 = 1.10;

/// A stroke letter: glyph points and the order to visit them. A negative
/// index lifts the pen before moving to that point.
struct Glyph {
    points: &'static [(f32, f32)],
    order: &'static [i8],
}

const GLYPH_X: Glyph = Glyph {
    points: &[(0.0, -0.5), (1.0, 0.5), (0.0, 0.5), (1.0, -0.5)],
    order: &[1, 2, -3, 4],
};

const GLYPH_Y: Glyph = Glyph {
    points: &[(0.0, 0.0), (0.0, 0.6), (-0.5, 1.0), (0.5, 1.0)],
    order: &[1, 2, 3, -2, 4],
};

const GLYPH_Z: Glyph = Glyph {
    points: &[
        (1.0, 0.5),
        (0.0, 0.5),
        (1.0, -0.5),
        (0.0, -0.5),
        (0.25, 0.0),
        (0.75, 0.0),
    ],
    order: &[1, 2, 3, 4, -5, 6],
};

impl Glyph {
    /// Expand the pen strokes into line-list segments through `place`.
    fn segments(&self, place: impl Fn(f32, f32) -> Vec3, out: &mut Vec<LineVertex>) {
        let mut prev: Option<Vec3> = None;
        for &step in self.order {
            let (a, b) = self.points[(step.unsigned_abs() - 1) as usize];
            let p = place(a, b);
            if let (Some(q), true) = (prev, step > 0) {
                out.push(LineVertex { position: q.to_array() });
                out.push(LineVertex { position: p.to_array() });
            }
            prev = Some(p);
        }
    }
}

/// Positive X, Y and Z axes of `length` with a stroke letter past each tip.
pub fn axes_lines(length: f32) -> Vec<LineVertex> {
    let v = |x: f32, y: f32, z: f32| LineVertex { position: [x, y, z] };
    let mut out = vec![
        v(0.0, 0.0, 0.0),
        v(length, 0.0, 0.0),
        v(0.0, 0.0, 0.0),
        v(0.0, length, 0.0),
        v(0.0, 0.0, 0.0),
        v(0.0, 0.0, length),
    ];

    let fact = LABEL_HEIGHT * length;
    let base = LABEL_OFFSET * length;
    GLYPH_X.segments(|a, b| Vec3::new(base + fact * a, fact * b, 0.0), &mut out);
    GLYPH_Y.segments(|a, b| Vec3::new(fact * a, base + fact * b, 0.0), &mut out);
    GLYPH_Z.segments(|a, b| Vec3::new(0.0, fact * b, base + fact * a), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_vertices_on_radius() {
        let mesh = generate_uv_sphere(0.5, 16, 8);
        for v in &mesh.vertices {
            let len = Vec3::from(v.position).length();
            assert!((len - 0.5).abs() < 1e-5, "vertex off sphere: {len}");
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = generate_uv_sphere(1.0, 16, 8);
        assert_eq!(mesh.vertices.len(), 17 * 9);
        // the pole rows contribute one triangle per slice
        assert_eq!(mesh.indices.len(), (16 * 8 * 2 - 2 * 16) * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_sphere_uv_range() {
        let mesh = generate_uv_sphere(1.0, 100, 100);
        for v in &mesh.vertices {
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
        // north pole at the top of the image
        assert!(mesh.vertices[0].position[1] > 0.99);
        assert_eq!(mesh.vertices[0].uv[1], 0.0);
    }

    #[test]
    fn test_sphere_winding_faces_outward() {
        let mesh = generate_uv_sphere(1.0, 12, 6);
        for tri in mesh.indices.chunks(3) {
            let [a, b, c] =
                [tri[0], tri[1], tri[2]].map(|i| Vec3::from(mesh.vertices[i as usize].position));
            let n = (b - a).cross(c - a);
            let centroid = (a + b + c) / 3.0;
            assert!(n.dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_degenerate_counts_raised() {
        let mesh = generate_uv_sphere(1.0, 0, 0);
        assert_eq!(mesh.vertices.len(), 4 * 3);
    }

    #[test]
    fn test_huge_counts_clamped() {
        let mesh = generate_uv_sphere(1.0, u32::MAX, 2);
        assert_eq!(mesh.vertices.len(), (MAX_SPHERE_DIVISIONS as usize + 1) * 3);
        assert!(mesh.indices.iter().all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_ring_is_closed_loop() {
        let ring = ring_outline(2.0, 100);
        assert_eq!(ring.len(), 200);
        let first = Vec3::from(ring[0].position);
        let last = Vec3::from(ring[199].position);
        assert!((first - last).length() < 1e-4);
        for v in &ring {
            assert_eq!(v.position[1], 0.0);
            assert!((Vec3::from(v.position).length() - 2.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_axes_segments() {
        let lines = axes_lines(1.5);
        assert_eq!(lines.len() % 2, 0);
        // three axes, X has 2 strokes, Y 3, Z 4
        assert_eq!(lines.len(), 2 * (3 + 2 + 3 + 4));
        assert_eq!(lines[1].position, [1.5, 0.0, 0.0]);
        assert_eq!(lines[3].position, [0.0, 1.5, 0.0]);
        assert_eq!(lines[5].position, [0.0, 0.0, 1.5]);
    }

    #[test]
    fn test_axis_labels_sit_past_tips() {
        let lines = axes_lines(1.0);
        let x_label = &lines[6..10];
        for v in x_label {
            assert!(v.position[0] >= 1.1 - 1e-6 && v.position[0] <= 1.2 + 1e-6);
            assert_eq!(v.position[2], 0.0);
        }
        let z_label = &lines[16..];
        for v in z_label {
            assert_eq!(v.position[0], 0.0);
            assert!(v.position[2] >= 1.1 - 1e-6);
        }
    }
}
