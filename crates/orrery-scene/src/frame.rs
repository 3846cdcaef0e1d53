//! Per-frame scene composition.
//!
//! [`compose_frame`] reads the viewer state and animation phase once and
//! issues every draw for the frame, in a fixed order, through a
//! [`RenderBackend`]. It keeps no state between frames.

use glam::{Mat4, Vec3};

use crate::action::ViewerState;
use crate::body::{BodyTable, OrbitalTransform};
use crate::toggles::LightingMode;
use crate::viewport::{Viewport, square_viewport};

pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
/// Orbit rings are drawn in a fixed neutral color.
pub const RING_COLOR: [f32; 3] = [1.0, 1.0, 1.0];

/// Linear distance fog.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fog {
    pub color: [f32; 3],
    /// Eye distance where fog begins.
    pub start: f32,
    /// Eye distance where fog is total.
    pub end: f32,
    /// Unused by linear fog.
    pub density: f32,
}

/// The depth-cue fog.
pub const DEPTH_CUE: Fog = Fog {
    color: [0.0, 0.0, 0.0],
    start: 1.5,
    end: 4.0,
    density: 0.30,
};

/// A body texture, or the sentinel for one that failed to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureBinding<T> {
    Bound(T),
    Unbound,
}

impl<T> TextureBinding<T> {
    pub fn as_ref(&self) -> TextureBinding<&T> {
        match self {
            TextureBinding::Bound(t) => TextureBinding::Bound(t),
            TextureBinding::Unbound => TextureBinding::Unbound,
        }
    }

    pub fn is_bound(&self) -> bool {
        matches!(self, TextureBinding::Bound(_))
    }
}

/// Everything fixed for the whole frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSetup {
    pub clear_color: [f32; 4],
    pub viewport: Viewport,
    pub projection: Mat4,
    pub view: Mat4,
    pub fog: Option<Fog>,
    /// Point light position in world space.
    pub light_position: Vec3,
}

/// How to shade one mesh draw.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material<'a, T> {
    pub texture: TextureBinding<&'a T>,
    /// Sample the texture. When false, or when the texture is unbound, the
    /// mesh is drawn in plain white.
    pub textured: bool,
    /// Shade with the point light. When false the texture replaces the
    /// fragment color.
    pub lit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub color: [f32; 3],
}

/// Drawing capability the composer needs.
///
/// Calls arrive in the order `begin_frame`, any number of
/// `set_transform` / `draw_*`, then `end_frame`. Each draw uses the most
/// recent transform.
pub trait RenderBackend {
    type Mesh;
    type Lines;
    type Texture;

    fn begin_frame(&mut self, setup: &FrameSetup);
    fn set_transform(&mut self, model: Mat4);
    fn draw_mesh(&mut self, mesh: &Self::Mesh, material: &Material<'_, Self::Texture>);
    fn draw_lines(&mut self, lines: &Self::Lines, style: &LineStyle);
    fn end_frame(&mut self);
}

/// Static scene content: the body table and the axes geometry.
pub struct Scene<B: RenderBackend> {
    pub bodies: BodyTable<B>,
    pub axes: B::Lines,
}

impl<B: RenderBackend> Scene<B> {
    pub fn new(bodies: BodyTable<B>, axes: B::Lines) -> Self {
        Self { bodies, axes }
    }
}

/// Issue one complete frame.
///
/// `surface` is the drawable size in physical pixels.
pub fn compose_frame<B: RenderBackend>(
    scene: &Scene<B>,
    viewer: &ViewerState,
    phase: f32,
    surface: (u32, u32),
    backend: &mut B,
) {
    let toggles = &viewer.toggles;
    let setup = FrameSetup {
        clear_color: CLEAR_COLOR,
        viewport: square_viewport(surface.0, surface.1),
        projection: toggles.projection.matrix(),
        view: viewer.camera.view_matrix(),
        fog: toggles.depth_cue.then_some(DEPTH_CUE),
        light_position: Vec3::ZERO,
    };
    log::trace!("compose phase={phase:.4} viewport={:?}", setup.viewport);

    backend.begin_frame(&setup);

    if toggles.axes_visible {
        backend.set_transform(Mat4::IDENTITY);
        backend.draw_lines(
            &scene.axes,
            &LineStyle {
                color: toggles.axis_color.rgb(),
            },
        );
    }

    for record in scene.bodies.iter() {
        let transform = OrbitalTransform::of(&record.params, phase);
        backend.set_transform(transform.matrix());
        let material = Material {
            texture: record.texture.as_ref(),
            textured: toggles.texturing,
            lit: toggles.lighting == LightingMode::Lit && !record.params.self_luminous,
        };
        backend.draw_mesh(&record.mesh, &material);
    }

    backend.set_transform(Mat4::IDENTITY);
    let ring_style = LineStyle { color: RING_COLOR };
    for ring in scene.bodies.iter().filter_map(|r| r.ring.as_ref()) {
        backend.draw_lines(ring, &ring_style);
    }

    backend.end_frame();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::body::{Body, BodyResources};
    use crate::recording::{Call, RecordingBackend};
    use crate::toggles::{AxisColor, Projection};

    const AXES: u32 = 100;

    fn scene(missing: Option<Body>) -> Scene<RecordingBackend> {
        let bodies = BodyTable::build(|body, params| {
            Ok::<_, ()>(BodyResources {
                mesh: body as u32,
                texture: if Some(body) == missing {
                    TextureBinding::Unbound
                } else {
                    TextureBinding::Bound(body.texture_file())
                },
                ring: params.ring_radius().map(|_| 10 + body as u32),
            })
        })
        .unwrap();
        Scene::new(bodies, AXES)
    }

    fn record(viewer: &ViewerState, phase: f32, missing: Option<Body>) -> Vec<Call> {
        let mut backend = RecordingBackend::default();
        compose_frame(&scene(missing), viewer, phase, (800, 600), &mut backend);
        backend.calls
    }

    fn body_transforms(calls: &[Call]) -> Vec<Mat4> {
        calls
            .windows(2)
            .filter_map(|w| match (&w[0], &w[1]) {
                (Call::Transform(m), Call::Mesh { .. }) => Some(*m),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_frame_order() {
        let calls = record(&ViewerState::default(), 0.3, None);
        assert!(matches!(calls.first(), Some(Call::Begin(_))));
        assert_eq!(calls.last(), Some(&Call::End));

        // axes, then nine bodies, then eight rings
        assert_eq!(calls[1], Call::Transform(Mat4::IDENTITY));
        assert!(matches!(calls[2], Call::Lines { lines: AXES, .. }));
        let meshes: Vec<u32> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Mesh { mesh, .. } => Some(*mesh),
                _ => None,
            })
            .collect();
        assert_eq!(meshes, (0..9).collect::<Vec<_>>());
        let rings: Vec<u32> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Lines { lines, color } if *lines != AXES => {
                    assert_eq!(*color, RING_COLOR);
                    Some(*lines)
                }
                _ => None,
            })
            .collect();
        assert_eq!(rings, (11..19).collect::<Vec<_>>());
    }

    #[test]
    fn test_frame_setup_from_state() {
        let mut viewer = ViewerState::default();
        viewer.apply(Action::SetProjection(Projection::Orthographic));
        viewer.apply(Action::SetDepthCue(true));
        let calls = record(&viewer, 0.0, None);
        let Call::Begin(setup) = &calls[0] else {
            panic!("frame must start with begin_frame");
        };
        assert_eq!(setup.viewport, Viewport { x: 100, y: 0, side: 600 });
        assert_eq!(setup.projection, Projection::Orthographic.matrix());
        assert_eq!(setup.view, viewer.camera.view_matrix());
        assert_eq!(setup.fog, Some(DEPTH_CUE));
        assert_eq!(setup.clear_color, CLEAR_COLOR);
    }

    #[test]
    fn test_no_fog_without_depth_cue() {
        let calls = record(&ViewerState::default(), 0.0, None);
        assert!(matches!(&calls[0], Call::Begin(setup) if setup.fog.is_none()));
    }

    #[test]
    fn test_axes_toggle_only_removes_axes() {
        let on = ViewerState::default();
        let mut off = on;
        off.apply(Action::SetAxes(false));

        let with_axes = record(&on, 0.42, None);
        let without = record(&off, 0.42, None);

        assert_eq!(with_axes.len(), without.len() + 2);
        assert!(!without.iter().any(|c| matches!(c, Call::Lines { lines: AXES, .. })));
        assert_eq!(body_transforms(&with_axes), body_transforms(&without));
    }

    #[test]
    fn test_axes_use_selected_color() {
        let mut viewer = ViewerState::default();
        viewer.apply(Action::SetAxisColor(AxisColor::Magenta));
        let calls = record(&viewer, 0.0, None);
        assert_eq!(
            calls[2],
            Call::Lines {
                lines: AXES,
                color: [1.0, 0.0, 1.0]
            }
        );
    }

    #[test]
    fn test_body_transforms_follow_phase() {
        let calls = record(&ViewerState::default(), 0.25, None);
        let transforms = body_transforms(&calls);
        for (m, body) in transforms.iter().zip(Body::ALL) {
            let expected = OrbitalTransform::of(&body.params(), 0.25).matrix();
            assert_eq!(*m, expected, "{}", body.name());
        }
    }

    #[test]
    fn test_missing_texture_still_draws() {
        let calls = record(&ViewerState::default(), 0.1, Some(Body::Earth));
        let earth = calls
            .iter()
            .find(|c| matches!(c, Call::Mesh { mesh, .. } if *mesh == Body::Earth as u32));
        assert_eq!(
            earth,
            Some(&Call::Mesh {
                mesh: Body::Earth as u32,
                texture: None,
                textured: true,
                lit: true,
            })
        );
        assert_eq!(calls.last(), Some(&Call::End));
    }

    #[test]
    fn test_sun_is_never_lit() {
        let calls = record(&ViewerState::default(), 0.0, None);
        let lit: Vec<bool> = calls
            .iter()
            .filter_map(|c| match c {
                Call::Mesh { lit, .. } => Some(*lit),
                _ => None,
            })
            .collect();
        assert!(!lit[0]);
        assert!(lit[1..].iter().all(|&l| l));
    }

    #[test]
    fn test_unlit_and_untextured_modes() {
        let mut viewer = ViewerState::default();
        viewer.apply(Action::ToggleLighting);
        viewer.apply(Action::ToggleTexturing);
        let calls = record(&viewer, 0.0, None);
        for call in &calls {
            if let Call::Mesh { lit, textured, .. } = call {
                assert!(!lit && !textured);
            }
        }
    }
}
