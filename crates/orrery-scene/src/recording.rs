use glam::Mat4;

use crate::frame::{FrameSetup, LineStyle, Material, RenderBackend, TextureBinding};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Begin(FrameSetup),
    Transform(Mat4),
    Mesh {
        mesh: u32,
        texture: Option<&'static str>,
        textured: bool,
        lit: bool,
    },
    Lines {
        lines: u32,
        color: [f32; 3],
    },
    End,
}

/// Backend that records every call for assertions.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub calls: Vec<Call>,
}

impl RenderBackend for RecordingBackend {
    type Mesh = u32;
    type Lines = u32;
    type Texture = &'static str;

    fn begin_frame(&mut self, setup: &FrameSetup) {
        self.calls.push(Call::Begin(*setup));
    }

    fn set_transform(&mut self, model: Mat4) {
        self.calls.push(Call::Transform(model));
    }

    fn draw_mesh(&mut self, mesh: &u32, material: &Material<'_, &'static str>) {
        let texture = match material.texture {
            TextureBinding::Bound(name) => Some(*name),
            TextureBinding::Unbound => None,
        };
        self.calls.push(Call::Mesh {
            mesh: *mesh,
            texture,
            textured: material.textured,
            lit: material.lit,
        });
    }

    fn draw_lines(&mut self, lines: &u32, style: &LineStyle) {
        self.calls.push(Call::Lines {
            lines: *lines,
            color: style.color,
        });
    }

    fn end_frame(&mut self) {
        self.calls.push(Call::End);
    }
}
