//! [`RenderBackend`] over wgpu.
//!
//! Draw calls from the frame composer are recorded with their uniforms and
//! replayed in a single render pass when the frame ends.

use std::convert::Infallible;
use std::path::Path;
use std::sync::Arc;

use glam::Mat4;
use orrery_scene::{
    Body, BodyParams, BodyResources, BodyTable, FrameSetup, LineStyle, Material, RenderBackend,
    Scene, TextureBinding,
};

use crate::buffer::{BufferAllocator, IndexData, LineBuffer, LineVertex, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::gpu::{RenderContext, SurfaceError};
use crate::mesh::{axes_lines, generate_uv_sphere, ring_outline};
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::pipeline::{DrawUniform, FrameUniform, LinePipeline, SceneBindings};
use crate::texture::{ManagedTexture, TextureError, TextureManager};
use crate::textured_pipeline::BodyPipeline;

/// Index of an uploaded sphere mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshHandle(usize);

/// Index of an uploaded line list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinesHandle(usize);

/// Tessellation and sizes for the static scene geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneDetail {
    pub sphere_slices: u32,
    pub sphere_stacks: u32,
    pub ring_segments: u32,
    pub axes_length: f32,
}

impl Default for SceneDetail {
    fn default() -> Self {
        Self {
            sphere_slices: 100,
            sphere_stacks: 100,
            ring_segments: 100,
            axes_length: 1.5,
        }
    }
}

enum DrawCommand {
    Mesh {
        mesh: MeshHandle,
        texture: Arc<ManagedTexture>,
    },
    Lines(LinesHandle),
}

pub struct WgpuBackend {
    context: RenderContext,
    depth: DepthBuffer,
    bindings: SceneBindings,
    line_pipeline: LinePipeline,
    body_pipeline: BodyPipeline,
    textures: TextureManager,
    white: Arc<ManagedTexture>,
    meshes: Vec<MeshBuffer>,
    lines: Vec<LineBuffer>,

    frame: Option<FrameSetup>,
    transform: Mat4,
    commands: Vec<DrawCommand>,
    draws: Vec<DrawUniform>,
}

impl WgpuBackend {
    pub fn new(context: RenderContext, generate_mipmaps: bool) -> Result<Self, TextureError> {
        let device = &context.device;
        let depth = DepthBuffer::new(
            device,
            context.surface_config.width,
            context.surface_config.height,
        );
        let bindings = SceneBindings::new(device);
        let line_pipeline = LinePipeline::new(device, &bindings, context.surface_format);
        let body_pipeline = BodyPipeline::new(device, &bindings, context.surface_format);
        let mut textures =
            TextureManager::new(device, bindings.texture_layout.clone(), generate_mipmaps);
        let white = textures.white(device, &context.queue)?;

        Ok(Self {
            context,
            depth,
            bindings,
            line_pipeline,
            body_pipeline,
            textures,
            white,
            meshes: Vec::new(),
            lines: Vec::new(),
            frame: None,
            transform: Mat4::IDENTITY,
            commands: Vec::new(),
            draws: Vec::new(),
        })
    }

    /// Reconfigure the surface and depth buffer for a new window size.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context.resize(width, height);
        self.depth.resize(
            &self.context.device,
            self.context.surface_config.width,
            self.context.surface_config.height,
        );
    }

    pub fn surface_size(&self) -> (u32, u32) {
        (
            self.context.surface_config.width,
            self.context.surface_config.height,
        )
    }

    pub fn upload_mesh(&mut self, label: &str, radius: f32, slices: u32, stacks: u32) -> MeshHandle {
        let sphere = generate_uv_sphere(radius, slices, stacks);
        let buffer = BufferAllocator::new(&self.context.device).create_mesh(
            label,
            &sphere.vertices,
            IndexData::U32(&sphere.indices),
        );
        self.meshes.push(buffer);
        MeshHandle(self.meshes.len() - 1)
    }

    pub fn upload_lines(&mut self, label: &str, vertices: &[LineVertex]) -> LinesHandle {
        let buffer = BufferAllocator::new(&self.context.device).create_lines(label, vertices);
        self.lines.push(buffer);
        LinesHandle(self.lines.len() - 1)
    }

    /// Load `<texture_dir>/<body>.bmp`. A missing or unreadable file is
    /// logged and leaves the body unbound.
    pub fn load_body_texture(
        &mut self,
        texture_dir: &Path,
        body: Body,
    ) -> TextureBinding<Arc<ManagedTexture>> {
        let path = texture_dir.join(body.texture_file());
        match self
            .textures
            .load_file(&self.context.device, &self.context.queue, &path)
        {
            Ok(texture) => TextureBinding::Bound(texture),
            Err(err) => {
                log::error!("Cannot open texture '{}'", path.display());
                log::debug!("{err}");
                TextureBinding::Unbound
            }
        }
    }

    pub fn body_resources(
        &mut self,
        body: Body,
        params: &BodyParams,
        texture_dir: &Path,
        detail: &SceneDetail,
    ) -> BodyResources<Self> {
        let mesh = self.upload_mesh(
            body.name(),
            params.radius,
            detail.sphere_slices,
            detail.sphere_stacks,
        );
        let texture = self.load_body_texture(texture_dir, body);
        let ring = params.ring_radius().map(|radius| {
            let label = format!("{}-ring", body.name());
            self.upload_lines(&label, &ring_outline(radius, detail.ring_segments))
        });
        BodyResources { mesh, texture, ring }
    }

    /// Upload every body and the axes.
    pub fn build_scene(&mut self, texture_dir: &Path, detail: &SceneDetail) -> Scene<Self> {
        let Ok(bodies) = BodyTable::build(|body, params| {
            Ok::<_, Infallible>(self.body_resources(body, params, texture_dir, detail))
        });
        let axes = self.upload_lines("axes", &axes_lines(detail.axes_length));
        log::info!(
            "Scene ready: {} bodies, {} textures",
            bodies.len(),
            self.textures.len()
        );
        Scene::new(bodies, axes)
    }

    fn push_draw(&mut self, uniform: DrawUniform, command: DrawCommand) {
        self.draws.push(uniform);
        self.commands.push(command);
    }

    fn present(&mut self, setup: &FrameSetup) -> Result<(), SurfaceError> {
        let surface_texture = self.context.get_current_texture()?;

        let frame_uniform = FrameUniform::new(
            setup.projection,
            setup.view,
            setup.light_position,
            setup.fog,
        );
        self.bindings.write_frame(&self.context.queue, &frame_uniform);
        self.bindings
            .write_draws(&self.context.device, &self.context.queue, &self.draws);

        let mut frame = FrameEncoder::new(&self.context.device, surface_texture);
        {
            let builder = RenderPassBuilder::new()
                .clear_color(setup.clear_color)
                .depth(&self.depth.view, DepthBuffer::CLEAR_VALUE)
                .viewport(setup.viewport)
                .label("scene-pass");
            let mut pass = frame.begin_render_pass(&builder);

            for (index, command) in self.commands.iter().enumerate() {
                match command {
                    DrawCommand::Mesh { mesh, texture } => self.body_pipeline.draw(
                        &mut pass,
                        &self.bindings,
                        index,
                        &texture.bind_group,
                        &self.meshes[mesh.0],
                    ),
                    DrawCommand::Lines(lines) => {
                        self.line_pipeline
                            .draw(&mut pass, &self.bindings, index, &self.lines[lines.0])
                    }
                }
            }
        }
        frame.submit(&self.context.queue);
        Ok(())
    }
}

impl RenderBackend for WgpuBackend {
    type Mesh = MeshHandle;
    type Lines = LinesHandle;
    type Texture = Arc<ManagedTexture>;

    fn begin_frame(&mut self, setup: &FrameSetup) {
        self.frame = Some(*setup);
        self.transform = Mat4::IDENTITY;
        self.commands.clear();
        self.draws.clear();
    }

    fn set_transform(&mut self, model: Mat4) {
        self.transform = model;
    }

    fn draw_mesh(&mut self, mesh: &MeshHandle, material: &Material<'_, Arc<ManagedTexture>>) {
        let texture = match material.texture {
            TextureBinding::Bound(texture) if material.textured => Arc::clone(texture),
            _ => Arc::clone(&self.white),
        };
        let uniform = DrawUniform::mesh(self.transform, material.lit);
        self.push_draw(uniform, DrawCommand::Mesh { mesh: *mesh, texture });
    }

    fn draw_lines(&mut self, lines: &LinesHandle, style: &LineStyle) {
        let uniform = DrawUniform::lines(self.transform, style.color);
        self.push_draw(uniform, DrawCommand::Lines(*lines));
    }

    fn end_frame(&mut self) {
        let Some(setup) = self.frame.take() else {
            log::warn!("end_frame without begin_frame");
            return;
        };
        match self.present(&setup) {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => log::debug!("Surface timeout, skipping frame"),
            Err(err) => log::error!("Frame dropped: {err}"),
        }
    }
}
