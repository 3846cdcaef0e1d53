//! Shared uniforms, bind group layouts and the line pipeline.
//!
//! Every draw in a frame shares one [`FrameUniform`] (group 0). Per-draw
//! state lives in a single [`DrawUniform`] buffer addressed with dynamic
//! offsets (group 1). Textured pipelines add a texture + sampler at group 2.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Vec3};
use orrery_scene::Fog;

use crate::buffer::{LineBuffer, LineVertex};
use crate::depth::DepthBuffer;

/// Light color used for both the diffuse and specular terms.
pub const LIGHT_COLOR: [f32; 3] = [1.0, 1.0, 0.3];

/// Per-frame uniform: camera, point light and fog.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    pub eye_position: [f32; 4],
    pub light_position: [f32; 4],
    pub light_color: [f32; 4],
    /// rgb, w = 1 when fog is enabled
    pub fog_color: [f32; 4],
    /// start, end, density, unused
    pub fog_params: [f32; 4],
}

impl FrameUniform {
    pub fn new(projection: Mat4, view: Mat4, light_position: Vec3, fog: Option<Fog>) -> Self {
        let eye = view.inverse().w_axis;
        let (fog_color, fog_params) = match fog {
            Some(f) => (
                [f.color[0], f.color[1], f.color[2], 1.0],
                [f.start, f.end, f.density, 0.0],
            ),
            None => ([0.0; 4], [0.0; 4]),
        };
        Self {
            view_proj: (projection * view).to_cols_array_2d(),
            view: view.to_cols_array_2d(),
            eye_position: eye.to_array(),
            light_position: light_position.extend(1.0).to_array(),
            light_color: [LIGHT_COLOR[0], LIGHT_COLOR[1], LIGHT_COLOR[2], 1.0],
            fog_color,
            fog_params,
        }
    }
}

/// Per-draw uniform: model matrix, flat color and shading flags.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct DrawUniform {
    pub model: [[f32; 4]; 4],
    pub color: [f32; 4],
    /// x = lit
    pub flags: [f32; 4],
}

impl DrawUniform {
    pub fn mesh(model: Mat4, lit: bool) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [1.0; 4],
            flags: [if lit { 1.0 } else { 0.0 }, 0.0, 0.0, 0.0],
        }
    }

    pub fn lines(model: Mat4, color: [f32; 3]) -> Self {
        Self {
            model: model.to_cols_array_2d(),
            color: [color[0], color[1], color[2], 1.0],
            flags: [0.0; 4],
        }
    }
}

/// WGSL declarations shared by every pipeline.
pub(crate) const COMMON_WGSL: &str = r#"
struct FrameUniform {
    view_proj: mat4x4<f32>,
    view: mat4x4<f32>,
    eye_position: vec4<f32>,
    light_position: vec4<f32>,
    light_color: vec4<f32>,
    fog_color: vec4<f32>,
    fog_params: vec4<f32>,
};

struct DrawUniform {
    model: mat4x4<f32>,
    color: vec4<f32>,
    flags: vec4<f32>,
};

@group(0) @binding(0)
var<uniform> frame: FrameUniform;

@group(1) @binding(0)
var<uniform> draw: DrawUniform;

// Linear fog on eye-space distance.
fn apply_fog(color: vec3<f32>, eye_depth: f32) -> vec3<f32> {
    if (frame.fog_color.w < 0.5) {
        return color;
    }
    let start = frame.fog_params.x;
    let end = frame.fog_params.y;
    let f = clamp((end - eye_depth) / max(end - start, 1e-6), 0.0, 1.0);
    return mix(frame.fog_color.rgb, color, f);
}
"#;

const LINE_WGSL: &str = r#"
struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) eye_depth: f32,
};

@vertex
fn vs_main(@location(0) position: vec3<f32>) -> VertexOutput {
    let world = draw.model * vec4<f32>(position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.eye_depth = abs((frame.view * world).z);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return vec4<f32>(apply_fog(draw.color.rgb, in.eye_depth), 1.0);
}
"#;

/// Build a shader module from the shared prelude plus `body`.
pub(crate) fn create_shader(device: &wgpu::Device, label: &str, body: &str) -> wgpu::ShaderModule {
    device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(format!("{COMMON_WGSL}{body}").into()),
    })
}

/// Round `size` up to the device's dynamic uniform offset alignment.
pub fn aligned_stride(size: u64, alignment: u32) -> u64 {
    let alignment = u64::from(alignment.max(1));
    size.div_ceil(alignment) * alignment
}

/// Bind group layouts plus the frame and per-draw uniform buffers.
pub struct SceneBindings {
    pub frame_layout: wgpu::BindGroupLayout,
    pub draw_layout: wgpu::BindGroupLayout,
    pub texture_layout: wgpu::BindGroupLayout,
    pub frame_buffer: wgpu::Buffer,
    pub frame_bind_group: wgpu::BindGroup,
    draw_buffer: wgpu::Buffer,
    draw_bind_group: wgpu::BindGroup,
    draw_stride: u64,
    draw_capacity: usize,
}

impl SceneBindings {
    const INITIAL_DRAWS: usize = 32;

    pub fn new(device: &wgpu::Device) -> Self {
        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("frame-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<FrameUniform>() as u64),
                },
                count: None,
            }],
        });

        let draw_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("draw-bind-group-layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("texture-bind-group-layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        multisampled: false,
                        view_dimension: wgpu::TextureViewDimension::D2,
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("frame-uniform"),
            size: std::mem::size_of::<FrameUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let draw_stride = aligned_stride(
            std::mem::size_of::<DrawUniform>() as u64,
            device.limits().min_uniform_buffer_offset_alignment,
        );
        let (draw_buffer, draw_bind_group) =
            Self::create_draw_storage(device, &draw_layout, draw_stride, Self::INITIAL_DRAWS);

        Self {
            frame_layout,
            draw_layout,
            texture_layout,
            frame_buffer,
            frame_bind_group,
            draw_buffer,
            draw_bind_group,
            draw_stride,
            draw_capacity: Self::INITIAL_DRAWS,
        }
    }

    fn create_draw_storage(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        stride: u64,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("draw-uniforms"),
            size: stride * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("draw-bind-group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: NonZeroU64::new(std::mem::size_of::<DrawUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    pub fn write_frame(&self, queue: &wgpu::Queue, uniform: &FrameUniform) {
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(uniform));
    }

    /// Upload every draw's uniform, growing the buffer when needed.
    pub fn write_draws(&mut self, device: &wgpu::Device, queue: &wgpu::Queue, draws: &[DrawUniform]) {
        if draws.len() > self.draw_capacity {
            let capacity = draws.len().next_power_of_two();
            log::debug!("Growing draw uniform buffer to {capacity} entries");
            (self.draw_buffer, self.draw_bind_group) =
                Self::create_draw_storage(device, &self.draw_layout, self.draw_stride, capacity);
            self.draw_capacity = capacity;
        }

        let stride = self.draw_stride as usize;
        let mut bytes = vec![0u8; stride * draws.len()];
        for (chunk, draw) in bytes.chunks_mut(stride).zip(draws) {
            chunk[..std::mem::size_of::<DrawUniform>()].copy_from_slice(bytemuck::bytes_of(draw));
        }
        if !bytes.is_empty() {
            queue.write_buffer(&self.draw_buffer, 0, &bytes);
        }
    }

    pub fn draw_bind_group(&self) -> &wgpu::BindGroup {
        &self.draw_bind_group
    }

    /// Dynamic offset of the `index`th draw uniform.
    pub fn draw_offset(&self, index: usize) -> u32 {
        (self.draw_stride * index as u64) as u32
    }
}

/// Unlit, fogged line list for axes and orbit rings.
pub struct LinePipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl LinePipeline {
    pub fn new(
        device: &wgpu::Device,
        bindings: &SceneBindings,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = create_shader(device, "line-shader", LINE_WGSL);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("line-pipeline-layout"),
            bind_group_layouts: &[&bindings.frame_layout, &bindings.draw_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("line-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[LineVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::LineList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            depth_stencil: Some(DepthBuffer::stencil_state(true)),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline }
    }

    pub fn draw<'a>(
        &self,
        render_pass: &mut wgpu::RenderPass<'a>,
        bindings: &'a SceneBindings,
        draw_index: usize,
        lines: &'a LineBuffer,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &bindings.frame_bind_group, &[]);
        render_pass.set_bind_group(1, bindings.draw_bind_group(), &[bindings.draw_offset(draw_index)]);
        lines.draw(render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_gpu::create_test_device_queue;
    use orrery_scene::DEPTH_CUE;

    #[test]
    fn test_uniform_sizes() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 64 * 2 + 16 * 5);
        assert_eq!(std::mem::size_of::<DrawUniform>(), 96);
    }

    #[test]
    fn test_aligned_stride() {
        assert_eq!(aligned_stride(96, 256), 256);
        assert_eq!(aligned_stride(256, 256), 256);
        assert_eq!(aligned_stride(300, 256), 512);
        assert_eq!(aligned_stride(96, 0), 96);
    }

    #[test]
    fn test_frame_uniform_fog() {
        let u = FrameUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, Some(DEPTH_CUE));
        assert_eq!(u.fog_color[3], 1.0);
        assert_eq!(u.fog_params[0], 1.5);
        assert_eq!(u.fog_params[1], 4.0);

        let off = FrameUniform::new(Mat4::IDENTITY, Mat4::IDENTITY, Vec3::ZERO, None);
        assert_eq!(off.fog_color[3], 0.0);
    }

    #[test]
    fn test_frame_uniform_eye_position() {
        let view = Mat4::look_at_rh(Vec3::new(2.0, 2.0, 4.0), Vec3::ZERO, Vec3::Y);
        let u = FrameUniform::new(Mat4::IDENTITY, view, Vec3::ZERO, None);
        let eye = Vec3::new(u.eye_position[0], u.eye_position[1], u.eye_position[2]);
        assert!((eye - Vec3::new(2.0, 2.0, 4.0)).length() < 1e-4);
        assert_eq!(u.light_position, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_draw_uniform_flags() {
        assert_eq!(DrawUniform::mesh(Mat4::IDENTITY, true).flags[0], 1.0);
        assert_eq!(DrawUniform::mesh(Mat4::IDENTITY, false).flags[0], 0.0);
        assert_eq!(
            DrawUniform::lines(Mat4::IDENTITY, [1.0, 0.0, 1.0]).color,
            [1.0, 0.0, 1.0, 1.0]
        );
    }

    #[test]
    fn test_line_pipeline_creation() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let bindings = SceneBindings::new(&device);
        let _pipeline = LinePipeline::new(&device, &bindings, wgpu::TextureFormat::Bgra8UnormSrgb);
    }

    #[test]
    fn test_draw_buffer_grows() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut bindings = SceneBindings::new(&device);
        let draws = vec![DrawUniform::mesh(Mat4::IDENTITY, true); 40];
        bindings.write_draws(&device, &queue, &draws);
        assert_eq!(bindings.draw_capacity, 64);
        assert_eq!(bindings.draw_offset(1) as u64, bindings.draw_stride);
    }
}
