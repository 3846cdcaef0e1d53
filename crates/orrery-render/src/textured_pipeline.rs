//! Textured, optionally lit pipeline for the body spheres.

use crate::buffer::{MeshBuffer, MeshVertex};
use crate::depth::DepthBuffer;
use crate::pipeline::{SceneBindings, create_shader};

/// Shading for a sphere: a point light with a fixed grey material, the
/// texture modulating the result. Unlit draws use the texture as is.
const BODY_WGSL: &str = r#"
@group(2) @binding(0)
var t_body: texture_2d<f32>;
@group(2) @binding(1)
var s_body: sampler;

const GLOBAL_AMBIENT: f32 = 0.2;
const MATERIAL_AMBIENT: f32 = 0.24;
const MATERIAL_DIFFUSE: f32 = 0.6;
const MATERIAL_SPECULAR: f32 = 0.7;
const SHININESS: f32 = 30.0;

struct VertexInput {
    @location(0) position: vec3<f32>,
    @location(1) normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
};

struct VertexOutput {
    @builtin(position) clip_position: vec4<f32>,
    @location(0) world_position: vec3<f32>,
    @location(1) world_normal: vec3<f32>,
    @location(2) uv: vec2<f32>,
    @location(3) eye_depth: f32,
};

@vertex
fn vs_main(in: VertexInput) -> VertexOutput {
    let world = draw.model * vec4<f32>(in.position, 1.0);
    var out: VertexOutput;
    out.clip_position = frame.view_proj * world;
    out.world_position = world.xyz;
    // model is rotation and translation only
    out.world_normal = (draw.model * vec4<f32>(in.normal, 0.0)).xyz;
    out.uv = in.uv;
    out.eye_depth = abs((frame.view * world).z);
    return out;
}

fn point_light(position: vec3<f32>, normal: vec3<f32>) -> vec3<f32> {
    let n = normalize(normal);
    let l = normalize(frame.light_position.xyz - position);
    let v = normalize(frame.eye_position.xyz - position);
    let h = normalize(l + v);

    let n_dot_l = max(dot(n, l), 0.0);
    var specular = 0.0;
    if (n_dot_l > 0.0) {
        specular = pow(max(dot(n, h), 0.0), SHININESS) * MATERIAL_SPECULAR;
    }
    let ambient = vec3<f32>(GLOBAL_AMBIENT * MATERIAL_AMBIENT);
    return ambient + frame.light_color.rgb * (MATERIAL_DIFFUSE * n_dot_l + specular);
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    let texel = textureSample(t_body, s_body, in.uv).rgb * draw.color.rgb;
    var color = texel;
    if (draw.flags.x > 0.5) {
        color = texel * point_light(in.world_position, in.world_normal);
    }
    return vec4<f32>(apply_fog(clamp(color, vec3<f32>(0.0), vec3<f32>(1.0)), in.eye_depth), 1.0);
}
"#;

pub struct BodyPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl BodyPipeline {
    pub fn new(
        device: &wgpu::Device,
        bindings: &SceneBindings,
        surface_format: wgpu::TextureFormat,
    ) -> Self {
        let shader = create_shader(device, "body-shader", BODY_WGSL);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("body-pipeline-layout"),
            bind_group_layouts: &[
                &bindings.frame_layout,
                &bindings.draw_layout,
                &bindings.texture_layout,
            ],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("body-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[MeshVertex::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Back),
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
        texture_bind_group: &'a wgpu::BindGroup,
        mesh: &'a MeshBuffer,
    ) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &bindings.frame_bind_group, &[]);
        render_pass.set_bind_group(1, bindings.draw_bind_group(), &[bindings.draw_offset(draw_index)]);
        render_pass.set_bind_group(2, texture_bind_group, &[]);
        mesh.bind(render_pass);
        mesh.draw(render_pass);
    }
}
