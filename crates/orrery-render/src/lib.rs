//! wgpu rendering for the orrery: device and surface management, procedural
//! geometry, body textures, and a [`RenderBackend`](orrery_scene::RenderBackend)
//! implementation that turns composed frames into render passes.

pub mod backend;
pub mod buffer;
pub mod depth;
pub mod gpu;
pub mod mesh;
pub mod pass;
pub mod pipeline;
pub mod surface;
pub mod texture;
pub mod textured_pipeline;

#[cfg(test)]
mod test_gpu;

pub use backend::{LinesHandle, MeshHandle, SceneDetail, WgpuBackend};
pub use buffer::{BufferAllocator, IndexData, LineBuffer, LineVertex, MeshBuffer, MeshVertex};
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use mesh::{SphereMesh, axes_lines, generate_uv_sphere, ring_outline};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use pipeline::{DrawUniform, FrameUniform, LIGHT_COLOR, LinePipeline, SceneBindings};
pub use surface::{PhysicalSize, SurfaceResizeEvent, SurfaceWrapper};
pub use texture::{ManagedTexture, TextureError, TextureManager, WHITE_TEXTURE};
pub use textured_pipeline::BodyPipeline;
