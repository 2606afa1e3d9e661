//! Renderer: wgpu context, shader programs, textures, meshes and the
//! scenes built from them.
//! wgpu = 27.x, winit = 0.30.x

pub mod frame;
pub mod gpu;
pub mod material;
pub mod mesh;
pub mod program;
pub mod scenes;
pub mod texture;
pub mod uniforms;

pub use frame::{Frame, FrameError, PassTarget};
pub use gpu::{DEPTH_FORMAT, GpuContext, GpuError, SurfaceTarget};
pub use material::{Material, TextureSlot};
pub use mesh::{GpuMesh, Vertex};
pub use program::{ProgramBuilder, ProgramError, ShaderProgram, ShaderStage};
pub use scenes::Scene;
pub use texture::{CubeMap, RenderTarget, SampledTexture, Texture2d};
pub use uniforms::{UniformBlock, UniformError, UniformLayout, UniformType, UniformValue};
