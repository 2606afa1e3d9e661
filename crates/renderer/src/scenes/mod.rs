//! The rendering techniques, one scene type per recipe.
//!
//! Every scene follows the same lifecycle: construct (no GPU access),
//! `init_scene` once to acquire GPU resources, `resize` at least once, then
//! per frame `update(t)` followed by `render(frame)`. GPU resources are
//! released when the scene is dropped.

use anyhow::Context;
use asset::AssetPaths;
use corelib::Recipe;

use crate::{
    frame::Frame,
    gpu::GpuContext,
    material::TextureSlot,
    program::{ShaderProgram, ShaderStage, stage_path},
    uniforms::UniformLayout,
};

mod alpha_test;
mod lighting;
mod multi_tex;
mod normal_map;
mod proj_tex;
mod reflect_cube;
mod refract_cube;
mod render_to_tex;
mod texture_cube;

pub use alpha_test::AlphaTest;
pub use multi_tex::MultiTex;
pub use normal_map::NormalMap;
pub use proj_tex::ProjTex;
pub use reflect_cube::ReflectCube;
pub use refract_cube::RefractCube;
pub use render_to_tex::RenderToTex;
pub use texture_cube::TextureCube;

/// Background of every pass, stored as-is on the non-sRGB surface.
pub const CLEAR_COLOR: [f32; 4] = [0.5, 0.5, 0.5, 1.0];

/// Base name of the shader pair a recipe compiles.
pub fn shader_name(recipe: Recipe) -> &'static str {
    match recipe {
        Recipe::AlphaTest => "alpha_test",
        Recipe::MultiTex => "multi_tex",
        Recipe::NormalMap => "normal_map",
        Recipe::ProjTex => "proj_tex",
        Recipe::ReflectCube => "cubemap_reflect",
        Recipe::RefractCube => "cubemap_refract",
        Recipe::RenderToTex | Recipe::Texture => "texture",
    }
}

pub enum Scene {
    AlphaTest(AlphaTest),
    MultiTex(MultiTex),
    NormalMap(NormalMap),
    ProjTex(ProjTex),
    ReflectCube(ReflectCube),
    RefractCube(RefractCube),
    RenderToTex(RenderToTex),
    Texture(TextureCube),
}

macro_rules! dispatch {
    ($scene:expr, $s:ident => $body:expr) => {
        match $scene {
            Scene::AlphaTest($s) => $body,
            Scene::MultiTex($s) => $body,
            Scene::NormalMap($s) => $body,
            Scene::ProjTex($s) => $body,
            Scene::ReflectCube($s) => $body,
            Scene::RefractCube($s) => $body,
            Scene::RenderToTex($s) => $body,
            Scene::Texture($s) => $body,
        }
    };
}

impl Scene {
    /// Scene for `recipe`, without GPU resources.
    pub fn new(recipe: Recipe, assets: AssetPaths) -> Self {
        match recipe {
            Recipe::AlphaTest => Scene::AlphaTest(AlphaTest::new(assets)),
            Recipe::MultiTex => Scene::MultiTex(MultiTex::new(assets)),
            Recipe::NormalMap => Scene::NormalMap(NormalMap::new(assets)),
            Recipe::ProjTex => Scene::ProjTex(ProjTex::new(assets)),
            Recipe::ReflectCube => Scene::ReflectCube(ReflectCube::new(assets)),
            Recipe::RefractCube => Scene::RefractCube(RefractCube::new(assets)),
            Recipe::RenderToTex => Scene::RenderToTex(RenderToTex::new(assets)),
            Recipe::Texture => Scene::Texture(TextureCube::new(assets)),
        }
    }

    pub fn recipe(&self) -> Recipe {
        match self {
            Scene::AlphaTest(_) => Recipe::AlphaTest,
            Scene::MultiTex(_) => Recipe::MultiTex,
            Scene::NormalMap(_) => Recipe::NormalMap,
            Scene::ProjTex(_) => Recipe::ProjTex,
            Scene::ReflectCube(_) => Recipe::ReflectCube,
            Scene::RefractCube(_) => Recipe::RefractCube,
            Scene::RenderToTex(_) => Recipe::RenderToTex,
            Scene::Texture(_) => Recipe::Texture,
        }
    }

    /// Compile shaders, build meshes and load textures.
    pub fn init_scene(&mut self, gpu: &GpuContext) -> anyhow::Result<()> {
        let recipe = self.recipe();
        log::info!("Initialising scene '{recipe}'");
        dispatch!(self, s => s.init_scene(gpu))
            .with_context(|| format!("Failed to initialise scene '{recipe}'"))
    }

    /// Advance animation to absolute time `t` in seconds.
    pub fn update(&mut self, t: f32) {
        dispatch!(self, s => s.update(t))
    }

    /// Record this frame's passes and draws.
    pub fn render(&mut self, frame: &mut Frame) -> anyhow::Result<()> {
        let recipe = self.recipe();
        dispatch!(self, s => s.render(frame))
            .with_context(|| format!("Failed to render scene '{recipe}'"))
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        dispatch!(self, s => s.resize(width, height))
    }
}

/// Compile and link `<name>.vert.wgsl` + `<name>.frag.wgsl`.
pub(crate) fn compile_program(
    gpu: &GpuContext,
    assets: &AssetPaths,
    name: &str,
    layout: UniformLayout,
    textures: &[TextureSlot],
) -> anyhow::Result<ShaderProgram> {
    let vert = stage_path(&assets.shader_dir, name, ShaderStage::Vertex);
    let frag = stage_path(&assets.shader_dir, name, ShaderStage::Fragment);
    let program = ShaderProgram::builder(gpu, name)
        .uniforms(layout)
        .textures(textures)
        .compile_shader(ShaderStage::Vertex, &vert)?
        .compile_shader(ShaderStage::Fragment, &frag)?
        .link()?;
    Ok(program)
}

pub(crate) fn not_initialised() -> anyhow::Error {
    anyhow::anyhow!("render called before init_scene")
}
