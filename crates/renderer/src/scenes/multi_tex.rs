//! The textured cube with moss blended over the brick by the moss alpha.

use asset::{AssetPaths, shapes};
use corelib::{Camera, Orbit, Recipe, Viewport};
use wgpu::AddressMode;

use super::{
    CLEAR_COLOR, compile_program,
    lighting::ads_layout,
    not_initialised, shader_name,
    texture_cube::{BRICK, ROTATION_SPEED, cube_camera, draw_cube},
};
use crate::{
    GpuContext,
    frame::{Frame, PassTarget},
    material::{Material, TextureSlot},
    mesh::GpuMesh,
    program::ShaderProgram,
    texture::Texture2d,
};

const MOSS: &str = "texture/moss.png";

pub struct MultiTex {
    assets: AssetPaths,
    orbit: Orbit,
    camera: Camera,
    viewport: Viewport,
    gpu: Option<MultiTexGpu>,
}

struct MultiTexGpu {
    program: ShaderProgram,
    cube: GpuMesh,
    material: Material,
}

impl MultiTex {
    pub fn new(assets: AssetPaths) -> Self {
        Self {
            assets,
            orbit: Orbit::new(0.0, ROTATION_SPEED),
            camera: cube_camera(),
            viewport: Viewport::default(),
            gpu: None,
        }
    }

    pub fn init_scene(&mut self, gpu: &GpuContext) -> anyhow::Result<()> {
        let program = compile_program(
            gpu,
            &self.assets,
            shader_name(Recipe::MultiTex),
            ads_layout(),
            &[TextureSlot::D2, TextureSlot::D2],
        )?;
        let load = |rel: &str| {
            Texture2d::load(
                gpu.device(),
                gpu.queue(),
                &self.assets.media(rel),
                AddressMode::Repeat,
            )
        };
        let brick = load(BRICK)?;
        let moss = load(MOSS)?;
        let material = program.create_material(&[&brick, &moss])?;
        self.gpu = Some(MultiTexGpu {
            program,
            cube: GpuMesh::upload(gpu.device(), "cube", &shapes::cube(1.0))?,
            material,
        });
        Ok(())
    }

    pub fn update(&mut self, t: f32) {
        self.orbit.update(t);
    }

    pub fn render(&mut self, frame: &mut Frame) -> anyhow::Result<()> {
        let gpu = self.gpu.as_mut().ok_or_else(not_initialised)?;
        frame.clear(PassTarget::Surface, CLEAR_COLOR, Some(self.viewport));
        draw_cube(
            &mut gpu.program,
            frame,
            &gpu.cube,
            &gpu.material,
            &self.camera,
            self.orbit.angle(),
        )?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.fit_viewport(self.viewport);
    }
}
