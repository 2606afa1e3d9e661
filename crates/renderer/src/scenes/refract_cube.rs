//! Refractive teapot inside the same skybox as the reflective one. The
//! teapot mixes the refracted and reflected environment colors.

use asset::AssetPaths;
use corelib::{Camera, Mat4, Orbit, Recipe, Vec3, Viewport};

use super::{
    CLEAR_COLOR, compile_program, not_initialised,
    reflect_cube::{
        Environment, ROTATION_SPEED, START_ANGLE, orbit_camera, set_env_matrices, teapot_model,
    },
    shader_name,
};
use crate::{
    GpuContext,
    frame::{Frame, PassTarget},
    material::{Material, TextureSlot},
    program::ShaderProgram,
    uniforms::{UniformLayout, UniformType},
};

/// Ratio of refraction indices, air to glass-like.
const ETA: f32 = 0.94;
const REFLECTION_FACTOR: f32 = 0.1;

fn layout() -> UniformLayout {
    UniformLayout::new()
        .field("model_matrix", UniformType::Mat4)
        .field("mvp", UniformType::Mat4)
        .field("world_camera_position", UniformType::Vec3)
        .field("draw_sky_box", UniformType::U32)
        .field("eta", UniformType::F32)
        .field("reflection_factor", UniformType::F32)
}

pub struct RefractCube {
    assets: AssetPaths,
    orbit: Orbit,
    lens: Camera,
    viewport: Viewport,
    gpu: Option<RefractGpu>,
}

struct RefractGpu {
    program: ShaderProgram,
    env: Environment,
    material: Material,
}

impl RefractCube {
    pub fn new(assets: AssetPaths) -> Self {
        Self {
            assets,
            orbit: Orbit::new(START_ANGLE, ROTATION_SPEED),
            lens: Camera::looking_at_origin(Vec3::ZERO, 50.0, 0.3, 100.0),
            viewport: Viewport::default(),
            gpu: None,
        }
    }

    pub fn init_scene(&mut self, gpu: &GpuContext) -> anyhow::Result<()> {
        let program = compile_program(
            gpu,
            &self.assets,
            shader_name(Recipe::RefractCube),
            layout(),
            &[TextureSlot::Cube],
        )?;
        let env = Environment::load(gpu, &self.assets)?;
        let material = program.create_material(&[&env.cube_map])?;
        self.gpu = Some(RefractGpu {
            program,
            env,
            material,
        });
        self.orbit = Orbit::new(START_ANGLE, ROTATION_SPEED);
        Ok(())
    }

    pub fn update(&mut self, t: f32) {
        self.orbit.update(t);
    }

    pub fn render(&mut self, frame: &mut Frame) -> anyhow::Result<()> {
        let camera = orbit_camera(&self.lens, self.orbit.angle());
        let gpu = self.gpu.as_mut().ok_or_else(not_initialised)?;
        frame.clear(PassTarget::Surface, CLEAR_COLOR, Some(self.viewport));

        let program = &mut gpu.program;
        program.set_uniform("world_camera_position", camera.eye)?;

        program.set_uniform("draw_sky_box", true)?;
        set_env_matrices(program, Mat4::IDENTITY, &camera)?;
        program.draw(frame, &gpu.env.sky, Some(&gpu.material))?;
        program.set_uniform("draw_sky_box", false)?;

        program.set_uniform("eta", ETA)?;
        program.set_uniform("reflection_factor", REFLECTION_FACTOR)?;
        set_env_matrices(program, teapot_model(), &camera)?;
        program.draw(frame, &gpu.env.teapot, Some(&gpu.material))?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.lens.fit_viewport(self.viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_layout() {
        let layout = layout();
        assert_eq!(layout.get("eta").unwrap().offset, 144);
        assert_eq!(layout.get("reflection_factor").unwrap().offset, 148);
        assert_eq!(layout.size(), 160);
    }

    #[test]
    fn orbits_like_the_reflective_scene() {
        let mut scene = RefractCube::new(AssetPaths::default());
        scene.update(5.0);
        scene.update(7.0);
        let expected = START_ANGLE + 2.0 * ROTATION_SPEED;
        assert!((scene.orbit.angle() - expected).abs() < 1e-5);
    }
}
