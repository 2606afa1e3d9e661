//! A brick-textured cube turning about Y, lit per fragment by a light at
//! the eye.

use std::f32::consts::FRAC_PI_8;

use asset::{AssetPaths, shapes};
use corelib::{Camera, Mat4, Orbit, Recipe, Vec3, Viewport, vec3};
use wgpu::AddressMode;

use super::{
    CLEAR_COLOR, compile_program,
    lighting::{HEADLIGHT, SurfaceMaterial, ads_layout, set_light, set_matrices},
    not_initialised, shader_name,
};
use crate::{
    GpuContext,
    frame::{Frame, PassTarget},
    material::{Material, TextureSlot},
    mesh::GpuMesh,
    program::{ProgramError, ShaderProgram},
    texture::Texture2d,
};

pub(super) const EYE: Vec3 = vec3(1.0, 1.25, 1.25);
pub(super) const ROTATION_SPEED: f32 = FRAC_PI_8;
pub(super) const BRICK: &str = "texture/brick1.jpg";

pub(super) const CUBE_SURFACE: SurfaceMaterial = SurfaceMaterial {
    ka: Vec3::splat(0.1),
    kd: Vec3::splat(0.9),
    ks: Vec3::splat(0.95),
    shininess: 100.0,
};

pub(super) fn cube_camera() -> Camera {
    Camera::looking_at_origin(EYE, 60.0, 0.3, 100.0)
}

/// Draw `cube` turned by `angle` about Y with the shared cube lighting.
pub(super) fn draw_cube(
    program: &mut ShaderProgram,
    frame: &mut Frame,
    cube: &GpuMesh,
    material: &Material,
    camera: &Camera,
    angle: f32,
) -> Result<(), ProgramError> {
    set_light(program, HEADLIGHT, Vec3::ONE)?;
    CUBE_SURFACE.apply(program)?;
    set_matrices(
        program,
        Mat4::from_rotation_y(angle),
        camera.view(),
        camera.proj(),
    )?;
    program.draw(frame, cube, Some(material))
}

pub struct TextureCube {
    assets: AssetPaths,
    orbit: Orbit,
    camera: Camera,
    viewport: Viewport,
    gpu: Option<TextureGpu>,
}

struct TextureGpu {
    program: ShaderProgram,
    cube: GpuMesh,
    material: Material,
}

impl TextureCube {
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
            shader_name(Recipe::Texture),
            ads_layout(),
            &[TextureSlot::D2],
        )?;
        let brick = Texture2d::load(
            gpu.device(),
            gpu.queue(),
            &self.assets.media(BRICK),
            AddressMode::Repeat,
        )?;
        let material = program.create_material(&[&brick])?;
        self.gpu = Some(TextureGpu {
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cube_turns_with_time() {
        let mut scene = TextureCube::new(AssetPaths::default());
        scene.update(1.0);
        assert_eq!(scene.orbit.angle(), 0.0);
        scene.update(3.0);
        assert!((scene.orbit.angle() - 2.0 * FRAC_PI_8).abs() < 1e-6);
    }

    #[test]
    fn resize_updates_projection() {
        let mut scene = TextureCube::new(AssetPaths::default());
        scene.resize(1000, 500);
        assert_eq!(scene.camera.aspect, 2.0);
        assert_eq!(scene.camera.eye, EYE);
    }
}
