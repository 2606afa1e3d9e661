//! A spinning teapot rendered into a 512x512 texture, which is then mapped
//! onto a cube seen from an orbiting camera. Both passes use the texture
//! program; the teapot pass binds a plain white texture.

use std::f32::consts::FRAC_PI_8;

use asset::{AssetPaths, shapes, texture::TextureData};
use corelib::{Camera, Mat4, Orbit, Recipe, Vec3, Viewport, camera::orbit_position, vec3};
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
    program::ShaderProgram,
    texture::{RenderTarget, Texture2d},
};

pub const TARGET_SIZE: u32 = 512;
const CUBE_RADIUS: f32 = 2.0;
const CUBE_HEIGHT: f32 = 1.5;

const TEAPOT_SURFACE: SurfaceMaterial = SurfaceMaterial {
    ka: Vec3::splat(0.1),
    kd: Vec3::splat(0.9),
    ks: Vec3::splat(0.95),
    shininess: 100.0,
};

const CUBE_SURFACE: SurfaceMaterial = SurfaceMaterial {
    ka: Vec3::splat(0.1),
    kd: Vec3::splat(0.9),
    ks: Vec3::ZERO,
    shininess: 1.0,
};

pub struct RenderToTex {
    assets: AssetPaths,
    orbit: Orbit,
    teapot_camera: Camera,
    cube_lens: Camera,
    viewport: Viewport,
    gpu: Option<RenderToTexGpu>,
}

struct RenderToTexGpu {
    program: ShaderProgram,
    teapot: GpuMesh,
    cube: GpuMesh,
    target: RenderTarget,
    white: Material,
    rendered: Material,
}

impl RenderToTex {
    pub fn new(assets: AssetPaths) -> Self {
        let mut teapot_camera = Camera::looking_at_origin(vec3(0.0, 0.0, 7.0), 60.0, 0.3, 100.0);
        teapot_camera.target = vec3(0.0, -1.0, 0.0);
        Self {
            assets,
            orbit: Orbit::new(0.0, FRAC_PI_8),
            teapot_camera,
            cube_lens: Camera::looking_at_origin(Vec3::ZERO, 45.0, 0.3, 100.0),
            viewport: Viewport::default(),
            gpu: None,
        }
    }

    pub fn init_scene(&mut self, gpu: &GpuContext) -> anyhow::Result<()> {
        let program = compile_program(
            gpu,
            &self.assets,
            shader_name(Recipe::RenderToTex),
            ads_layout(),
            &[TextureSlot::D2],
        )?;
        let device = gpu.device();
        let white = Texture2d::upload(
            device,
            gpu.queue(),
            "white",
            &TextureData::solid(1, 1, [255; 4]),
            AddressMode::Repeat,
        );
        let target = RenderTarget::new(device, gpu.surface_format(), TARGET_SIZE, TARGET_SIZE);
        self.gpu = Some(RenderToTexGpu {
            white: program.create_material(&[&white])?,
            rendered: program.create_material(&[&target])?,
            teapot: GpuMesh::upload(device, "teapot", &shapes::teapot(14))?,
            cube: GpuMesh::upload(device, "cube", &shapes::cube(1.0))?,
            program,
            target,
        });
        Ok(())
    }

    pub fn update(&mut self, t: f32) {
        self.orbit.update(t);
    }

    pub fn render(&mut self, frame: &mut Frame) -> anyhow::Result<()> {
        let angle = self.orbit.angle();
        let cube_camera = Camera {
            eye: orbit_position(angle, CUBE_RADIUS, CUBE_HEIGHT),
            ..self.cube_lens
        };
        let gpu = self.gpu.as_mut().ok_or_else(not_initialised)?;
        let program = &mut gpu.program;
        set_light(program, HEADLIGHT, Vec3::ONE)?;

        // teapot into the texture
        frame.clear(PassTarget::Offscreen(gpu.target.clone()), CLEAR_COLOR, None);
        TEAPOT_SURFACE.apply(program)?;
        let model = Mat4::from_rotation_y(angle) * Mat4::from_rotation_x(-90f32.to_radians());
        set_matrices(
            program,
            model,
            self.teapot_camera.view(),
            self.teapot_camera.proj(),
        )?;
        program.draw(frame, &gpu.teapot, Some(&gpu.white))?;

        // textured cube to the window
        frame.clear(PassTarget::Surface, CLEAR_COLOR, Some(self.viewport));
        CUBE_SURFACE.apply(program)?;
        set_matrices(
            program,
            Mat4::IDENTITY,
            cube_camera.view(),
            cube_camera.proj(),
        )?;
        program.draw(frame, &gpu.cube, Some(&gpu.rendered))?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.cube_lens.fit_viewport(self.viewport);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teapot_pass_keeps_square_aspect() {
        let mut scene = RenderToTex::new(AssetPaths::default());
        scene.resize(800, 600);
        assert_eq!(scene.teapot_camera.aspect, 1.0);
        assert!((scene.cube_lens.aspect - 800.0 / 600.0).abs() < 1e-6);
    }
}
