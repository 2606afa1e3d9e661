//! Teapot cut out by the alpha channel of a moss texture. Fragments with
//! alpha below 0.15 are discarded; back faces are lit with the flipped
//! normal so the inside shows through the holes.

use std::f32::consts::FRAC_PI_8;

use asset::{AssetPaths, shapes};
use corelib::{
    Camera, Orbit, Recipe, Transform, Vec3, Viewport, camera::orbit_position, vec3,
};
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
    texture::Texture2d,
};

const CAMERA_RADIUS: f32 = 6.0;
const CAMERA_HEIGHT: f32 = 0.25;
const MOSS: &str = "texture/moss.png";

const SURFACE: SurfaceMaterial = SurfaceMaterial {
    ka: Vec3::splat(0.1),
    kd: Vec3::splat(0.9),
    ks: Vec3::ZERO,
    shininess: 100.0,
};

pub struct AlphaTest {
    assets: AssetPaths,
    orbit: Orbit,
    lens: Camera,
    viewport: Viewport,
    gpu: Option<AlphaTestGpu>,
}

struct AlphaTestGpu {
    program: ShaderProgram,
    teapot: GpuMesh,
    material: Material,
}

impl AlphaTest {
    pub fn new(assets: AssetPaths) -> Self {
        Self {
            assets,
            orbit: Orbit::new(0.0, FRAC_PI_8),
            lens: Camera::looking_at_origin(Vec3::ZERO, 50.0, 0.3, 100.0),
            viewport: Viewport::default(),
            gpu: None,
        }
    }

    pub fn init_scene(&mut self, gpu: &GpuContext) -> anyhow::Result<()> {
        let program = compile_program(
            gpu,
            &self.assets,
            shader_name(Recipe::AlphaTest),
            ads_layout(),
            &[TextureSlot::D2],
        )?;
        let moss = Texture2d::load(
            gpu.device(),
            gpu.queue(),
            &self.assets.media(MOSS),
            AddressMode::Repeat,
        )?;
        let material = program.create_material(&[&moss])?;
        self.gpu = Some(AlphaTestGpu {
            program,
            teapot: GpuMesh::upload(gpu.device(), "teapot", &shapes::teapot(14))?,
            material,
        });
        Ok(())
    }

    pub fn update(&mut self, t: f32) {
        self.orbit.update(t);
    }

    pub fn render(&mut self, frame: &mut Frame) -> anyhow::Result<()> {
        let camera = self.camera();
        let gpu = self.gpu.as_mut().ok_or_else(not_initialised)?;
        frame.clear(PassTarget::Surface, CLEAR_COLOR, Some(self.viewport));

        let program = &mut gpu.program;
        set_light(program, HEADLIGHT, Vec3::ONE)?;
        SURFACE.apply(program)?;
        let model = Transform::translated_rotated_x(vec3(0.0, -1.5, 0.0), -90.0).matrix();
        set_matrices(program, model, camera.view(), camera.proj())?;
        program.draw(frame, &gpu.teapot, Some(&gpu.material))?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.lens.fit_viewport(self.viewport);
    }

    fn camera(&self) -> Camera {
        Camera {
            eye: orbit_position(self.orbit.angle(), CAMERA_RADIUS, CAMERA_HEIGHT),
            ..self.lens
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn camera_circles_at_radius_six() {
        let mut scene = AlphaTest::new(AssetPaths::default());
        scene.update(0.0);
        scene.update(4.0);
        let eye = scene.camera().eye;
        assert!((vec3(eye.x, 0.0, eye.z).length() - CAMERA_RADIUS).abs() < 1e-4);
        assert_eq!(eye.y, CAMERA_HEIGHT);
        // four seconds at pi/8 is a quarter turn from +X
        assert!((eye - vec3(0.0, CAMERA_HEIGHT, CAMERA_RADIUS)).length() < 1e-4);
    }
}
