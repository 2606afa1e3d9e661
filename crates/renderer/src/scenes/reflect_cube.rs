//! Reflective teapot inside a cube-mapped skybox.
//!
//! The camera circles the origin at radius 7, height 2. The skybox is drawn
//! first with an identity model; the teapot then samples the same cube map
//! along the reflected view direction.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

use asset::{AssetPaths, shapes};
use corelib::{
    Camera, Mat4, Orbit, Recipe, Transform, Vec3, Vec4, Viewport, camera::orbit_position, vec3,
};

use super::{CLEAR_COLOR, compile_program, not_initialised, shader_name};
use crate::{
    GpuContext,
    frame::{Frame, PassTarget},
    material::{Material, TextureSlot},
    mesh::GpuMesh,
    program::{ProgramError, ShaderProgram},
    texture::CubeMap,
    uniforms::{UniformLayout, UniformType},
};

pub(super) const ROTATION_SPEED: f32 = FRAC_PI_8;
pub(super) const START_ANGLE: f32 = FRAC_PI_2;
const CAMERA_RADIUS: f32 = 7.0;
const CAMERA_HEIGHT: f32 = 2.0;
pub(super) const CUBE_MAP: &str = "texture/cubemap_night/night";

const MATERIAL_COLOR: Vec4 = Vec4::new(0.5, 0.5, 0.5, 1.0);
const REFLECT_FACTOR: f32 = 0.85;

fn layout() -> UniformLayout {
    UniformLayout::new()
        .field("model_matrix", UniformType::Mat4)
        .field("mvp", UniformType::Mat4)
        .field("world_camera_position", UniformType::Vec3)
        .field("draw_sky_box", UniformType::U32)
        .field("material_color", UniformType::Vec4)
        .field("reflect_factor", UniformType::F32)
}

/// Teapot, skybox and cube map shared by the environment-mapped scenes.
pub(super) struct Environment {
    pub teapot: GpuMesh,
    pub sky: GpuMesh,
    pub cube_map: CubeMap,
}

impl Environment {
    pub fn load(gpu: &GpuContext, assets: &AssetPaths) -> anyhow::Result<Self> {
        let device = gpu.device();
        Ok(Self {
            teapot: GpuMesh::upload(device, "teapot", &shapes::teapot(14))?,
            sky: GpuMesh::upload(device, "skybox", &shapes::skybox(50.0))?,
            cube_map: CubeMap::load(device, gpu.queue(), &assets.media(CUBE_MAP))?,
        })
    }
}

/// The Z-up teapot stood on its base, one unit below the origin.
pub(super) fn teapot_model() -> Mat4 {
    Transform::translated_rotated_x(vec3(0.0, -1.0, 0.0), -90.0).matrix()
}

/// Orbiting camera at `angle`, with the lens of `lens`.
pub(super) fn orbit_camera(lens: &Camera, angle: f32) -> Camera {
    Camera {
        eye: orbit_position(angle, CAMERA_RADIUS, CAMERA_HEIGHT),
        ..*lens
    }
}

pub(super) fn set_env_matrices(
    program: &mut ShaderProgram,
    model: Mat4,
    camera: &Camera,
) -> Result<(), ProgramError> {
    program.set_uniform("model_matrix", model)?;
    program.set_uniform("mvp", camera.proj_view() * model)
}

pub struct ReflectCube {
    assets: AssetPaths,
    orbit: Orbit,
    lens: Camera,
    viewport: Viewport,
    gpu: Option<ReflectGpu>,
}

struct ReflectGpu {
    program: ShaderProgram,
    env: Environment,
    material: Material,
    // built with the scene but not drawn
    #[allow(dead_code)]
    plane: GpuMesh,
    #[allow(dead_code)]
    torus: GpuMesh,
}

impl ReflectCube {
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
            shader_name(Recipe::ReflectCube),
            layout(),
            &[TextureSlot::Cube],
        )?;
        let env = Environment::load(gpu, &self.assets)?;
        let material = program.create_material(&[&env.cube_map])?;
        let c = 3.5;
        let device = gpu.device();
        self.gpu = Some(ReflectGpu {
            plane: GpuMesh::upload(device, "plane", &shapes::plane(1.0, 1.0, 1, 1, 1.0, 1.0))?,
            torus: GpuMesh::upload(device, "torus", &shapes::torus(0.7 * c, 0.3 * c, 50, 50))?,
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
        let camera = self.camera();
        let gpu = self.gpu.as_mut().ok_or_else(not_initialised)?;
        frame.clear(PassTarget::Surface, CLEAR_COLOR, Some(self.viewport));

        let program = &mut gpu.program;
        program.set_uniform("world_camera_position", camera.eye)?;

        program.set_uniform("draw_sky_box", true)?;
        set_env_matrices(program, Mat4::IDENTITY, &camera)?;
        program.draw(frame, &gpu.env.sky, Some(&gpu.material))?;
        program.set_uniform("draw_sky_box", false)?;

        program.set_uniform("material_color", MATERIAL_COLOR)?;
        program.set_uniform("reflect_factor", REFLECT_FACTOR)?;
        set_env_matrices(program, teapot_model(), &camera)?;
        program.draw(frame, &gpu.env.teapot, Some(&gpu.material))?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.lens.fit_viewport(self.viewport);
    }

    #[inline]
    pub fn angle(&self) -> f32 {
        self.orbit.angle()
    }

    /// Camera for the current angle and viewport.
    pub fn camera(&self) -> Camera {
        orbit_camera(&self.lens, self.orbit.angle())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_block_layout() {
        let layout = layout();
        let offsets: Vec<u32> = layout.fields().iter().map(|f| f.offset).collect();
        assert_eq!(offsets, vec![0, 64, 128, 140, 144, 160]);
        assert_eq!(layout.size(), 176);
    }

    #[test]
    fn starts_at_ninety_degrees() {
        let scene = ReflectCube::new(AssetPaths::default());
        assert_eq!(scene.angle(), FRAC_PI_2);
    }

    #[test]
    fn one_second_orbits_by_an_eighth_of_pi() {
        let mut scene = ReflectCube::new(AssetPaths::default());
        scene.update(0.0);
        assert_eq!(scene.angle(), FRAC_PI_2);
        scene.update(1.0);

        let angle = FRAC_PI_2 + FRAC_PI_8;
        assert!((scene.angle() - angle).abs() < 1e-5);
        let eye = scene.camera().eye;
        let expected = vec3(7.0 * angle.cos(), 2.0, 7.0 * angle.sin());
        assert!((eye - expected).length() < 1e-4, "{eye:?}");
    }

    #[test]
    fn resize_sets_aspect_and_clamps_height() {
        let mut scene = ReflectCube::new(AssetPaths::default());
        scene.resize(800, 600);
        assert!((scene.camera().aspect - 800.0 / 600.0).abs() < 1e-6);
        assert_eq!(scene.viewport, Viewport::new(800, 600));

        scene.resize(640, 0);
        assert_eq!(scene.camera().aspect, 640.0);
        assert!(scene.camera().proj().is_finite());
    }

    #[test]
    fn camera_looks_at_origin() {
        let mut scene = ReflectCube::new(AssetPaths::default());
        scene.resize(800, 600);
        let cam = scene.camera();
        // the origin projects to the centre of the screen
        let clip = cam.proj_view() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert!((clip.x / clip.w).abs() < 1e-5);
        assert!((clip.y / clip.w).abs() < 1e-5);
    }

    #[test]
    fn teapot_stands_on_its_base() {
        let model = teapot_model();
        // Z-up base centre lands one unit below the origin, the lid above it
        assert!((model.transform_point3(Vec3::ZERO) - vec3(0.0, -1.0, 0.0)).length() < 1e-5);
        assert!((model.transform_point3(Vec3::Z) - Vec3::ZERO).length() < 1e-5);
    }
}
