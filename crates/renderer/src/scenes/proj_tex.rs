//! A flower texture projected onto a teapot and the ground from a fixed
//! projector, like a slide projector.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

use asset::{AssetPaths, shapes};
use corelib::{
    Camera, Mat4, Orbit, Recipe, Transform, Vec3, Viewport, camera::orbit_position, vec3,
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
    program::{ProgramError, ShaderProgram},
    texture::Texture2d,
    uniforms::{UniformLayout, UniformType},
};

const FLOWER: &str = "texture/flower.png";
const CAMERA_RADIUS: f32 = 7.0;
const CAMERA_HEIGHT: f32 = 2.0;
const PROJECTOR_EYE: Vec3 = vec3(2.0, 5.0, 5.0);
const PROJECTOR_AT: Vec3 = vec3(-2.0, -4.0, 0.0);

const TEAPOT_SURFACE: SurfaceMaterial = SurfaceMaterial {
    ka: Vec3::splat(0.1),
    kd: Vec3::splat(0.5),
    ks: Vec3::splat(0.95),
    shininess: 100.0,
};

const PLANE_SURFACE: SurfaceMaterial = SurfaceMaterial {
    ka: Vec3::splat(0.1),
    kd: Vec3::splat(0.4),
    ks: Vec3::ZERO,
    shininess: 1.0,
};

fn layout() -> UniformLayout {
    ads_layout()
        .field("model_matrix", UniformType::Mat4)
        .field("projector_matrix", UniformType::Mat4)
}

/// World space to projector texture space: `[0,1]²` across the
/// projector's frustum, v pointing down as texture rows do.
fn projector_matrix() -> Mat4 {
    let view = Mat4::look_at_rh(PROJECTOR_EYE, PROJECTOR_AT, Vec3::Y);
    let proj = Mat4::perspective_rh(30f32.to_radians(), 1.0, 0.2, 1000.0);
    let bias = Mat4::from_translation(vec3(0.5, 0.5, 0.0)) * Mat4::from_scale(vec3(0.5, -0.5, 1.0));
    bias * proj * view
}

pub struct ProjTex {
    assets: AssetPaths,
    orbit: Orbit,
    lens: Camera,
    viewport: Viewport,
    gpu: Option<ProjTexGpu>,
}

struct ProjTexGpu {
    program: ShaderProgram,
    teapot: GpuMesh,
    plane: GpuMesh,
    material: Material,
}

impl ProjTex {
    pub fn new(assets: AssetPaths) -> Self {
        Self {
            assets,
            orbit: Orbit::new(FRAC_PI_2, FRAC_PI_8),
            lens: Camera::looking_at_origin(Vec3::ZERO, 50.0, 0.3, 100.0),
            viewport: Viewport::default(),
            gpu: None,
        }
    }

    pub fn init_scene(&mut self, gpu: &GpuContext) -> anyhow::Result<()> {
        let mut program = compile_program(
            gpu,
            &self.assets,
            shader_name(Recipe::ProjTex),
            layout(),
            &[TextureSlot::D2],
        )?;
        program.set_uniform("projector_matrix", projector_matrix())?;

        let flower = Texture2d::load(
            gpu.device(),
            gpu.queue(),
            &self.assets.media(FLOWER),
            AddressMode::ClampToEdge,
        )?;
        let material = program.create_material(&[&flower])?;
        let device = gpu.device();
        self.gpu = Some(ProjTexGpu {
            program,
            teapot: GpuMesh::upload(device, "teapot", &shapes::teapot(14))?,
            plane: GpuMesh::upload(device, "plane", &shapes::plane(100.0, 100.0, 1, 1, 1.0, 1.0))?,
            material,
        });
        Ok(())
    }

    pub fn update(&mut self, t: f32) {
        self.orbit.update(t);
    }

    pub fn render(&mut self, frame: &mut Frame) -> anyhow::Result<()> {
        let camera = Camera {
            eye: orbit_position(self.orbit.angle(), CAMERA_RADIUS, CAMERA_HEIGHT),
            ..self.lens
        };
        let gpu = self.gpu.as_mut().ok_or_else(not_initialised)?;
        frame.clear(PassTarget::Surface, CLEAR_COLOR, Some(self.viewport));

        let program = &mut gpu.program;
        set_light(program, HEADLIGHT, Vec3::ONE)?;

        TEAPOT_SURFACE.apply(program)?;
        let teapot = Transform::translated_rotated_x(vec3(0.0, -1.0, 0.0), -90.0).matrix();
        set_model(program, teapot, &camera)?;
        program.draw(frame, &gpu.teapot, Some(&gpu.material))?;

        PLANE_SURFACE.apply(program)?;
        set_model(program, Mat4::from_translation(vec3(0.0, -0.75, 0.0)), &camera)?;
        program.draw(frame, &gpu.plane, Some(&gpu.material))?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.lens.fit_viewport(self.viewport);
    }
}

fn set_model(program: &mut ShaderProgram, model: Mat4, camera: &Camera) -> Result<(), ProgramError> {
    program.set_uniform("model_matrix", model)?;
    set_matrices(program, model, camera.view(), camera.proj())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_appends_projector_members() {
        let layout = layout();
        assert_eq!(layout.get("model_matrix").unwrap().offset, 256);
        assert_eq!(layout.get("projector_matrix").unwrap().offset, 320);
        assert_eq!(layout.size(), 384);
    }

    #[test]
    fn projector_axis_hits_texture_centre() {
        let p = projector_matrix() * PROJECTOR_AT.extend(1.0);
        assert!(p.w > 0.0);
        assert!((p.x / p.w - 0.5).abs() < 1e-5);
        assert!((p.y / p.w - 0.5).abs() < 1e-5);
    }

    #[test]
    fn projected_v_grows_downwards() {
        // a point above the projector axis lands in the upper half (small v)
        let above = PROJECTOR_AT + vec3(0.0, 0.5, 0.0);
        let p = projector_matrix() * above.extend(1.0);
        assert!(p.y / p.w < 0.5);
    }
}
