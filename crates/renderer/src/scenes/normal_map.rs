//! Ogre head lit in tangent space from a normal map, with a light
//! circling the model.

use std::f32::consts::{FRAC_PI_2, FRAC_PI_8};

use asset::{AssetPaths, obj};
use corelib::{Camera, Mat4, Orbit, Recipe, Vec3, Vec4, Viewport, camera::orbit_position, vec3};
use wgpu::AddressMode;

use super::{
    CLEAR_COLOR, compile_program,
    lighting::{SurfaceMaterial, ads_layout, set_light, set_matrices},
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

const MESH: &str = "bs_ears.obj";
const DIFFUSE: &str = "texture/ogre_diffuse.png";
const NORMAL_MAP: &str = "texture/ogre_normalmap.png";

const EYE: Vec3 = vec3(-1.0, 0.25, 2.0);
const LIGHT_RADIUS: f32 = 10.0;
const LIGHT_HEIGHT: f32 = 1.0;
const LIGHT_INTENSITY: Vec3 = Vec3::splat(0.9);

// kd comes from the diffuse map
const SURFACE: SurfaceMaterial = SurfaceMaterial {
    ka: Vec3::splat(0.1),
    kd: Vec3::ONE,
    ks: Vec3::splat(0.2),
    shininess: 1.0,
};

pub struct NormalMap {
    assets: AssetPaths,
    orbit: Orbit,
    camera: Camera,
    viewport: Viewport,
    gpu: Option<NormalMapGpu>,
}

struct NormalMapGpu {
    program: ShaderProgram,
    mesh: GpuMesh,
    material: Material,
}

impl NormalMap {
    pub fn new(assets: AssetPaths) -> Self {
        Self {
            assets,
            orbit: Orbit::new(FRAC_PI_2, FRAC_PI_8),
            camera: Camera::looking_at_origin(EYE, 35.0, 0.3, 100.0),
            viewport: Viewport::default(),
            gpu: None,
        }
    }

    pub fn init_scene(&mut self, gpu: &GpuContext) -> anyhow::Result<()> {
        let program = compile_program(
            gpu,
            &self.assets,
            shader_name(Recipe::NormalMap),
            ads_layout(),
            &[TextureSlot::D2, TextureSlot::D2],
        )?;

        let mut mesh = obj::load_obj_from_path(self.assets.media(MESH))?;
        mesh.compute_tangents();

        let diffuse = Texture2d::load(
            gpu.device(),
            gpu.queue(),
            &self.assets.media(DIFFUSE),
            AddressMode::Repeat,
        )?;
        let normals = Texture2d::load(
            gpu.device(),
            gpu.queue(),
            &self.assets.media(NORMAL_MAP),
            AddressMode::Repeat,
        )?;
        let material = program.create_material(&[&diffuse, &normals])?;

        self.gpu = Some(NormalMapGpu {
            program,
            mesh: GpuMesh::upload(gpu.device(), "ogre", &mesh)?,
            material,
        });
        Ok(())
    }

    pub fn update(&mut self, t: f32) {
        self.orbit.update(t);
    }

    pub fn render(&mut self, frame: &mut Frame) -> anyhow::Result<()> {
        let view = self.camera.view();
        let light = self.light_position(view);
        let gpu = self.gpu.as_mut().ok_or_else(not_initialised)?;
        frame.clear(PassTarget::Surface, CLEAR_COLOR, Some(self.viewport));

        let program = &mut gpu.program;
        set_light(program, light, LIGHT_INTENSITY)?;
        SURFACE.apply(program)?;
        set_matrices(program, Mat4::IDENTITY, view, self.camera.proj())?;
        program.draw(frame, &gpu.mesh, Some(&gpu.material))?;
        Ok(())
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.fit_viewport(self.viewport);
    }

    /// Orbiting light, in eye space.
    fn light_position(&self, view: Mat4) -> Vec4 {
        let world = orbit_position(self.orbit.angle(), LIGHT_RADIUS, LIGHT_HEIGHT);
        view * world.extend(1.0)
    }
}
