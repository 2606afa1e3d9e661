//! Uniforms shared by the Phong-lit techniques.

use corelib::{Mat4, Vec3, Vec4, transform::normal_matrix};

use crate::{
    program::{ProgramError, ShaderProgram},
    uniforms::{UniformLayout, UniformType},
};

/// `model_view`, `normal_matrix`, `mvp`, the light and the material.
pub(crate) fn ads_layout() -> UniformLayout {
    UniformLayout::new()
        .field("model_view", UniformType::Mat4)
        .field("normal_matrix", UniformType::Mat3)
        .field("mvp", UniformType::Mat4)
        .field("light_position", UniformType::Vec4)
        .field("light_intensity", UniformType::Vec3)
        .field("ka", UniformType::Vec3)
        .field("kd", UniformType::Vec3)
        .field("ks", UniformType::Vec3)
        .field("shininess", UniformType::F32)
}

/// Phong reflectivities.
#[derive(Clone, Copy, Debug)]
pub(crate) struct SurfaceMaterial {
    pub ka: Vec3,
    pub kd: Vec3,
    pub ks: Vec3,
    pub shininess: f32,
}

impl SurfaceMaterial {
    pub fn apply(&self, program: &mut ShaderProgram) -> Result<(), ProgramError> {
        program.set_uniform("ka", self.ka)?;
        program.set_uniform("kd", self.kd)?;
        program.set_uniform("ks", self.ks)?;
        program.set_uniform("shininess", self.shininess)
    }
}

/// `position` is in eye space; `w == 1` for a point light.
pub(crate) fn set_light(
    program: &mut ShaderProgram,
    position: Vec4,
    intensity: Vec3,
) -> Result<(), ProgramError> {
    program.set_uniform("light_position", position)?;
    program.set_uniform("light_intensity", intensity)
}

pub(crate) fn set_matrices(
    program: &mut ShaderProgram,
    model: Mat4,
    view: Mat4,
    proj: Mat4,
) -> Result<(), ProgramError> {
    let mv = view * model;
    program.set_uniform("model_view", mv)?;
    program.set_uniform("normal_matrix", normal_matrix(mv))?;
    program.set_uniform("mvp", proj * mv)
}

/// A light at the eye, the usual setup of the textured scenes.
pub(crate) const HEADLIGHT: Vec4 = Vec4::new(0.0, 0.0, 0.0, 1.0);
