use crate::{EulerRot, Mat3, Mat4, Quat, Vec3};

/// Rigid transform with uniform or non-uniform scale (Euler XYZ).
#[derive(Clone, Copy, Debug)]
pub struct Transform {
    pub translation: Vec3,
    /// Euler angles in radians (XYZ order).
    pub rotation_euler: Vec3,
    pub scale: Vec3,
}

impl Transform {
    /// Translation followed by a rotation about X given in degrees. This is
    /// how the Z-up teapot is stood upright.
    #[inline]
    pub fn translated_rotated_x(translation: Vec3, degrees: f32) -> Self {
        Self {
            translation,
            rotation_euler: Vec3::new(degrees.to_radians(), 0.0, 0.0),
            scale: Vec3::ONE,
        }
    }

    /// Build matrix = T * R * S (column-major Mat4 per glam).
    #[inline]
    pub fn matrix(&self) -> Mat4 {
        let q = Quat::from_euler(
            EulerRot::XYZ,
            self.rotation_euler.x,
            self.rotation_euler.y,
            self.rotation_euler.z,
        );
        Mat4::from_scale_rotation_translation(self.scale, q, self.translation)
    }
}

/// Inverse-transpose of the upper 3x3 of a model-view matrix, for
/// transforming normals into eye space.
#[inline]
pub fn normal_matrix(model_view: Mat4) -> Mat3 {
    Mat3::from_mat4(model_view).inverse().transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec3;

    #[test]
    fn translated_rotated_x_matches_composition() {
        let t = Transform::translated_rotated_x(vec3(0.0, -1.0, 0.0), -90.0);
        let expected =
            Mat4::from_translation(vec3(0.0, -1.0, 0.0)) * Mat4::from_rotation_x((-90f32).to_radians());
        assert!(t.matrix().abs_diff_eq(expected, 1e-5));
    }

    #[test]
    fn z_up_becomes_y_up() {
        let m = Transform::translated_rotated_x(Vec3::ZERO, -90.0).matrix();
        let up = m.transform_vector3(Vec3::Z);
        assert!((up - Vec3::Y).length() < 1e-5);
    }

    #[test]
    fn normal_matrix_undoes_non_uniform_scale() {
        let mv = Mat4::from_scale(vec3(2.0, 1.0, 1.0));
        let n = normal_matrix(mv) * vec3(1.0, 1.0, 0.0);
        assert!((n - vec3(0.5, 1.0, 0.0)).length() < 1e-6);
    }
}
