//! Core types shared by every crate: math re-exports, camera, transforms,
//! animation state, viewport and the recipe catalogue. Renderer-agnostic.

pub use glam::{EulerRot, Mat3, Mat4, Quat, Vec3, Vec4, vec3, vec4};

pub mod animation;
pub mod camera;
pub mod error;
pub mod recipe;
pub mod transform;
pub mod viewport;

pub use animation::Orbit;
pub use camera::Camera;
pub use error::CoreError;
pub use recipe::Recipe;
pub use transform::Transform;
pub use viewport::Viewport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upright_teapot_base_is_below_the_lid_on_screen() {
        let mut cam = Camera::looking_at_origin(vec3(0.0, 2.0, 7.0), 50.0, 0.3, 100.0);
        cam.fit_viewport(Viewport::new(800, 600));
        let model = Transform::translated_rotated_x(vec3(0.0, -1.0, 0.0), -90.0).matrix();

        let ndc = |p: Vec3| {
            let clip = cam.proj_view() * model.transform_point3(p).extend(1.0);
            clip.truncate() / clip.w
        };
        let base = ndc(Vec3::ZERO);
        let lid = ndc(vec3(0.0, 0.0, 1.5));
        assert!(base.y < lid.y, "base {base:?} lid {lid:?}");
        assert!(base.x.abs() < 1e-5 && lid.x.abs() < 1e-5);
    }

    #[test]
    fn looking_at_origin_keeps_world_up() {
        let cam = Camera::looking_at_origin(vec3(1.0, 1.25, 1.25), 60.0, 0.3, 100.0);
        assert_eq!(cam.target, Vec3::ZERO);
        assert_eq!(cam.up, Vec3::Y);
        assert!((cam.fov_y_rad - 60f32.to_radians()).abs() < 1e-6);
        // a point straight above the origin stays above it in view space
        let view = cam.view();
        let above = view.transform_point3(Vec3::Y) - view.transform_point3(Vec3::ZERO);
        assert!(above.y > 0.0);
    }

    #[test]
    fn clip_depth_spans_zero_to_one() {
        let cam = Camera::looking_at_origin(vec3(0.0, 0.0, 5.0), 45.0, 0.5, 50.0);
        let depth = |z: f32| {
            let clip = cam.proj_view() * Vec4::new(0.0, 0.0, z, 1.0);
            clip.z / clip.w
        };
        assert!(depth(4.5).abs() < 1e-5);
        assert!((depth(-45.0) - 1.0).abs() < 1e-4);
    }
}
