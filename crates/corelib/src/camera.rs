use crate::{Mat4, Vec3, Viewport, vec3};

/// Simple perspective camera (right-handed, looking at `target`).
#[derive(Clone, Copy, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_rad: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub aspect: f32,
}

impl Camera {
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        eye: Vec3,
        target: Vec3,
        up: Vec3,
        fov_y_rad: f32,
        z_near: f32,
        z_far: f32,
        aspect: f32,
    ) -> Self {
        Self {
            eye,
            target,
            up,
            fov_y_rad,
            z_near,
            z_far,
            aspect,
        }
    }

    /// Camera at `eye` looking at the world origin with +Y up.
    pub fn looking_at_origin(eye: Vec3, fov_y_deg: f32, z_near: f32, z_far: f32) -> Self {
        Self::new_perspective(
            eye,
            Vec3::ZERO,
            Vec3::Y,
            fov_y_deg.to_radians(),
            z_near,
            z_far,
            1.0,
        )
    }

    #[inline]
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Depth range is `[0, 1]`, as the wgpu clip space expects.
    #[inline]
    pub fn proj(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_rad,
            self.aspect.max(1e-6),
            self.z_near,
            self.z_far,
        )
    }

    #[inline]
    pub fn proj_view(&self) -> Mat4 {
        self.proj() * self.view()
    }

    /// Match the aspect ratio to a freshly resized viewport.
    #[inline]
    pub fn fit_viewport(&mut self, viewport: Viewport) {
        self.aspect = viewport.aspect();
    }
}

/// Point on a horizontal circle of `radius` around the Y axis at `height`.
#[inline]
pub fn orbit_position(angle: f32, radius: f32, height: f32) -> Vec3 {
    vec3(radius * angle.cos(), height, radius * angle.sin())
}
