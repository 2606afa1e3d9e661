//! Teapot built from the classic profile curves.
//!
//! Z is up (the scenes stand it upright with a -90° turn about X). Rim,
//! body, bottom and lid are surfaces of revolution of cubic Bézier profiles;
//! handle and spout are tubes swept along Bézier paths in the XZ plane.

use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use crate::mesh::{MeshData, MeshVertex};

/// (radius, height) control points, four per cubic segment, traversed from
/// the top of the rim down to the centre of the base.
const BODY_PROFILE: [[f32; 2]; 16] = [
    [1.4, 2.4], [1.3375, 2.53125], [1.4375, 2.53125], [1.5, 2.4],
    [1.5, 2.4], [1.75, 1.875], [2.0, 1.35], [2.0, 0.9],
    [2.0, 0.9], [2.0, 0.45], [1.5, 0.225], [1.5, 0.15],
    [1.5, 0.15], [1.5, 0.075], [1.425, 0.0], [0.0, 0.0],
];

/// Lid, from the knob on the axis out to the rim.
const LID_PROFILE: [[f32; 2]; 8] = [
    [0.0, 3.15], [0.8, 3.15], [0.0, 2.85], [0.2, 2.7],
    [0.2, 2.7], [0.4, 2.55], [1.3, 2.55], [1.3, 2.4],
];

/// (x, z) path of the handle centre line.
const HANDLE_PATH: [[f32; 2]; 8] = [
    [-1.6, 1.875], [-2.3, 1.875], [-2.7, 1.875], [-2.7, 1.65],
    [-2.7, 1.65], [-2.7, 1.425], [-2.5, 0.975], [-2.0, 0.75],
];
const HANDLE_RADIUS: (f32, f32) = (0.15, 0.15);

/// (x, z) path of the spout centre line.
const SPOUT_PATH: [[f32; 2]; 8] = [
    [1.7, 1.275], [2.6, 1.275], [2.3, 1.95], [2.7, 2.25],
    [2.7, 2.25], [2.8, 2.325], [2.9, 2.325], [3.0, 2.25],
];
const SPOUT_RADIUS: (f32, f32) = (0.45, 0.15);

/// Teapot with `grid` samples per Bézier segment (the classic value is 14).
pub fn teapot(grid: u32) -> MeshData {
    let grid = grid.max(2);
    let slices = grid * 4;

    let mut mesh = lathe(&sample_curve(&BODY_PROFILE, grid), slices);
    mesh.append(lathe(&sample_curve(&LID_PROFILE, grid), slices));
    mesh.append(tube(&sample_curve(&HANDLE_PATH, grid), HANDLE_RADIUS, grid));
    mesh.append(tube(&sample_curve(&SPOUT_PATH, grid), SPOUT_RADIUS, grid));
    mesh
}

fn bezier(p: &[[f32; 2]], t: f32) -> Vec2 {
    let s = 1.0 - t;
    Vec2::from(p[0]) * (s * s * s)
        + Vec2::from(p[1]) * (3.0 * s * s * t)
        + Vec2::from(p[2]) * (3.0 * s * t * t)
        + Vec2::from(p[3]) * (t * t * t)
}

/// Points along consecutive cubic segments; shared segment ends appear once.
fn sample_curve(control: &[[f32; 2]], grid: u32) -> Vec<Vec2> {
    let mut points = Vec::new();
    for (seg, p) in control.chunks_exact(4).enumerate() {
        let first = if seg == 0 { 0 } else { 1 };
        for i in first..=grid {
            points.push(bezier(p, i as f32 / grid as f32));
        }
    }
    points
}

/// Finite-difference direction of the curve at `i`.
fn direction(points: &[Vec2], i: usize) -> Vec2 {
    let prev = points[i.saturating_sub(1)];
    let next = points[(i + 1).min(points.len() - 1)];
    (next - prev).normalize_or(Vec2::X)
}

/// Revolve a (radius, height) profile around Z. The profile runs so that
/// the outside is on its right, giving the outward normal `(-dz, dr)`.
fn lathe(profile: &[Vec2], slices: u32) -> MeshData {
    let mut vertices = Vec::with_capacity(profile.len() * (slices as usize + 1));
    for (i, p) in profile.iter().enumerate() {
        let d = direction(profile, i);
        let n = Vec2::new(-d.y, d.x);
        let v = i as f32 / (profile.len() - 1) as f32;
        for j in 0..=slices {
            let u = j as f32 / slices as f32;
            let (s, c) = (u * TAU).sin_cos();
            vertices.push(MeshVertex::new(
                [p.x * c, p.x * s, p.y],
                Vec3::new(n.x * c, n.x * s, n.y).normalize_or(Vec3::Z).to_array(),
                [u, v],
            ));
        }
    }
    MeshData::new(vertices, grid_indices(profile.len() as u32, slices))
}

/// Sweep a circle along an (x, z) path, radius interpolated linearly from
/// `radius.0` at the start to `radius.1` at the end.
fn tube(path: &[Vec2], radius: (f32, f32), sides: u32) -> MeshData {
    let sides = sides.max(3);
    let mut vertices = Vec::with_capacity(path.len() * (sides as usize + 1));
    for (i, c) in path.iter().enumerate() {
        let v = i as f32 / (path.len() - 1) as f32;
        let r = radius.0 + (radius.1 - radius.0) * v;
        let d = direction(path, i);
        let tangent = Vec3::new(d.x, 0.0, d.y);
        // the path lies in the XZ plane, so Y is always perpendicular to it
        let side = tangent.cross(Vec3::Y).normalize_or(Vec3::X);
        let centre = Vec3::new(c.x, 0.0, c.y);
        for j in 0..=sides {
            let u = j as f32 / sides as f32;
            let (s, co) = (u * TAU).sin_cos();
            let n = side * co + Vec3::Y * s;
            vertices.push(MeshVertex::new(
                (centre + n * r).to_array(),
                n.to_array(),
                [u, v],
            ));
        }
    }
    MeshData::new(vertices, grid_indices(path.len() as u32, sides))
}

/// Two triangles per cell of a `rows` x `(cols + 1)` vertex grid.
fn grid_indices(rows: u32, cols: u32) -> Vec<u32> {
    let stride = cols + 1;
    let mut indices = Vec::with_capacity(((rows - 1) * cols * 6) as usize);
    for i in 0..rows - 1 {
        for j in 0..cols {
            let a = i * stride + j;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn teapot_is_valid_with_unit_normals() {
        let mesh = teapot(14);
        assert!(mesh.is_valid());
        for v in &mesh.vertices {
            let n = Vec3::from(v.normal);
            assert!((n.length() - 1.0).abs() < 1e-3, "normal {n:?}");
        }
    }

    #[test]
    fn teapot_fits_classic_bounds() {
        let mesh = teapot(8);
        let (mut lo, mut hi) = (Vec3::splat(f32::MAX), Vec3::splat(f32::MIN));
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            lo = lo.min(p);
            hi = hi.max(p);
        }
        assert!(lo.z >= -1e-4 && hi.z <= 3.15 + 1e-4);
        assert!(lo.x > -3.0 && hi.x < 3.5);
    }

    #[test]
    fn body_normals_point_away_from_axis() {
        let profile = sample_curve(&BODY_PROFILE, 10);
        let mesh = lathe(&profile, 16);
        // row at the widest part of the body (r == 2.0, z == 0.9)
        let row = profile
            .iter()
            .position(|p| (p.x - 2.0).abs() < 1e-4 && (p.y - 0.9).abs() < 1e-4)
            .unwrap();
        for v in &mesh.vertices[row * 17..(row + 1) * 17] {
            let p = Vec3::from(v.position);
            let radial = Vec3::new(p.x, p.y, 0.0).normalize();
            assert!(Vec3::from(v.normal).dot(radial) > 0.9);
        }
    }

    #[test]
    fn grid_density_controls_size() {
        assert!(teapot(4).vertices.len() < teapot(14).vertices.len());
    }
}
