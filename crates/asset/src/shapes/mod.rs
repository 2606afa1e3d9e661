//! Procedural meshes: teapot, torus, plane, cube and skybox.
//! All shapes are centred on the origin and wound counter-clockwise when
//! seen from outside.

use std::f32::consts::TAU;

use crate::mesh::{MeshData, MeshVertex};

mod teapot;

pub use teapot::teapot;

/// Flat grid in the XZ plane facing +Y. `smax`/`tmax` scale the texture
/// coordinates so a texture can repeat across the plane.
pub fn plane(xsize: f32, zsize: f32, xdivs: u32, zdivs: u32, smax: f32, tmax: f32) -> MeshData {
    let xdivs = xdivs.max(1);
    let zdivs = zdivs.max(1);
    let mut vertices = Vec::with_capacity(((xdivs + 1) * (zdivs + 1)) as usize);
    for i in 0..=zdivs {
        let fz = i as f32 / zdivs as f32;
        let z = zsize * fz - zsize / 2.0;
        for j in 0..=xdivs {
            let fx = j as f32 / xdivs as f32;
            let x = xsize * fx - xsize / 2.0;
            vertices.push(MeshVertex::new(
                [x, 0.0, z],
                [0.0, 1.0, 0.0],
                [fx * smax, fz * tmax],
            ));
        }
    }

    let mut indices = Vec::with_capacity((xdivs * zdivs * 6) as usize);
    let row = xdivs + 1;
    for i in 0..zdivs {
        for j in 0..xdivs {
            let a = i * row + j;
            let b = a + row;
            // a, b lie on consecutive z rows; +Y facing means b, a+1 order
            indices.extend_from_slice(&[a, b, a + 1, a + 1, b, b + 1]);
        }
    }
    MeshData::new(vertices, indices)
}

/// Torus around the Z axis.
pub fn torus(outer_radius: f32, inner_radius: f32, nsides: u32, nrings: u32) -> MeshData {
    let nsides = nsides.max(3);
    let nrings = nrings.max(3);
    let mut vertices = Vec::with_capacity(((nsides + 1) * (nrings + 1)) as usize);
    for ring in 0..=nrings {
        let u = ring as f32 / nrings as f32;
        let (su, cu) = (u * TAU).sin_cos();
        for side in 0..=nsides {
            let v = side as f32 / nsides as f32;
            let (sv, cv) = (v * TAU).sin_cos();
            let r = outer_radius + inner_radius * cv;
            vertices.push(MeshVertex::new(
                [r * cu, r * su, inner_radius * sv],
                [cv * cu, cv * su, sv],
                [u, v],
            ));
        }
    }

    let mut indices = Vec::with_capacity((nsides * nrings * 6) as usize);
    let stride = nsides + 1;
    for ring in 0..nrings {
        for side in 0..nsides {
            let a = ring * stride + side;
            let b = a + stride;
            indices.extend_from_slice(&[a, b, b + 1, a, b + 1, a + 1]);
        }
    }
    MeshData::new(vertices, indices)
}

/// Axis-aligned cube of edge `size` with per-face normals and a full
/// `[0,1]²` texture on every face.
pub fn cube(size: f32) -> MeshData {
    let h = size / 2.0;
    box_faces(h, |normal| normal)
}

/// Cube of half-extent `size`, seen from inside. Only positions matter:
/// the shaders use them as cube-map lookup directions.
pub fn skybox(size: f32) -> MeshData {
    let mut mesh = box_faces(size, |_| [0.0; 3]);
    for tri in mesh.indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }
    mesh
}

/// Six quads of a box with half-extent `h`; `normal_of` picks the stored
/// normal for each face's outward direction.
fn box_faces(h: f32, normal_of: impl Fn([f32; 3]) -> [f32; 3]) -> MeshData {
    // (outward normal, u axis, v axis); u x v == normal keeps CCW winding
    const FACES: [([f32; 3], [f32; 3], [f32; 3]); 6] = [
        ([0.0, 0.0, 1.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([1.0, 0.0, 0.0], [0.0, 0.0, -1.0], [0.0, 1.0, 0.0]),
        ([0.0, 0.0, -1.0], [-1.0, 0.0, 0.0], [0.0, 1.0, 0.0]),
        ([-1.0, 0.0, 0.0], [0.0, 0.0, 1.0], [0.0, 1.0, 0.0]),
        ([0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
        ([0.0, -1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]),
    ];

    let mut vertices = Vec::with_capacity(24);
    let mut indices = Vec::with_capacity(36);
    for (n, u, v) in FACES {
        let base = vertices.len() as u32;
        for (su, sv) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            let p = [
                h * (n[0] + su * u[0] + sv * v[0]),
                h * (n[1] + su * u[1] + sv * v[1]),
                h * (n[2] + su * u[2] + sv * v[2]),
            ];
            let uv = [(su + 1.0) / 2.0, (1.0 - sv) / 2.0];
            vertices.push(MeshVertex::new(p, normal_of(n), uv));
        }
        indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }
    MeshData::new(vertices, indices)
}
