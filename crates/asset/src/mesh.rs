//! CPU-side mesh representation used by loaders and shape generators.

use glam::{Vec2, Vec3};

/// Vertex with position/normal/uv/tangent. Values are in object space.
/// `tangent.w` is the handedness of the bitangent (`±1`).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
    pub tangent: [f32; 4],
}

impl MeshVertex {
    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
            tangent: [0.0; 4],
        }
    }
}

/// Indexed triangle mesh with tightly-packed vertices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn new(vertices: Vec<MeshVertex>, indices: Vec<u32>) -> Self {
        Self { vertices, indices }
    }

    /// Returns `true` if both vertex and index buffers are non-empty and
    /// every index points at a vertex.
    pub fn is_valid(&self) -> bool {
        !self.vertices.is_empty()
            && !self.indices.is_empty()
            && self.indices.len() % 3 == 0
            && self
                .indices
                .iter()
                .all(|&i| (i as usize) < self.vertices.len())
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append another mesh, rebasing its indices.
    pub fn append(&mut self, other: MeshData) {
        let base = self.vertices.len() as u32;
        self.vertices.extend(other.vertices);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Replace every normal with the area-weighted average of the faces
    /// sharing the vertex.
    pub fn compute_normals(&mut self) {
        let mut acc = vec![Vec3::ZERO; self.vertices.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let p0 = Vec3::from(self.vertices[a].position);
            let p1 = Vec3::from(self.vertices[b].position);
            let p2 = Vec3::from(self.vertices[c].position);
            let n = (p1 - p0).cross(p2 - p0);
            acc[a] += n;
            acc[b] += n;
            acc[c] += n;
        }
        for (v, n) in self.vertices.iter_mut().zip(acc) {
            v.normal = n.normalize_or(Vec3::Y).to_array();
        }
    }

    /// Per-vertex tangents from the uv layout, Gram-Schmidt orthogonalised
    /// against the normal. Degenerate uv triangles contribute nothing.
    pub fn compute_tangents(&mut self) {
        let n = self.vertices.len();
        let mut tan = vec![Vec3::ZERO; n];
        let mut bitan = vec![Vec3::ZERO; n];

        for tri in self.indices.chunks_exact(3) {
            let corners = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let [va, vb, vc] = corners.map(|i| self.vertices[i]);

            let e1 = Vec3::from(vb.position) - Vec3::from(va.position);
            let e2 = Vec3::from(vc.position) - Vec3::from(va.position);
            let d1 = Vec2::from(vb.uv) - Vec2::from(va.uv);
            let d2 = Vec2::from(vc.uv) - Vec2::from(va.uv);

            let det = d1.x * d2.y - d2.x * d1.y;
            if det.abs() < 1e-12 {
                continue;
            }
            let r = 1.0 / det;
            let t = (e1 * d2.y - e2 * d1.y) * r;
            let b = (e2 * d1.x - e1 * d2.x) * r;
            for i in corners {
                tan[i] += t;
                bitan[i] += b;
            }
        }

        for (i, v) in self.vertices.iter_mut().enumerate() {
            let normal = Vec3::from(v.normal);
            let t = (tan[i] - normal * normal.dot(tan[i])).normalize_or(any_orthogonal(normal));
            let w = if normal.cross(t).dot(bitan[i]) < 0.0 {
                -1.0
            } else {
                1.0
            };
            v.tangent = [t.x, t.y, t.z, w];
        }
    }
}

fn any_orthogonal(n: Vec3) -> Vec3 {
    if n.x.abs() < 0.9 {
        n.cross(Vec3::X).normalize_or(Vec3::Z)
    } else {
        n.cross(Vec3::Y).normalize_or(Vec3::Z)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quad() -> MeshData {
        let n = [0.0, 0.0, 1.0];
        MeshData::new(
            vec![
                MeshVertex::new([0.0, 0.0, 0.0], n, [0.0, 0.0]),
                MeshVertex::new([1.0, 0.0, 0.0], n, [1.0, 0.0]),
                MeshVertex::new([1.0, 1.0, 0.0], n, [1.0, 1.0]),
                MeshVertex::new([0.0, 1.0, 0.0], n, [0.0, 1.0]),
            ],
            vec![0, 1, 2, 0, 2, 3],
        )
    }

    #[test]
    fn mesh_data_validity() {
        let data = MeshData::new(vec![MeshVertex::default()], vec![0, 0, 0]);
        assert!(data.is_valid());
        let bad = MeshData::new(vec![MeshVertex::default()], vec![0, 0, 1]);
        assert!(!bad.is_valid());
    }

    #[test]
    fn append_rebases_indices() {
        let mut a = quad();
        a.append(quad());
        assert_eq!(a.vertices.len(), 8);
        assert_eq!(&a.indices[6..], &[4, 5, 6, 4, 6, 7]);
        assert!(a.is_valid());
    }

    #[test]
    fn tangent_follows_u_axis() {
        let mut mesh = quad();
        mesh.compute_tangents();
        for v in &mesh.vertices {
            assert!((Vec3::from_slice(&v.tangent[..3]) - Vec3::X).length() < 1e-5);
            assert_eq!(v.tangent[3], 1.0);
        }
    }

    #[test]
    fn mirrored_uvs_flip_handedness() {
        let mut mesh = quad();
        for v in &mut mesh.vertices {
            v.uv[1] = 1.0 - v.uv[1];
        }
        mesh.compute_tangents();
        assert!(mesh.vertices.iter().all(|v| v.tangent[3] == -1.0));
    }

    #[test]
    fn computed_normals_face_out_of_ccw_winding() {
        let mut mesh = quad();
        for v in &mut mesh.vertices {
            v.normal = [0.0; 3];
        }
        mesh.compute_normals();
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }
}
