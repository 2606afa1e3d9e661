//! Wavefront OBJ reader: positions, texture coordinates, normals and
//! polygon faces (fan-triangulated). Other statements are skipped.
//!
//! Vertices are de-duplicated per `v/vt/vn` triple. When the file carries
//! no normals at all, smooth normals are generated from the faces.

use std::{
    collections::HashMap,
    fs::File,
    io::{self, BufRead, BufReader},
    path::Path,
};

use anyhow::{Context, Result, anyhow};

use crate::mesh::{MeshData, MeshVertex};

/// Load an OBJ mesh from a file path.
pub fn load_obj_from_path(path: impl AsRef<Path>) -> Result<MeshData> {
    let path = path.as_ref();
    log::info!("Loading mesh from {:?}", path);
    let file =
        File::open(path).with_context(|| format!("Failed to open OBJ file: {}", path.display()))?;
    let mesh = load_obj_from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse OBJ file: {}", path.display()))?;
    log::info!(
        "Loaded mesh with {} vertices, {} triangles",
        mesh.vertices.len(),
        mesh.triangle_count()
    );
    Ok(mesh)
}

/// Load an OBJ mesh from a [`BufRead`] implementation.
pub fn load_obj_from_reader<R: BufRead>(reader: R) -> Result<MeshData> {
    let mut builder = ObjBuilder::default();
    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
        builder
            .statement(line.trim())
            .with_context(|| format!("line {line_no}: '{}'", line.trim()))?;
    }
    builder.finish()
}

/// Convenience helper to parse an OBJ string literal.
pub fn load_obj_from_str(contents: &str) -> Result<MeshData> {
    load_obj_from_reader(io::Cursor::new(contents))
}

/// Corner reference: position index plus optional uv and normal indices,
/// all zero-based.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
struct Corner {
    position: usize,
    uv: Option<usize>,
    normal: Option<usize>,
}

#[derive(Default)]
struct ObjBuilder {
    positions: Vec<[f32; 3]>,
    uvs: Vec<[f32; 2]>,
    normals: Vec<[f32; 3]>,
    corners: HashMap<Corner, u32>,
    mesh: MeshData,
    polygon: Vec<u32>,
}

impl ObjBuilder {
    fn statement(&mut self, line: &str) -> Result<()> {
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let [x, y, z] = floats(&mut parts, ["x", "y", "z"])?;
                self.positions.push([x, y, z]);
            }
            Some("vt") => {
                let [u, v] = floats(&mut parts, ["u", "v"])?;
                self.uvs.push([u, v]);
            }
            Some("vn") => {
                let [x, y, z] = floats(&mut parts, ["nx", "ny", "nz"])?;
                self.normals.push([x, y, z]);
            }
            Some("f") => self.face(parts)?,
            // o/g/s/usemtl/mtllib and friends
            _ => {}
        }
        Ok(())
    }

    fn face<'a>(&mut self, parts: impl Iterator<Item = &'a str>) -> Result<()> {
        self.polygon.clear();
        for token in parts {
            let corner = self.corner(token)?;
            let index = self.vertex_for(corner)?;
            self.polygon.push(index);
        }
        if self.polygon.len() < 3 {
            return Ok(());
        }
        for i in 1..self.polygon.len() - 1 {
            self.mesh
                .indices
                .extend_from_slice(&[self.polygon[0], self.polygon[i], self.polygon[i + 1]]);
        }
        Ok(())
    }

    fn corner(&self, token: &str) -> Result<Corner> {
        let mut fields = token.split('/');
        let position = match fields.next() {
            Some(p) if !p.is_empty() => resolve_index(p, self.positions.len())?,
            _ => return Err(anyhow!("Malformed face element '{token}'")),
        };
        let uv = match fields.next() {
            Some(t) if !t.is_empty() => Some(resolve_index(t, self.uvs.len())?),
            _ => None,
        };
        let normal = match fields.next() {
            Some(n) if !n.is_empty() => Some(resolve_index(n, self.normals.len())?),
            _ => None,
        };
        Ok(Corner {
            position,
            uv,
            normal,
        })
    }

    fn vertex_for(&mut self, corner: Corner) -> Result<u32> {
        if let Some(&index) = self.corners.get(&corner) {
            return Ok(index);
        }
        let index = u32::try_from(self.mesh.vertices.len())
            .map_err(|_| anyhow!("Too many vertices in OBJ (>{})", u32::MAX))?;
        let uv = corner.uv.map_or([0.0, 0.0], |i| self.uvs[i]);
        let normal = corner.normal.map_or([0.0, 0.0, 0.0], |i| self.normals[i]);
        self.mesh
            .vertices
            .push(MeshVertex::new(self.positions[corner.position], normal, uv));
        self.corners.insert(corner, index);
        Ok(index)
    }

    fn finish(mut self) -> Result<MeshData> {
        if self.mesh.vertices.is_empty() || self.mesh.indices.is_empty() {
            anyhow::bail!("OBJ contained no triangles");
        }
        if self.normals.is_empty() {
            log::debug!("OBJ has no normals, generating smooth normals");
            self.mesh.compute_normals();
        }
        Ok(self.mesh)
    }
}

fn floats<'a, const N: usize>(
    parts: &mut impl Iterator<Item = &'a str>,
    names: [&str; N],
) -> Result<[f32; N]> {
    let mut out = [0.0; N];
    for (slot, name) in out.iter_mut().zip(names) {
        let token = parts.next().ok_or_else(|| anyhow!("Missing {name}"))?;
        *slot = token
            .parse::<f32>()
            .with_context(|| format!("Failed to parse {name} from '{token}'"))?;
    }
    Ok(out)
}

/// OBJ indices are 1-based; negative values count back from the most
/// recently declared element.
fn resolve_index(token: &str, len: usize) -> Result<usize> {
    let raw = token
        .parse::<i64>()
        .with_context(|| format!("Invalid index '{token}'"))?;
    let idx = match raw {
        0 => anyhow::bail!("OBJ indices are 1-based; found 0"),
        r if r > 0 => r - 1,
        r => len as i64 + r,
    };
    if idx < 0 || idx as usize >= len {
        anyhow::bail!("OBJ index {raw} resolved out of bounds (len={len})");
    }
    Ok(idx as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_simple_triangle() {
        let src = r#"
            v 0.0 0.0 0.0
            v 1.0 0.0 0.0
            v 0.0 1.0 0.0
            vn 0.0 0.0 1.0
            vt 0.0 0.0
            vt 1.0 0.0
            vt 0.0 1.0
            f 1/1/1 2/2/1 3/3/1
        "#;
        let mesh = load_obj_from_str(src).expect("parse triangle");
        assert_eq!(mesh.vertices.len(), 3);
        assert_eq!(mesh.indices.len(), 3);
        assert!(mesh.is_valid());
    }

    #[test]
    fn quad_is_fan_triangulated_and_shared_corners_reused() {
        let src = "v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\nf 1 3 4\n";
        let mesh = load_obj_from_str(src).unwrap();
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3, 0, 2, 3]);
    }

    #[test]
    fn missing_normals_are_generated() {
        let mesh = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n").unwrap();
        assert!(mesh.vertices.iter().all(|v| v.normal == [0.0, 0.0, 1.0]));
    }

    #[test]
    fn negative_indices_count_from_the_end() {
        let mesh = load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf -3 -2 -1\n").unwrap();
        assert_eq!(mesh.vertices[2].position, [0.0, 1.0, 0.0]);
    }

    #[test]
    fn zero_and_out_of_range_indices_fail() {
        assert!(load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 0 1 2\n").is_err());
        assert!(load_obj_from_str("v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 4\n").is_err());
    }

    #[test]
    fn file_without_faces_fails() {
        assert!(load_obj_from_str("v 0 0 0\n# nothing else\n").is_err());
    }
}
