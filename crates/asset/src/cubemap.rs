//! Cube-map face images.
//!
//! A cube map is stored as six files sharing a base name:
//! `<base>_posx.tga`, `<base>_negx.tga`, ... `<base>_negz.tga`.
//! Every face must decode to a [`FACE_SIZE`] x [`FACE_SIZE`] RGBA8 image.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::texture::TextureData;

/// Edge length, in pixels, of every cube-map face.
pub const FACE_SIZE: u32 = 256;

/// Cube faces in upload order (array layer 0..6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];

    pub const fn suffix(self) -> &'static str {
        match self {
            CubeFace::PosX => "posx",
            CubeFace::NegX => "negx",
            CubeFace::PosY => "posy",
            CubeFace::NegY => "negy",
            CubeFace::PosZ => "posz",
            CubeFace::NegZ => "negz",
        }
    }

    /// Array layer of this face in a cube texture.
    pub const fn layer(self) -> u32 {
        self as u32
    }
}

/// `<base>_<suffix>.tga`
pub fn face_path(base: &Path, face: CubeFace) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push("_");
    name.push(face.suffix());
    name.push(".tga");
    PathBuf::from(name)
}

/// Decode the six faces one at a time and hand each to `upload`.
///
/// A face is dropped as soon as `upload` returns. The first missing,
/// undecodable or mis-sized face stops the load with an error naming it.
pub fn load_faces<F>(base: &Path, mut upload: F) -> anyhow::Result<()>
where
    F: FnMut(CubeFace, &TextureData) -> anyhow::Result<()>,
{
    log::info!("Loading cube map {}", base.display());
    for face in CubeFace::ALL {
        let path = face_path(base, face);
        if !path.is_file() {
            anyhow::bail!(
                "Cube-map face {} is missing: {}",
                face.suffix(),
                path.display()
            );
        }

        let data = TextureData::load(&path)
            .with_context(|| format!("Cube-map face {} could not be decoded", face.suffix()))?;
        if data.width != FACE_SIZE || data.height != FACE_SIZE {
            anyhow::bail!(
                "Cube-map face {} is {}x{}, expected {}x{}: {}",
                face.suffix(),
                data.width,
                data.height,
                FACE_SIZE,
                FACE_SIZE,
                path.display()
            );
        }

        upload(face, &data)
            .with_context(|| format!("Failed to upload cube-map face {}", face.suffix()))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    struct TempDir(PathBuf);

    impl TempDir {
        fn new(tag: &str) -> Self {
            let dir = std::env::temp_dir().join(format!(
                "texlab-cubemap-{}-{}",
                tag,
                std::process::id()
            ));
            let _ = fs::remove_dir_all(&dir);
            fs::create_dir_all(&dir).unwrap();
            Self(dir)
        }
    }

    impl Drop for TempDir {
        fn drop(&mut self) {
            let _ = fs::remove_dir_all(&self.0);
        }
    }

    fn write_face(base: &Path, face: CubeFace, size: u32) {
        let img = image::RgbaImage::from_pixel(size, size, image::Rgba([face.layer() as u8, 0, 0, 255]));
        img.save(face_path(base, face)).unwrap();
    }

    #[test]
    fn face_paths_follow_naming_convention() {
        let p = face_path(Path::new("media/cubemap_night/night"), CubeFace::NegY);
        assert_eq!(p, PathBuf::from("media/cubemap_night/night_negy.tga"));
    }

    #[test]
    fn faces_map_to_consecutive_layers() {
        let layers: Vec<u32> = CubeFace::ALL.iter().map(|f| f.layer()).collect();
        assert_eq!(layers, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn loads_all_faces_in_order() {
        let dir = TempDir::new("ok");
        let base = dir.0.join("sky");
        for face in CubeFace::ALL {
            write_face(&base, face, FACE_SIZE);
        }

        let mut seen = Vec::new();
        load_faces(&base, |face, data| {
            assert_eq!((data.width, data.height), (FACE_SIZE, FACE_SIZE));
            assert_eq!(data.data[0], face.layer() as u8);
            seen.push(face);
            Ok(())
        })
        .unwrap();
        assert_eq!(seen, CubeFace::ALL.to_vec());
    }

    #[test]
    fn missing_face_is_reported() {
        let dir = TempDir::new("missing");
        let base = dir.0.join("sky");
        for face in &CubeFace::ALL[..5] {
            write_face(&base, *face, FACE_SIZE);
        }

        let mut uploads = 0;
        let err = load_faces(&base, |_, _| {
            uploads += 1;
            Ok(())
        })
        .unwrap_err();
        assert_eq!(uploads, 5);
        assert!(err.to_string().contains("negz"));
    }

    #[test]
    fn mis_sized_face_is_reported() {
        let dir = TempDir::new("size");
        let base = dir.0.join("sky");
        for face in CubeFace::ALL {
            let size = if face == CubeFace::PosY { 128 } else { FACE_SIZE };
            write_face(&base, face, size);
        }

        let err = load_faces(&base, |_, _| Ok(())).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("posy"));
        assert!(msg.contains("128x128"));
    }
}
