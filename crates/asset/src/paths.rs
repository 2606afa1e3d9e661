//! Where shaders and media live on disk.

use std::path::PathBuf;

/// Root directories for shader sources and media (textures, meshes).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetPaths {
    pub shader_dir: PathBuf,
    pub media_dir: PathBuf,
}

impl AssetPaths {
    pub fn new(shader_dir: impl Into<PathBuf>, media_dir: impl Into<PathBuf>) -> Self {
        Self {
            shader_dir: shader_dir.into(),
            media_dir: media_dir.into(),
        }
    }

    #[inline]
    pub fn media(&self, relative: &str) -> PathBuf {
        self.media_dir.join(relative)
    }
}

impl Default for AssetPaths {
    fn default() -> Self {
        Self::new("shaders", "media")
    }
}
