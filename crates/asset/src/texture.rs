//! Decoded images ready for upload.
//! Any format the `image` crate was built with (TGA, PNG, JPEG) is decoded
//! to tightly packed RGBA8 rows, top row first.

use std::path::Path;

use anyhow::Context;

const RGBA8_BYTES: u32 = 4;

/// RGBA8 pixels plus their dimensions.
#[derive(Clone, Debug)]
pub struct TextureData {
    pub data: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

impl TextureData {
    /// Decode an image file into RGBA8.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        log::info!("Loading texture {}", path.display());

        let rgba = image::open(path)
            .with_context(|| format!("Failed to decode image {}", path.display()))?
            .into_rgba8();
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            anyhow::bail!("Image {} has no pixels", path.display());
        }
        log::debug!("Decoded {}: {width}x{height}", path.display());

        Ok(Self {
            data: rgba.into_raw(),
            width,
            height,
        })
    }

    /// A texture filled with one color.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba
            .iter()
            .copied()
            .cycle()
            .take((width * height * RGBA8_BYTES) as usize)
            .collect();
        Self {
            data,
            width,
            height,
        }
    }

    /// Bytes in one row of pixels.
    #[inline]
    pub fn row_bytes(&self) -> u32 {
        self.width * RGBA8_BYTES
    }

    pub fn is_valid(&self) -> bool {
        let expected = (self.row_bytes() * self.height) as usize;
        self.width > 0 && self.height > 0 && self.data.len() == expected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solid_texture_repeats_color() {
        let tex = TextureData::solid(2, 3, [10, 20, 30, 40]);
        assert!(tex.is_valid());
        assert_eq!(tex.row_bytes(), 8);
        assert!(tex.data.chunks(4).all(|px| px == [10, 20, 30, 40]));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = TextureData::load("definitely/not/here.png").unwrap_err();
        assert!(format!("{err:#}").contains("not/here.png"));
    }
}
