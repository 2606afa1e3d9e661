/// Drawable area in physical pixels. Both sides are at least 1 so the
/// aspect ratio is always finite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    #[inline]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Intersection with another area, anchored at the origin.
    pub fn clamp_to(&self, other: Viewport) -> Viewport {
        Viewport::new(self.width.min(other.width), self.height.min(other.height))
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1, 1)
    }
}
