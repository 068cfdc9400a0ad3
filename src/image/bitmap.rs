use super::PackedColor;
use std::fmt;

/// Fixed-size, row-major grid of packed colors.
///
/// A bitmap is never mutated after construction; filters build a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: usize,
    height: usize,
    pixels: Vec<PackedColor>,
}

/// Raised when a pixel buffer does not cover exactly `width * height` entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapError {
    SizeMismatch {
        width: usize,
        height: usize,
        len: usize,
    },
}

impl fmt::Display for BitmapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { width, height, len } => write!(
                f,
                "Pixel buffer holds {len} values but a {width}x{height} image needs {}",
                width.saturating_mul(*height)
            ),
        }
    }
}

impl std::error::Error for BitmapError {}

impl Bitmap {
    /// Build a bitmap from row-major pixels, checking the buffer length.
    pub fn new(
        width: usize,
        height: usize,
        pixels: Vec<PackedColor>,
    ) -> Result<Self, BitmapError> {
        if width.checked_mul(height) != Some(pixels.len()) {
            return Err(BitmapError::SizeMismatch {
                width,
                height,
                len: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Bitmap with every pixel set to `color`.
    #[cfg(test)]
    pub fn filled(width: usize, height: usize, color: PackedColor) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width * height],
        }
    }

    /// Zero-area bitmap keeping the given (degenerate) dimensions.
    pub(super) const fn empty(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: Vec::new(),
        }
    }

    /// Caller guarantees `pixels.len() == width * height`.
    pub(super) fn from_parts(width: usize, height: usize, pixels: Vec<PackedColor>) -> Self {
        debug_assert_eq!(width * height, pixels.len());
        Self {
            width,
            height,
            pixels,
        }
    }

    pub const fn width(&self) -> usize {
        self.width
    }

    pub const fn height(&self) -> usize {
        self.height
    }

    /// `[width, height]`, matching egui's image size convention.
    pub const fn size(&self) -> [usize; 2] {
        [self.width, self.height]
    }

    pub fn pixel_count(&self) -> usize {
        self.pixels.len()
    }

    /// True for degenerate bitmaps with zero width or height.
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixels(&self) -> &[PackedColor] {
        &self.pixels
    }

    /// Color at `(x, y)`, or `None` outside the grid.
    pub fn pixel(&self, x: usize, y: usize) -> Option<PackedColor> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(y * self.width + x).copied()
    }
}
