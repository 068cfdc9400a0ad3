use super::{Bitmap, FilterKind, PackedColor};
use rayon::prelude::*;

/// Minimum pixel count before splitting a filter pass across rows.
pub const DEFAULT_PARALLEL_MIN_PIXELS: usize = 262_144; // 512x512

/// Applies a [`FilterKind`] to every pixel of a bitmap, producing a new one.
#[derive(Debug, Clone, Copy)]
pub struct ImageTransformer {
    parallel_min_pixels: usize,
}

impl Default for ImageTransformer {
    fn default() -> Self {
        Self {
            parallel_min_pixels: DEFAULT_PARALLEL_MIN_PIXELS,
        }
    }
}

impl ImageTransformer {
    /// Transformer that goes row-parallel once an image reaches `parallel_min_pixels`.
    pub const fn with_parallel_threshold(parallel_min_pixels: usize) -> Self {
        Self {
            parallel_min_pixels,
        }
    }

    /// Filter `source` into a freshly allocated bitmap of identical size.
    ///
    /// The source is only read. Every output pixel depends on its source pixel
    /// alone, so the sequential and row-parallel paths give the same result.
    pub fn transform(&self, source: &Bitmap, filter: FilterKind) -> Bitmap {
        let [width, height] = source.size();
        if source.is_empty() {
            return Bitmap::empty(width, height);
        }

        let src = source.pixels();
        let mut out = vec![PackedColor::BLACK; src.len()];
        if src.len() >= self.parallel_min_pixels {
            out.par_chunks_mut(width)
                .zip(src.par_chunks(width))
                .for_each(|(dst_row, src_row)| filter_row(filter, src_row, dst_row));
        } else {
            filter_row(filter, src, &mut out);
        }
        Bitmap::from_parts(width, height, out)
    }
}

fn filter_row(filter: FilterKind, src: &[PackedColor], dst: &mut [PackedColor]) {
    for (out, &color) in dst.iter_mut().zip(src) {
        *out = filter.apply(color);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn transform(source: &Bitmap, filter: FilterKind) -> Bitmap {
        ImageTransformer::default().transform(source, filter)
    }

    fn gradient(width: usize, height: usize) -> Bitmap {
        let mut pixels = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                let r = u8::try_from(x % 256).unwrap();
                let g = u8::try_from(y % 256).unwrap();
                let b = u8::try_from((x * 7 + y * 13) % 256).unwrap();
                pixels.push(PackedColor::from_rgb(r, g, b));
            }
        }
        Bitmap::new(width, height, pixels).unwrap()
    }

    #[test]
    fn preserves_dimensions_for_every_filter() {
        let source = gradient(5, 3);
        for kind in FilterKind::ALL {
            let out = transform(&source, kind);
            assert_eq!(out.size(), source.size(), "{kind:?} changed size");
            assert_eq!(out.pixel_count(), source.pixel_count());
        }
    }

    #[test]
    fn single_white_pixel_through_sepia() {
        let source = Bitmap::filled(1, 1, PackedColor::WHITE);
        let out = transform(&source, FilterKind::Sepia);
        assert_eq!(out.pixel(0, 0).map(PackedColor::channels), Some([255, 255, 238]));
    }

    #[test]
    fn single_black_pixel_through_each_filter() {
        let source = Bitmap::filled(1, 1, PackedColor::BLACK);
        let gray = transform(&source, FilterKind::Grayscale);
        let sepia = transform(&source, FilterKind::Sepia);
        let invert = transform(&source, FilterKind::Invert);
        assert_eq!(gray.pixel(0, 0), Some(PackedColor::BLACK));
        assert_eq!(sepia.pixel(0, 0), Some(PackedColor::BLACK));
        assert_eq!(invert.pixel(0, 0), Some(PackedColor::WHITE));
    }

    #[test]
    fn two_by_two_grayscale_averages_each_pixel() {
        let inputs: [[u8; 3]; 4] = [[255, 0, 0], [10, 20, 31], [0, 0, 2], [100, 150, 200]];
        let pixels = inputs.iter().map(|&c| PackedColor::from(c)).collect();
        let source = Bitmap::new(2, 2, pixels).unwrap();
        let out = transform(&source, FilterKind::Grayscale);
        assert_eq!(out.size(), [2, 2]);
        for (idx, [r, g, b]) in inputs.iter().enumerate() {
            let avg = u8::try_from((u16::from(*r) + u16::from(*g) + u16::from(*b)) / 3).unwrap();
            let got = out.pixel(idx % 2, idx / 2).unwrap();
            assert_eq!(got.channels(), [avg, avg, avg], "pixel {idx}");
        }
        // 85, 20, 0, 150
        assert_eq!(
            out.pixels().iter().map(|c| c.red()).collect::<Vec<_>>(),
            vec![85, 20, 0, 150]
        );
    }

    #[test]
    fn source_is_left_untouched() {
        let source = gradient(4, 4);
        let copy = source.clone();
        let _ = transform(&source, FilterKind::Invert);
        assert_eq!(source, copy);
    }

    #[test]
    fn parallel_and_sequential_paths_agree() {
        let source = gradient(37, 23);
        let sequential = ImageTransformer::with_parallel_threshold(usize::MAX);
        let parallel = ImageTransformer::with_parallel_threshold(1);
        for kind in FilterKind::ALL {
            assert_eq!(
                sequential.transform(&source, kind),
                parallel.transform(&source, kind),
                "{kind:?} differs between paths"
            );
        }
    }

    #[test]
    fn degenerate_bitmap_yields_empty_output() {
        let source = Bitmap::new(0, 3, Vec::new()).unwrap();
        let out = transform(&source, FilterKind::Sepia);
        assert_eq!(out.size(), [0, 3]);
        assert!(out.pixels().is_empty());
    }
}
