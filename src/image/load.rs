use super::{Bitmap, PackedColor, SourceFormat};
use crate::config::ImageLimits;
use anyhow::Context as _;
use image::{GenericImageView, ImageReader, Limits, RgbImage};
use std::io::{BufRead, Cursor, Read, Seek};
use std::path::Path;

/// A decoded picture plus what it looked like before flattening.
#[derive(Debug)]
pub struct DecodedImage {
    pub bitmap: Bitmap,
    pub source: SourceFormat,
}

fn decode_reader_to_bitmap<R>(
    limits: &ImageLimits,
    mut reader: ImageReader<R>,
) -> anyhow::Result<DecodedImage>
where
    R: Read + Seek + BufRead,
{
    let il = limits.sanitized();
    let mut decoder_limits = Limits::default();
    decoder_limits.max_image_width = Some(il.image_dim);
    decoder_limits.max_image_height = Some(il.image_dim);
    decoder_limits.max_alloc = Some(il.alloc_bytes);
    reader.limits(decoder_limits);
    let format = reader.format();
    let img = reader.decode().context("Failed to decode image data")?;

    let (w, h) = img.dimensions();
    if w == 0 || h == 0 {
        anyhow::bail!("Image has no pixels ({w}x{h})");
    }
    let total_pixels = u64::from(w) * u64::from(h);
    if total_pixels > il.total_pixels {
        anyhow::bail!(
            "Image too large: {}x{} (~{} MP) exceeds limit (~{} MP)",
            w,
            h,
            total_pixels / 1_000_000,
            il.total_pixels / 1_000_000
        );
    }

    let source = SourceFormat {
        format,
        color_type: img.color(),
    };
    // Alpha and wider sample formats are flattened to 8-bit RGB here.
    Ok(DecodedImage {
        bitmap: bitmap_from_rgb(&img.to_rgb8()),
        source,
    })
}

/// Copy an 8-bit RGB buffer into a packed bitmap.
fn bitmap_from_rgb(rgb: &RgbImage) -> Bitmap {
    let pixels = rgb
        .pixels()
        .map(|pixel| PackedColor::from(pixel.0))
        .collect();
    // An `RgbImage` always holds exactly width * height pixels.
    Bitmap::from_parts(rgb.width() as usize, rgb.height() as usize, pixels)
}

/// Load and decode an image from a filesystem path using configured limits.
pub fn decode_image_from_path(
    limits: &ImageLimits,
    path: &Path,
) -> anyhow::Result<DecodedImage> {
    let reader = ImageReader::open(path)
        .with_context(|| format!("Failed to read {}", path.display()))?
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_reader_to_bitmap(limits, reader)
}

/// Load and decode an image from raw bytes using configured limits.
pub fn decode_image_from_bytes(
    limits: &ImageLimits,
    bytes: Vec<u8>,
) -> anyhow::Result<DecodedImage> {
    let cursor = Cursor::new(bytes);
    let reader = ImageReader::new(cursor)
        .with_guessed_format()
        .context("Failed to detect image format")?;
    decode_reader_to_bitmap(limits, reader)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, ImageFormat, Rgb, Rgba, RgbaImage};

    fn encode_png(image: &RgbaImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn decodes_png_bytes_and_drops_alpha() {
        let mut rgba = RgbaImage::new(2, 1);
        rgba.put_pixel(0, 0, Rgba([10, 20, 30, 255]));
        rgba.put_pixel(1, 0, Rgba([200, 100, 50, 0]));
        let decoded = decode_image_from_bytes(&ImageLimits::default(), encode_png(&rgba))
            .expect("decode png");
        assert_eq!(decoded.source.format, Some(ImageFormat::Png));
        assert_eq!(decoded.source.color_type, ColorType::Rgba8);
        let bitmap = decoded.bitmap;
        assert_eq!(bitmap.size(), [2, 1]);
        assert_eq!(bitmap.pixel(0, 0), Some(PackedColor::from_rgb(10, 20, 30)));
        assert_eq!(bitmap.pixel(1, 0), Some(PackedColor::from_rgb(200, 100, 50)));
    }

    #[test]
    fn rejects_garbage_bytes() {
        let err = decode_image_from_bytes(&ImageLimits::default(), b"not an image".to_vec())
            .expect_err("garbage must not decode");
        assert!(!err.to_string().is_empty());
    }

    #[test]
    fn missing_file_reports_path() {
        let path = Path::new("/definitely/not/here/picture.png");
        let err = decode_image_from_path(&ImageLimits::default(), path)
            .expect_err("missing file must fail");
        assert!(err.to_string().contains("picture.png"));
    }

    #[test]
    fn enforces_dimension_limit() {
        let rgba = RgbaImage::new(100, 1);
        let limits = ImageLimits {
            image_dim: 64,
            ..ImageLimits::default()
        };
        assert!(decode_image_from_bytes(&limits, encode_png(&rgba)).is_err());
    }

    #[test]
    fn rgb_buffer_maps_row_major() {
        let mut rgb = RgbImage::new(2, 2);
        rgb.put_pixel(1, 0, Rgb([1, 2, 3]));
        rgb.put_pixel(0, 1, Rgb([4, 5, 6]));
        let bitmap = bitmap_from_rgb(&rgb);
        assert_eq!(bitmap.size(), [2, 2]);
        assert_eq!(bitmap.pixel(1, 0), Some(PackedColor::from_rgb(1, 2, 3)));
        assert_eq!(bitmap.pixel(0, 1), Some(PackedColor::from_rgb(4, 5, 6)));
        assert_eq!(bitmap.pixel(0, 0), Some(PackedColor::BLACK));
    }
}
