use super::Bitmap;
use anyhow::Context as _;
use image::{ImageFormat, RgbImage};
use std::path::Path;

/// Extensions offered by the save dialog. Every entry has an RGB8 encoder.
pub const SAVE_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "bmp", "tiff", "tif", "ppm", "tga", "webp",
];

/// Expand a packed bitmap into an 8-bit RGB buffer.
pub fn bitmap_to_rgb(bitmap: &Bitmap) -> anyhow::Result<RgbImage> {
    let width = u32::try_from(bitmap.width()).context("Image is too wide to encode")?;
    let height = u32::try_from(bitmap.height()).context("Image is too tall to encode")?;
    let bytes: Vec<u8> = bitmap
        .pixels()
        .iter()
        .flat_map(|color| color.channels())
        .collect();
    RgbImage::from_raw(width, height, bytes).context("Pixel buffer does not match image size")
}

/// Encode `bitmap` to `path`, picking the format from the file extension.
pub fn save_bitmap(path: &Path, bitmap: &Bitmap) -> anyhow::Result<()> {
    if bitmap.is_empty() {
        anyhow::bail!("Nothing to save: image has no pixels");
    }
    let format = ImageFormat::from_path(path)
        .with_context(|| format!("Unsupported image format for {}", path.display()))?;
    let rgb = bitmap_to_rgb(bitmap)?;
    rgb.save_with_format(path, format)
        .with_context(|| format!("Failed to write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ImageLimits;
    use crate::image::{PackedColor, decode_image_from_path};
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn unique_temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_nanos())
            .unwrap_or(0);
        let dir = std::env::temp_dir().join(format!("tintlab_{label}_{nanos}"));
        fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    fn sample_bitmap() -> Bitmap {
        Bitmap::new(
            2,
            2,
            vec![
                PackedColor::from_rgb(255, 0, 0),
                PackedColor::from_rgb(0, 255, 0),
                PackedColor::from_rgb(0, 0, 255),
                PackedColor::from_rgb(12, 34, 56),
            ],
        )
        .expect("valid bitmap")
    }

    #[test]
    fn png_save_then_load_keeps_pixels() {
        let dir = unique_temp_dir("png");
        let path = dir.join("out.png");
        let bitmap = sample_bitmap();
        save_bitmap(&path, &bitmap).expect("save png");
        let loaded = decode_image_from_path(&ImageLimits::default(), &path)
            .expect("load png")
            .bitmap;
        assert_eq!(loaded, bitmap);
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let dir = unique_temp_dir("ext");
        let path = dir.join("out.unknownformat");
        let err = save_bitmap(&path, &sample_bitmap()).expect_err("unknown extension");
        assert!(err.to_string().contains("Unsupported image format"));
        assert!(!path.exists());
        let _ = fs::remove_dir_all(dir);
    }

    #[test]
    fn rgb_expansion_matches_channels() {
        let rgb = bitmap_to_rgb(&sample_bitmap()).expect("expand");
        assert_eq!(rgb.dimensions(), (2, 2));
        assert_eq!(rgb.get_pixel(1, 1).0, [12, 34, 56]);
        assert_eq!(rgb.get_pixel(0, 1).0, [0, 0, 255]);
    }
}
