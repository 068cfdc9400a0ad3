use super::Bitmap;
use egui::{Color32, ColorImage, Context, TextureHandle, TextureOptions};
use std::sync::Arc;

/// Expand a packed bitmap into egui's opaque RGBA pixels.
pub fn color_image_from_bitmap(bitmap: &Bitmap) -> ColorImage {
    let pixels = bitmap
        .pixels()
        .iter()
        .map(|color| {
            let [r, g, b] = color.channels();
            Color32::from_rgb(r, g, b)
        })
        .collect();
    ColorImage::new(bitmap.size(), pixels)
}

/// The bitmap currently on screen plus the egui texture that mirrors it.
pub struct LoadedImage {
    pub size: [usize; 2],
    pub texture: TextureHandle,
    bitmap: Arc<Bitmap>,
}

impl LoadedImage {
    /// Upload `bitmap` into a new texture.
    pub fn from_bitmap(ctx: &Context, bitmap: Arc<Bitmap>) -> Self {
        let texture = ctx.load_texture(
            "displayed_image",
            color_image_from_bitmap(&bitmap),
            TextureOptions::LINEAR,
        );
        Self {
            size: bitmap.size(),
            texture,
            bitmap,
        }
    }

    /// Swap in a complete bitmap; the texture is rewritten in one go.
    pub fn replace_bitmap(&mut self, bitmap: Arc<Bitmap>) {
        self.texture
            .set(color_image_from_bitmap(&bitmap), TextureOptions::LINEAR);
        self.size = bitmap.size();
        self.bitmap = bitmap;
    }

    pub fn bitmap(&self) -> &Bitmap {
        &self.bitmap
    }
}
