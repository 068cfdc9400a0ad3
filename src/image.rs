mod bitmap;
mod color;
mod display;
mod filters;
mod load;
mod meta;
mod save;
mod transform;

pub use bitmap::Bitmap;
pub use color::PackedColor;
pub use display::LoadedImage;
pub use filters::FilterKind;
pub use load::{DecodedImage, decode_image_from_bytes, decode_image_from_path};
pub use meta::{ImageMeta, SourceFormat};
pub use save::{SAVE_EXTENSIONS, save_bitmap};
pub use transform::{DEFAULT_PARALLEL_MIN_PIXELS, ImageTransformer};
