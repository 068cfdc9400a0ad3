use super::{ImageLoadRequest, ImageLoadResult, PendingImageMeta, PendingImageTask, TintlabApp};
use crate::image::{DecodedImage, decode_image_from_bytes, decode_image_from_path};
use egui::Context;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, TryRecvError};
use std::thread;

impl TintlabApp {
    pub(crate) fn start_loading_image_from_path(&mut self, path: PathBuf) {
        self.remember_image_dir_from_path(&path);
        let meta = PendingImageMeta::Path { path: path.clone() };
        self.start_image_load(ImageLoadRequest::Path(path), meta);
    }

    pub(crate) fn start_loading_image_from_bytes(
        &mut self,
        name: Option<String>,
        bytes: Vec<u8>,
        last_modified: Option<std::time::SystemTime>,
    ) {
        let meta = PendingImageMeta::DroppedBytes {
            name,
            byte_len: bytes.len(),
            last_modified,
        };
        self.start_image_load(ImageLoadRequest::Bytes(bytes), meta);
    }

    fn start_image_load(&mut self, request: ImageLoadRequest, meta: PendingImageMeta) {
        let description = meta.description();
        let limits = self.config.effective_image_limits();
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let result = match request {
                ImageLoadRequest::Path(path) => decode_image_from_path(&limits, &path),
                ImageLoadRequest::Bytes(bytes) => decode_image_from_bytes(&limits, bytes),
            };
            let msg = match result {
                Ok(decoded) => ImageLoadResult::Success(decoded),
                Err(err) => ImageLoadResult::Error(format!("{err:#}")),
            };
            let _ = tx.send(msg);
        });
        log::info!("Loading {description}");
        self.pending_image_task = Some(PendingImageTask { rx, meta });
        self.set_status(format!("Loading {description}…"));
    }

    pub(crate) fn poll_image_loader(&mut self, ctx: &Context) {
        let Some(task) = self.pending_image_task.take() else {
            return;
        };
        match task.rx.try_recv() {
            Ok(ImageLoadResult::Success(decoded)) => {
                self.finish_loaded_image(ctx, decoded, task.meta);
            }
            Ok(ImageLoadResult::Error(err)) => {
                let label = task.meta.description();
                log::warn!("Failed to load {label}: {err}");
                self.set_status(format!("Failed to load {label}: {err}"));
            }
            Err(TryRecvError::Empty) => {
                self.pending_image_task = Some(task);
            }
            Err(TryRecvError::Disconnected) => {
                let label = task.meta.description();
                log::warn!("Image loader for {label} disconnected without a result");
                self.set_status(format!("Loading {label} failed: worker disconnected."));
            }
        }
    }

    fn finish_loaded_image(
        &mut self,
        ctx: &Context,
        decoded: DecodedImage,
        pending: PendingImageMeta,
    ) {
        let DecodedImage { bitmap, source } = decoded;
        let [w, h] = bitmap.size();
        let meta = pending.into_image_meta([w, h], source);
        let name = meta.name().to_owned();
        log::info!("Loaded {name} ({w}x{h}, {:?})", source.color_type);
        self.set_source_bitmap(ctx, bitmap, Some(meta));
        self.set_status(format!("Loaded {name}"));
    }

    pub(crate) fn remember_image_dir_from_path(&mut self, path: &Path) {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self.last_image_dir = Some(dir);
    }

    pub(crate) fn remember_save_dir_from_path(&mut self, path: &Path) {
        let dir = path
            .parent()
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        self.last_save_dir = Some(dir);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::image::{Bitmap, PackedColor};
    use image::{ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;
    use std::time::{Duration, Instant};

    fn wait_for_load(app: &mut TintlabApp, ctx: &Context) {
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.pending_image_task.is_some() {
            assert!(Instant::now() < deadline, "image loader timed out");
            app.poll_image_loader(ctx);
            std::thread::sleep(Duration::from_millis(1));
        }
    }

    fn png_bytes() -> Vec<u8> {
        let mut rgb = RgbImage::new(3, 2);
        rgb.put_pixel(2, 1, Rgb([9, 8, 7]));
        let mut bytes = Vec::new();
        rgb.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .expect("encode png");
        bytes
    }

    #[test]
    fn dropped_bytes_become_source_and_display() {
        let ctx = Context::default();
        let mut app = TintlabApp::with_config(AppConfig::default());
        app.start_loading_image_from_bytes(Some("drop.png".into()), png_bytes(), None);
        wait_for_load(&mut app, &ctx);

        let source = app.session.source().expect("source loaded");
        assert_eq!(source.size(), [3, 2]);
        assert_eq!(source.pixel(2, 1), Some(PackedColor::from_rgb(9, 8, 7)));
        assert_eq!(app.display.as_ref().map(|d| d.size), Some([3, 2]));
        assert_eq!(app.last_status.as_deref(), Some("Loaded drop.png"));
        let rows = app.image_meta.as_ref().expect("meta recorded").summary();
        assert!(rows.contains(&("Format", "PNG".to_string())));
        assert!(rows.contains(&("Dimensions", "3 × 2 px".to_string())));
    }

    #[test]
    fn failed_decode_keeps_previous_image() {
        let ctx = Context::default();
        let mut app = TintlabApp::with_config(AppConfig::default());
        app.set_source_bitmap(&ctx, Bitmap::filled(1, 1, PackedColor::WHITE), None);

        app.start_loading_image_from_bytes(Some("junk.bin".into()), b"junk".to_vec(), None);
        wait_for_load(&mut app, &ctx);

        let status = app.last_status.clone().unwrap_or_default();
        assert!(status.starts_with("Failed to load junk.bin: "), "{status}");
        assert_eq!(app.session.source().map(Bitmap::size), Some([1, 1]));
        assert_eq!(app.display.as_ref().map(|d| d.size), Some([1, 1]));
    }

    #[test]
    fn remembers_parent_directories() {
        let mut app = TintlabApp::with_config(AppConfig::default());
        app.remember_image_dir_from_path(Path::new("/photos/cat.png"));
        app.remember_save_dir_from_path(Path::new("out.png"));
        assert_eq!(app.last_image_dir.as_deref(), Some(Path::new("/photos")));
        assert_eq!(app.last_save_dir.as_deref(), Some(Path::new("")));
    }
}
