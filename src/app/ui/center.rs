use super::super::{TintlabApp, safe_usize_to_f32};
use crate::image::Bitmap;
use egui::{Color32, RichText, Sense};

/// Text for the pixel under the cursor: position, packed value and channels.
fn describe_pixel(bitmap: &Bitmap, x: usize, y: usize) -> Option<String> {
    let color = bitmap.pixel(x, y)?;
    Some(format!(
        "{x}, {y}: #{:06X}  R {} G {} B {}",
        color.raw(),
        color.red(),
        color.green(),
        color.blue()
    ))
}

impl TintlabApp {
    fn handle_dropped_files(&mut self, ui: &egui::Ui) {
        let dropped_files = ui.input(|i| i.raw.dropped_files.clone());
        if dropped_files.is_empty() {
            return;
        }
        log::debug!("Drop received {} item(s)", dropped_files.len());
        for f in &dropped_files {
            if let Some(path) = &f.path {
                log::debug!("Loading dropped path {}", path.display());
                self.start_loading_image_from_path(path.clone());
                return;
            }
            if let Some(bytes) = &f.bytes {
                log::debug!("Loading dropped bytes name='{}'", f.name);
                self.start_loading_image_from_bytes(
                    (!f.name.is_empty()).then(|| f.name.clone()),
                    bytes.to_vec(),
                    f.last_modified,
                );
                return;
            }
        }
        log::warn!("Drop failed: no readable bytes/path");
        self.set_status("Drop failed: no readable bytes/path");
    }

    pub(crate) fn ui_central_image(&mut self, ui: &mut egui::Ui) {
        // Handle drag & drop regardless of whether an image is already loaded
        self.handle_dropped_files(ui);

        let Some(display) = self.display.as_ref() else {
            ui.centered_and_justified(|ui| {
                ui.label(
                    RichText::new("Load an image (Ctrl+O) or drop one here")
                        .color(Color32::from_gray(160)),
                );
            });
            return;
        };

        let (tex_id, [w, h]) = (display.texture.id(), display.size);
        let mut hovered: Option<String> = None;
        egui::ScrollArea::both().show(ui, |ui| {
            let size = egui::vec2(safe_usize_to_f32(w), safe_usize_to_f32(h));
            let response = ui.add(
                egui::Image::new((tex_id, size))
                    .fit_to_exact_size(size)
                    .sense(Sense::hover()),
            );
            if let Some(pos) = response.hover_pos() {
                let local = pos - response.rect.min;
                #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
                let (x, y) = (local.x.max(0.0) as usize, local.y.max(0.0) as usize);
                hovered = describe_pixel(display.bitmap(), x, y);
            }
        });
        if let Some(text) = hovered {
            ui.painter().text(
                ui.max_rect().left_bottom() + egui::vec2(6.0, -6.0),
                egui::Align2::LEFT_BOTTOM,
                text,
                egui::FontId::monospace(12.0),
                ui.visuals().strong_text_color(),
            );
        }
    }
}
