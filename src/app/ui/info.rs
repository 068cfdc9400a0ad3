use super::super::TintlabApp;
use crate::image::ImageMeta;
use egui::{Color32, RichText};

impl TintlabApp {
    pub(crate) fn ui_status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if self.pending_image_task.is_some() || self.pending_filter_task.is_some() {
                ui.spinner();
            }
            let filter = self
                .session
                .active_filter()
                .map_or("Original", |kind| kind.label());
            let view = match self.session.source() {
                Some(src) => format!("View: {filter} · {} × {}", src.width(), src.height()),
                None => format!("View: {filter}"),
            };
            ui.label(
                RichText::new(view)
                    .small()
                    .color(Color32::from_gray(180)),
            );
            if let Some(msg) = &self.last_status {
                ui.separator();
                ui.label(
                    RichText::new(msg.as_str())
                        .small()
                        .color(Color32::from_gray(200)),
                );
            }
        });
    }

    pub(crate) fn ui_image_info_window(&mut self, ctx: &egui::Context) {
        if !self.info_window_open {
            return;
        }

        let mut rows = self
            .image_meta
            .as_ref()
            .map(ImageMeta::summary)
            .unwrap_or_default();
        if self.display.is_some() {
            let filter = self
                .session
                .active_filter()
                .map_or("none (original)", |kind| kind.label());
            rows.push(("Filter", filter.to_string()));
        }

        egui::Window::new("Image info")
            .open(&mut self.info_window_open)
            .resizable(false)
            .collapsible(false)
            .show(ctx, |ui| {
                if rows.is_empty() {
                    ui.label("Load an image to inspect its metadata.");
                    return;
                }
                egui::Grid::new("image_info_grid")
                    .num_columns(2)
                    .striped(true)
                    .show(ui, |ui| {
                        for (label, value) in &rows {
                            ui.label(RichText::new(*label).strong());
                            ui.label(value);
                            ui.end_row();
                        }
                    });
            });
    }
}
