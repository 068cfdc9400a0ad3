use super::super::TintlabApp;
use super::icons;
use crate::image::FilterKind;

const fn filter_icon(kind: FilterKind) -> &'static str {
    match kind {
        FilterKind::Grayscale => icons::ICON_GRAYSCALE,
        FilterKind::Sepia => icons::ICON_SEPIA,
        FilterKind::Invert => icons::ICON_INVERT,
    }
}

impl TintlabApp {
    pub(crate) fn ui_top(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            // Use egui's built-in theme toggle so icon matches current mode.
            egui::widgets::global_theme_preference_switch(ui);
            ui.separator();

            let has_image = self.display.is_some();
            self.ui_file_menu(ui, has_image);
            ui.separator();

            self.ui_filter_buttons(ui, has_image);
            ui.separator();

            let info_resp = ui
                .add_enabled(
                    has_image,
                    egui::Button::new(format!("{} Image info", icons::ICON_INFO))
                        .shortcut_text("Ctrl+I"),
                )
                .on_hover_text("Show file & image details (Ctrl+I)");
            if info_resp.clicked() && has_image {
                self.info_window_open = true;
            }
        });
    }

    fn ui_file_menu(&mut self, ui: &mut egui::Ui, has_image: bool) {
        ui.menu_button(format!("{} File", icons::ICON_MENU), |ui| {
            if ui
                .add(egui::Button::new("Load image…").shortcut_text("Ctrl+O"))
                .on_hover_text("Open an image (Ctrl+O). You can also drag & drop into the center.")
                .clicked()
            {
                self.open_image_dialog();
                ui.close();
            }

            if ui
                .add_enabled(
                    has_image,
                    egui::Button::new("Save image…").shortcut_text("Ctrl+S"),
                )
                .on_hover_text("Save the image as currently shown (Ctrl+S)")
                .clicked()
            {
                self.save_image_dialog();
                ui.close();
            }
        });
    }

    fn ui_filter_buttons(&mut self, ui: &mut egui::Ui, has_image: bool) {
        let active = self.session.active_filter();
        for kind in FilterKind::ALL {
            let button = egui::Button::new(format!("{} {}", filter_icon(kind), kind.label()))
                .selected(active == Some(kind));
            let resp = ui
                .add_enabled(has_image, button)
                .on_hover_text(format!("Apply {} to the original image", kind.label()))
                .on_disabled_hover_text("Load an image first");
            if resp.clicked() {
                let ctx = ui.ctx().clone();
                self.apply_filter(&ctx, kind);
            }
        }
    }
}
