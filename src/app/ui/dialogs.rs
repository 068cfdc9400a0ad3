use super::super::{NativeDialog, TintlabApp};
use crate::image::SAVE_EXTENSIONS;
use egui_file_dialog::FileDialog;
use std::path::Path;

impl TintlabApp {
    pub(crate) fn open_image_dialog(&mut self) {
        let mut dialog = Self::make_open_dialog(self.last_image_dir.as_deref());
        dialog.pick_file();
        self.active_dialog = Some(NativeDialog::Open(dialog));
    }

    pub(crate) fn save_image_dialog(&mut self) {
        if self.display.is_none() {
            self.set_status("Nothing to save: no image loaded.");
            return;
        }
        let default_name = self.default_save_name();
        let initial_dir = self
            .last_save_dir
            .as_deref()
            .or(self.last_image_dir.as_deref());
        let mut dialog =
            Self::make_save_dialog("Save image", &default_name, SAVE_EXTENSIONS, initial_dir);
        dialog.save_file();
        self.active_dialog = Some(NativeDialog::Save(dialog));
    }

    /// `<stem>-<filter>.png`, or `<stem>.png` while the original is shown.
    fn default_save_name(&self) -> String {
        let stem = self
            .image_meta
            .as_ref()
            .and_then(|meta| {
                Path::new(meta.name())
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .map(str::to_owned)
            })
            .filter(|stem| !stem.is_empty())
            .unwrap_or_else(|| "image".to_string());
        match self.session.active_filter() {
            Some(kind) => format!("{stem}-{}.png", kind.id()),
            None => format!("{stem}.png"),
        }
    }

    pub(crate) fn make_open_dialog(initial_dir: Option<&Path>) -> FileDialog {
        // Keep in sync with enabled `image` crate features.
        let mut dialog = FileDialog::new()
            .title("Load image")
            .add_file_filter_extensions(
                "All images",
                vec![
                    "png", "jpg", "jpeg", "gif", "bmp", "webp", "ico", "tga", "tiff", "tif", "pnm",
                    "pbm", "pgm", "ppm", "hdr", "dds",
                ],
            )
            .add_file_filter_extensions("PNG", vec!["png"])
            .add_file_filter_extensions("JPEG/JPG", vec!["jpg", "jpeg"])
            .add_file_filter_extensions("BMP", vec!["bmp"])
            .add_file_filter_extensions("TIFF", vec!["tiff", "tif"])
            .default_file_filter("All images");
        if let Some(dir) = initial_dir {
            dialog = dialog.initial_directory(dir.to_path_buf());
        }
        dialog
    }

    pub(crate) fn make_save_dialog(
        title: &str,
        default_name: &str,
        extensions: &[&str],
        initial_dir: Option<&Path>,
    ) -> FileDialog {
        let mut dialog = FileDialog::new()
            .title(title)
            .default_file_name(default_name);
        let mut first_label: Option<String> = None;
        for ext in extensions {
            let label = format!("*.{ext}");
            if first_label.is_none() {
                first_label = Some(label.clone());
            }
            dialog = dialog.add_save_extension(&label, ext);
        }
        if let Some(label) = first_label.as_deref() {
            dialog = dialog.default_save_extension(label);
        }
        if let Some(dir) = initial_dir {
            dialog = dialog.initial_directory(dir.to_path_buf());
        }
        dialog
    }
}
