//! Main egui/eframe application state and UI orchestration.

use crate::config::{AppConfig, FilterConfig};
use crate::image::{
    Bitmap, DecodedImage, FilterKind, ImageMeta, ImageTransformer, LoadedImage, SourceFormat,
    save_bitmap,
};
use egui::{Context, Key};
use egui_file_dialog::{DialogState, FileDialog};
use std::{
    path::{Path, PathBuf},
    sync::{Arc, mpsc::Receiver},
    time::{Duration, Instant, SystemTime},
};

mod filter_worker;
mod image_loader;
mod session;
mod ui;

use session::FilterSession;

enum ImageLoadRequest {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

struct PendingImageTask {
    rx: Receiver<ImageLoadResult>,
    meta: PendingImageMeta,
}

enum ImageLoadResult {
    Success(DecodedImage),
    Error(String),
}

/// A filter pass running off the UI thread.
struct PendingFilterTask {
    rx: Receiver<Bitmap>,
    generation: u64,
    kind: FilterKind,
    started: Instant,
}

#[derive(Clone)]
enum PendingImageMeta {
    Path {
        path: PathBuf,
    },
    DroppedBytes {
        name: Option<String>,
        byte_len: usize,
        last_modified: Option<SystemTime>,
    },
}

impl PendingImageMeta {
    fn description(&self) -> String {
        match self {
            Self::Path { path } => path
                .file_name()
                .and_then(|s| s.to_str())
                .map_or_else(|| path.display().to_string(), str::to_string),
            Self::DroppedBytes { name, .. } => name
                .as_deref()
                .map_or_else(|| "dropped bytes".to_string(), str::to_string),
        }
    }

    fn into_image_meta(self, size: [usize; 2], source: SourceFormat) -> ImageMeta {
        match self {
            Self::Path { path } => ImageMeta::for_file(&path, size, source),
            Self::DroppedBytes {
                name,
                byte_len,
                last_modified,
            } => ImageMeta::for_drop(name.as_deref(), byte_len, last_modified, size, source),
        }
    }
}

#[derive(Debug)]
enum NativeDialog {
    Open(FileDialog),
    Save(FileDialog),
}

fn safe_usize_to_f32(value: usize) -> f32 {
    let clamped = value.min(u32::MAX as usize);
    let as_u32 = u32::try_from(clamped).unwrap_or(u32::MAX);
    #[allow(clippy::cast_precision_loss)]
    {
        as_u32 as f32
    }
}

/// Top-level application state for the Tintlab UI.
pub struct TintlabApp {
    config: AppConfig,
    filter_cfg: FilterConfig,
    transformer: ImageTransformer,
    session: FilterSession,
    display: Option<LoadedImage>,
    image_meta: Option<ImageMeta>,
    pending_image_task: Option<PendingImageTask>,
    pending_filter_task: Option<PendingFilterTask>,
    active_dialog: Option<NativeDialog>,
    last_image_dir: Option<PathBuf>,
    last_save_dir: Option<PathBuf>,
    last_status: Option<String>,
    info_window_open: bool,
}

impl TintlabApp {
    pub fn with_config(config: AppConfig) -> Self {
        let filter_cfg = config.effective_filter();
        Self {
            transformer: ImageTransformer::with_parallel_threshold(filter_cfg.parallel_min_pixels),
            filter_cfg,
            config,
            session: FilterSession::default(),
            display: None,
            image_meta: None,
            pending_image_task: None,
            pending_filter_task: None,
            active_dialog: None,
            last_image_dir: None,
            last_save_dir: None,
            last_status: None,
            info_window_open: false,
        }
    }

    /// Create a new app and optionally queue an initial image load.
    pub fn new_with_initial_path(
        _ctx: &Context,
        config: AppConfig,
        initial_path: Option<&Path>,
    ) -> Self {
        let mut app = Self::with_config(config);
        if let Some(p) = initial_path {
            app.start_loading_image_from_path(p.to_owned());
        }
        app
    }

    fn set_status(&mut self, msg: impl Into<String>) {
        self.last_status = Some(msg.into());
    }

    /// Install a freshly decoded image as the filter source and show it unfiltered.
    fn set_source_bitmap(&mut self, ctx: &Context, bitmap: Bitmap, meta: Option<ImageMeta>) {
        let source = self.session.set_source(bitmap);
        if self.pending_filter_task.take().is_some() {
            log::debug!("Dropped running filter job for the previous image");
        }
        self.image_meta = meta;
        self.show_bitmap(ctx, source);
    }

    /// Hand a complete bitmap to the display, replacing whatever was shown.
    fn show_bitmap(&mut self, ctx: &Context, bitmap: Arc<Bitmap>) {
        match self.display.as_mut() {
            Some(display) => display.replace_bitmap(bitmap),
            None => self.display = Some(LoadedImage::from_bitmap(ctx, bitmap)),
        }
    }

    /// Run `kind` over the current source, inline for small images and on a
    /// worker thread otherwise.
    pub(crate) fn apply_filter(&mut self, ctx: &Context, kind: FilterKind) {
        let job = match self.session.request(kind) {
            Ok(job) => job,
            Err(err) => {
                log::debug!("Ignoring {} filter: {err}", kind.id());
                return;
            }
        };
        if self.pending_filter_task.take().is_some() {
            log::debug!("Superseded running filter job with {}", kind.id());
        }

        let pixels = job.source.pixel_count();
        if pixels < self.filter_cfg.background_min_pixels {
            let started = Instant::now();
            let output = job.run(&self.transformer);
            log::info!(
                "Applied {} inline to {pixels} px in {:.1?}",
                kind.id(),
                started.elapsed()
            );
            self.finish_filter(ctx, kind, output);
        } else {
            self.start_filter_job(job);
        }
    }

    fn finish_filter(&mut self, ctx: &Context, kind: FilterKind, output: Bitmap) {
        self.show_bitmap(ctx, Arc::new(output));
        self.set_status(format!("Applied {}", kind.label()));
    }

    fn save_displayed(&mut self, path: &Path) {
        self.remember_save_dir_from_path(path);
        let Some(display) = self.display.as_ref() else {
            self.set_status("Nothing to save: no image loaded.");
            return;
        };
        match save_bitmap(path, display.bitmap()) {
            Ok(()) => {
                log::info!("Saved image to {}", path.display());
                self.set_status(format!("Saved {}", path.display()));
            }
            Err(err) => {
                log::warn!("Saving {} failed: {err:#}", path.display());
                self.set_status(format!("Save failed: {err:#}"));
            }
        }
    }

    fn handle_shortcuts(&mut self, ctx: &Context) {
        // Global hotkeys (ignored while typing in text fields)
        if ctx.wants_keyboard_input() {
            return;
        }
        if self.active_dialog.is_none()
            && ctx.input(|i| i.key_pressed(Key::O) && i.modifiers.command)
        {
            self.open_image_dialog();
        }
        if self.active_dialog.is_none()
            && self.display.is_some()
            && ctx.input(|i| i.key_pressed(Key::S) && i.modifiers.command)
        {
            self.save_image_dialog();
        }
        if self.display.is_some() && ctx.input(|i| i.key_pressed(Key::I) && i.modifiers.command) {
            self.info_window_open = true;
        }
    }

    fn update_dialog(&mut self, ctx: &Context) {
        let mut close_dialog = false;
        let mut picked_open: Option<PathBuf> = None;
        let mut picked_save: Option<PathBuf> = None;

        if let Some(dialog_state) = self.active_dialog.as_mut() {
            let (dialog, picked, cancel_msg) = match dialog_state {
                NativeDialog::Open(dialog) => (dialog, &mut picked_open, "Open canceled."),
                NativeDialog::Save(dialog) => (dialog, &mut picked_save, "Save canceled."),
            };
            dialog.update(ctx);
            if let Some(path) = dialog.take_picked() {
                *picked = Some(path);
                close_dialog = true;
            } else {
                match dialog.state() {
                    DialogState::Cancelled => {
                        self.last_status = Some(cancel_msg.to_string());
                        close_dialog = true;
                    }
                    DialogState::Closed => close_dialog = true,
                    _ => {}
                }
            }
        }

        if let Some(path) = picked_open {
            self.start_loading_image_from_path(path);
        }
        if let Some(path) = picked_save {
            self.save_displayed(&path);
        }
        if close_dialog {
            self.active_dialog = None;
        }
    }
}

impl eframe::App for TintlabApp {
    // Required by eframe 0.34; the frame is driven by `update`, which eframe still calls before `ui`.
    fn ui(&mut self, _ui: &mut egui::Ui, _frame: &mut eframe::Frame) {}

    fn update(&mut self, ctx: &Context, _frame: &mut eframe::Frame) {
        self.poll_image_loader(ctx);
        self.poll_filter_worker(ctx);
        if self.pending_image_task.is_some() || self.pending_filter_task.is_some() {
            ctx.request_repaint_after(Duration::from_millis(16));
        }

        self.handle_shortcuts(ctx);

        egui::TopBottomPanel::top("top").show(ctx, |ui| self.ui_top(ui));
        egui::TopBottomPanel::bottom("status").show(ctx, |ui| self.ui_status_bar(ui));
        egui::CentralPanel::default().show(ctx, |ui| self.ui_central_image(ui));
        self.ui_image_info_window(ctx);

        self.update_dialog(ctx);
    }
}
