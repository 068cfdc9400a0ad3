use std::fs;
use std::path::PathBuf;

use directories::{BaseDirs, ProjectDirs};
use serde::Deserialize;

use crate::image::DEFAULT_PARALLEL_MIN_PIXELS;

const CONFIG_FILE_NAME: &str = "tintlab.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub image_limits: ImageLimits,
    pub filter: FilterConfig,
    pub window: WindowConfig,
}

impl AppConfig {
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if let Ok(contents) = fs::read_to_string(&path) {
                match Self::parse(&contents) {
                    Ok(cfg) => {
                        log::info!("Using config {}", path.display());
                        return cfg;
                    }
                    Err(err) => {
                        log::warn!("Failed to parse config {}: {err}", path.display());
                    }
                }
            }
        }
        Self::default()
    }

    pub fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<Self>(contents)
    }

    pub fn effective_image_limits(&self) -> ImageLimits {
        self.image_limits.sanitized()
    }

    pub fn effective_filter(&self) -> FilterConfig {
        self.filter.sanitized()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Ok(exe_path) = std::env::current_exe()
            && let Some(dir) = exe_path.parent()
        {
            paths.push(dir.join(CONFIG_FILE_NAME));
        }

        if let Some(proj_dirs) = ProjectDirs::from("dev", "Tintlab", "Tintlab") {
            paths.push(proj_dirs.config_dir().join(CONFIG_FILE_NAME));
        }

        if let Some(base_dirs) = BaseDirs::new() {
            paths.push(base_dirs.config_dir().join("tintlab").join(CONFIG_FILE_NAME));
        }

        paths
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ImageLimits {
    pub image_dim: u32,
    pub total_pixels: u64,
    pub alloc_bytes: u64,
}

impl Default for ImageLimits {
    fn default() -> Self {
        Self {
            image_dim: 12_000,
            total_pixels: 80_000_000,       // ~80 MP
            alloc_bytes: 512 * 1024 * 1024, // 512 MiB
        }
    }
}

impl ImageLimits {
    pub fn sanitized(&self) -> Self {
        let dim = self.image_dim.clamp(64, 100_000);
        let pixels = self.total_pixels.clamp(1_000_000, 5_000_000_000); // 1 MP .. 5 GP
        let alloc = self
            .alloc_bytes
            .clamp(8 * 1024 * 1024, 8 * 1024 * 1024 * 1024); // 8 MiB .. 8 GiB
        Self {
            image_dim: dim,
            total_pixels: pixels,
            alloc_bytes: alloc,
        }
    }
}

/// When a filter pass goes row-parallel and when it leaves the UI thread.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub parallel_min_pixels: usize,
    pub background_min_pixels: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            parallel_min_pixels: DEFAULT_PARALLEL_MIN_PIXELS,
            background_min_pixels: 1_048_576, // 1024x1024
        }
    }
}

impl FilterConfig {
    pub fn sanitized(self) -> Self {
        Self {
            parallel_min_pixels: self.parallel_min_pixels.max(1),
            background_min_pixels: self.background_min_pixels.max(1),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 900.0,
            height: 640.0,
        }
    }
}

impl WindowConfig {
    pub const MIN_SIZE: [f32; 2] = [400.0, 300.0];

    pub const fn inner_size(&self) -> [f32; 2] {
        [
            self.width.clamp(Self::MIN_SIZE[0], 8192.0),
            self.height.clamp(Self::MIN_SIZE[1], 8192.0),
        ]
    }
}
