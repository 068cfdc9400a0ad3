use chrono::{DateTime, SecondsFormat, Utc};
use image::{ColorType, ImageFormat};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// What the decoder reported before the pixels were flattened to packed RGB.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceFormat {
    pub format: Option<ImageFormat>,
    pub color_type: ColorType,
}

impl SourceFormat {
    /// Short container name such as `PNG`, or `unknown` when it was not detected.
    pub fn format_name(self) -> String {
        self.format
            .and_then(|format| format.extensions_str().first())
            .map_or_else(|| "unknown".to_string(), |ext| ext.to_ascii_uppercase())
    }

    /// What packing into 8-bit RGB discarded or had to synthesize.
    pub fn flattening_losses(self) -> Vec<&'static str> {
        let color_type = self.color_type;
        let channels = u16::from(color_type.channel_count());
        let mut losses = Vec::new();
        if color_type.has_alpha() {
            losses.push("alpha dropped");
        }
        if channels > 0 && u16::from(color_type.bytes_per_pixel()) > channels {
            losses.push("samples reduced to 8 bits");
        }
        if !color_type.has_color() {
            losses.push("gray expanded to RGB");
        }
        losses
    }
}

/// One loaded picture: where it came from and how it decoded.
#[derive(Debug, Clone)]
pub struct ImageMeta {
    name: String,
    path: Option<PathBuf>,
    byte_len: Option<u64>,
    last_modified: Option<SystemTime>,
    size: [usize; 2],
    source: SourceFormat,
}

impl ImageMeta {
    /// Metadata for a file on disk. Byte size and mtime are filled in when the
    /// filesystem still answers for `path`.
    pub fn for_file(path: &Path, size: [usize; 2], source: SourceFormat) -> Self {
        let fs_meta = std::fs::metadata(path).ok();
        let name = path.file_name().map_or_else(
            || path.display().to_string(),
            |name| name.to_string_lossy().into_owned(),
        );
        Self {
            name,
            path: Some(path.to_owned()),
            byte_len: fs_meta.as_ref().map(std::fs::Metadata::len),
            last_modified: fs_meta.and_then(|meta| meta.modified().ok()),
            size,
            source,
        }
    }

    /// Metadata for bytes dropped onto the window without a backing path.
    pub fn for_drop(
        name: Option<&str>,
        byte_len: usize,
        last_modified: Option<SystemTime>,
        size: [usize; 2],
        source: SourceFormat,
    ) -> Self {
        Self {
            name: name
                .filter(|name| !name.is_empty())
                .unwrap_or("dropped image")
                .to_owned(),
            path: None,
            byte_len: u64::try_from(byte_len).ok(),
            last_modified,
            size,
            source,
        }
    }

    /// File name, or the suggested name of a drop.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Label/value pairs for the info window, in display order.
    pub fn summary(&self) -> Vec<(&'static str, String)> {
        let [w, h] = self.size;
        let mut rows = vec![("Name", self.name.clone())];
        if let Some(path) = &self.path {
            rows.push(("Path", path.display().to_string()));
        }
        rows.push((
            "File size",
            self.byte_len
                .map_or_else(|| "unknown".to_string(), format_byte_len),
        ));
        if let Some(modified) = self.last_modified {
            rows.push(("Modified", format_timestamp(modified)));
        }
        rows.push(("Format", self.source.format_name()));
        rows.push(("Decoded as", format!("{:?}", self.source.color_type)));
        let losses = self.source.flattening_losses();
        rows.push((
            "Flattening",
            if losses.is_empty() {
                "lossless".to_string()
            } else {
                losses.join(", ")
            },
        ));
        rows.push(("Dimensions", format!("{w} × {h} px")));
        let pixels = w.saturating_mul(h);
        #[allow(clippy::cast_precision_loss)]
        let megapixels = pixels as f64 / 1_000_000.0;
        rows.push(("Pixels", format!("{pixels} ({megapixels:.2} MP)")));
        rows
    }
}

/// Byte count in the largest binary unit that keeps the value at or above 1.
fn format_byte_len(bytes: u64) -> String {
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    // Each binary unit spans ten bits of the value.
    let exp = (bytes.ilog2() / 10).min(4);
    let unit = match exp {
        1 => "KiB",
        2 => "MiB",
        3 => "GiB",
        _ => "TiB",
    };
    #[allow(clippy::cast_precision_loss)]
    let value = bytes as f64 / (1u64 << (10 * exp)) as f64;
    format!("{value:.1} {unit}")
}

/// UTC timestamp to the second, RFC 3339 style.
fn format_timestamp(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).to_rfc3339_opts(SecondsFormat::Secs, true)
}
