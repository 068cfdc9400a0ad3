use crate::image::{Bitmap, FilterKind, ImageTransformer};
use std::fmt;
use std::sync::Arc;

/// Why a filter action did not produce a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterError {
    /// A filter was chosen before any image was loaded; the action is a no-op.
    NoSourceLoaded,
}

impl fmt::Display for FilterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSourceLoaded => write!(f, "No image loaded"),
        }
    }
}

impl std::error::Error for FilterError {}

/// One filter application against a snapshot of the source image.
#[derive(Debug, Clone)]
pub struct FilterJob {
    pub source: Arc<Bitmap>,
    pub kind: FilterKind,
    pub generation: u64,
}

impl FilterJob {
    pub fn run(&self, transformer: &ImageTransformer) -> Bitmap {
        transformer.transform(&self.source, self.kind)
    }
}

/// The loaded source image and the latest filter selection.
///
/// Every new image or filter selection bumps `generation`; results computed
/// for an older generation are stale and must not reach the display.
#[derive(Debug, Default)]
pub struct FilterSession {
    source: Option<Arc<Bitmap>>,
    active: Option<FilterKind>,
    generation: u64,
}

impl FilterSession {
    /// Replace the source image and clear the filter selection.
    pub fn set_source(&mut self, bitmap: Bitmap) -> Arc<Bitmap> {
        let source = Arc::new(bitmap);
        self.source = Some(Arc::clone(&source));
        self.active = None;
        self.generation += 1;
        source
    }

    /// Select `kind` and build the job that applies it to the current source.
    pub fn request(&mut self, kind: FilterKind) -> Result<FilterJob, FilterError> {
        let source = self
            .source
            .as_ref()
            .map(Arc::clone)
            .ok_or(FilterError::NoSourceLoaded)?;
        self.active = Some(kind);
        self.generation += 1;
        Ok(FilterJob {
            source,
            kind,
            generation: self.generation,
        })
    }

    pub const fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn source(&self) -> Option<&Bitmap> {
        self.source.as_deref()
    }

    pub const fn active_filter(&self) -> Option<FilterKind> {
        self.active
    }
}
