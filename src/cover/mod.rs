pub mod font;
pub mod renderer;

pub use renderer::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoverError {
    #[error("cannot write cover image {path}: {reason}")]
    Write { path: String, reason: String },
}

/// Raster cover rendering abstraction (allows mocking).
///
/// Consumes the already-trimmed title and author and produces a fixed-size
/// image file at `out`. Failure is fatal to the run; no partial output.
pub trait CoverRenderer {
    fn render(&self, title: &str, author: &str, out: &Path) -> Result<(), CoverError>;
}

/// Scoped ownership of the temporary cover file.
///
/// The image lives only as long as the run needs it: drop removes it on every
/// exit path, success or failure. Removal failure never masks the primary
/// result; it is logged and forgotten.
#[derive(Debug)]
pub struct TempCover {
    path: PathBuf,
}

impl TempCover {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempCover {
    fn drop(&mut self) {
        if !self.path.exists() {
            return;
        }
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(path = %self.path.display(), "Temporary cover removed"),
            Err(e) => tracing::warn!(
                path = %self.path.display(),
                error = %e,
                "Failed to remove temporary cover"
            ),
        }
    }
}
