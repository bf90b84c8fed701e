pub mod writer;

pub use writer::*;

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::pipeline::assembly::Chapter;

#[derive(Error, Debug)]
pub enum ContainerError {
    #[error("cannot read cover image {path}: {reason}")]
    CoverRead { path: String, reason: String },

    #[error("cannot write container {path}: {reason}")]
    Write { path: String, reason: String },
}

/// E-book container writing abstraction (allows mocking).
///
/// Consumes title, author, the rendered cover, and the ordered chapter list;
/// produces the finished file in `out_dir` and returns its path.
pub trait ContainerWriter {
    fn write_book(
        &self,
        title: &str,
        author: &str,
        cover: &Path,
        chapters: &[Chapter],
        out_dir: &Path,
    ) -> Result<PathBuf, ContainerError>;
}

/// Filesystem-safe stem derived from the title: lowercase, spaces become
/// underscores.
pub fn slugify(title: &str) -> String {
    title.to_lowercase().replace(' ', "_")
}
