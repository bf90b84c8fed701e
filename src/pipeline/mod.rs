pub mod assembly;
pub mod extraction;
pub mod processor;
pub mod tagging;
pub mod validate;

pub use assembly::*;
pub use processor::*;
pub use tagging::*;
pub use validate::*;

use thiserror::Error;

use crate::cover::CoverError;
use crate::epub::ContainerError;
use extraction::ExtractionError;

#[derive(Error, Debug)]
pub enum PressError {
    #[error("cannot read manuscript {path}: {reason}")]
    ManuscriptRead { path: String, reason: String },

    #[error("manuscript contains no text")]
    EmptyManuscript,

    #[error("cannot create output directory {path}: {reason}")]
    OutputDir { path: String, reason: String },

    #[error("structure extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("structural metadata rejected: {0}")]
    Validation(#[from] validate::ValidationError),

    #[error("cover rendering failed: {0}")]
    Cover(#[from] CoverError),

    #[error("container writing failed: {0}")]
    Container(#[from] ContainerError),
}
