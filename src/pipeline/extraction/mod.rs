pub mod gemini;
pub mod parser;
pub mod prompt;
pub mod types;

pub use gemini::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("cannot reach the extraction service at {0}")]
    Connection(String),

    #[error("extraction service returned error (status {status}): {body}")]
    ApiError { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("malformed extraction response: {0}")]
    MalformedResponse(String),

    #[error("extraction response violates the book schema: {0}")]
    SchemaViolation(String),

    #[error("cannot read prompt template {path}: {reason}")]
    PromptTemplate { path: String, reason: String },
}
