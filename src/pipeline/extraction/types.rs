use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// The wire schema the extraction service must satisfy: book metadata with
/// chapter boundaries addressed by paragraph tag index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawBookData {
    pub title: String,
    pub author: String,
    pub is_poetry: bool,
    pub chapters: Vec<RawChapterData>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawChapterData {
    pub number: u32,
    #[serde(default)]
    pub name: Option<String>,
    pub tag_index_of_first_paragraph: usize,
    pub tag_index_of_last_paragraph: usize,
}

/// Structured-extraction capability abstraction (allows mocking).
///
/// Consumes the assembled prompt (template + tagged corpus) and returns the
/// model's raw response text; parsing is a separate concern.
pub trait ExtractionClient {
    fn generate(&self, prompt: &str) -> Result<String, ExtractionError>;
}
