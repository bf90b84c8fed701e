//! Structural metadata validation: normalize what the extraction model
//! returned and refuse anything assembly cannot honor.
//!
//! Every boundary must address paragraphs that actually appear in the tagged
//! corpus, and ranges must increase without overlap. Violations abort the run
//! with the offending chapter named; they are never silently coerced.

use thiserror::Error;

use super::extraction::RawBookData;
use super::tagging::ParagraphTable;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("chapter {number} ({name}): first paragraph index {first} is after last index {last}")]
    InvertedRange {
        number: u32,
        name: String,
        first: usize,
        last: usize,
    },

    #[error(
        "chapter {number} ({name}): paragraph index {index} is out of range \
         (manuscript has {count} paragraphs)"
    )]
    IndexOutOfRange {
        number: u32,
        name: String,
        index: usize,
        count: usize,
    },

    #[error(
        "chapter {number} ({name}): paragraph index {index} refers to an empty \
         paragraph that never received a tag"
    )]
    UntaggedIndex {
        number: u32,
        name: String,
        index: usize,
    },

    #[error(
        "chapter {number} ({name}) starts at paragraph {first}, but chapter \
         {prev_number} already covers up to paragraph {prev_last}"
    )]
    OverlappingRange {
        number: u32,
        name: String,
        first: usize,
        prev_number: u32,
        prev_last: usize,
    },
}

/// One chapter's inclusive paragraph-index range.
///
/// `name` is an explicit optional field: a blank-after-trim name from the
/// wire becomes `None`, and the display title falls back to the number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChapterBoundary {
    pub number: u32,
    pub name: Option<String>,
    pub first_index: usize,
    pub last_index: usize,
}

impl ChapterBoundary {
    /// Display title: the trimmed name if present, else `Chapter {number}`.
    pub fn display_title(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Chapter {}", self.number),
        }
    }
}

/// Validated, trimmed book metadata. Produced once per run.
#[derive(Debug, Clone)]
pub struct BookMetadata {
    pub title: String,
    pub author: String,
    pub is_poetry: bool,
    pub chapters: Vec<ChapterBoundary>,
}

/// Result of validation: normalized metadata plus non-fatal warnings.
#[derive(Debug, Clone)]
pub struct ValidatedBook {
    pub metadata: BookMetadata,
    pub warnings: Vec<String>,
}

/// Validate raw extraction output against the paragraph table.
pub fn validate_book_data(
    raw: RawBookData,
    table: &ParagraphTable,
) -> Result<ValidatedBook, ValidationError> {
    let mut warnings = Vec::new();
    let mut chapters = Vec::with_capacity(raw.chapters.len());
    let mut prev: Option<(u32, usize)> = None;

    for chapter in raw.chapters {
        let name = chapter
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let label = name.clone().unwrap_or_else(|| "unnamed".into());
        let first = chapter.tag_index_of_first_paragraph;
        let last = chapter.tag_index_of_last_paragraph;

        if first > last {
            return Err(ValidationError::InvertedRange {
                number: chapter.number,
                name: label,
                first,
                last,
            });
        }

        for index in [first, last] {
            if index >= table.len() {
                return Err(ValidationError::IndexOutOfRange {
                    number: chapter.number,
                    name: label,
                    index,
                    count: table.len(),
                });
            }
            if !table.is_tagged(index) {
                return Err(ValidationError::UntaggedIndex {
                    number: chapter.number,
                    name: label,
                    index,
                });
            }
        }

        if let Some((prev_number, prev_last)) = prev {
            if first <= prev_last {
                return Err(ValidationError::OverlappingRange {
                    number: chapter.number,
                    name: label,
                    first,
                    prev_number,
                    prev_last,
                });
            }
        }
        prev = Some((chapter.number, last));

        let gaps = (first..=last).filter(|&i| !table.is_tagged(i)).count();
        if gaps > 0 {
            warnings.push(format!(
                "chapter {} ({label}) spans {gaps} empty paragraph(s) that will be skipped",
                chapter.number
            ));
        }

        chapters.push(ChapterBoundary {
            number: chapter.number,
            name,
            first_index: first,
            last_index: last,
        });
    }

    for warning in &warnings {
        tracing::warn!("{warning}");
    }

    Ok(ValidatedBook {
        metadata: BookMetadata {
            title: raw.title.trim().to_string(),
            author: raw.author.trim().to_string(),
            is_poetry: raw.is_poetry,
            chapters,
        },
        warnings,
    })
}
