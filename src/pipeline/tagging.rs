//! Paragraph tagging: the bijection between raw manuscript text and stable
//! paragraph indices.
//!
//! The manuscript is split on blank-line runs into paragraphs whose index is
//! their position in that original split. Indices are assigned once and never
//! renumbered, so the tagged corpus handed to the extraction model may be
//! index-sparse: whitespace-only paragraphs keep their slot in the table but
//! never appear as a tag, and no boundary may reference them.

use regex::Regex;

/// One paragraph of the original split.
///
/// `normalized` is populated only for paragraphs that survived trimming;
/// empty paragraphs keep their raw text and stay untagged.
#[derive(Debug, Clone)]
pub struct Paragraph {
    pub index: usize,
    pub raw: String,
    pub normalized: Option<String>,
}

impl Paragraph {
    /// Whether this paragraph appears in the tagged corpus.
    pub fn is_tagged(&self) -> bool {
        self.normalized.is_some()
    }
}

/// The ordered paragraph table, read-only after construction.
#[derive(Debug, Clone, Default)]
pub struct ParagraphTable {
    paragraphs: Vec<Paragraph>,
}

impl ParagraphTable {
    pub fn len(&self) -> usize {
        self.paragraphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paragraphs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Paragraph> {
        self.paragraphs.get(index)
    }

    /// Normalized text of the paragraph at `index`, or None if the index is
    /// out of range or the paragraph was empty (untagged).
    pub fn normalized(&self, index: usize) -> Option<&str> {
        self.paragraphs.get(index)?.normalized.as_deref()
    }

    /// Whether `index` names a paragraph that appears in the tagged corpus.
    pub fn is_tagged(&self, index: usize) -> bool {
        self.normalized(index).is_some()
    }

    /// Number of tagged (non-empty) paragraphs.
    pub fn tagged_count(&self) -> usize {
        self.paragraphs.iter().filter(|p| p.is_tagged()).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Paragraph> {
        self.paragraphs.iter()
    }
}

/// A tagged manuscript: the paragraph table plus the serialized corpus sent
/// to the extraction model.
#[derive(Debug, Clone)]
pub struct TaggedManuscript {
    pub table: ParagraphTable,
    pub corpus: String,
}

/// Split the manuscript into indexed paragraphs and serialize the tagged
/// corpus.
///
/// Line endings are normalized to LF first; the split delimiter is a run of
/// two or more newlines. Each non-empty paragraph contributes one
/// `<p_{index}>{trimmed}</p_{index}>` block terminated by a line break.
pub fn tag_manuscript(text: &str) -> TaggedManuscript {
    let normalized_newlines = text.replace("\r\n", "\n").replace('\r', "\n");

    let blank_lines = Regex::new(r"\n{2,}").unwrap();

    let mut paragraphs = Vec::new();
    let mut corpus = String::new();

    for (index, chunk) in blank_lines.split(&normalized_newlines).enumerate() {
        let trimmed = chunk.trim();
        if trimmed.is_empty() {
            paragraphs.push(Paragraph {
                index,
                raw: chunk.to_string(),
                normalized: None,
            });
            continue;
        }

        corpus.push_str(&format!("<p_{index}>{trimmed}</p_{index}>\n"));
        paragraphs.push(Paragraph {
            index,
            raw: chunk.to_string(),
            normalized: Some(trimmed.to_string()),
        });
    }

    tracing::debug!(
        paragraphs = paragraphs.len(),
        tagged = paragraphs.iter().filter(|p| p.is_tagged()).count(),
        "Manuscript tagged"
    );

    TaggedManuscript {
        table: ParagraphTable { paragraphs },
        corpus,
    }
}
