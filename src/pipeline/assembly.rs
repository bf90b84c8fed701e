//! Chapter assembly: map validated index ranges back onto paragraphs and
//! produce chapter bodies.
//!
//! This is a pure read over the paragraph table: the table is never mutated,
//! so assembling the same boundary twice always yields the same body and the
//! stage is safe to re-invoke (or parallelize) as-is.

use super::tagging::ParagraphTable;
use super::validate::BookMetadata;

/// Separator substituted for internal line breaks when the book is poetry.
const POETRY_SEPARATOR: &str = "<br/>";

/// One finished chapter, ready for the container writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chapter {
    pub title: String,
    pub body_html: String,
}

/// Assemble all chapters in metadata order.
///
/// The separator is a book-wide choice: `<br/>` for poetry (line breaks are
/// part of the work), a single space for prose (line breaks are incidental
/// wrapping). Paragraphs without a tag are skipped, so an all-empty range
/// yields an empty body.
pub fn assemble_chapters(metadata: &BookMetadata, table: &ParagraphTable) -> Vec<Chapter> {
    let separator = if metadata.is_poetry {
        POETRY_SEPARATOR
    } else {
        " "
    };

    metadata
        .chapters
        .iter()
        .map(|boundary| {
            let mut body = String::new();
            for index in boundary.first_index..=boundary.last_index {
                if let Some(text) = table.normalized(index) {
                    let flattened = text.replace('\n', separator);
                    body.push_str(&format!("<p>{flattened}</p>\n"));
                }
            }

            tracing::debug!(
                chapter = boundary.number,
                first = boundary.first_index,
                last = boundary.last_index,
                bytes = body.len(),
                "Chapter assembled"
            );

            Chapter {
                title: boundary.display_title(),
                body_html: body,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::tagging::tag_manuscript;
    use crate::pipeline::validate::{BookMetadata, ChapterBoundary};

    fn metadata(is_poetry: bool, chapters: Vec<ChapterBoundary>) -> BookMetadata {
        BookMetadata {
            title: "T".into(),
            author: "A".into(),
            is_poetry,
            chapters,
        }
    }

    fn boundary(number: u32, name: Option<&str>, first: usize, last: usize) -> ChapterBoundary {
        ChapterBoundary {
            number,
            name: name.map(str::to_string),
            first_index: first,
            last_index: last,
        }
    }

    #[test]
    fn worked_example_from_the_contract() {
        let tagged = tag_manuscript("Hello world.\n\nThis is paragraph two.\n\nThird one.");
        let meta = metadata(false, vec![boundary(1, None, 0, 2)]);

        let chapters = assemble_chapters(&meta, &tagged.table);
        assert_eq!(chapters.len(), 1);
        assert_eq!(chapters[0].title, "Chapter 1");
        assert_eq!(
            chapters[0].body_html,
            "<p>Hello world.</p>\n<p>This is paragraph two.</p>\n<p>Third one.</p>\n"
        );
    }

    #[test]
    fn prose_replaces_internal_newlines_with_spaces() {
        let tagged = tag_manuscript("wrapped\nprose\nlines");
        let meta = metadata(false, vec![boundary(1, None, 0, 0)]);

        let chapters = assemble_chapters(&meta, &tagged.table);
        assert_eq!(chapters[0].body_html, "<p>wrapped prose lines</p>\n");
    }

    #[test]
    fn poetry_replaces_internal_newlines_with_breaks() {
        let tagged = tag_manuscript("verse one\nverse two");
        let meta = metadata(true, vec![boundary(1, None, 0, 0)]);

        let chapters = assemble_chapters(&meta, &tagged.table);
        assert_eq!(chapters[0].body_html, "<p>verse one<br/>verse two</p>\n");
    }

    #[test]
    fn separator_touches_nothing_but_newlines() {
        let tagged = tag_manuscript("a < b & c\nd");
        let meta = metadata(false, vec![boundary(1, None, 0, 0)]);

        let chapters = assemble_chapters(&meta, &tagged.table);
        assert_eq!(chapters[0].body_html, "<p>a < b & c d</p>\n");
    }

    #[test]
    fn assembly_is_idempotent() {
        let tagged = tag_manuscript("line one\nline two\n\nsecond paragraph");
        let meta = metadata(true, vec![boundary(1, None, 0, 1)]);

        let once = assemble_chapters(&meta, &tagged.table);
        let twice = assemble_chapters(&meta, &tagged.table);
        assert_eq!(once, twice);
    }

    #[test]
    fn untagged_paragraphs_in_range_are_skipped() {
        let tagged = tag_manuscript("first\n\n   \n\nlast");
        let meta = metadata(false, vec![boundary(1, None, 0, 2)]);

        let chapters = assemble_chapters(&meta, &tagged.table);
        assert_eq!(chapters[0].body_html, "<p>first</p>\n<p>last</p>\n");
    }

    #[test]
    fn named_chapter_uses_its_name() {
        let tagged = tag_manuscript("text");
        let meta = metadata(false, vec![boundary(4, Some("The Road"), 0, 0)]);

        let chapters = assemble_chapters(&meta, &tagged.table);
        assert_eq!(chapters[0].title, "The Road");
    }

    #[test]
    fn chapters_come_out_in_metadata_order() {
        let tagged = tag_manuscript("one\n\ntwo\n\nthree\n\nfour");
        let meta = metadata(
            false,
            vec![boundary(1, Some("First"), 0, 1), boundary(2, None, 2, 3)],
        );

        let chapters = assemble_chapters(&meta, &tagged.table);
        assert_eq!(chapters[0].title, "First");
        assert_eq!(chapters[1].title, "Chapter 2");
        assert_eq!(chapters[1].body_html, "<p>three</p>\n<p>four</p>\n");
    }

    #[test]
    fn full_span_round_trips_the_tagged_text() {
        let text = "alpha\nbeta\n\n  \n\ngamma\n\ndelta";
        let tagged = tag_manuscript(text);
        let last = tagged.table.len() - 1;
        let meta = metadata(false, vec![boundary(1, None, 0, last)]);

        let chapters = assemble_chapters(&meta, &tagged.table);

        // Strip wrapping and separators; what remains is the concatenation of
        // every tagged paragraph's trimmed text, in order.
        let stripped: String = chapters[0]
            .body_html
            .replace("<p>", "")
            .replace("</p>\n", "\n")
            .replace(' ', "")
            .replace('\n', "");
        let expected: String = tagged
            .table
            .iter()
            .filter_map(|p| p.normalized.as_deref())
            .collect::<Vec<_>>()
            .join("")
            .replace('\n', "")
            .replace(' ', "");
        assert_eq!(stripped, expected);
    }
}
