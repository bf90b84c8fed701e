//! End-to-end orchestration: manuscript in, finished e-book out.
//!
//! The run is strictly sequential: tagging completes before the extraction
//! request is issued, and assembly, cover rendering, and container writing
//! happen only after a successful, validated response.

use std::path::{Path, PathBuf};

use super::assembly::assemble_chapters;
use super::extraction::{build_extraction_prompt, parse_book_response, ExtractionClient, ExtractionError};
use super::tagging::tag_manuscript;
use super::validate::validate_book_data;
use super::PressError;
use crate::config;
use crate::cover::{CoverRenderer, TempCover};
use crate::epub::ContainerWriter;

/// Additional attempts after the first failed extraction call.
const MAX_EXTRACTION_RETRIES: usize = 2;

/// Base delay before the first retry; doubles per attempt.
const RETRY_BASE_DELAY_MS: u64 = 500;

/// The press: holds the extraction capability, the cover renderer, and the
/// container writer behind their seams, plus the prompt template loaded at
/// startup.
pub struct BookPress {
    extraction: Box<dyn ExtractionClient>,
    renderer: Box<dyn CoverRenderer>,
    writer: Box<dyn ContainerWriter>,
    prompt_template: String,
}

impl BookPress {
    pub fn new(
        extraction: Box<dyn ExtractionClient>,
        renderer: Box<dyn CoverRenderer>,
        writer: Box<dyn ContainerWriter>,
        prompt_template: String,
    ) -> Self {
        Self {
            extraction,
            renderer,
            writer,
            prompt_template,
        }
    }

    /// Press one manuscript into an e-book; returns the finished file's path.
    pub fn press(&self, input: &Path, out_dir: &Path) -> Result<PathBuf, PressError> {
        let _span = tracing::info_span!("press", input = %input.display()).entered();

        let raw_text =
            std::fs::read_to_string(input).map_err(|e| PressError::ManuscriptRead {
                path: input.display().to_string(),
                reason: e.to_string(),
            })?;
        if raw_text.trim().is_empty() {
            return Err(PressError::EmptyManuscript);
        }

        let tagged = tag_manuscript(&raw_text);
        tracing::info!(
            paragraphs = tagged.table.len(),
            tagged = tagged.table.tagged_count(),
            "Manuscript tagged"
        );

        let prompt = build_extraction_prompt(&self.prompt_template, &tagged.corpus);
        let response = self.extract_with_retry(&prompt)?;
        let raw_book = parse_book_response(&response)?;

        let validated = validate_book_data(raw_book, &tagged.table)?;
        tracing::info!(
            title = %validated.metadata.title,
            author = %validated.metadata.author,
            chapters = validated.metadata.chapters.len(),
            is_poetry = validated.metadata.is_poetry,
            "Book structure validated"
        );

        let chapters = assemble_chapters(&validated.metadata, &tagged.table);

        std::fs::create_dir_all(out_dir).map_err(|e| PressError::OutputDir {
            path: out_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let cover_path = out_dir.join(config::COVER_FILE_NAME);
        self.renderer.render(
            &validated.metadata.title,
            &validated.metadata.author,
            &cover_path,
        )?;
        // From here on the cover is cleaned up on every exit path.
        let _cover = TempCover::new(cover_path.clone());

        let out_path = self.writer.write_book(
            &validated.metadata.title,
            &validated.metadata.author,
            &cover_path,
            &chapters,
            out_dir,
        )?;

        Ok(out_path)
    }

    /// Call the extraction service, retrying transient transport failures
    /// with exponential backoff. Malformed or schema-violating responses are
    /// not retried; the same prompt would fail the same way.
    fn extract_with_retry(&self, prompt: &str) -> Result<String, ExtractionError> {
        let mut delay = std::time::Duration::from_millis(RETRY_BASE_DELAY_MS);

        for attempt in 0..=MAX_EXTRACTION_RETRIES {
            match self.extraction.generate(prompt) {
                Ok(response) => return Ok(response),
                Err(e) if is_transient(&e) && attempt < MAX_EXTRACTION_RETRIES => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        error = %e,
                        "Extraction call failed, retrying"
                    );
                    std::thread::sleep(delay);
                    delay *= 2;
                }
                Err(e) => return Err(e),
            }
        }
        unreachable!("retry loop always returns");
    }
}

/// Transport-level failures worth another attempt.
fn is_transient(e: &ExtractionError) -> bool {
    match e {
        ExtractionError::Connection(_) | ExtractionError::HttpClient(_) => true,
        ExtractionError::ApiError { status, .. } => *status == 429 || *status >= 500,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cover::renderer::BitmapCoverRenderer;
    use crate::cover::CoverError;
    use crate::epub::writer::EpubWriter;
    use crate::epub::ContainerError;
    use crate::pipeline::assembly::Chapter;
    use crate::pipeline::extraction::MockExtractionClient;
    use std::io::Write;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Extraction client that fails transiently N times, then succeeds.
    struct FailThenSucceedClient {
        fail_count: usize,
        call_count: AtomicUsize,
        response: String,
    }

    impl FailThenSucceedClient {
        fn new(fail_count: usize, response: &str) -> Self {
            Self {
                fail_count,
                call_count: AtomicUsize::new(0),
                response: response.to_string(),
            }
        }
    }

    impl ExtractionClient for FailThenSucceedClient {
        fn generate(&self, _prompt: &str) -> Result<String, ExtractionError> {
            let count = self.call_count.fetch_add(1, Ordering::SeqCst);
            if count < self.fail_count {
                Err(ExtractionError::Connection("https://example.test".into()))
            } else {
                Ok(self.response.clone())
            }
        }
    }

    /// Container writer that always fails, for cleanup-path testing.
    struct FailingWriter;

    impl ContainerWriter for FailingWriter {
        fn write_book(
            &self,
            _title: &str,
            _author: &str,
            _cover: &Path,
            _chapters: &[Chapter],
            out_dir: &Path,
        ) -> Result<PathBuf, ContainerError> {
            Err(ContainerError::Write {
                path: out_dir.display().to_string(),
                reason: "disk full".into(),
            })
        }
    }

    fn book_json() -> &'static str {
        r#"{
            "title": "Test Book",
            "author": "Test Author",
            "is_poetry": false,
            "chapters": [
                {"number": 1, "name": "",
                 "tag_index_of_first_paragraph": 0,
                 "tag_index_of_last_paragraph": 2}
            ]
        }"#
    }

    fn write_manuscript(dir: &Path) -> PathBuf {
        let path = dir.join("book.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        write!(
            file,
            "Hello world.\n\nThis is paragraph two.\n\nThird one."
        )
        .unwrap();
        path
    }

    fn press_with(extraction: Box<dyn ExtractionClient>) -> BookPress {
        BookPress::new(
            extraction,
            Box::new(BitmapCoverRenderer::new(160, 240)),
            Box::new(EpubWriter),
            "Identify the book structure.".into(),
        )
    }

    #[test]
    fn full_run_produces_an_epub_and_cleans_the_cover() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manuscript(dir.path());
        let press = press_with(Box::new(MockExtractionClient::new(book_json())));

        let out = press.press(&input, dir.path()).unwrap();
        assert_eq!(out.file_name().unwrap(), "test_book.epub");
        assert!(out.exists());
        assert!(
            !dir.path().join(config::COVER_FILE_NAME).exists(),
            "temporary cover should be removed after a successful write"
        );
    }

    #[test]
    fn missing_manuscript_is_an_input_error() {
        let dir = tempfile::tempdir().unwrap();
        let press = press_with(Box::new(MockExtractionClient::new(book_json())));

        let err = press
            .press(&dir.path().join("absent.txt"), dir.path())
            .unwrap_err();
        assert!(matches!(err, PressError::ManuscriptRead { .. }));
    }

    #[test]
    fn blank_manuscript_is_rejected_before_extraction() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blank.txt");
        std::fs::write(&input, "  \n\n \t ").unwrap();
        let press = press_with(Box::new(MockExtractionClient::new(book_json())));

        let err = press.press(&input, dir.path()).unwrap_err();
        assert!(matches!(err, PressError::EmptyManuscript));
    }

    #[test]
    fn transient_failures_are_retried() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manuscript(dir.path());
        let press = press_with(Box::new(FailThenSucceedClient::new(1, book_json())));

        let out = press.press(&input, dir.path()).unwrap();
        assert!(out.exists());
    }

    #[test]
    fn persistent_transport_failure_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manuscript(dir.path());
        let press = press_with(Box::new(FailThenSucceedClient::new(10, book_json())));

        let err = press.press(&input, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            PressError::Extraction(ExtractionError::Connection(_))
        ));
    }

    #[test]
    fn schema_violation_is_not_retried() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manuscript(dir.path());
        let press = press_with(Box::new(MockExtractionClient::new("{\"nope\": true}")));

        let err = press.press(&input, dir.path()).unwrap_err();
        assert!(matches!(
            err,
            PressError::Extraction(ExtractionError::SchemaViolation(_))
        ));
    }

    #[test]
    fn invalid_boundaries_abort_before_assembly() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manuscript(dir.path());
        let bad = r#"{
            "title": "T", "author": "A", "is_poetry": false,
            "chapters": [
                {"number": 1, "name": "",
                 "tag_index_of_first_paragraph": 0,
                 "tag_index_of_last_paragraph": 99}
            ]
        }"#;
        let press = press_with(Box::new(MockExtractionClient::new(bad)));

        let err = press.press(&input, dir.path()).unwrap_err();
        assert!(matches!(err, PressError::Validation(_)));
        assert!(!dir.path().join("t.epub").exists());
    }

    #[test]
    fn cover_is_cleaned_up_when_the_container_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let input = write_manuscript(dir.path());
        let press = BookPress::new(
            Box::new(MockExtractionClient::new(book_json())),
            Box::new(BitmapCoverRenderer::new(160, 240)),
            Box::new(FailingWriter),
            "template".into(),
        );

        let err = press.press(&input, dir.path()).unwrap_err();
        assert!(matches!(err, PressError::Container(_)));
        assert!(
            !dir.path().join(config::COVER_FILE_NAME).exists(),
            "temporary cover should be removed on the failure path too"
        );
    }

    #[test]
    fn transient_error_classification() {
        assert!(is_transient(&ExtractionError::Connection("u".into())));
        assert!(is_transient(&ExtractionError::HttpClient("timeout".into())));
        assert!(is_transient(&ExtractionError::ApiError {
            status: 503,
            body: String::new()
        }));
        assert!(is_transient(&ExtractionError::ApiError {
            status: 429,
            body: String::new()
        }));
        assert!(!is_transient(&ExtractionError::ApiError {
            status: 400,
            body: String::new()
        }));
        assert!(!is_transient(&ExtractionError::SchemaViolation("x".into())));
        assert!(!is_transient(&ExtractionError::MalformedResponse("x".into())));
    }

    #[test]
    fn cover_render_failure_propagates() {
        struct FailingRenderer;
        impl CoverRenderer for FailingRenderer {
            fn render(&self, _t: &str, _a: &str, out: &Path) -> Result<(), CoverError> {
                Err(CoverError::Write {
                    path: out.display().to_string(),
                    reason: "no fonts".into(),
                })
            }
        }

        let dir = tempfile::tempdir().unwrap();
        let input = write_manuscript(dir.path());
        let press = BookPress::new(
            Box::new(MockExtractionClient::new(book_json())),
            Box::new(FailingRenderer),
            Box::new(EpubWriter),
            "template".into(),
        );

        let err = press.press(&input, dir.path()).unwrap_err();
        assert!(matches!(err, PressError::Cover(_)));
    }
}
