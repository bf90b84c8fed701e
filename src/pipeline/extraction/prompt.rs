use std::path::Path;

use super::ExtractionError;

/// Read the extraction prompt template from its fixed path at startup.
pub fn load_prompt_template(path: &Path) -> Result<String, ExtractionError> {
    std::fs::read_to_string(path).map_err(|e| ExtractionError::PromptTemplate {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Assemble the full prompt: template first, tagged corpus after.
pub fn build_extraction_prompt(template: &str, tagged_corpus: &str) -> String {
    format!("{}\n{}", template.trim_end(), tagged_corpus)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn prompt_ends_with_the_corpus() {
        let prompt = build_extraction_prompt("Identify chapters.", "<p_0>text</p_0>\n");
        assert!(prompt.starts_with("Identify chapters.\n"));
        assert!(prompt.ends_with("<p_0>text</p_0>\n"));
    }

    #[test]
    fn trailing_template_whitespace_is_collapsed() {
        let prompt = build_extraction_prompt("Template\n\n\n", "<p_0>x</p_0>\n");
        assert!(prompt.starts_with("Template\n<p_0>"));
    }

    #[test]
    fn loads_template_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prompt.txt");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "You are a book structurer.").unwrap();

        let template = load_prompt_template(&path).unwrap();
        assert!(template.contains("book structurer"));
    }

    #[test]
    fn missing_template_is_reported_with_path() {
        let err = load_prompt_template(Path::new("no/such/prompt.txt")).unwrap_err();
        match err {
            ExtractionError::PromptTemplate { path, .. } => {
                assert!(path.contains("prompt.txt"))
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
